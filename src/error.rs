//! Error type shared by the connection, cursor and driver layers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Error reported by the bundled SQLite client.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The connection failed to open; carries the opening error message.
    #[error("not connected: {0}")]
    NotConnected(String),

    /// The SQL text contains no statement, only whitespace or comments.
    #[error("empty SQL statement")]
    EmptyStatement,

    /// An earlier attempt to fetch the rows of a result failed.
    #[error("result fetch failed earlier: {0}")]
    FetchFailed(String),

    #[error("unknown driver: {0}")]
    UnknownDriver(String),

    #[error("invalid dsn: {0}")]
    InvalidDsn(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("logging error: {0}")]
    Logging(String),

    /// Error raised by a third-party driver.
    #[error(transparent)]
    Driver(#[from] anyhow::Error),
}

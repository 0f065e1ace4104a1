//! Minimal SQL connection and result cursor wrapper for the Runar ecosystem.
//!
//! # Intention
//!
//! - Open a connection, run raw or parameterized queries, and read results
//!   through a small cursor object.
//! - Keep the driver behind a narrow capability interface ([`driver`]) so the
//!   wrapper adds only binding dispatch, memoized row fetching and cursor state.
//!
//! # Architectural Boundaries
//!
//! - No pooling, transactions, schema management or query building.
//! - Driver-specific code lives in [`sqlite`]; everything else is driver agnostic.

pub mod config;
pub mod connection;
pub mod cursor;
pub mod driver;
pub mod error;
pub mod logging;
pub mod sqlite;
pub mod value;

pub use config::{DatabaseConfig, Dsn};
pub use connection::Connection;
pub use cursor::ResultCursor;
pub use driver::{ClientConnection, Driver, StatementHandle};
pub use error::{Error, Result};
pub use value::{Params, Row, SqlQuery, Value};

/// Build [`Params`] from a list of values, in binding order.
///
/// ```
/// let params = minidb::params![1, "two", 3.0];
/// assert_eq!(params.len(), 3);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Params::new()$(.with_value($value))+
    };
}

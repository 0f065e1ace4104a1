//! Capability interface to the underlying SQL client.
//!
//! A [`Driver`] opens client connections; a [`ClientConnection`] executes
//! statements; a [`StatementHandle`] hands out the rows and counts of one
//! executed statement. The wrapper in [`crate::connection`] and
//! [`crate::cursor`] talks to clients only through these traits.

use crate::config::Dsn;
use crate::error::{Error, Result};
use crate::sqlite::SqliteDriver;
use crate::value::{Row, Value};

pub trait Driver {
    /// Driver kind as it appears in a DSN
    fn name(&self) -> &str;

    fn open(&self, dsn: &Dsn, username: &str, password: &str) -> Result<Box<dyn ClientConnection>>;
}

pub trait ClientConnection {
    /// Prepare `sql`, bind `params` positionally and execute it.
    fn prepare_and_execute<'c>(
        &'c self,
        sql: &str,
        params: &[Value],
    ) -> Result<Box<dyn StatementHandle + 'c>>;

    /// Execute `sql` as-is, without parameter binding.
    fn execute_raw<'c>(&'c self, sql: &str) -> Result<Box<dyn StatementHandle + 'c>>;

    fn last_insert_id(&self) -> Result<i64>;

    /// Quote and escape `value` as a SQL string literal.
    fn quote(&self, value: &str) -> Result<String>;
}

/// An executed statement.
///
/// Statements are forward-only: once `fetch_all_rows` has returned the
/// rows, a second call yields an empty vector.
pub trait StatementHandle {
    fn fetch_all_rows(&mut self) -> Result<Vec<Row>>;

    /// Rows changed by the statement, as reported by the client.
    fn row_count(&self) -> u64;

    fn column_names(&self) -> Vec<String>;
}

/// Look up a built-in driver by kind.
pub fn for_kind(kind: &str) -> Result<Box<dyn Driver>> {
    match kind.to_ascii_lowercase().as_str() {
        "sqlite" | "sqlite3" => Ok(Box::new(SqliteDriver)),
        _ => Err(Error::UnknownDriver(kind.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_sqlite_aliases() {
        assert_eq!(for_kind("sqlite").unwrap().name(), "sqlite");
        assert_eq!(for_kind("SQLite3").unwrap().name(), "sqlite");
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(matches!(for_kind("oracle"), Err(Error::UnknownDriver(k)) if k == "oracle"));
    }
}

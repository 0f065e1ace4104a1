//! Result cursor over one executed statement.
//!
//! Rows are pulled from the statement the first time they are needed and
//! cached; statements are forward-only, so the cache is the only copy.

use std::fmt;

use tracing::{trace, warn};

use crate::connection::Connection;
use crate::driver::StatementHandle;
use crate::error::{Error, Result};
use crate::value::Row;

/// State of the row cache. A fetch is attempted at most once.
enum Materialized {
    Pending,
    Rows(Vec<Row>),
    Failed(String),
}

pub struct ResultCursor<'c> {
    statement: Box<dyn StatementHandle + 'c>,
    connection: &'c Connection,
    rows: Materialized,
    position: usize,
}

impl<'c> ResultCursor<'c> {
    /// Wrap an executed statement. No rows are fetched here.
    pub fn new(statement: Box<dyn StatementHandle + 'c>, connection: &'c Connection) -> Self {
        Self {
            statement,
            connection,
            rows: Materialized::Pending,
            position: 0,
        }
    }

    /// All rows of the result, fetched on first call and cached afterwards.
    ///
    /// A failed fetch is returned as-is the first time; every later call
    /// answers [`Error::FetchFailed`] instead of reading the statement again.
    pub fn result(&mut self) -> Result<&[Row]> {
        if let Materialized::Pending = self.rows {
            match self.statement.fetch_all_rows() {
                Ok(rows) => {
                    trace!(rows = rows.len(), "materialized result rows");
                    self.rows = Materialized::Rows(rows);
                }
                Err(err) => {
                    warn!(error = %err, "fetching result rows failed");
                    self.rows = Materialized::Failed(err.to_string());
                    return Err(err);
                }
            }
        }
        match &self.rows {
            Materialized::Rows(rows) => Ok(rows.as_slice()),
            Materialized::Failed(reason) => Err(Error::FetchFailed(reason.clone())),
            Materialized::Pending => Ok(&[][..]),
        }
    }

    /// Number of rows fetched, not the number changed; see [`ResultCursor::affected_rows`].
    pub fn num_rows(&mut self) -> Result<usize> {
        Ok(self.result()?.len())
    }

    /// Row at `index`, without moving the cursor.
    pub fn row_at(&mut self, index: usize) -> Result<Option<&Row>> {
        Ok(self.result()?.get(index))
    }

    /// Row under the cursor, then advance.
    ///
    /// Returns `None` once every row has been read, and keeps returning
    /// `None` on later calls:
    ///
    /// ```no_run
    /// # fn main() -> minidb::Result<()> {
    /// # let conn = minidb::Connection::connect(&minidb::DatabaseConfig::in_memory())?;
    /// let mut cursor = conn.query("SELECT name FROM users")?;
    /// while let Some(row) = cursor.next_row()? {
    ///     println!("{:?}", row.get("name"));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn next_row(&mut self) -> Result<Option<&Row>> {
        let position = self.position;
        if position >= self.result()?.len() {
            return Ok(None);
        }
        self.position += 1;
        Ok(self.result()?.get(position))
    }

    /// Current cursor position, i.e. the index `next_row` reads next.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Rows changed by the statement as reported by the client.
    pub fn affected_rows(&self) -> u64 {
        self.statement.row_count()
    }

    /// Id generated by the most recent insert on the owning connection.
    pub fn insert_id(&self) -> Result<i64> {
        self.connection.last_insert_id()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.statement.column_names()
    }
}

impl fmt::Debug for ResultCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCursor")
            .field("dsn", self.connection.dsn())
            .field(
                "rows",
                &match &self.rows {
                    Materialized::Rows(rows) => Some(rows.len()),
                    _ => None,
                },
            )
            .field("position", &self.position)
            .finish()
    }
}

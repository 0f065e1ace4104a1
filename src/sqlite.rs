//! SQLite client built on `rusqlite`.
//!
//! SQLite has no server or accounts: the DSN `dbname` is the database file
//! path (or `:memory:`), while host, username and password are ignored.
//!
//! Statements run to completion when executed. Result rows are buffered in
//! the statement handle and handed out once by `fetch_all_rows`.

use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use tracing::{debug, trace};

use crate::config::Dsn;
use crate::driver::{ClientConnection, Driver, StatementHandle};
use crate::error::{Error, Result};
use crate::value::{Row, Value};

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Integer(i) => ToSqlOutput::from(*i),
            Value::Real(f) => ToSqlOutput::from(*f),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
            Value::Blob(b) => ToSqlOutput::from(b.as_slice()),
            Value::Boolean(b) => ToSqlOutput::from(i64::from(*b)),
        })
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

/// Driver for the `sqlite` DSN kind
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDriver;

impl Driver for SqliteDriver {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn open(&self, dsn: &Dsn, _username: &str, _password: &str) -> Result<Box<dyn ClientConnection>> {
        let connection = rusqlite::Connection::open(&dsn.database)?;
        Ok(Box::new(SqliteConnection { connection }))
    }
}

pub struct SqliteConnection {
    connection: rusqlite::Connection,
}

impl SqliteConnection {
    /// Wrap an existing rusqlite connection, e.g. one opened with custom flags.
    pub fn new(connection: rusqlite::Connection) -> Self {
        Self { connection }
    }

    fn run(&self, sql: &str, params: Option<&[Value]>) -> Result<SqliteStatement> {
        // sqlite prepares nothing for these and stepping it fails with "not an error"
        if is_empty_sql(sql) {
            return Err(Error::EmptyStatement);
        }
        let mut stmt = self.connection.prepare(sql)?;

        if let Some(params) = params {
            let expected = stmt.parameter_count();
            if expected != params.len() {
                return Err(rusqlite::Error::InvalidParameterCount(params.len(), expected).into());
            }
            for (index, value) in params.iter().enumerate() {
                stmt.raw_bind_parameter(index + 1, value)?;
            }
        }

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let readonly = stmt.readonly();

        let mut rows = Vec::new();
        if columns.is_empty() {
            stmt.raw_execute()?;
        } else {
            let mut cursor = stmt.raw_query();
            while let Some(row) = cursor.next()? {
                let mut record = Row::new();
                for (index, name) in columns.iter().enumerate() {
                    record.insert(name.as_str(), Value::from(row.get_ref(index)?));
                }
                rows.push(record);
            }
        }

        // sqlite3_changes keeps the count of the last write, so reads report zero
        let changes = if readonly {
            0
        } else {
            self.connection.changes()
        };
        trace!(rows = rows.len(), changes, "sqlite statement finished");

        Ok(SqliteStatement {
            columns,
            rows: Some(rows),
            changes,
        })
    }
}

impl ClientConnection for SqliteConnection {
    fn prepare_and_execute<'c>(
        &'c self,
        sql: &str,
        params: &[Value],
    ) -> Result<Box<dyn StatementHandle + 'c>> {
        debug!(sql, params = params.len(), "sqlite prepare");
        Ok(Box::new(self.run(sql, Some(params))?))
    }

    fn execute_raw<'c>(&'c self, sql: &str) -> Result<Box<dyn StatementHandle + 'c>> {
        debug!(sql, "sqlite execute");
        Ok(Box::new(self.run(sql, None)?))
    }

    fn last_insert_id(&self) -> Result<i64> {
        Ok(self.connection.last_insert_rowid())
    }

    fn quote(&self, value: &str) -> Result<String> {
        let quoted = self
            .connection
            .query_row("SELECT quote(?1)", [value], |row| row.get(0))?;
        Ok(quoted)
    }
}

/// True when `sql` holds only whitespace, comments and semicolons.
fn is_empty_sql(sql: &str) -> bool {
    let mut rest = sql.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.find('\n').map_or("", |end| &after[end + 1..]);
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.find("*/").map_or("", |end| &after[end + 2..]);
        } else if let Some(after) = rest.strip_prefix(';') {
            rest = after;
        } else {
            return rest.is_empty();
        }
        rest = rest.trim_start();
    }
}

/// Buffered result of one SQLite statement
pub struct SqliteStatement {
    columns: Vec<String>,
    rows: Option<Vec<Row>>,
    changes: u64,
}

impl StatementHandle for SqliteStatement {
    fn fetch_all_rows(&mut self) -> Result<Vec<Row>> {
        Ok(self.rows.take().unwrap_or_default())
    }

    fn row_count(&self) -> u64 {
        self.changes
    }

    fn column_names(&self) -> Vec<String> {
        self.columns.clone()
    }
}

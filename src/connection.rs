//! Connection wrapper.
//!
//! Opening is fail-soft: [`Connection::open`] never returns an error, it
//! keeps the failure in [`Connection::last_error`] and every later query
//! answers with [`Error::NotConnected`]. Query-time errors from the client
//! are returned to the caller unchanged.

use std::fmt;

use tracing::{debug, error, info};

use crate::config::{DatabaseConfig, Dsn};
use crate::cursor::ResultCursor;
use crate::driver::{self, ClientConnection, Driver};
use crate::error::{Error, Result};
use crate::value::{Params, SqlQuery};

pub struct Connection {
    dsn: Dsn,
    handle: Option<Box<dyn ClientConnection>>,
    last_error: Option<Error>,
}

impl Connection {
    /// Open a connection with the driver named in `config`.
    ///
    /// Failures are stored rather than returned; check [`Connection::is_connected`].
    pub fn open(config: &DatabaseConfig) -> Self {
        let dsn = config.dsn();
        match driver::for_kind(&config.driver) {
            Ok(driver) => Self::open_with(driver.as_ref(), dsn, &config.username, &config.password),
            Err(err) => Self::failed(dsn, err),
        }
    }

    /// Like [`Connection::open`], but returns the opening error.
    pub fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut connection = Self::open(config);
        match connection.last_error.take() {
            Some(err) => Err(err),
            None => Ok(connection),
        }
    }

    /// Open through a caller-supplied driver, fail-soft like [`Connection::open`].
    pub fn open_with(driver: &dyn Driver, dsn: Dsn, username: &str, password: &str) -> Self {
        info!(dsn = %dsn, username, driver = driver.name(), "opening connection");
        match driver.open(&dsn, username, password) {
            Ok(handle) => {
                info!(dsn = %dsn, "connection established");
                Self {
                    dsn,
                    handle: Some(handle),
                    last_error: None,
                }
            }
            Err(err) => Self::failed(dsn, err),
        }
    }

    /// Wrap an already opened client connection.
    pub fn from_client(dsn: Dsn, handle: Box<dyn ClientConnection>) -> Self {
        Self {
            dsn,
            handle: Some(handle),
            last_error: None,
        }
    }

    fn failed(dsn: Dsn, err: Error) -> Self {
        error!(dsn = %dsn, error = %err, "failed to open connection");
        Self {
            dsn,
            handle: None,
            last_error: Some(err),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    /// The error that prevented the connection from opening, if any.
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    pub fn dsn(&self) -> &Dsn {
        &self.dsn
    }

    fn handle(&self) -> Result<&dyn ClientConnection> {
        match &self.handle {
            Some(handle) => Ok(&**handle),
            None => Err(Error::NotConnected(match &self.last_error {
                Some(err) => err.to_string(),
                None => "connection is not open".to_string(),
            })),
        }
    }

    /// Execute `sql` directly, without parameter binding.
    pub fn query(&self, sql: &str) -> Result<ResultCursor<'_>> {
        let handle = self.handle()?;
        debug!(sql, "query");
        let statement = handle.execute_raw(sql)?;
        Ok(ResultCursor::new(statement, self))
    }

    /// Prepare `sql` and execute it with `params` bound positionally, in order.
    pub fn query_with_params(&self, sql: &str, params: &Params) -> Result<ResultCursor<'_>> {
        let handle = self.handle()?;
        debug!(sql, params = params.len(), "query with params");
        let statement = handle.prepare_and_execute(sql, params.as_slice())?;
        Ok(ResultCursor::new(statement, self))
    }

    /// Run a [`SqlQuery`].
    ///
    /// A blank statement returns `Ok(None)` without reaching the client. A
    /// query without params is executed raw, otherwise it is prepared and
    /// its params bound.
    pub fn run(&self, query: &SqlQuery) -> Result<Option<ResultCursor<'_>>> {
        if query.is_blank() {
            return Ok(None);
        }
        let cursor = if query.params.is_empty() {
            self.query(&query.statement)?
        } else {
            self.query_with_params(&query.statement, &query.params)?
        };
        Ok(Some(cursor))
    }

    /// Quote `value` as a string literal using the client's escaping rules.
    pub fn quote(&self, value: &str) -> Result<String> {
        self.handle()?.quote(value)
    }

    /// Id generated by the most recent insert on this connection.
    pub fn last_insert_id(&self) -> Result<i64> {
        self.handle()?.last_insert_id()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("dsn", &self.dsn)
            .field("connected", &self.is_connected())
            .field("last_error", &self.last_error)
            .finish()
    }
}

//! Connection configuration and data-source descriptors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_DRIVER: &str = "sqlite";

fn default_driver() -> String {
    DEFAULT_DRIVER.to_string()
}

/// Connection settings
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Database name; for SQLite the file path or `:memory:`
    pub database: String,
    /// Driver kind, e.g. `sqlite`
    #[serde(default = "default_driver")]
    pub driver: String,
}

impl DatabaseConfig {
    /// Create a config for the default driver
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            username: username.into(),
            password: password.into(),
            database: database.into(),
            driver: default_driver(),
        }
    }

    /// In-memory SQLite database
    pub fn in_memory() -> Self {
        Self::new("", "", "", ":memory:")
    }

    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = driver.into();
        self
    }

    pub fn dsn(&self) -> Dsn {
        Dsn::new(&self.driver, &self.database, &self.hostname)
    }

    /// Read `MINIDB_HOST`, `MINIDB_USER`, `MINIDB_PASSWORD`, `MINIDB_DATABASE`
    /// and `MINIDB_DRIVER` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when `MINIDB_DATABASE` is not set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DatabaseConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = lookup("MINIDB_DATABASE")
            .ok_or_else(|| Error::Config("MINIDB_DATABASE is not set".to_string()))?;
        Ok(Self {
            hostname: lookup("MINIDB_HOST").unwrap_or_default(),
            username: lookup("MINIDB_USER").unwrap_or_default(),
            password: lookup("MINIDB_PASSWORD").unwrap_or_default(),
            database,
            driver: lookup("MINIDB_DRIVER").unwrap_or_else(default_driver),
        })
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("hostname", &self.hostname)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("driver", &self.driver)
            .finish()
    }
}

/// Data-source descriptor: `{driver}:dbname={database};host={host}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dsn {
    pub driver: String,
    pub database: String,
    pub host: String,
}

impl Dsn {
    pub fn new(driver: &str, database: &str, host: &str) -> Self {
        Self {
            driver: driver.to_string(),
            database: database.to_string(),
            host: host.to_string(),
        }
    }
}

impl fmt::Display for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:dbname={};host={}",
            self.driver, self.database, self.host
        )
    }
}

impl FromStr for Dsn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (driver, rest) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidDsn(format!("missing driver prefix in '{}'", s)))?;
        if driver.is_empty() {
            return Err(Error::InvalidDsn(format!("empty driver in '{}'", s)));
        }

        let mut dsn = Dsn::new(driver, "", "");
        for part in rest.split(';').filter(|part| !part.is_empty()) {
            match part.split_once('=') {
                Some(("dbname", value)) => dsn.database = value.to_string(),
                Some(("host", value)) => dsn.host = value.to_string(),
                // other driver options are not interpreted here
                Some(_) => {}
                None => {
                    return Err(Error::InvalidDsn(format!(
                        "expected key=value, got '{}'",
                        part
                    )))
                }
            }
        }
        Ok(dsn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn dsn_renders_driver_database_host() {
        let config = DatabaseConfig::new("db.local", "app", "secret", "shop").with_driver("mysql");
        assert_eq!(config.dsn().to_string(), "mysql:dbname=shop;host=db.local");
    }

    #[test]
    fn dsn_parses_back() {
        let dsn: Dsn = "sqlite:dbname=/tmp/app.db;host=".parse().unwrap();
        assert_eq!(dsn, Dsn::new("sqlite", "/tmp/app.db", ""));

        let dsn: Dsn = "mysql:host=h;dbname=d;charset=utf8".parse().unwrap();
        assert_eq!(dsn, Dsn::new("mysql", "d", "h"));
    }

    #[test]
    fn dsn_rejects_malformed_input() {
        assert!(matches!("dbname=x".parse::<Dsn>(), Err(Error::InvalidDsn(_))));
        assert!(matches!(":dbname=x".parse::<Dsn>(), Err(Error::InvalidDsn(_))));
        assert!(matches!("sqlite:dbname".parse::<Dsn>(), Err(Error::InvalidDsn(_))));
    }

    #[test]
    fn driver_defaults_when_deserializing() {
        let config: DatabaseConfig =
            serde_json::from_str(r#"{"database": ":memory:", "username": "u"}"#).unwrap();
        assert_eq!(config.driver, DEFAULT_DRIVER);
        assert_eq!(config.username, "u");
        assert_eq!(config.hostname, "");
    }

    #[test]
    fn from_lookup_requires_database() {
        let vars: HashMap<&str, &str> = HashMap::from([("MINIDB_USER", "app")]);
        let err = DatabaseConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let vars: HashMap<&str, &str> =
            HashMap::from([("MINIDB_DATABASE", "app.db"), ("MINIDB_PASSWORD", "pw")]);
        let config = DatabaseConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.database, "app.db");
        assert_eq!(config.password, "pw");
        assert_eq!(config.driver, DEFAULT_DRIVER);
    }

    #[test]
    fn debug_hides_password() {
        let config = DatabaseConfig::new("h", "u", "hunter2", "d");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }
}

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Core value types for SQL parameters and row fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Boolean(bool),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer view of the value; booleans read as 0/1.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Boolean(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(b) => Some(b),
            Value::Text(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Integer(i) => Some(*i != 0),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Blob(value.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Positional parameter bindings for SQL queries
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Params {
    pub values: Vec<Value>,
}

impl Params {
    /// Create an empty Params object
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next positional value
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.values.push(value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        Self { values }
    }
}

impl<V: Into<Value>> FromIterator<V> for Params {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// SQL statement with its positional parameters.
///
/// A blank statement stands for "nothing to run": [`Connection::run`]
/// answers it with `Ok(None)` and never reaches the driver.
///
/// [`Connection::run`]: crate::Connection::run
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub statement: String,
    pub params: Params,
}

impl SqlQuery {
    pub fn new(statement: &str) -> Self {
        Self {
            statement: statement.to_string(),
            params: Params::new(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn is_blank(&self) -> bool {
        self.statement.trim().is_empty()
    }
}

/// One fetched row: column name to value, in column order.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: IndexMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column; a repeated column name keeps its position and takes the new value.
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.fields.insert(column.into(), value);
    }

    pub fn with_value(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.insert(column, value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_converts_to_null() {
        let missing: Option<i64> = None;
        assert_eq!(Value::from(missing), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    }

    #[test]
    fn params_keep_binding_order() {
        let params = Params::new().with_value(1).with_value("two").with_value(3.5);
        assert_eq!(
            params.as_slice(),
            &[
                Value::Integer(1),
                Value::Text("two".to_string()),
                Value::Real(3.5)
            ]
        );
        assert_eq!(crate::params![1, "two", 3.5], params);
        assert!(crate::params![].is_empty());
    }

    #[test]
    fn repeated_column_overwrites() {
        let row = Row::new()
            .with_value("id", 1)
            .with_value("name", "x")
            .with_value("id", 2);
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("id"), Some(&Value::Integer(2)));
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["id", "name"]);
    }

    #[test]
    fn row_serializes_as_ordered_map() {
        let row = Row::new()
            .with_value("name", "Ada")
            .with_value("age", 36)
            .with_value("email", Value::Null);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"name":"Ada","age":36,"email":null}"#);
    }

    #[test]
    fn row_deserializes_in_column_order() {
        let row: Row =
            serde_json::from_str(r#"{"id": 7, "score": 1.5, "name": "Ada", "gone": null, "ok": true, "raw": [1, 2]}"#)
                .unwrap();
        assert_eq!(
            row.columns().collect::<Vec<_>>(),
            vec!["id", "score", "name", "gone", "ok", "raw"]
        );
        assert_eq!(row.get("id"), Some(&Value::Integer(7)));
        assert_eq!(row.get("score"), Some(&Value::Real(1.5)));
        assert_eq!(row.get("ok"), Some(&Value::Boolean(true)));
        assert_eq!(row.get("raw"), Some(&Value::Blob(vec![1, 2])));
        assert!(row.get("gone").is_some_and(Value::is_null));
        assert!(row.iter().all(|(name, value)| row.get(name) == Some(value)));
        assert!(!row.is_empty());
        assert!(Row::new().is_empty());
    }

    #[test]
    fn scalar_accessors() {
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Real(0.25).as_f64(), Some(0.25));
        assert_eq!(Value::Text("x".to_string()).as_f64(), None);

        assert_eq!(Value::Integer(0).as_bool(), Some(false));
        assert_eq!(Value::Integer(2).as_bool(), Some(true));
        assert_eq!(Value::Boolean(true).as_i64(), Some(1));
        assert_eq!(Value::Null.as_bool(), None);

        assert_eq!(Value::from(vec![9u8]).as_bytes(), Some(&[9u8][..]));
        assert_eq!(Value::from("ab").as_bytes(), Some(&b"ab"[..]));
        assert_eq!(Value::Integer(1).as_bytes(), None);

        assert!(Value::Null.is_null());
        assert!(!Value::Integer(0).is_null());
    }

    #[test]
    fn blank_query_detection() {
        assert!(SqlQuery::new("  \n").is_blank());
        assert!(!SqlQuery::new("SELECT 1").is_blank());
    }
}

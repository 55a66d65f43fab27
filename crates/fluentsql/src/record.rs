//! Generic result rows.

use crate::error::{DbError, DbResult};
use crate::value::{FromValue, Value};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;

/// One result row: an ordered column name → [`Value`] mapping.
///
/// Rows of the same result set share one column list.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Record {
    /// Build a record. `values` must line up with `columns`.
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> DbResult<Self> {
        if columns.len() != values.len() {
            return Err(DbError::driver(format!(
                "row has {} values for {} columns",
                values.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, values })
    }

    /// Build a record from `(column, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let (columns, values): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self {
            columns: columns.into(),
            values,
        }
    }

    /// Number of columns.
    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn has_field(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.position(column).map(|i| &self.values[i])
    }

    /// Text value of `column`, if present and textual.
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    /// Integer value of `column`, if present and integral.
    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_i64)
    }

    /// Decode `column` into `T`.
    ///
    /// A missing column is a decode error; a NULL decodes only into `Option`.
    pub fn try_get<T: FromValue>(&self, column: &str) -> DbResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| DbError::decode(column, "column not found in result"))?;
        T::from_value(value, column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A fully materialized result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Records {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Records {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    /// Rows as positional value lists aligned with [`Records::columns`].
    pub fn into_tuples(self) -> Vec<Vec<Value>> {
        self.records.into_iter().map(Record::into_values).collect()
    }
}

impl IntoIterator for Records {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record::from_pairs([
            ("id", Value::Int(5)),
            ("name", Value::Text("Ann".into())),
            ("email", Value::Null),
        ])
    }

    #[test]
    fn lookups() {
        let r = sample();
        assert_eq!(r.count(), 3);
        assert!(r.has_field("name"));
        assert!(!r.has_field("age"));
        assert_eq!(r.get_str("name"), Some("Ann"));
        assert_eq!(r.get_i64("id"), Some(5));
        assert_eq!(r.get_i64("name"), None);
        assert_eq!(r.get_str("missing"), None);
    }

    #[test]
    fn try_get_handles_null_and_missing() {
        let r = sample();
        assert_eq!(r.try_get::<Option<String>>("email").unwrap(), None);
        assert!(r.try_get::<String>("email").is_err());
        let err = r.try_get::<i64>("age").unwrap_err();
        assert!(matches!(err, DbError::Decode { ref column, .. } if column == "age"));
    }

    #[test]
    fn new_rejects_misaligned_row() {
        let cols: Arc<[String]> = vec!["a".to_string()].into();
        assert!(Record::new(cols, vec![]).is_err());
    }

    #[test]
    fn serializes_in_column_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"id":5,"name":"Ann","email":null}"#);
    }

    #[test]
    fn tuples_keep_column_alignment() {
        let rs = Records {
            columns: vec!["id".into(), "name".into(), "email".into()],
            records: vec![sample()],
        };
        let tuples = rs.into_tuples();
        assert_eq!(
            tuples,
            vec![vec![Value::Int(5), Value::Text("Ann".into()), Value::Null]]
        );
    }
}

//! Dynamically-typed scalar values carried in records and parameters.

use crate::error::{DbError, DbResult};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::fmt;

/// A single SQL scalar.
///
/// Result cells and bound parameters are both expressed as `Value`, so a
/// record can be fed straight back into a statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL
    Null,
    /// Boolean / BIT(1)
    Bool(bool),
    /// Any integer column, widened to 64 bits
    Int(i64),
    /// Floating point column
    Float(f64),
    /// Exact numeric (DECIMAL / NUMERIC) column
    Decimal(Decimal),
    /// Character data
    Text(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// Date and time without zone
    DateTime(NaiveDateTime),
}

impl Value {
    /// Returns `true` for SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the variant, used in decode error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::DateTime(_) => "datetime",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::Text(s) => f.write_str(s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::DateTime(dt) => write!(f, "{dt}"),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Typed extraction from a [`Value`].
///
/// `Option<T>` maps `Null` to `None`; every other target rejects `Null`
/// with a decode error instead of panicking.
pub trait FromValue: Sized {
    /// Convert `value` (read from `column`) into `Self`.
    fn from_value(value: &Value, column: &str) -> DbResult<Self>;
}

fn mismatch(column: &str, expected: &str, got: &Value) -> DbError {
    DbError::decode(column, format!("expected {expected}, got {}", got.kind()))
}

impl FromValue for Value {
    fn from_value(value: &Value, _column: &str) -> DbResult<Self> {
        Ok(value.clone())
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value, column: &str) -> DbResult<Self> {
        value.as_i64().ok_or_else(|| mismatch(column, "int", value))
    }
}

macro_rules! impl_from_value_narrow {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                fn from_value(value: &Value, column: &str) -> DbResult<Self> {
                    let wide = i64::from_value(value, column)?;
                    <$t>::try_from(wide).map_err(|e| DbError::decode(column, e.to_string()))
                }
            }
        )*
    };
}

impl_from_value_narrow!(i8, i16, i32, u8, u16, u32, u64);

impl FromValue for f64 {
    fn from_value(value: &Value, column: &str) -> DbResult<Self> {
        value.as_f64().ok_or_else(|| mismatch(column, "float", value))
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value, column: &str) -> DbResult<Self> {
        Ok(f64::from_value(value, column)? as f32)
    }
}

impl FromValue for Decimal {
    fn from_value(value: &Value, column: &str) -> DbResult<Self> {
        match value {
            Value::Decimal(d) => Ok(*d),
            Value::Int(i) => Ok(Decimal::from(*i)),
            Value::Float(f) => {
                Decimal::try_from(*f).map_err(|e| DbError::decode(column, e.to_string()))
            }
            // MySQL-style drivers hand back DECIMAL as text
            Value::Text(s) => s
                .trim()
                .parse()
                .map_err(|e: rust_decimal::Error| DbError::decode(column, e.to_string())),
            other => Err(mismatch(column, "decimal", other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value, column: &str) -> DbResult<Self> {
        value.as_bool().ok_or_else(|| mismatch(column, "bool", value))
    }
}

impl FromValue for String {
    fn from_value(value: &Value, column: &str) -> DbResult<Self> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            // MySQL-style drivers hand back VARCHAR as raw bytes
            Value::Bytes(b) => String::from_utf8(b.clone())
                .map_err(|e| DbError::decode(column, e.to_string())),
            other => Err(mismatch(column, "text", other)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value, column: &str) -> DbResult<Self> {
        match value {
            Value::Bytes(b) => Ok(b.clone()),
            Value::Text(s) => Ok(s.clone().into_bytes()),
            other => Err(mismatch(column, "bytes", other)),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: &Value, column: &str) -> DbResult<Self> {
        match value {
            Value::DateTime(dt) => Ok(*dt),
            other => Err(mismatch(column, "datetime", other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value, column: &str) -> DbResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other, column).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_maps_null() {
        let v: Value = None::<i32>.into();
        assert!(v.is_null());
        assert_eq!(Option::<i64>::from_value(&v, "age").unwrap(), None);
        assert_eq!(
            Option::<i64>::from_value(&Value::Int(3), "age").unwrap(),
            Some(3)
        );
    }

    #[test]
    fn null_into_scalar_is_decode_error() {
        let err = i64::from_value(&Value::Null, "age").unwrap_err();
        assert!(matches!(err, DbError::Decode { ref column, .. } if column == "age"));
    }

    #[test]
    fn narrowing_checks_range() {
        assert_eq!(i32::from_value(&Value::Int(30), "age").unwrap(), 30);
        assert!(i8::from_value(&Value::Int(300), "age").is_err());
    }

    #[test]
    fn string_from_bytes() {
        let v = Value::Bytes(b"Ann".to_vec());
        assert_eq!(String::from_value(&v, "name").unwrap(), "Ann");
    }

    #[test]
    fn bool_from_bit() {
        assert!(bool::from_value(&Value::Int(1), "active").unwrap());
        assert!(!bool::from_value(&Value::Bool(false), "active").unwrap());
    }

    #[test]
    fn decimal_extraction() {
        let price = Decimal::new(15, 1);
        assert_eq!(Decimal::from_value(&Value::Decimal(price), "price").unwrap(), price);
        assert_eq!(Decimal::from_value(&Value::from("1.50000"), "price").unwrap(), price);
        assert_eq!(f64::from_value(&Value::Decimal(price), "price").unwrap(), 1.5);
        assert!(Decimal::from_value(&Value::from("n/a"), "price").is_err());
        assert!(Decimal::from_value(&Value::Bool(true), "price").is_err());
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Int(5),
            Value::Text("x".into()),
            Value::Null,
        ])
        .unwrap();
        assert_eq!(json, r#"[5,"x",null]"#);
    }
}

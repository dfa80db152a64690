//! SQL literal values

use crate::types::DataType;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use uuid::Uuid;

/// A SQL value as it appears in a literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    // Null
    Null,
    // Boolean
    Bool(bool),
    // Integer types
    I16(i16),
    I32(i32),
    I64(i64),
    // Float types
    F32(f32),
    F64(f64),
    // Decimal
    Decimal(Decimal),
    // String
    Str(String),
    // Date/Time types
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    // Special types
    Uuid(Uuid),
    Bytea(Vec<u8>),
    Inet(IpAddr),
}

impl Value {
    /// Create an I64 value (most common integer type)
    pub fn integer(i: i64) -> Self {
        Value::I64(i)
    }

    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Create a boolean value
    pub fn boolean(b: bool) -> Self {
        Value::Bool(b)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the data type of this value
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Null,
            Value::Bool(_) => DataType::Bool,
            Value::I16(_) => DataType::I16,
            Value::I32(_) => DataType::I32,
            Value::I64(_) => DataType::I64,
            Value::F32(_) => DataType::F32,
            Value::F64(_) => DataType::F64,
            Value::Decimal(_) => DataType::Decimal(None, None),
            Value::Str(_) => DataType::Str,
            Value::Date(_) => DataType::Date,
            Value::Time(_) => DataType::Time,
            Value::Timestamp(_) => DataType::Timestamp,
            Value::Uuid(_) => DataType::Uuid,
            Value::Bytea(_) => DataType::Bytea,
            Value::Inet(_) => DataType::Inet,
        }
    }

    /// Check whether this value is acceptable for a declared data type.
    ///
    /// This is an exact-variant check, not a coercion: the only latitude is
    /// that string values satisfy both string types, decimal values satisfy
    /// any precision/scale, and NULL satisfies only the NULL type.
    pub fn matches_type(&self, expected: &DataType) -> bool {
        match (self, expected) {
            (Value::Str(_), DataType::Str | DataType::Text) => true,
            (Value::Decimal(_), DataType::Decimal(_, _)) => true,
            _ => self.data_type() == *expected,
        }
    }
}

// Formats values as SQL literal text.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I16(i) => write!(f, "{}", i),
            Value::I32(i) => write!(f, "{}", i),
            Value::I64(i) => write!(f, "{}", i),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Str(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Date(d) => write!(f, "'{}'", d),
            Value::Time(t) => write!(f, "'{}'", t),
            Value::Timestamp(ts) => write!(f, "'{}'", ts),
            Value::Uuid(u) => write!(f, "'{}'", u),
            Value::Bytea(b) => write!(f, "x'{}'", hex::encode(b)),
            Value::Inet(ip) => write!(f, "'{}'", ip),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_of_values() {
        assert_eq!(Value::Null.data_type(), DataType::Null);
        assert_eq!(Value::Bool(true).data_type(), DataType::Bool);
        assert_eq!(Value::integer(7).data_type(), DataType::I64);
        assert_eq!(Value::string("a").data_type(), DataType::Str);
    }

    #[test]
    fn test_matches_type() {
        assert!(Value::string("a").matches_type(&DataType::Str));
        assert!(Value::string("a").matches_type(&DataType::Text));
        assert!(Value::Decimal(Decimal::new(100, 2)).matches_type(&DataType::Decimal(Some(5), Some(2))));
        assert!(Value::Null.matches_type(&DataType::Null));

        assert!(!Value::Null.matches_type(&DataType::I64));
        assert!(!Value::integer(1).matches_type(&DataType::Str));
        assert!(!Value::Bool(true).matches_type(&DataType::I64));
    }

    #[test]
    fn test_display_as_sql_literals() {
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::integer(42).to_string(), "42");
        assert_eq!(Value::string("it's").to_string(), "'it''s'");
        assert_eq!(Value::Bytea(vec![0xde, 0xad]).to_string(), "x'dead'");
        assert_eq!(Value::Null.to_string(), "NULL");
    }
}

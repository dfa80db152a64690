//! SQL data types used during analysis

use serde::{Deserialize, Serialize};
use std::fmt;

/// SQL data types
///
/// `Null` is the type of an untyped NULL literal or an unbound parameter.
/// It is compatible with every other type and only becomes concrete once
/// the value is used in a typed position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    // Boolean
    Bool,
    // Integer types
    I16,
    I32,
    I64,
    // Float types
    F32,
    F64,
    // Decimal with optional precision and scale
    Decimal(Option<u32>, Option<u32>),
    // String types
    Str,
    Text,
    // Date/Time types
    Date,
    Time,
    Timestamp,
    // Special types
    Uuid,
    Bytea,
    Inet,
    // The type of NULL literals and unhinted parameters
    Null,
}

impl DataType {
    /// Check if this type is numeric (integer, float, or decimal)
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::I16
                | DataType::I32
                | DataType::I64
                | DataType::F32
                | DataType::F64
                | DataType::Decimal(_, _)
        )
    }

    /// Check if this type is an integer
    pub fn is_integer(&self) -> bool {
        matches!(self, DataType::I16 | DataType::I32 | DataType::I64)
    }

    /// Check if this type holds character data
    pub fn is_string(&self) -> bool {
        matches!(self, DataType::Str | DataType::Text)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Bool => write!(f, "BOOLEAN"),
            DataType::I16 => write!(f, "SMALLINT"),
            DataType::I32 => write!(f, "INT"),
            DataType::I64 => write!(f, "BIGINT"),
            DataType::F32 => write!(f, "REAL"),
            DataType::F64 => write!(f, "DOUBLE PRECISION"),
            DataType::Decimal(p, s) => match (p, s) {
                (Some(p), Some(s)) => write!(f, "DECIMAL({}, {})", p, s),
                (Some(p), None) => write!(f, "DECIMAL({})", p),
                _ => write!(f, "DECIMAL"),
            },
            DataType::Str | DataType::Text => write!(f, "VARCHAR"),
            DataType::Date => write!(f, "DATE"),
            DataType::Time => write!(f, "TIME"),
            DataType::Timestamp => write!(f, "TIMESTAMP"),
            DataType::Uuid => write!(f, "UUID"),
            DataType::Bytea => write!(f, "BYTEA"),
            DataType::Inet => write!(f, "INET"),
            DataType::Null => write!(f, "NULL"),
        }
    }
}

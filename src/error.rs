//! Error types for SQL analysis

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Naming errors
    #[error("Relation already exists: {0}")]
    RelationAlreadyExists(String),

    #[error("Relation not found: {0}")]
    RelationNotFound(String),

    #[error("Relation appears twice in the same FROM clause: {0}")]
    DuplicateRelation(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column is ambiguous: {0}")]
    AmbiguousColumn(String),

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    // Type errors
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    // Write-capability errors
    #[error("Relation {0} is read-only and does not allow writes")]
    ReadOnlyRelation(String),

    #[error("Column {0} is generated and cannot be written to")]
    GeneratedColumn(String),

    // Printer errors
    #[error("Cannot format statement: {0}")]
    UnsupportedStatement(String),

    // System errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

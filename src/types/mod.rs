//! The SQL data model: data types, values, and schema objects.

pub mod data_type;
pub mod schema;
pub mod value;

// Re-export key types
pub use data_type::DataType;
pub use schema::{Column, ColumnIdent, Operation, QualifiedName, RelationName, Table, View};
pub use value::Value;

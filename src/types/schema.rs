//! Schema objects and relation naming
//!
//! Relations are identified two ways during analysis: by the name as it was
//! written in the statement (`QualifiedName`, possibly schema-less) and by
//! the fully resolved catalog identity (`RelationName`, always schema.name).

use super::data_type::DataType;
use crate::error::{Error, Result};
use crate::semantic::symbol::Field;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dotted name as written in a statement, e.g. `users` or `doc.users`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName(pub Vec<String>);

impl QualifiedName {
    pub fn new(parts: Vec<String>) -> Self {
        QualifiedName(parts)
    }

    /// A single-part name
    pub fn of(name: impl Into<String>) -> Self {
        QualifiedName(vec![name.into()])
    }

    /// A schema-qualified name
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        QualifiedName(vec![schema.into(), name.into()])
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// The last part of the name, e.g. `users` for `doc.users`
    pub fn last(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or("")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// The fully qualified identity of a catalog relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationName {
    pub schema: String,
    pub name: String,
}

impl RelationName {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        RelationName {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Resolve a written name against the session's default schema.
    ///
    /// One part resolves into the default schema, two parts are taken
    /// verbatim. More parts are rejected.
    pub fn of(name: &QualifiedName, default_schema: &str) -> Result<Self> {
        match name.parts() {
            [name] => Ok(RelationName::new(default_schema, name.clone())),
            [schema, name] => Ok(RelationName::new(schema.clone(), name.clone())),
            _ => Err(Error::InvalidValue(format!(
                "Invalid relation name: {name}"
            ))),
        }
    }
}

impl fmt::Display for RelationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// Column identity with an optional nested path into object columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnIdent {
    pub name: String,
    pub path: Vec<String>,
}

impl ColumnIdent {
    pub fn new(name: impl Into<String>) -> Self {
        ColumnIdent {
            name: name.into(),
            path: Vec::new(),
        }
    }

    pub fn with_path(name: impl Into<String>, path: Vec<String>) -> Self {
        ColumnIdent {
            name: name.into(),
            path,
        }
    }

    /// Render the column as dotted SQL text, e.g. `address.city`
    pub fn sql_fqn(&self) -> String {
        if self.path.is_empty() {
            self.name.clone()
        } else {
            let mut fqn = self.name.clone();
            for part in &self.path {
                fqn.push('.');
                fqn.push_str(part);
            }
            fqn
        }
    }
}

/// The operation a statement performs against the relations it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Insert,
    Update,
    Delete,
}

/// A table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name. Can't be empty.
    pub name: String,
    /// Column data type.
    pub data_type: DataType,
    /// Whether the column allows null values.
    pub nullable: bool,
    /// Whether the column value is computed. Generated columns can be read
    /// but never targeted by writes.
    pub generated: bool,
}

impl Column {
    /// Creates a new nullable column.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Column {
            name: name.into(),
            data_type,
            nullable: true,
            generated: false,
        }
    }

    /// Sets whether this column is nullable.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Marks this column as generated.
    pub fn generated(mut self) -> Self {
        self.generated = true;
        self
    }
}

/// A table schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Fully qualified table identity.
    pub name: RelationName,
    /// The table's columns. Must have at least one.
    pub columns: Vec<Column>,
    /// Read-only tables (system tables) reject every write operation.
    pub read_only: bool,
}

impl Table {
    /// Creates a new table schema.
    pub fn new(name: RelationName, columns: Vec<Column>) -> Result<Self> {
        if name.schema.is_empty() || name.name.is_empty() {
            return Err(Error::InvalidValue("Table name cannot be empty".into()));
        }
        if columns.is_empty() {
            return Err(Error::InvalidValue(format!(
                "Table {} must have at least one column",
                name
            )));
        }
        for (i, column) in columns.iter().enumerate() {
            if column.name.is_empty() {
                return Err(Error::InvalidValue("Column name cannot be empty".into()));
            }
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(Error::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Table {
            name,
            columns,
            read_only: false,
        })
    }

    /// Marks this table as read-only.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Returns the column with the given name, if it exists.
    pub fn get_column(&self, name: &str) -> Option<(usize, &Column)> {
        self.columns
            .iter()
            .enumerate()
            .find(|(_, c)| c.name == name)
    }

    /// Check that this table supports the given operation.
    pub fn check_operation(&self, operation: Operation) -> Result<()> {
        if self.read_only && operation != Operation::Read {
            return Err(Error::ReadOnlyRelation(self.name.to_string()));
        }
        Ok(())
    }
}

/// A persisted view: the canonical definition text plus the analyzed output
/// fields, so a view used in FROM resolves without re-analyzing its query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub name: RelationName,
    pub definition: String,
    pub fields: Vec<Field>,
}

impl View {
    pub fn new(name: RelationName, definition: impl Into<String>, fields: Vec<Field>) -> Self {
        View {
            name,
            definition: definition.into(),
            fields,
        }
    }
}

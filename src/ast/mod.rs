//! Abstract Syntax Tree (AST) for SQL statements
//!
//! The statement is the root node of this tree, describing the syntactic
//! structure of a SQL statement. Built by the parser, consumed by the
//! semantic analyzer which validates it against the catalog and produces
//! a typed symbol tree.

pub mod common;
pub mod ddl;
pub mod dml;
pub mod expressions;

// Re-export commonly used types at the module level
pub use common::{FromClause, JoinType};
pub use ddl::DdlStatement;
pub use dml::{DmlStatement, SelectStatement};
pub use expressions::{Expression, Literal, Operator, ParameterExpression};

use crate::types::QualifiedName;

/// SQL statements represented as an Abstract Syntax Tree (AST).
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// DDL statements (CREATE VIEW, DROP VIEW)
    Ddl(DdlStatement),

    /// DML statements (SELECT)
    Dml(DmlStatement),
}

// Convenience constructors
impl Statement {
    /// Creates a Select statement
    pub fn select(select: SelectStatement) -> Self {
        Statement::Dml(DmlStatement::Select(Box::new(select)))
    }

    /// Creates a CreateView statement
    pub fn create_view(name: QualifiedName, replace_existing: bool, query: SelectStatement) -> Self {
        Statement::Ddl(DdlStatement::CreateView {
            name,
            replace_existing,
            query: Box::new(query),
        })
    }

    /// Creates a DropView statement
    pub fn drop_view(name: QualifiedName, if_exists: bool) -> Self {
        Statement::Ddl(DdlStatement::DropView { name, if_exists })
    }
}

//! Common AST structures shared between statement types

use super::dml::SelectStatement;
use super::expressions::Expression;
use crate::types::QualifiedName;

/// FROM clause item
#[derive(Debug, Clone, PartialEq)]
pub enum FromClause {
    /// A table or view reference, optionally aliased.
    Table {
        name: QualifiedName,
        alias: Option<String>,
    },
    /// A derived table: a parenthesized subquery with a mandatory alias.
    Subquery {
        query: Box<SelectStatement>,
        alias: String,
    },
    /// A join between two sources.
    Join {
        left: Box<FromClause>,
        right: Box<FromClause>,
        join_type: JoinType,
        /// ON: the join condition. None for CROSS JOIN.
        predicate: Option<Expression>,
    },
}

/// Join types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Cross,
    Inner,
    Left,
    Right,
    Full,
}

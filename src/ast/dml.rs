//! Data Manipulation Language (DML) statements: SELECT

use super::common::FromClause;
use super::expressions::Expression;

/// SELECT statement structure
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectStatement {
    /// Expressions to select, with an optional column alias.
    pub select: Vec<(Expression, Option<String>)>,
    /// FROM: sources to select from.
    pub from: Vec<FromClause>,
    /// WHERE: optional condition to filter rows.
    pub r#where: Option<Expression>,
}

/// DML statements
#[derive(Debug, Clone, PartialEq)]
pub enum DmlStatement {
    /// SELECT: reads rows from one or more relations.
    Select(Box<SelectStatement>),
}

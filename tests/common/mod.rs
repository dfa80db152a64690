//! Common test utilities for analysis integration tests
#![allow(dead_code)]

use std::sync::Arc;
use stratum_sql::ast::{Expression, FromClause, JoinType, SelectStatement, Statement};
use stratum_sql::catalog::{Catalog, SessionContext, TransactionContext};
use stratum_sql::semantic::statement::QueriedSelect;
use stratum_sql::semantic::{AnalyzedStatement, Analyzer, ParamBinding};
use stratum_sql::types::schema::{Column, RelationName, Table};
use stratum_sql::types::{DataType, QualifiedName};
use stratum_sql::Result;

/// Builds the catalog most tests analyze against: a writable `doc.users`
/// and `doc.orders`, plus a read-only `sys.nodes`.
pub fn setup() -> TransactionContext {
    let mut catalog = Catalog::new();
    catalog
        .add_table(
            Table::new(
                RelationName::new("doc", "users"),
                vec![
                    Column::new("id", DataType::I64).nullable(false),
                    Column::new("name", DataType::Str),
                    Column::new("active", DataType::Bool),
                ],
            )
            .unwrap(),
        )
        .unwrap();
    catalog
        .add_table(
            Table::new(
                RelationName::new("doc", "orders"),
                vec![
                    Column::new("id", DataType::I64).nullable(false),
                    Column::new("user_id", DataType::I64),
                    Column::new("total", DataType::F64),
                ],
            )
            .unwrap(),
        )
        .unwrap();
    catalog
        .add_table(
            Table::new(
                RelationName::new("sys", "nodes"),
                vec![
                    Column::new("id", DataType::Str).nullable(false),
                    Column::new("hostname", DataType::Str),
                ],
            )
            .unwrap()
            .read_only(),
        )
        .unwrap();
    TransactionContext::new(SessionContext::default(), Arc::new(catalog))
}

/// Analyze a statement without bound parameters
pub fn analyze(ctx: &TransactionContext, statement: &Statement) -> Result<AnalyzedStatement> {
    Analyzer::analyze(statement, ctx, &ParamBinding::NONE)
}

/// Analyze a SELECT and unwrap the analyzed query
pub fn analyze_select(ctx: &TransactionContext, select: SelectStatement) -> Result<QueriedSelect> {
    match analyze(ctx, &Statement::select(select))? {
        AnalyzedStatement::Query(query) => Ok(query),
        other => panic!("expected an analyzed query, got {other:?}"),
    }
}

/// Fluent SELECT statement builder for tests
pub struct SelectBuilder {
    select: Vec<(Expression, Option<String>)>,
    from: Vec<FromClause>,
    r#where: Option<Expression>,
}

impl SelectBuilder {
    pub fn new() -> Self {
        SelectBuilder {
            select: Vec::new(),
            from: Vec::new(),
            r#where: None,
        }
    }

    pub fn item(mut self, expression: Expression) -> Self {
        self.select.push((expression, None));
        self
    }

    pub fn item_as(mut self, expression: Expression, alias: &str) -> Self {
        self.select.push((expression, Some(alias.to_string())));
        self
    }

    pub fn from_table(mut self, name: &str) -> Self {
        self.from.push(table(name));
        self
    }

    pub fn from_table_as(mut self, name: &str, alias: &str) -> Self {
        self.from.push(FromClause::Table {
            name: parse_name(name),
            alias: Some(alias.to_string()),
        });
        self
    }

    pub fn from_subquery(mut self, query: SelectStatement, alias: &str) -> Self {
        self.from.push(FromClause::Subquery {
            query: Box::new(query),
            alias: alias.to_string(),
        });
        self
    }

    pub fn from_join(mut self, left: FromClause, right: FromClause, on: Expression) -> Self {
        self.from.push(FromClause::Join {
            left: Box::new(left),
            right: Box::new(right),
            join_type: JoinType::Inner,
            predicate: Some(on),
        });
        self
    }

    pub fn filter(mut self, predicate: Expression) -> Self {
        self.r#where = Some(predicate);
        self
    }

    pub fn build(self) -> SelectStatement {
        SelectStatement {
            select: self.select,
            from: self.from,
            r#where: self.r#where,
        }
    }
}

impl Default for SelectBuilder {
    fn default() -> Self {
        SelectBuilder::new()
    }
}

/// An unaliased FROM item for a possibly dotted name
pub fn table(name: &str) -> FromClause {
    FromClause::Table {
        name: parse_name(name),
        alias: None,
    }
}

fn parse_name(name: &str) -> QualifiedName {
    QualifiedName::new(name.split('.').map(str::to_string).collect())
}

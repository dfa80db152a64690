//! Canonical SQL text for analyzed statements
//!
//! View definitions are stored as text produced here, so the rendering must
//! be deterministic: items print in output order, references print by column
//! name, and aliases are emitted whenever the output name differs from what
//! the expression would be called on its own.

mod symbol;

pub use symbol::{output_name, print_symbol};

use crate::error::{Error, Result};
use crate::semantic::statement::{AnalyzedStatement, QueriedSelect};
use crate::semantic::symbol::Symbol;
use crate::types::QualifiedName;

/// Formats analyzed statements back into SQL text
pub struct SqlPrinter;

impl SqlPrinter {
    /// Render a statement as canonical SQL. Only plain single-relation
    /// queries have a text form; everything else is rejected.
    pub fn format(statement: &AnalyzedStatement) -> Result<String> {
        match statement {
            AnalyzedStatement::Query(query) => format_select(query),
            AnalyzedStatement::CreateView(_) => {
                Err(Error::UnsupportedStatement("CREATE VIEW".to_string()))
            }
            AnalyzedStatement::DropView(_) => {
                Err(Error::UnsupportedStatement("DROP VIEW".to_string()))
            }
        }
    }
}

fn format_select(query: &QueriedSelect) -> Result<String> {
    let Some((source_name, _)) = query.single_source() else {
        return Err(Error::UnsupportedStatement(
            "SELECT over multiple relations".to_string(),
        ));
    };

    let mut sql = String::from("SELECT ");
    for (i, (field, output)) in query.fields().iter().zip(query.outputs()).enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        match output {
            // a reference selected under its own name prints bare
            Symbol::Reference(reference) if reference.column().sql_fqn() == field.name => {
                sql.push_str(&field.name);
            }
            Symbol::Reference(_) | Symbol::Function(_) => {
                sql.push_str(&print_symbol(output));
                sql.push_str(" AS ");
                sql.push_str(&quote_if_needed(&field.name));
            }
            _ => sql.push_str(&quote_if_needed(&field.name)),
        }
    }

    sql.push_str(" FROM ");
    sql.push_str(&format_relation_name(source_name));

    if let Some(predicate) = query.where_clause() {
        sql.push_str(" WHERE ");
        sql.push_str(&print_symbol(predicate));
    }
    Ok(sql)
}

fn format_relation_name(name: &QualifiedName) -> String {
    name.parts()
        .iter()
        .map(|part| quote_if_needed(part))
        .collect::<Vec<_>>()
        .join(".")
}

/// Emit `name` bare when it is a plain lowercase identifier, double-quoted
/// otherwise
fn quote_if_needed(name: &str) -> String {
    let mut chars = name.chars();
    let plain = match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {
            chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        }
        _ => false,
    };
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expression, FromClause, JoinType, Literal, Operator, SelectStatement, Statement};
    use crate::catalog::{Catalog, SessionContext, TransactionContext};
    use crate::semantic::analyzer::{Analyzer, ParamBinding};
    use crate::types::schema::{Column, RelationName, Table};
    use crate::types::DataType;
    use std::sync::Arc;

    fn transaction_context() -> TransactionContext {
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
        TransactionContext::new(SessionContext::default(), Arc::new(catalog))
    }

    fn format_sql(select: SelectStatement) -> Result<String> {
        let analyzed = Analyzer::analyze(
            &Statement::select(select),
            &transaction_context(),
            &ParamBinding::NONE,
        )
        .unwrap();
        SqlPrinter::format(&analyzed)
    }

    #[test]
    fn test_aliased_items_and_where() {
        let select = SelectStatement {
            select: vec![
                (Expression::column("name"), Some("n".to_string())),
                (
                    Expression::Function("count".to_string(), vec![Expression::All]),
                    Some("c".to_string()),
                ),
            ],
            from: vec![FromClause::Table {
                name: QualifiedName::of("users"),
                alias: None,
            }],
            r#where: Some(
                Operator::Equal(
                    Box::new(Expression::column("active")),
                    Box::new(Literal::Boolean(true).into()),
                )
                .into(),
            ),
        };
        assert_eq!(
            format_sql(select).unwrap(),
            "SELECT name AS n, count(*) AS c FROM users WHERE active = true"
        );
    }

    #[test]
    fn test_bare_references_print_without_alias() {
        let select = SelectStatement {
            select: vec![(Expression::All, None)],
            from: vec![FromClause::Table {
                name: QualifiedName::of("users"),
                alias: None,
            }],
            r#where: None,
        };
        assert_eq!(format_sql(select).unwrap(), "SELECT id, name, active FROM users");
    }

    #[test]
    fn test_qualified_from_name_is_preserved() {
        let select = SelectStatement {
            select: vec![(Expression::column("id"), None)],
            from: vec![FromClause::Table {
                name: QualifiedName::qualified("doc", "users"),
                alias: None,
            }],
            r#where: None,
        };
        assert_eq!(format_sql(select).unwrap(), "SELECT id FROM doc.users");
    }

    #[test]
    fn test_odd_output_names_are_quoted() {
        let select = SelectStatement {
            select: vec![(Expression::column("name"), Some("User Name".to_string()))],
            from: vec![FromClause::Table {
                name: QualifiedName::of("users"),
                alias: None,
            }],
            r#where: None,
        };
        assert_eq!(
            format_sql(select).unwrap(),
            "SELECT name AS \"User Name\" FROM users"
        );
    }

    #[test]
    fn test_literal_output_prints_its_name() {
        let select = SelectStatement {
            select: vec![(Literal::Integer(1).into(), Some("one".to_string()))],
            from: vec![FromClause::Table {
                name: QualifiedName::of("users"),
                alias: None,
            }],
            r#where: None,
        };
        assert_eq!(format_sql(select).unwrap(), "SELECT one FROM users");
    }

    #[test]
    fn test_joins_have_no_text_form() {
        let select = SelectStatement {
            select: vec![(Expression::All, None)],
            from: vec![FromClause::Join {
                left: Box::new(FromClause::Table {
                    name: QualifiedName::of("users"),
                    alias: Some("a".to_string()),
                }),
                right: Box::new(FromClause::Table {
                    name: QualifiedName::of("users"),
                    alias: Some("b".to_string()),
                }),
                join_type: JoinType::Inner,
                predicate: Some(
                    Operator::Equal(
                        Box::new(Expression::qualified_column("a", "id")),
                        Box::new(Expression::qualified_column("b", "id")),
                    )
                    .into(),
                ),
            }],
            r#where: None,
        };
        let err = format_sql(select).unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedStatement("SELECT over multiple relations".to_string())
        );
    }

    #[test]
    fn test_ddl_has_no_text_form() {
        let mut catalog = Catalog::new();
        catalog
            .add_view(crate::types::schema::View::new(
                RelationName::new("doc", "v"),
                "SELECT 1",
                vec![crate::semantic::symbol::Field::new("one", 0, DataType::I64)],
            ))
            .unwrap();
        let ctx = TransactionContext::new(SessionContext::default(), Arc::new(catalog));

        let statement = Statement::drop_view(QualifiedName::of("v"), false);
        let analyzed = Analyzer::analyze(&statement, &ctx, &ParamBinding::NONE).unwrap();
        let err = SqlPrinter::format(&analyzed).unwrap_err();
        assert_eq!(err, Error::UnsupportedStatement("DROP VIEW".to_string()));
    }
}

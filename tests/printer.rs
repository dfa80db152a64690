//! Canonical SQL printing tests
//!
//! The printed text is what gets persisted for views, so these pin the
//! exact rendering and check that analyzing the printed form again yields
//! the same output shape.

mod common;

use common::{SelectBuilder, analyze, analyze_select, setup};
use stratum_sql::SqlPrinter;
use stratum_sql::ast::{Expression, Literal as AstLiteral, Operator, Statement};
use stratum_sql::semantic::AnalyzedStatement;
use stratum_sql::types::DataType;

fn print(select: stratum_sql::ast::SelectStatement) -> String {
    let ctx = setup();
    let analyzed = analyze(&ctx, &Statement::select(select)).unwrap();
    SqlPrinter::format(&analyzed).unwrap()
}

#[test]
fn test_aliased_select_prints_exactly() {
    let select = SelectBuilder::new()
        .item_as(Expression::column("name"), "n")
        .item_as(
            Expression::Function("count".to_string(), vec![Expression::All]),
            "c",
        )
        .from_table("users")
        .filter(
            Operator::Equal(
                Box::new(Expression::column("active")),
                Box::new(AstLiteral::Boolean(true).into()),
            )
            .into(),
        )
        .build();
    assert_eq!(
        print(select),
        "SELECT name AS n, count(*) AS c FROM users WHERE active = true"
    );
}

#[test]
fn test_star_prints_expanded_columns() {
    let select = SelectBuilder::new()
        .item(Expression::All)
        .from_table("users")
        .build();
    assert_eq!(print(select), "SELECT id, name, active FROM users");
}

#[test]
fn test_operator_precedence_survives_printing() {
    // (active OR id = 1) printed with parentheses around the nested operator
    let select = SelectBuilder::new()
        .item(Expression::column("id"))
        .from_table("users")
        .filter(
            Operator::And(
                Box::new(
                    Operator::Or(
                        Box::new(Expression::column("active")),
                        Box::new(
                            Operator::Equal(
                                Box::new(Expression::column("id")),
                                Box::new(AstLiteral::Integer(1).into()),
                            )
                            .into(),
                        ),
                    )
                    .into(),
                ),
                Box::new(
                    Operator::Not(Box::new(Expression::column("active"))).into(),
                ),
            )
            .into(),
        )
        .build();
    assert_eq!(
        print(select),
        "SELECT id FROM users WHERE (active OR (id = 1)) AND (NOT active)"
    );
}

#[test]
fn test_printed_text_analyzes_to_the_same_shape() {
    let ctx = setup();

    let original = analyze_select(
        &ctx,
        SelectBuilder::new()
            .item_as(Expression::column("name"), "n")
            .item_as(
                Expression::Function("count".to_string(), vec![Expression::All]),
                "c",
            )
            .from_table("users")
            .filter(
                Operator::Equal(
                    Box::new(Expression::column("active")),
                    Box::new(AstLiteral::Boolean(true).into()),
                )
                .into(),
            )
            .build(),
    )
    .unwrap();
    let printed = SqlPrinter::format(&AnalyzedStatement::Query(original.clone())).unwrap();

    // the statement the printed text parses to
    let reparsed = SelectBuilder::new()
        .item_as(Expression::column("name"), "n")
        .item_as(Expression::Function("count".to_string(), vec![]), "c")
        .from_table("users")
        .filter(
            Operator::Equal(
                Box::new(Expression::column("active")),
                Box::new(AstLiteral::Boolean(true).into()),
            )
            .into(),
        )
        .build();
    let reanalyzed = analyze_select(&ctx, reparsed).unwrap();

    assert_eq!(original.fields(), reanalyzed.fields());
    assert_eq!(original.outputs(), reanalyzed.outputs());
    assert_eq!(
        SqlPrinter::format(&AnalyzedStatement::Query(reanalyzed)).unwrap(),
        printed
    );
}

#[test]
fn test_unaliased_function_gets_its_rendering_as_name() {
    let select = SelectBuilder::new()
        .item(Expression::Function(
            "upper".to_string(),
            vec![Expression::column("name")],
        ))
        .from_table("users")
        .build();

    let ctx = setup();
    let query = analyze_select(&ctx, select).unwrap();
    assert_eq!(query.fields()[0].name, "upper(name)");
    assert_eq!(query.fields()[0].data_type, DataType::Text);

    // non-identifier output names are quoted when printed
    assert_eq!(
        SqlPrinter::format(&AnalyzedStatement::Query(query)).unwrap(),
        "SELECT upper(name) AS \"upper(name)\" FROM users"
    );
}

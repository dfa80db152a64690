//! Relation analysis: FROM resolution and SELECT shaping
//!
//! Analyzing a SELECT runs inside its own scope on the statement's stack.
//! FROM items register the relations visible to the rest of the query,
//! SELECT items become typed output symbols with derived or aliased names,
//! and the WHERE predicate is checked to be boolean.

use crate::ast::common::FromClause;
use crate::ast::dml::SelectStatement;
use crate::ast::expressions::Expression;
use crate::catalog::CatalogRelation;
use crate::error::{Error, Result};
use crate::printing;
use crate::semantic::context::StatementAnalysisContext;
use crate::semantic::expression::analyze_expression;
use crate::semantic::statement::{
    AliasedRelation, AnalyzedRelation, QueriedSelect, TableRelation, ViewRelation,
};
use crate::semantic::symbol::{Field, Symbol};
use crate::types::schema::{QualifiedName, RelationName};
use crate::types::DataType;
use std::sync::Arc;

/// Analyze a SELECT inside a fresh scope
pub fn analyze_select(
    select: &SelectStatement,
    ctx: &mut StatementAnalysisContext<'_>,
) -> Result<QueriedSelect> {
    ctx.with_relation(false, |ctx| analyze_select_in_scope(select, ctx))
}

/// Analyze a SELECT against the scope already on top of the stack
fn analyze_select_in_scope(
    select: &SelectStatement,
    ctx: &mut StatementAnalysisContext<'_>,
) -> Result<QueriedSelect> {
    let mut join_conditions = Vec::new();
    for from in &select.from {
        register_from(from, ctx, &mut join_conditions)?;
    }
    let sources: Vec<(QualifiedName, Arc<AnalyzedRelation>)> = ctx
        .current_relation_context()
        .sources()
        .iter()
        .map(|(name, relation)| (name.clone(), relation.clone()))
        .collect();

    let mut outputs = Vec::new();
    let mut fields = Vec::new();
    for (expression, alias) in &select.select {
        if matches!(expression, Expression::All) && alias.is_none() {
            expand_star(ctx, &mut outputs, &mut fields)?;
            continue;
        }
        let symbol = analyze_expression(expression, ctx)?;
        let name = match alias {
            Some(alias) => alias.clone(),
            None => printing::output_name(&symbol),
        };
        fields.push(Field::new(name, fields.len(), symbol.value_type()));
        outputs.push(symbol);
    }

    let where_clause = match &select.r#where {
        Some(predicate) => {
            let symbol = analyze_expression(predicate, ctx)?;
            require_boolean(&symbol)?;
            Some(symbol)
        }
        None => None,
    };

    Ok(QueriedSelect::new(
        sources,
        join_conditions,
        outputs,
        fields,
        where_clause,
    ))
}

/// Resolve one FROM item and register it into the current scope
fn register_from(
    from: &FromClause,
    ctx: &mut StatementAnalysisContext<'_>,
    join_conditions: &mut Vec<Symbol>,
) -> Result<()> {
    match from {
        FromClause::Table { name, alias } => {
            let relation = resolve_table_or_view(name, ctx)?;
            let (key, relation) = match alias {
                Some(alias) => (
                    QualifiedName::of(alias),
                    Arc::new(AnalyzedRelation::Aliased(AliasedRelation::new(
                        alias, relation,
                    ))),
                ),
                None => (name.clone(), relation),
            };
            ctx.current_relation_context().add_source(key, relation)
        }
        FromClause::Subquery { query, alias } => {
            // The subquery body runs in its own scope; only the alias is
            // visible to the enclosing query
            let analyzed = ctx.with_relation(true, |ctx| analyze_select_in_scope(query, ctx))?;
            let relation = Arc::new(AnalyzedRelation::Aliased(AliasedRelation::new(
                alias,
                Arc::new(AnalyzedRelation::Query(analyzed)),
            )));
            ctx.current_relation_context()
                .add_source(QualifiedName::of(alias), relation)
        }
        FromClause::Join {
            left,
            right,
            predicate,
            ..
        } => {
            register_from(left, ctx, join_conditions)?;
            register_from(right, ctx, join_conditions)?;
            if let Some(predicate) = predicate {
                let symbol = analyze_expression(predicate, ctx)?;
                require_boolean(&symbol)?;
                join_conditions.push(symbol);
            }
            Ok(())
        }
    }
}

fn resolve_table_or_view(
    name: &QualifiedName,
    ctx: &mut StatementAnalysisContext<'_>,
) -> Result<Arc<AnalyzedRelation>> {
    let relation_name = RelationName::of(name, ctx.default_schema())?;
    let resolved = ctx
        .transaction_context()
        .catalog()
        .resolve_relation(&relation_name)
        .ok_or_else(|| Error::RelationNotFound(relation_name.to_string()))?;
    match resolved {
        CatalogRelation::Table(table) => {
            table.check_operation(ctx.operation())?;
            Ok(Arc::new(AnalyzedRelation::Table(TableRelation::new(
                table,
                name.clone(),
            ))))
        }
        CatalogRelation::View(view) => Ok(Arc::new(AnalyzedRelation::View(ViewRelation::new(
            view,
            name.clone(),
        )))),
    }
}

/// Expand a bare `*` into every column of every source, in registration
/// order. Duplicate names across sources are fine here; only view creation
/// insists on unique output names.
fn expand_star(
    ctx: &mut StatementAnalysisContext<'_>,
    outputs: &mut Vec<Symbol>,
    fields: &mut Vec<Field>,
) -> Result<()> {
    let operation = ctx.operation();
    let scope = ctx.current_relation_context();
    if scope.sources().is_empty() {
        return Err(Error::InvalidValue(
            "SELECT * requires a FROM clause".to_string(),
        ));
    }
    for relation in scope.sources().values() {
        for field in relation.fields() {
            let Some(symbol) = relation.resolve_column(&field.name, operation)? else {
                return Err(Error::Internal(format!(
                    "column {} disappeared during * expansion",
                    field.name
                )));
            };
            fields.push(Field::new(&field.name, fields.len(), symbol.value_type()));
            outputs.push(symbol);
        }
    }
    Ok(())
}

fn require_boolean(symbol: &Symbol) -> Result<()> {
    let data_type = symbol.value_type();
    if matches!(data_type, DataType::Bool | DataType::Null) {
        Ok(())
    } else {
        Err(Error::TypeMismatch {
            expected: DataType::Bool.to_string(),
            found: data_type.to_string(),
        })
    }
}

//! View statement analysis
//!
//! CREATE VIEW validates the name against both catalog namespaces before it
//! analyzes the defining query, so naming conflicts surface first. The
//! query is analyzed without parameter values; placeholders in a view body
//! stay parameter symbols until the view is queried.

use crate::ast::dml::SelectStatement;
use crate::ast::expressions::ParameterExpression;
use crate::catalog::TransactionContext;
use crate::error::{Error, Result};
use crate::semantic::context::StatementAnalysisContext;
use crate::semantic::relation;
use crate::semantic::statement::{CreateViewStmt, DropViewStmt};
use crate::semantic::symbol::{Parameter, Symbol};
use crate::types::schema::{Operation, QualifiedName, RelationName};
use crate::types::DataType;
use std::collections::HashSet;

// A view body has no bound values and no type hints at creation time
fn view_params(param: &ParameterExpression) -> Result<Symbol> {
    Ok(Symbol::Parameter(Parameter::new(
        param.index,
        DataType::Null,
    )))
}

/// Analyze CREATE [OR REPLACE] VIEW
pub fn analyze_create_view(
    name: &QualifiedName,
    replace_existing: bool,
    query: &SelectStatement,
    txn_ctx: &TransactionContext,
) -> Result<CreateViewStmt> {
    let view_name = RelationName::of(name, txn_ctx.default_schema())?;
    let catalog = txn_ctx.catalog();
    // A table never gives way, with or without OR REPLACE
    if catalog.table_exists(&view_name) {
        return Err(Error::RelationAlreadyExists(view_name.to_string()));
    }
    if catalog.view_exists(&view_name) && !replace_existing {
        return Err(Error::RelationAlreadyExists(view_name.to_string()));
    }

    // Colliding aliases are rejected before the body is analyzed, so they
    // surface even when the body has errors of its own
    let mut seen = HashSet::new();
    for (_, alias) in &query.select {
        if let Some(alias) = alias
            && !seen.insert(alias.as_str())
        {
            return Err(Error::DuplicateColumn(alias.clone()));
        }
    }

    let mut ctx = StatementAnalysisContext::new(Operation::Read, txn_ctx, &view_params);
    let analyzed = relation::analyze_select(query, &mut ctx)?;
    debug_assert_eq!(ctx.depth(), 0, "scope stack out of balance");

    // Checked again after analysis so derived names count too
    let mut seen = HashSet::new();
    for field in analyzed.fields() {
        if !seen.insert(field.name.as_str()) {
            return Err(Error::DuplicateColumn(field.name.clone()));
        }
    }

    Ok(CreateViewStmt {
        name: view_name,
        query: analyzed,
        replace_existing,
    })
}

/// Analyze DROP VIEW
pub fn analyze_drop_view(
    name: &QualifiedName,
    if_exists: bool,
    txn_ctx: &TransactionContext,
) -> Result<DropViewStmt> {
    let view_name = RelationName::of(name, txn_ctx.default_schema())?;
    let catalog = txn_ctx.catalog();
    if catalog.table_exists(&view_name) {
        return Err(Error::InvalidValue(format!(
            "Cannot drop a table with DROP VIEW: {}",
            view_name
        )));
    }
    if !catalog.view_exists(&view_name) && !if_exists {
        return Err(Error::RelationNotFound(view_name.to_string()));
    }
    Ok(DropViewStmt {
        name: view_name,
        if_exists,
    })
}

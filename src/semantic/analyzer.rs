//! Statement analysis entry point
//!
//! [`Analyzer::analyze`] is how a parsed statement becomes an
//! [`AnalyzedStatement`]: it builds the parameter substitution for the given
//! binding, sets up the per-statement context and dispatches by statement
//! kind.

use crate::ast::expressions::ParameterExpression;
use crate::ast::{DdlStatement, DmlStatement, Statement};
use crate::catalog::TransactionContext;
use crate::error::{Error, Result};
use crate::semantic::context::StatementAnalysisContext;
use crate::semantic::statement::AnalyzedStatement;
use crate::semantic::symbol::{Parameter, Symbol};
use crate::semantic::{relation, view};
use crate::types::data_type::DataType;
use crate::types::schema::Operation;
use crate::types::value::Value;
use tracing::debug;

/// How statement parameters are provided to analysis
#[derive(Debug, Clone)]
pub enum ParamBinding {
    /// Values known up front. Placeholders become literal symbols, and a
    /// placeholder past the end of the values is an error.
    Bound(Vec<Value>),
    /// No values yet. Placeholders stay parameter symbols, typed by the
    /// hint at their position when one is given.
    Unbound(Vec<DataType>),
}

impl ParamBinding {
    /// No values and no hints
    pub const NONE: ParamBinding = ParamBinding::Unbound(Vec::new());
}

fn convert_param(binding: &ParamBinding, param: &ParameterExpression) -> Result<Symbol> {
    match binding {
        ParamBinding::Bound(values) => match values.get(param.index) {
            Some(value) => Ok(Symbol::from_value(value.clone())),
            None => Err(Error::InvalidValue(format!(
                "No value for parameter ${} ({} provided)",
                param.index + 1,
                values.len()
            ))),
        },
        ParamBinding::Unbound(hints) => {
            let data_type = hints.get(param.index).cloned().unwrap_or(DataType::Null);
            Ok(Symbol::Parameter(Parameter::new(param.index, data_type)))
        }
    }
}

/// The semantic analyzer
pub struct Analyzer;

impl Analyzer {
    /// Analyze a statement against the catalog visible to `txn_ctx`
    pub fn analyze(
        statement: &Statement,
        txn_ctx: &TransactionContext,
        params: &ParamBinding,
    ) -> Result<AnalyzedStatement> {
        let kind = statement_kind(statement);
        debug!(kind, "analyzing statement");
        let result = match statement {
            Statement::Dml(DmlStatement::Select(select)) => {
                let convert = |param: &ParameterExpression| convert_param(params, param);
                let mut ctx = StatementAnalysisContext::new(Operation::Read, txn_ctx, &convert);
                relation::analyze_select(select, &mut ctx).map(|query| {
                    debug_assert_eq!(ctx.depth(), 0, "scope stack out of balance");
                    AnalyzedStatement::Query(query)
                })
            }
            Statement::Ddl(DdlStatement::CreateView {
                name,
                replace_existing,
                query,
            }) => view::analyze_create_view(name, *replace_existing, query, txn_ctx)
                .map(AnalyzedStatement::CreateView),
            Statement::Ddl(DdlStatement::DropView { name, if_exists }) => {
                view::analyze_drop_view(name, *if_exists, txn_ctx).map(AnalyzedStatement::DropView)
            }
        };
        match &result {
            Ok(_) => debug!(kind, "statement analyzed"),
            Err(error) => debug!(kind, %error, "statement analysis failed"),
        }
        result
    }
}

fn statement_kind(statement: &Statement) -> &'static str {
    match statement {
        Statement::Dml(DmlStatement::Select(_)) => "select",
        Statement::Ddl(DdlStatement::CreateView { .. }) => "create view",
        Statement::Ddl(DdlStatement::DropView { .. }) => "drop view",
    }
}

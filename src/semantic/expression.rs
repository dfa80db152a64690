//! Expression analysis
//!
//! Turns syntax expressions into typed [`Symbol`]s. Column names resolve
//! through the scope stack, function and operator calls are validated
//! against the registry, and parameters are substituted through the
//! statement's parameter conversion.

use crate::ast::expressions::{Expression, Literal as AstLiteral, Operator};
use crate::error::{Error, Result};
use crate::functions;
use crate::semantic::context::StatementAnalysisContext;
use crate::semantic::symbol::{FunctionCall, Symbol};
use crate::types::value::Value;

/// Analyze one expression against the current scope
pub fn analyze_expression(
    expression: &Expression,
    ctx: &mut StatementAnalysisContext<'_>,
) -> Result<Symbol> {
    match expression {
        Expression::All => Err(Error::InvalidValue(
            "* is only valid as a lone SELECT item or as count(*)".to_string(),
        )),
        Expression::Column(qualifier, name) => {
            let operation = ctx.operation();
            ctx.current_relation_context()
                .resolve_column(qualifier.as_deref(), name, operation)
        }
        Expression::Literal(literal) => Ok(analyze_literal(literal)),
        Expression::Function(name, args) => analyze_function(name, args, ctx),
        Expression::Operator(operator) => {
            let (name, operands) = desugar_operator(operator);
            analyze_call(name, &operands, ctx)
        }
        Expression::Parameter(param) => ctx.convert_parameter(param),
    }
}

fn analyze_literal(literal: &AstLiteral) -> Symbol {
    let value = match literal {
        AstLiteral::Null => Value::Null,
        AstLiteral::Boolean(b) => Value::Bool(*b),
        AstLiteral::Integer(i) => Value::I64(*i),
        AstLiteral::Float(v) => Value::F64(*v),
        AstLiteral::String(s) => Value::Str(s.clone()),
    };
    Symbol::from_value(value)
}

fn analyze_function(
    name: &str,
    args: &[Expression],
    ctx: &mut StatementAnalysisContext<'_>,
) -> Result<Symbol> {
    let name = name.to_lowercase();
    // count(*) counts rows; the star is not an expression of its own
    if name == "count" && matches!(args, [Expression::All]) {
        let data_type = functions::validate_function(&name, &[])?;
        return Ok(Symbol::Function(FunctionCall::new(name, vec![], data_type)));
    }
    let operands: Vec<&Expression> = args.iter().collect();
    analyze_call(&name, &operands, ctx)
}

fn analyze_call(
    name: &str,
    operands: &[&Expression],
    ctx: &mut StatementAnalysisContext<'_>,
) -> Result<Symbol> {
    let mut args = Vec::with_capacity(operands.len());
    for operand in operands {
        args.push(analyze_expression(operand, ctx)?);
    }
    let arg_types: Vec<_> = args.iter().map(Symbol::value_type).collect();
    let data_type = functions::validate_function(name, &arg_types)?;
    Ok(Symbol::Function(FunctionCall::new(name, args, data_type)))
}

/// Map an operator onto its registry function name and operands
fn desugar_operator(operator: &Operator) -> (&'static str, Vec<&Expression>) {
    match operator {
        Operator::And(l, r) => ("and", vec![l.as_ref(), r.as_ref()]),
        Operator::Or(l, r) => ("or", vec![l.as_ref(), r.as_ref()]),
        Operator::Not(e) => ("not", vec![e.as_ref()]),
        Operator::Equal(l, r) => ("=", vec![l.as_ref(), r.as_ref()]),
        Operator::NotEqual(l, r) => ("<>", vec![l.as_ref(), r.as_ref()]),
        Operator::GreaterThan(l, r) => (">", vec![l.as_ref(), r.as_ref()]),
        Operator::GreaterThanOrEqual(l, r) => (">=", vec![l.as_ref(), r.as_ref()]),
        Operator::LessThan(l, r) => ("<", vec![l.as_ref(), r.as_ref()]),
        Operator::LessThanOrEqual(l, r) => ("<=", vec![l.as_ref(), r.as_ref()]),
        Operator::Add(l, r) => ("+", vec![l.as_ref(), r.as_ref()]),
        Operator::Subtract(l, r) => ("-", vec![l.as_ref(), r.as_ref()]),
        Operator::Multiply(l, r) => ("*", vec![l.as_ref(), r.as_ref()]),
        Operator::Divide(l, r) => ("/", vec![l.as_ref(), r.as_ref()]),
        Operator::Remainder(l, r) => ("%", vec![l.as_ref(), r.as_ref()]),
    }
}

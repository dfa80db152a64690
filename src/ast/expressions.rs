//! SQL expressions and operators

use std::hash::{Hash, Hasher};

/// SQL expressions, e.g. `a + 7 > b`. Can be nested.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Expression {
    /// All columns, i.e. *.
    All,
    /// A column reference, optionally qualified with a relation name or alias.
    Column(Option<String>, String),
    /// A literal value.
    Literal(Literal),
    /// A function call (name and arguments).
    Function(String, Vec<Expression>),
    /// An operator.
    Operator(Operator),
    /// A parameter placeholder ($1, $2, ...).
    Parameter(ParameterExpression),
}

/// Expression literal values.
#[derive(Clone, Debug)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// A positional parameter placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParameterExpression {
    /// Parameter position (0-indexed).
    pub index: usize,
}

impl ParameterExpression {
    pub fn new(index: usize) -> Self {
        ParameterExpression { index }
    }
}

/// Expression operators.
///
/// Since this is a recursive data structure, we have to box each child
/// expression, which incurs a heap allocation.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    And(Box<Expression>, Box<Expression>), // a AND b
    Not(Box<Expression>),                  // NOT a
    Or(Box<Expression>, Box<Expression>),  // a OR b

    Equal(Box<Expression>, Box<Expression>),       // a = b
    GreaterThan(Box<Expression>, Box<Expression>), // a > b
    GreaterThanOrEqual(Box<Expression>, Box<Expression>), // a >= b
    LessThan(Box<Expression>, Box<Expression>),    // a < b
    LessThanOrEqual(Box<Expression>, Box<Expression>), // a <= b
    NotEqual(Box<Expression>, Box<Expression>),    // a <> b

    Add(Box<Expression>, Box<Expression>),       // a + b
    Divide(Box<Expression>, Box<Expression>),    // a / b
    Multiply(Box<Expression>, Box<Expression>),  // a * b
    Remainder(Box<Expression>, Box<Expression>), // a % b
    Subtract(Box<Expression>, Box<Expression>),  // a - b
}

/// To allow using expressions and literals in e.g. hashmaps, implement simple
/// equality by value for all types, including Null and f64::NAN. This only
/// checks that the values are the same, and ignores SQL semantics for e.g.
/// NULL and NaN (which is handled during analysis and evaluation).
impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Integer(l), Self::Integer(r)) => l == r,
            (Self::Float(l), Self::Float(r)) => l.to_bits() == r.to_bits(),
            (Self::String(l), Self::String(r)) => l == r,
            (_, _) => false,
        }
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Boolean(v) => v.hash(state),
            Self::Integer(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::String(v) => v.hash(state),
        }
    }
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        Expression::Literal(literal)
    }
}

impl From<Operator> for Expression {
    fn from(operator: Operator) -> Self {
        Expression::Operator(operator)
    }
}

impl Expression {
    /// A bare column reference.
    pub fn column(name: impl Into<String>) -> Self {
        Expression::Column(None, name.into())
    }

    /// A qualified column reference.
    pub fn qualified_column(relation: impl Into<String>, name: impl Into<String>) -> Self {
        Expression::Column(Some(relation.into()), name.into())
    }
}

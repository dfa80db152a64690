//! Symbol model for analyzed expressions
//!
//! Analysis replaces every syntax-tree expression with a `Symbol`. Symbols
//! are the currency of the whole semantic layer: relation outputs, WHERE
//! predicates and view fields are all symbols, and they travel between nodes
//! through the wire codec in [`crate::semantic::wire`].
//!
//! The enum is closed on purpose. Adding a kind means every `match` and
//! every [`SymbolVisitor`] implementation stops compiling until it handles
//! the new case, which is exactly the reminder downstream code needs.

use crate::error::{Error, Result};
use crate::types::data_type::DataType;
use crate::types::schema::{ColumnIdent, RelationName};
use crate::types::value::Value;
use serde::{Deserialize, Serialize};

/// An analyzed expression
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    /// A constant value with its type
    Literal(Literal),
    /// The SQL NULL constant. There is exactly one observable NULL symbol;
    /// [`Symbol::NULL`] is the canonical way to spell it.
    Null,
    /// A column of a stored relation
    Reference(Reference),
    /// A function or operator applied to argument symbols
    Function(FunctionCall),
    /// An output column of a derived relation, addressed by name and position
    Field(Field),
    /// A placeholder for a parameter that has no bound value yet
    Parameter(Parameter),
}

impl Symbol {
    /// The canonical NULL symbol
    pub const NULL: Symbol = Symbol::Null;

    /// Build a symbol from a constant value, inferring its type.
    /// `Value::Null` maps to the canonical NULL symbol rather than a literal.
    pub fn from_value(value: Value) -> Symbol {
        if value.is_null() {
            return Symbol::NULL;
        }
        let data_type = value.data_type();
        Symbol::Literal(Literal { value, data_type })
    }

    /// The type this symbol evaluates to
    pub fn value_type(&self) -> DataType {
        match self {
            Symbol::Literal(literal) => literal.data_type.clone(),
            Symbol::Null => DataType::Null,
            Symbol::Reference(reference) => reference.data_type.clone(),
            Symbol::Function(function) => function.data_type.clone(),
            Symbol::Field(field) => field.data_type.clone(),
            Symbol::Parameter(parameter) => parameter.data_type.clone(),
        }
    }

    /// The symbol's kind discriminant
    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::Literal(_) => SymbolKind::Literal,
            Symbol::Null => SymbolKind::Null,
            Symbol::Reference(_) => SymbolKind::Reference,
            Symbol::Function(_) => SymbolKind::Function,
            Symbol::Field(_) => SymbolKind::Field,
            Symbol::Parameter(_) => SymbolKind::Parameter,
        }
    }

    /// Double dispatch into a [`SymbolVisitor`]
    pub fn accept<C, R>(&self, visitor: &mut dyn SymbolVisitor<C, R>, context: &mut C) -> R {
        match self {
            Symbol::Literal(literal) => visitor.visit_literal(literal, context),
            Symbol::Null => visitor.visit_null(context),
            Symbol::Reference(reference) => visitor.visit_reference(reference, context),
            Symbol::Function(function) => visitor.visit_function(function, context),
            Symbol::Field(field) => visitor.visit_field(field, context),
            Symbol::Parameter(parameter) => visitor.visit_parameter(parameter, context),
        }
    }
}

/// Discriminant of a [`Symbol`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Literal,
    Null,
    Reference,
    Function,
    Field,
    Parameter,
}

/// Visitor over symbols. One required method per kind and no default
/// bodies, so every implementation is forced to decide what a new kind
/// means for it.
pub trait SymbolVisitor<C, R> {
    fn visit_literal(&mut self, literal: &Literal, context: &mut C) -> R;
    fn visit_null(&mut self, context: &mut C) -> R;
    fn visit_reference(&mut self, reference: &Reference, context: &mut C) -> R;
    fn visit_function(&mut self, function: &FunctionCall, context: &mut C) -> R;
    fn visit_field(&mut self, field: &Field, context: &mut C) -> R;
    fn visit_parameter(&mut self, parameter: &Parameter, context: &mut C) -> R;
}

/// A typed constant. The fields are private so the value/type pairing is
/// checked once at construction and can be relied on afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    value: Value,
    data_type: DataType,
}

impl Literal {
    /// Create a literal, checking that the value fits the declared type.
    /// NULL is not a literal; use [`Symbol::NULL`].
    pub fn new(value: Value, data_type: DataType) -> Result<Self> {
        if value.is_null() || data_type == DataType::Null {
            return Err(Error::InvalidValue(
                "NULL is represented by the null symbol, not a literal".to_string(),
            ));
        }
        if !value.matches_type(&data_type) {
            return Err(Error::TypeMismatch {
                expected: data_type.to_string(),
                found: value.data_type().to_string(),
            });
        }
        Ok(Self { value, data_type })
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }
}

/// Identity of a stored column: the relation it belongs to plus the column
/// identifier within it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceIdent {
    pub relation: RelationName,
    pub column: ColumnIdent,
}

impl ReferenceIdent {
    pub fn new(relation: RelationName, column: ColumnIdent) -> Self {
        Self { relation, column }
    }
}

/// A resolved column of a stored relation
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub ident: ReferenceIdent,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Reference {
    pub fn new(ident: ReferenceIdent, data_type: DataType, nullable: bool) -> Self {
        Self {
            ident,
            data_type,
            nullable,
        }
    }

    /// The column identifier within the relation
    pub fn column(&self) -> &ColumnIdent {
        &self.ident.column
    }

    /// The relation the column belongs to
    pub fn relation(&self) -> &RelationName {
        &self.ident.relation
    }
}

/// A resolved function or operator call
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// Canonical lowercase function name
    pub name: String,
    pub args: Vec<Symbol>,
    /// Return type, validated against the argument types at analysis time
    pub data_type: DataType,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, args: Vec<Symbol>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            args,
            data_type,
        }
    }
}

/// An output column of a derived relation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    /// Position within the relation's output, 0-based
    pub index: usize,
    pub data_type: DataType,
}

impl Field {
    pub fn new(name: impl Into<String>, index: usize, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            index,
            data_type,
        }
    }
}

/// A parameter placeholder, typed by hint when one is available
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Position within the parameter list, 0-based
    pub index: usize,
    pub data_type: DataType,
}

impl Parameter {
    pub fn new(index: usize, data_type: DataType) -> Self {
        Self { index, data_type }
    }
}

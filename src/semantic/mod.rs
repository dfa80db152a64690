//! Semantic analysis for SQL statements
//!
//! This module turns a parsed statement into a typed, catalog-validated
//! form. It operates between parsing and planning: names are resolved
//! against the catalog snapshot, expressions become typed symbols, and
//! scope rules (including correlated references into enclosing queries)
//! are enforced here.
//!
//! The entry point is [`Analyzer::analyze`], which dispatches per statement
//! kind and returns an [`AnalyzedStatement`].

pub mod analyzer;
pub mod context;
pub mod expression;
pub mod relation;
pub mod statement;
pub mod symbol;
pub mod view;
pub mod wire;

pub use analyzer::{Analyzer, ParamBinding};
pub use context::{RelationAnalysisContext, StatementAnalysisContext};
pub use statement::{AnalyzedRelation, AnalyzedStatement, QueriedSelect};
pub use symbol::{Symbol, SymbolVisitor};

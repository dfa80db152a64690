//! Semantic analysis and symbol resolution for a distributed SQL engine
//!
//! This crate takes parsed SQL statements and turns them into typed,
//! catalog-validated analyzed statements that:
//! - Resolve table, view and column names against a catalog snapshot
//! - Track nested query scopes, including correlated references
//! - Type-check expressions through a pluggable function registry
//! - Serialize symbol trees for shipping plans between nodes
//! - Print analyzed queries back to canonical SQL for view storage

pub mod ast;
pub mod catalog;
pub mod error;
pub mod functions;
pub mod printing;
pub mod semantic;
pub mod types;

pub use catalog::{Catalog, CatalogRelation, SessionContext, TransactionContext};
pub use error::{Error, Result};
pub use printing::SqlPrinter;
pub use semantic::analyzer::{Analyzer, ParamBinding};
pub use semantic::statement::AnalyzedStatement;
pub use semantic::symbol::{Symbol, SymbolVisitor};
pub use types::data_type::DataType;
pub use types::value::Value;

//! Data Definition Language (DDL) statements: CREATE VIEW, DROP VIEW

use super::dml::SelectStatement;
use crate::types::QualifiedName;

/// DDL statements
#[derive(Debug, Clone, PartialEq)]
pub enum DdlStatement {
    /// CREATE [OR REPLACE] VIEW: persists a named query.
    CreateView {
        /// The view name, possibly schema-qualified.
        name: QualifiedName,
        /// OR REPLACE: whether an existing view of the same name is replaced.
        replace_existing: bool,
        /// The defining query.
        query: Box<SelectStatement>,
    },
    /// DROP VIEW: removes a view.
    DropView {
        /// The view name, possibly schema-qualified.
        name: QualifiedName,
        /// IF EXISTS: whether a missing view is tolerated.
        if_exists: bool,
    },
}

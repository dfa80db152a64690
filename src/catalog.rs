//! Catalog snapshot and per-statement analysis context
//!
//! The catalog is an immutable read view during analysis: statements are
//! analyzed against the snapshot handed to them and never observe catalog
//! mutations made by concurrent statements. The mutators exist for the
//! catalog-owning layer and for tests.

use crate::error::{Error, Result};
use crate::types::schema::{RelationName, Table, View};
use std::collections::HashMap;
use std::sync::Arc;

/// A resolved catalog relation: either a base table or a view.
#[derive(Debug, Clone)]
pub enum CatalogRelation {
    Table(Arc<Table>),
    View(Arc<View>),
}

/// In-memory catalog snapshot holding tables and views by their identity.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: HashMap<RelationName, Arc<Table>>,
    views: HashMap<RelationName, Arc<View>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_exists(&self, name: &RelationName) -> bool {
        self.tables.contains_key(name)
    }

    pub fn view_exists(&self, name: &RelationName) -> bool {
        self.views.contains_key(name)
    }

    pub fn get_table(&self, name: &RelationName) -> Option<Arc<Table>> {
        self.tables.get(name).cloned()
    }

    pub fn get_view(&self, name: &RelationName) -> Option<Arc<View>> {
        self.views.get(name).cloned()
    }

    /// Resolve a name to a table or view. Tables and views share one
    /// namespace, so a name identifies at most one of them.
    pub fn resolve_relation(&self, name: &RelationName) -> Option<CatalogRelation> {
        if let Some(table) = self.tables.get(name) {
            return Some(CatalogRelation::Table(table.clone()));
        }
        self.views.get(name).map(|v| CatalogRelation::View(v.clone()))
    }

    /// Add a table. The name must be free in both namespaces.
    pub fn add_table(&mut self, table: Table) -> Result<()> {
        let name = table.name.clone();
        if self.tables.contains_key(&name) || self.views.contains_key(&name) {
            return Err(Error::RelationAlreadyExists(name.to_string()));
        }
        self.tables.insert(name, Arc::new(table));
        Ok(())
    }

    /// Add or replace a view. Replace semantics are validated by the
    /// CREATE VIEW analysis, so this is an upsert.
    pub fn add_view(&mut self, view: View) -> Result<()> {
        let name = view.name.clone();
        if self.tables.contains_key(&name) {
            return Err(Error::RelationAlreadyExists(name.to_string()));
        }
        self.views.insert(name, Arc::new(view));
        Ok(())
    }

    /// Remove a view.
    pub fn drop_view(&mut self, name: &RelationName) -> Result<()> {
        self.views
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::RelationNotFound(name.to_string()))
    }
}

/// Session-level settings that influence name resolution.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub current_user: String,
    pub default_schema: String,
}

impl SessionContext {
    pub fn new(current_user: impl Into<String>, default_schema: impl Into<String>) -> Self {
        SessionContext {
            current_user: current_user.into(),
            default_schema: default_schema.into(),
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        SessionContext::new("stratum", "doc")
    }
}

/// The per-statement read view handed to analysis: session settings plus
/// a catalog snapshot.
#[derive(Debug, Clone)]
pub struct TransactionContext {
    session: SessionContext,
    catalog: Arc<Catalog>,
}

impl TransactionContext {
    pub fn new(session: SessionContext, catalog: Arc<Catalog>) -> Self {
        TransactionContext { session, catalog }
    }

    pub fn session_context(&self) -> &SessionContext {
        &self.session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn default_schema(&self) -> &str {
        &self.session.default_schema
    }
}

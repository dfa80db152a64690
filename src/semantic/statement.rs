//! Analyzed relations and statements
//!
//! These are the outputs of semantic analysis: every name is resolved
//! against the catalog, every expression is a typed [`Symbol`], and the
//! shapes here are what planning and execution consume.

use crate::error::{Error, Result};
use crate::semantic::symbol::{Field, Reference, ReferenceIdent, Symbol};
use crate::types::schema::{ColumnIdent, Operation, QualifiedName, RelationName, Table, View};
use std::sync::Arc;

/// A relation as the analyzer sees it: a stored table, a view, a derived
/// query or an aliased wrapper around one of those
#[derive(Debug, Clone)]
pub enum AnalyzedRelation {
    Table(TableRelation),
    View(ViewRelation),
    Query(QueriedSelect),
    Aliased(AliasedRelation),
}

impl AnalyzedRelation {
    /// The name this relation can be addressed by, if it has one. A derived
    /// query only becomes addressable through an alias.
    pub fn qualified_name(&self) -> Option<QualifiedName> {
        match self {
            AnalyzedRelation::Table(table) => Some(table.qualified_name.clone()),
            AnalyzedRelation::View(view) => Some(view.qualified_name.clone()),
            AnalyzedRelation::Query(_) => None,
            AnalyzedRelation::Aliased(aliased) => Some(QualifiedName::of(&aliased.alias)),
        }
    }

    /// The externally visible output columns, in order
    pub fn fields(&self) -> Vec<Field> {
        match self {
            AnalyzedRelation::Table(table) => table.fields(),
            AnalyzedRelation::View(view) => view.view.fields.clone(),
            AnalyzedRelation::Query(query) => query.fields.clone(),
            AnalyzedRelation::Aliased(aliased) => aliased.inner.fields(),
        }
    }

    /// Resolve a column by name within this relation.
    ///
    /// Returns `Ok(None)` when the relation has no such column, so callers
    /// can keep searching other relations. A column that exists but cannot
    /// be used for `operation` is an error, not a miss.
    pub fn resolve_column(&self, name: &str, operation: Operation) -> Result<Option<Symbol>> {
        match self {
            AnalyzedRelation::Table(table) => table.resolve_column(name, operation),
            AnalyzedRelation::View(view) => view.resolve_column(name, operation),
            AnalyzedRelation::Query(query) => Ok(query.resolve_field(name)),
            AnalyzedRelation::Aliased(aliased) => aliased.inner.resolve_column(name, operation),
        }
    }
}

/// A stored table together with the name it was referenced by in the query
/// text (which may be unqualified even though the catalog name never is)
#[derive(Debug, Clone)]
pub struct TableRelation {
    table: Arc<Table>,
    qualified_name: QualifiedName,
}

impl TableRelation {
    pub fn new(table: Arc<Table>, qualified_name: QualifiedName) -> Self {
        Self {
            table,
            qualified_name,
        }
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn name(&self) -> &RelationName {
        &self.table.name
    }

    fn fields(&self) -> Vec<Field> {
        self.table
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| Field::new(&column.name, index, column.data_type.clone()))
            .collect()
    }

    fn resolve_column(&self, name: &str, operation: Operation) -> Result<Option<Symbol>> {
        let Some((_, column)) = self.table.get_column(name) else {
            return Ok(None);
        };
        self.table.check_operation(operation)?;
        if column.generated && matches!(operation, Operation::Insert | Operation::Update) {
            return Err(Error::GeneratedColumn(name.to_string()));
        }
        Ok(Some(Symbol::Reference(Reference::new(
            ReferenceIdent::new(self.table.name.clone(), ColumnIdent::new(name)),
            column.data_type.clone(),
            column.nullable,
        ))))
    }
}

/// A view reference. Its columns come from the field list captured when the
/// view was created, not from re-analyzing its definition.
#[derive(Debug, Clone)]
pub struct ViewRelation {
    view: Arc<View>,
    qualified_name: QualifiedName,
}

impl ViewRelation {
    pub fn new(view: Arc<View>, qualified_name: QualifiedName) -> Self {
        Self {
            view,
            qualified_name,
        }
    }

    pub fn view(&self) -> &Arc<View> {
        &self.view
    }

    fn resolve_column(&self, name: &str, operation: Operation) -> Result<Option<Symbol>> {
        let Some(field) = self.view.fields.iter().find(|field| field.name == name) else {
            return Ok(None);
        };
        if !matches!(operation, Operation::Read) {
            return Err(Error::ReadOnlyRelation(self.view.name.to_string()));
        }
        Ok(Some(Symbol::Field(field.clone())))
    }
}

/// A relation made visible under an alias. The inner relation's own name is
/// hidden; only the alias resolves.
#[derive(Debug, Clone)]
pub struct AliasedRelation {
    alias: String,
    inner: Arc<AnalyzedRelation>,
}

impl AliasedRelation {
    pub fn new(alias: impl Into<String>, inner: Arc<AnalyzedRelation>) -> Self {
        Self {
            alias: alias.into(),
            inner,
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn inner(&self) -> &Arc<AnalyzedRelation> {
        &self.inner
    }
}

/// An analyzed SELECT
#[derive(Debug, Clone)]
pub struct QueriedSelect {
    /// FROM items in registration order, keyed by the name each one is
    /// visible under
    sources: Vec<(QualifiedName, Arc<AnalyzedRelation>)>,
    /// Analyzed join predicates, boolean typed
    join_conditions: Vec<Symbol>,
    /// One analyzed symbol per SELECT item
    outputs: Vec<Symbol>,
    /// The output columns this query exposes, parallel to `outputs`
    fields: Vec<Field>,
    /// Analyzed WHERE predicate, boolean or null typed
    where_clause: Option<Symbol>,
}

impl QueriedSelect {
    pub fn new(
        sources: Vec<(QualifiedName, Arc<AnalyzedRelation>)>,
        join_conditions: Vec<Symbol>,
        outputs: Vec<Symbol>,
        fields: Vec<Field>,
        where_clause: Option<Symbol>,
    ) -> Self {
        debug_assert_eq!(outputs.len(), fields.len());
        Self {
            sources,
            join_conditions,
            outputs,
            fields,
            where_clause,
        }
    }

    pub fn sources(&self) -> &[(QualifiedName, Arc<AnalyzedRelation>)] {
        &self.sources
    }

    pub fn join_conditions(&self) -> &[Symbol] {
        &self.join_conditions
    }

    pub fn outputs(&self) -> &[Symbol] {
        &self.outputs
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn where_clause(&self) -> Option<&Symbol> {
        self.where_clause.as_ref()
    }

    /// The single FROM source, when the query has exactly one and no joins
    pub fn single_source(&self) -> Option<(&QualifiedName, &Arc<AnalyzedRelation>)> {
        if self.join_conditions.is_empty()
            && let [(name, relation)] = self.sources.as_slice()
        {
            return Some((name, relation));
        }
        None
    }

    fn resolve_field(&self, name: &str) -> Option<Symbol> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| Symbol::Field(field.clone()))
    }
}

/// A fully analyzed statement, ready for planning
#[derive(Debug, Clone)]
pub enum AnalyzedStatement {
    Query(QueriedSelect),
    CreateView(CreateViewStmt),
    DropView(DropViewStmt),
}

/// An analyzed CREATE VIEW
#[derive(Debug, Clone)]
pub struct CreateViewStmt {
    pub name: RelationName,
    pub query: QueriedSelect,
    pub replace_existing: bool,
}

/// An analyzed DROP VIEW
#[derive(Debug, Clone)]
pub struct DropViewStmt {
    pub name: RelationName,
    pub if_exists: bool,
}

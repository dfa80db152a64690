//! Analysis state: the scope stack and column visibility
//!
//! Every SELECT being analyzed owns one [`RelationAnalysisContext`] on the
//! statement's scope stack. A nested scope (subquery) sees the relations of
//! its enclosing scopes through an immutable [`ParentRelations`] chain that
//! is captured when the scope is entered. Sibling scopes never share state;
//! two subqueries at the same depth each get their own snapshot of the
//! enclosing scope and cannot observe each other's sources.

use crate::ast::expressions::ParameterExpression;
use crate::catalog::TransactionContext;
use crate::error::{Error, Result};
use crate::semantic::statement::AnalyzedRelation;
use crate::semantic::symbol::Symbol;
use crate::types::schema::{Operation, QualifiedName};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::warn;

/// Relations visible at one scope level, keyed by the name they were
/// registered under, in registration order
pub type SourceMap = IndexMap<QualifiedName, Arc<AnalyzedRelation>>;

/// Immutable chain of enclosing scopes, nearest first
///
/// Levels are linked through `Arc`, so extending the chain shares every
/// existing level instead of copying it. A snapshot taken when a subquery
/// starts stays valid no matter what the enclosing scope registers later.
#[derive(Debug, Clone, Default)]
pub struct ParentRelations {
    head: Option<Arc<ParentLevel>>,
}

#[derive(Debug)]
struct ParentLevel {
    sources: SourceMap,
    next: Option<Arc<ParentLevel>>,
}

impl ParentRelations {
    /// The empty chain of a top-level statement
    pub fn none() -> Self {
        Self { head: None }
    }

    /// Extend the chain with one more enclosing level
    pub fn new_level(&self, sources: SourceMap) -> Self {
        Self {
            head: Some(Arc::new(ParentLevel {
                sources,
                next: self.head.clone(),
            })),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Number of enclosing levels
    pub fn depth(&self) -> usize {
        self.levels().count()
    }

    fn levels(&self) -> impl Iterator<Item = &ParentLevel> {
        std::iter::successors(self.head.as_deref(), |level| level.next.as_deref())
    }
}

/// The relations visible to one SELECT
#[derive(Debug)]
pub struct RelationAnalysisContext {
    sources: SourceMap,
    parent_relations: ParentRelations,
    aliased_relation: bool,
}

impl RelationAnalysisContext {
    fn new(parent_relations: ParentRelations, aliased_relation: bool) -> Self {
        Self {
            sources: SourceMap::new(),
            parent_relations,
            aliased_relation,
        }
    }

    /// Whether this scope analyzes the body of an aliased FROM item
    pub fn is_aliased_relation(&self) -> bool {
        self.aliased_relation
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    pub fn parent_relations(&self) -> &ParentRelations {
        &self.parent_relations
    }

    /// Register a relation under the name it is visible by. Two relations
    /// cannot share a name within one scope.
    pub fn add_source(
        &mut self,
        name: QualifiedName,
        relation: Arc<AnalyzedRelation>,
    ) -> Result<()> {
        if self.sources.contains_key(&name) {
            return Err(Error::DuplicateRelation(name.to_string()));
        }
        self.sources.insert(name, relation);
        Ok(())
    }

    /// Resolve a column against this scope, then the enclosing scopes.
    ///
    /// Within a single level a name matching more than one source is
    /// ambiguous. Enclosing levels are searched nearest-first and the first
    /// level with a match wins; a hit in an enclosing level is a correlated
    /// reference to that scope.
    pub fn resolve_column(
        &self,
        qualifier: Option<&str>,
        name: &str,
        operation: Operation,
    ) -> Result<Symbol> {
        if let Some(symbol) = resolve_in_level(&self.sources, qualifier, name, operation)? {
            return Ok(symbol);
        }
        for level in self.parent_relations.levels() {
            if let Some(symbol) = resolve_in_level(&level.sources, qualifier, name, operation)? {
                return Ok(symbol);
            }
        }
        Err(Error::ColumnNotFound(display_name(qualifier, name)))
    }
}

fn display_name(qualifier: Option<&str>, name: &str) -> String {
    match qualifier {
        Some(qualifier) => format!("{}.{}", qualifier, name),
        None => name.to_string(),
    }
}

fn resolve_in_level(
    sources: &SourceMap,
    qualifier: Option<&str>,
    name: &str,
    operation: Operation,
) -> Result<Option<Symbol>> {
    let mut found: Option<Symbol> = None;
    for (source_name, relation) in sources {
        if let Some(qualifier) = qualifier
            && source_name.last() != qualifier
        {
            continue;
        }
        if let Some(symbol) = relation.resolve_column(name, operation)? {
            if found.is_some() {
                return Err(Error::AmbiguousColumn(display_name(qualifier, name)));
            }
            found = Some(symbol);
        }
    }
    Ok(found)
}

/// Per-statement analysis state
///
/// Owns the LIFO stack of relation contexts. All analyzer code nests scopes
/// through [`StatementAnalysisContext::with_relation`], which guarantees the
/// matching pop on every exit path.
pub struct StatementAnalysisContext<'a> {
    operation: Operation,
    transaction_context: &'a TransactionContext,
    convert_param: &'a dyn Fn(&ParameterExpression) -> Result<Symbol>,
    stack: Vec<RelationAnalysisContext>,
    unbalanced_end_relations: usize,
}

impl<'a> StatementAnalysisContext<'a> {
    pub fn new(
        operation: Operation,
        transaction_context: &'a TransactionContext,
        convert_param: &'a dyn Fn(&ParameterExpression) -> Result<Symbol>,
    ) -> Self {
        Self {
            operation,
            transaction_context,
            convert_param,
            stack: Vec::new(),
            unbalanced_end_relations: 0,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn transaction_context(&self) -> &TransactionContext {
        self.transaction_context
    }

    pub fn default_schema(&self) -> &str {
        self.transaction_context.default_schema()
    }

    /// Substitute a parameter placeholder with a symbol
    pub fn convert_parameter(&self, param: &ParameterExpression) -> Result<Symbol> {
        (self.convert_param)(param)
    }

    /// Enter a nested scope. The new scope captures the current scope's
    /// sources as its nearest enclosing level.
    pub fn start_relation(&mut self, aliased_relation: bool) {
        let parent_relations = match self.stack.last() {
            Some(top) => top.parent_relations.new_level(top.sources.clone()),
            None => ParentRelations::none(),
        };
        self.stack
            .push(RelationAnalysisContext::new(parent_relations, aliased_relation));
    }

    /// Leave the current scope. A call with nothing on the stack is
    /// tolerated, logged and counted instead of panicking.
    pub fn end_relation(&mut self) -> Option<RelationAnalysisContext> {
        let popped = self.stack.pop();
        if popped.is_none() {
            self.unbalanced_end_relations += 1;
            warn!("end_relation called with no relation context on the stack");
        }
        popped
    }

    /// The scope currently being analyzed. Calling this with no open scope
    /// is a programming error in the analyzer itself.
    pub fn current_relation_context(&mut self) -> &mut RelationAnalysisContext {
        self.stack
            .last_mut()
            .expect("no relation context on the stack")
    }

    /// Run `f` inside a fresh nested scope, popping it on every exit path
    pub fn with_relation<T>(
        &mut self,
        aliased_relation: bool,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.start_relation(aliased_relation);
        let result = f(self);
        self.end_relation();
        result
    }

    /// Current nesting depth of the scope stack
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Stray `end_relation` calls observed so far
    pub fn unbalanced_end_relations(&self) -> usize {
        self.unbalanced_end_relations
    }
}

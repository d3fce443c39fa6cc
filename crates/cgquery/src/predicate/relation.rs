//! Relationship predicates: does a symbol's image under a call relation meet a target?

use crate::error::Result;
use crate::graph::{CallGraph, Symbol, SymbolId};
use crate::pattern::name_regex;
use crate::set::SymbolSet;
use log::trace;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashSet;
use uuid::Uuid;

/// A relation between symbol sets, derived from the "calls" edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Direct callees
    Callees,
    /// Direct callers
    Callers,
    /// Callees through one or more calls
    TransitiveCallees,
    /// Callers through one or more calls
    TransitiveCallers,
    /// The set itself plus its transitive callees
    ReflexiveCallees,
    /// The set itself plus its transitive callers
    ReflexiveCallers,
}

impl Relation {
    /// Image of `set` under this relation.
    pub fn apply<'g>(self, set: &SymbolSet<'g>) -> SymbolSet<'g> {
        match self {
            Self::Callees => set.callees().clone(),
            Self::Callers => set.callers().clone(),
            Self::TransitiveCallees => set.tcallees(),
            Self::TransitiveCallers => set.tcallers(),
            Self::ReflexiveCallees => set.trcallees(),
            Self::ReflexiveCallers => set.trcallers(),
        }
    }

    // Image of a single-symbol probe set. Probes have no universe.
    fn image_of<'g>(self, graph: &'g CallGraph, symbol: &'g Symbol) -> SymbolSet<'g> {
        self.apply(&SymbolSet::probe(graph, symbol))
    }

    pub(crate) fn reaches_itself(self, graph: &CallGraph, symbol: &Symbol) -> bool {
        self.image_of(graph, symbol).contains(symbol)
    }
}

#[derive(Debug, Clone)]
enum TargetKind {
    Symbols {
        // Identity of the graph the members were drawn from
        graph: Uuid,
        members: HashSet<SymbolId>,
    },
    Pattern {
        pattern: Regex,
        // Resolved members, keyed by the identity of the graph they came from
        resolved: RefCell<Option<(Uuid, HashSet<SymbolId>)>>,
    },
}

/// What a relationship predicate looks for: a fixed set of symbols, or
/// every symbol whose name fully matches a pattern.
///
/// A fixed set only ever meets symbols of the graph it was drawn from; on
/// any other graph the predicate is false.
///
/// A pattern is resolved against the graph the predicate is evaluated on.
/// The resolution is cached in the target and recomputed whenever the
/// predicate meets a different graph.
#[derive(Debug, Clone)]
pub struct RelationTarget {
    kind: TargetKind,
}

impl RelationTarget {
    /// Target every symbol whose name fully matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Pattern`](crate::QueryError::Pattern) if the
    /// pattern does not compile.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(Self {
            kind: TargetKind::Pattern {
                pattern: name_regex(pattern)?,
                resolved: RefCell::new(None),
            },
        })
    }

    /// Target the members of `set`.
    pub fn symbols(set: &SymbolSet<'_>) -> Self {
        Self {
            kind: TargetKind::Symbols {
                graph: set.graph().id(),
                members: set.iter().map(|symbol| symbol.id).collect(),
            },
        }
    }

    fn meets(&self, graph: &CallGraph, image: &SymbolSet<'_>) -> bool {
        match &self.kind {
            TargetKind::Symbols { graph: source, members } => {
                *source == graph.id() && image.iter().any(|symbol| members.contains(&symbol.id))
            }
            TargetKind::Pattern { pattern, resolved } => {
                let mut resolved = resolved.borrow_mut();
                let stale = resolved
                    .as_ref()
                    .map_or(true, |(graph_id, _)| *graph_id != graph.id());
                if stale {
                    let members: HashSet<SymbolId> = graph
                        .symbols()
                        .filter(|symbol| pattern.is_match(&symbol.name))
                        .map(|symbol| symbol.id)
                        .collect();
                    trace!(
                        "Resolved target '{}' to {} symbols in graph {}",
                        pattern.as_str(),
                        members.len(),
                        graph.id()
                    );
                    *resolved = Some((graph.id(), members));
                }
                resolved
                    .as_ref()
                    .is_some_and(|(_, members)| image.iter().any(|symbol| members.contains(&symbol.id)))
            }
        }
    }

    fn is_resolved_for(&self, graph: &CallGraph) -> bool {
        match &self.kind {
            TargetKind::Symbols { graph: source, .. } => *source == graph.id(),
            TargetKind::Pattern { resolved, .. } => resolved
                .borrow()
                .as_ref()
                .is_some_and(|(graph_id, _)| *graph_id == graph.id()),
        }
    }
}

impl From<&SymbolSet<'_>> for RelationTarget {
    fn from(set: &SymbolSet<'_>) -> Self {
        Self::symbols(set)
    }
}

/// True for a symbol when its image under `relation` meets `target`.
#[derive(Debug, Clone)]
pub struct RelationshipPredicate {
    relation: Relation,
    target: RelationTarget,
}

impl RelationshipPredicate {
    /// Pair a relation with a target.
    pub fn new(relation: Relation, target: RelationTarget) -> Self {
        Self { relation, target }
    }

    /// The relation applied to each symbol.
    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// Whether the target is resolved against `graph`. A fixed set is
    /// resolved only for the graph it was drawn from.
    pub fn is_resolved_for(&self, graph: &CallGraph) -> bool {
        self.target.is_resolved_for(graph)
    }

    pub(crate) fn eval(&self, graph: &CallGraph, symbol: &Symbol) -> bool {
        let image = self.relation.image_of(graph, symbol);
        self.target.meets(graph, &image)
    }
}

//! Symbol sets: the central container of the query algebra.

use super::closure::{tclose, trclose};
use super::path_set::{CallPath, PathSet};
use crate::error::{QueryError, Result};
use crate::graph::{CallGraph, Symbol};
use crate::pattern::Address;
use crate::predicate::{Comparator, Item, Predicate, StrField};
use indexmap::IndexSet;
use log::{debug, trace};
use std::cell::OnceCell;
use std::collections::HashSet;
use std::rc::Rc;

type Members<'g> = IndexSet<&'g Symbol>;

/// A deduplicated set of symbols from one [`CallGraph`].
///
/// Every set derived from another one (algebra, filtering, closures) shares
/// the same `universe`, the whole-program set used for [`complement`].
/// Members keep insertion order, which [`sort`] rearranges.
///
/// Direct `callees()` and `callers()` are computed on first use and cached
/// in the instance. The caches use `OnceCell`, so a `SymbolSet` is neither
/// `Sync` nor meant to be shared between threads.
///
/// [`complement`]: SymbolSet::complement
/// [`sort`]: SymbolSet::sort
pub struct SymbolSet<'g> {
    graph: &'g CallGraph,
    members: Members<'g>,
    universe: Option<Rc<Members<'g>>>,
    callees_cache: OnceCell<Box<SymbolSet<'g>>>,
    callers_cache: OnceCell<Box<SymbolSet<'g>>>,
}

impl<'g> SymbolSet<'g> {
    fn from_parts(
        graph: &'g CallGraph,
        members: Members<'g>,
        universe: Option<Rc<Members<'g>>>,
    ) -> Self {
        Self {
            graph,
            members,
            universe,
            callees_cache: OnceCell::new(),
            callers_cache: OnceCell::new(),
        }
    }

    /// The whole program: every symbol, acting as its own universe.
    pub(crate) fn universe(graph: &'g CallGraph) -> Self {
        let members: Members<'g> = graph.symbols().collect();
        let universe = Rc::new(members.clone());
        Self::from_parts(graph, members, Some(universe))
    }

    /// A single-symbol set with no universe, used to probe relations.
    pub(crate) fn probe(graph: &'g CallGraph, symbol: &'g Symbol) -> Self {
        Self::from_parts(graph, IndexSet::from([symbol]), None)
    }

    pub(crate) fn with_universe(
        graph: &'g CallGraph,
        members: Members<'g>,
        universe: Option<Rc<Members<'g>>>,
    ) -> Self {
        Self::from_parts(graph, members, universe)
    }

    fn derive(&self, members: Members<'g>) -> Self {
        Self::from_parts(self.graph, members, self.universe.clone())
    }

    fn reset_caches(&mut self) {
        self.callees_cache.take();
        self.callers_cache.take();
    }

    /// The graph this set was drawn from.
    pub fn graph(&self) -> &'g CallGraph {
        self.graph
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the set has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `symbol` is a member.
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.members.contains(symbol)
    }

    /// Members in their current order.
    pub fn iter(&self) -> impl Iterator<Item = &'g Symbol> + '_ {
        self.members.iter().copied()
    }

    /// Member names in their current order.
    pub fn names(&self) -> Vec<&'g str> {
        self.iter().map(|symbol| symbol.name.as_str()).collect()
    }

    /// Whether the set carries a whole-program universe.
    pub fn has_universe(&self) -> bool {
        self.universe.is_some()
    }

    /// The universe as a set of its own.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MissingUniverse`] for sets built without one.
    pub fn universe_set(&self) -> Result<Self> {
        let universe = self
            .universe
            .as_ref()
            .ok_or_else(|| QueryError::missing_universe("resolve the universe"))?;
        Ok(self.derive((**universe).clone()))
    }

    // ---- algebra ----

    /// Members of either set. Keeps the universe of `self`.
    pub fn union(&self, other: &SymbolSet<'g>) -> Self {
        self.derive(self.members.union(&other.members).copied().collect())
    }

    /// Members of both sets.
    pub fn intersect(&self, other: &SymbolSet<'g>) -> Self {
        self.derive(self.members.intersection(&other.members).copied().collect())
    }

    /// Members of `self` that are not in `other`.
    pub fn difference(&self, other: &SymbolSet<'g>) -> Self {
        self.derive(self.members.difference(&other.members).copied().collect())
    }

    /// In-place union.
    pub fn union_with(&mut self, other: &SymbolSet<'g>) {
        let before = self.len();
        self.members.extend(other.members.iter().copied());
        if self.len() != before {
            self.reset_caches();
        }
    }

    /// In-place intersection.
    pub fn intersect_with(&mut self, other: &SymbolSet<'g>) {
        let before = self.len();
        self.members.retain(|symbol| other.members.contains(*symbol));
        if self.len() != before {
            self.reset_caches();
        }
    }

    /// In-place difference.
    pub fn subtract(&mut self, other: &SymbolSet<'g>) {
        let before = self.len();
        self.members.retain(|symbol| !other.members.contains(*symbol));
        if self.len() != before {
            self.reset_caches();
        }
    }

    /// Every symbol of the universe that is not a member.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidComplement`] if the set has no universe,
    /// as is the case for single-symbol probe sets.
    pub fn complement(&self) -> Result<Self> {
        let universe = self.universe.as_ref().ok_or(QueryError::InvalidComplement)?;
        Ok(self.derive(
            universe
                .iter()
                .copied()
                .filter(|symbol| !self.members.contains(*symbol))
                .collect(),
        ))
    }

    /// Whether the two sets share at least one member.
    pub fn intersects(&self, other: &SymbolSet<'g>) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.members.iter().any(|symbol| large.members.contains(*symbol))
    }

    // ---- relations ----

    /// Symbols called directly by any member. Computed once per instance.
    pub fn callees(&self) -> &SymbolSet<'g> {
        self.callees_cache.get_or_init(|| {
            let members = self
                .iter()
                .flat_map(|symbol| self.graph.callees_of(symbol))
                .collect();
            trace!("Expanded callees of {} symbols", self.len());
            Box::new(self.derive(members))
        })
    }

    /// Symbols calling any member directly. Computed once per instance.
    pub fn callers(&self) -> &SymbolSet<'g> {
        self.callers_cache.get_or_init(|| {
            let members = self
                .iter()
                .flat_map(|symbol| self.graph.callers_of(symbol))
                .collect();
            trace!("Expanded callers of {} symbols", self.len());
            Box::new(self.derive(members))
        })
    }

    /// Symbols reachable through one or more calls.
    pub fn tcallees(&self) -> Self {
        tclose(self, |set| set.callees().clone())
    }

    /// Symbols reaching a member through one or more calls.
    pub fn tcallers(&self) -> Self {
        tclose(self, |set| set.callers().clone())
    }

    /// The members plus everything reachable from them.
    pub fn trcallees(&self) -> Self {
        trclose(self, |set| set.callees().clone())
    }

    /// The members plus everything reaching them.
    pub fn trcallers(&self) -> Self {
        trclose(self, |set| set.callers().clone())
    }

    // ---- filtering ----

    /// Members for which `predicate` holds.
    pub fn filter(&self, predicate: &Predicate) -> Self {
        self.derive(
            self.members
                .iter()
                .copied()
                .filter(|symbol| predicate.eval(self.graph, Item::Symbol(symbol)))
                .collect(),
        )
    }

    /// Members located at `address` (file pattern, line, name pattern).
    pub fn filter_by_address(&self, address: &Address) -> Result<Self> {
        Ok(self.filter(&address.to_predicate()?))
    }

    /// Members whose name fully matches `pattern`; `""` and `*` match every name.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Pattern`] if the pattern does not compile.
    pub fn filter_by_name(&self, pattern: &str) -> Result<Self> {
        self.filter_by_address(&Address::name(pattern))
    }

    /// Reorder members by chained comparators: each comparator breaks the
    /// ties left by the previous one. With no comparators, sort by name.
    ///
    /// Membership and cached relations are unaffected.
    pub fn sort(&mut self, comparators: &[Comparator]) {
        let by_name = [StrField::Name.ascending()];
        let comparators = if comparators.is_empty() {
            &by_name[..]
        } else {
            comparators
        };
        self.members.sort_by(|a, b| {
            Comparator::compare_chain(comparators, Item::Symbol(a), Item::Symbol(b))
        });
    }

    /// Remove and return the most recently inserted member.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EmptyCollection`] if the set is empty.
    pub fn pop(&mut self) -> Result<&'g Symbol> {
        let symbol = self
            .members
            .pop()
            .ok_or_else(|| QueryError::empty_collection("pop"))?;
        self.reset_caches();
        Ok(symbol)
    }

    // ---- paths ----

    /// Every simple call path from a member of `self` to a member of `destination`.
    ///
    /// The search is depth-first over an explicit stack, so path length is
    /// not limited by the thread's stack. It never revisits a symbol already
    /// on the current path, so cycles cannot make it diverge. A symbol may still
    /// appear in several distinct paths. Paths are kept in discovery order;
    /// `QueryConfig::max_path_length` bounds their length.
    pub fn paths(&self, destination: &SymbolSet<'g>) -> PathSet<'g> {
        let search = PathSearch {
            graph: self.graph,
            targets: &destination.members,
            max_length: self.graph.config().max_path_length,
        };
        let mut found = IndexSet::new();
        for start in self.iter() {
            search.run(start, &mut found);
        }
        debug!(
            "Found {} paths from {} to {} symbols",
            found.len(),
            self.len(),
            destination.len()
        );
        PathSet::with_universe(self.graph, found, self.universe.clone())
    }

    /// Paths to every symbol of the universe satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MissingUniverse`] if the set has no universe.
    pub fn paths_where(&self, predicate: &Predicate) -> Result<PathSet<'g>> {
        let destination = self.universe_set()?.filter(predicate);
        Ok(self.paths(&destination))
    }

    /// Paths to every symbol of the universe whose name fully matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MissingUniverse`] if the set has no universe, or
    /// [`QueryError::Pattern`] if the pattern does not compile.
    pub fn paths_to_named(&self, pattern: &str) -> Result<PathSet<'g>> {
        let destination = self.universe_set()?.filter_by_name(pattern)?;
        Ok(self.paths(&destination))
    }
}

struct PathSearch<'a, 'g> {
    graph: &'g CallGraph,
    targets: &'a Members<'g>,
    max_length: Option<usize>,
}

impl<'g> PathSearch<'_, 'g> {
    // Records `prefix` if it ends at a target, and reports whether it may grow.
    fn visit(&self, prefix: &[&'g Symbol], found: &mut IndexSet<CallPath<'g>>) -> bool {
        let len = prefix.len();
        if self.max_length.is_some_and(|max| len > max) {
            return false;
        }
        if prefix.last().is_some_and(|last| self.targets.contains(*last)) {
            found.insert(CallPath::new(prefix.to_vec()));
        }
        self.max_length.map_or(true, |max| len < max)
    }

    // Depth-first over an explicit stack of callee iterators, one frame per
    // symbol on the current path.
    fn run(&self, start: &'g Symbol, found: &mut IndexSet<CallPath<'g>>) {
        let mut prefix = vec![start];
        let mut on_path = HashSet::from([start.id]);
        let mut frames = Vec::new();
        if self.visit(&prefix, found) {
            frames.push(self.graph.callees_of(start));
        }

        loop {
            let next = match frames.last_mut() {
                Some(callees) => callees.next(),
                None => break,
            };
            match next {
                Some(next) => {
                    if !on_path.insert(next.id) {
                        continue;
                    }
                    prefix.push(next);
                    if self.visit(&prefix, found) {
                        frames.push(self.graph.callees_of(next));
                    } else {
                        prefix.pop();
                        on_path.remove(&next.id);
                    }
                }
                None => {
                    frames.pop();
                    if let Some(done) = prefix.pop() {
                        on_path.remove(&done.id);
                    }
                }
            }
        }
    }
}

impl Clone for SymbolSet<'_> {
    // Caches are not carried over
    fn clone(&self) -> Self {
        Self::from_parts(self.graph, self.members.clone(), self.universe.clone())
    }
}

impl PartialEq for SymbolSet<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph)
            && self.len() == other.len()
            && self.members.iter().all(|symbol| other.members.contains(*symbol))
    }
}

impl Eq for SymbolSet<'_> {}

impl std::fmt::Debug for SymbolSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolSet")
            .field("members", &self.names())
            .field("has_universe", &self.has_universe())
            .finish()
    }
}

impl std::fmt::Display for SymbolSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.names().join(", "))
    }
}

impl<'a, 'g> IntoIterator for &'a SymbolSet<'g> {
    type Item = &'g Symbol;
    type IntoIter = std::iter::Copied<indexmap::set::Iter<'a, &'g Symbol>>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter().copied()
    }
}

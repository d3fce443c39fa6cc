//! Sets of call paths.

use super::SymbolSet;
use crate::config::TieBreak;
use crate::error::{QueryError, Result};
use crate::graph::{CallGraph, Symbol, SymbolId};
use crate::pattern::name_regex;
use crate::predicate::{Item, Predicate};
use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use log::debug;
use regex::Regex;
use std::rc::Rc;

/// An ordered, non-empty sequence of symbols linked by direct calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallPath<'g> {
    symbols: Vec<&'g Symbol>,
}

impl<'g> CallPath<'g> {
    pub(crate) fn new(symbols: Vec<&'g Symbol>) -> Self {
        Self { symbols }
    }

    /// The symbols along the path.
    pub fn symbols(&self) -> &[&'g Symbol] {
        &self.symbols
    }

    /// Names along the path.
    pub fn names(&self) -> Vec<&'g str> {
        self.symbols.iter().map(|symbol| symbol.name.as_str()).collect()
    }

    /// Number of symbols on the path.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for paths built by queries.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Where the path starts.
    pub fn first(&self) -> Option<&'g Symbol> {
        self.symbols.first().copied()
    }

    /// Where the path ends.
    pub fn last(&self) -> Option<&'g Symbol> {
        self.symbols.last().copied()
    }

    fn endpoints(&self) -> Option<(SymbolId, SymbolId)> {
        Some((self.first()?.id, self.last()?.id))
    }

    fn position_of(&self, pattern: &Regex) -> Option<usize> {
        self.symbols
            .iter()
            .position(|symbol| pattern.is_match(&symbol.name))
    }
}

impl std::fmt::Display for CallPath<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.names().join(", "))
    }
}

/// One end of a [`PathSet::slice`].
#[derive(Debug, Clone)]
pub enum PathBound {
    /// Start or end of each path
    Open,
    /// Position within each path; negative values count from the end
    Index(isize),
    /// First symbol whose name fully matches the pattern
    Name(Regex),
}

impl PathBound {
    /// Bound at the first symbol whose name fully matches `pattern`.
    pub fn name(pattern: &str) -> Result<Self> {
        Ok(Self::Name(name_regex(pattern)?))
    }

    // Resolved position, clamped into 0..=len like sequence slicing.
    fn resolve(&self, path: &CallPath<'_>, open: usize) -> Result<usize> {
        let len = path.len();
        match self {
            Self::Open => Ok(open),
            Self::Index(index) if *index < 0 => Ok(len.saturating_sub(index.unsigned_abs())),
            Self::Index(index) => Ok((*index as usize).min(len)),
            Self::Name(pattern) => path.position_of(pattern).ok_or_else(|| QueryError::NotFound {
                pattern: pattern.as_str().to_string(),
                path: path.to_string(),
            }),
        }
    }
}

impl From<isize> for PathBound {
    fn from(index: isize) -> Self {
        Self::Index(index)
    }
}

/// A deduplicated collection of call paths.
///
/// Paths keep the order in which they were found or combined, which makes
/// every operation, including [`unique`](PathSet::unique), deterministic.
#[derive(Clone)]
pub struct PathSet<'g> {
    graph: &'g CallGraph,
    paths: IndexSet<CallPath<'g>>,
    universe: Option<Rc<IndexSet<&'g Symbol>>>,
}

impl<'g> PathSet<'g> {
    pub(crate) fn with_universe(
        graph: &'g CallGraph,
        paths: IndexSet<CallPath<'g>>,
        universe: Option<Rc<IndexSet<&'g Symbol>>>,
    ) -> Self {
        Self {
            graph,
            paths,
            universe,
        }
    }

    fn derive(&self, paths: IndexSet<CallPath<'g>>) -> Self {
        Self::with_universe(self.graph, paths, self.universe.clone())
    }

    /// Number of paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether there are no paths.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Paths in set order.
    pub fn iter(&self) -> impl Iterator<Item = &CallPath<'g>> {
        self.paths.iter()
    }

    /// Whether `path` is a member.
    pub fn contains(&self, path: &CallPath<'g>) -> bool {
        self.paths.contains(path)
    }

    /// Whether a path with exactly these symbol names is a member.
    pub fn contains_names(&self, names: &[&str]) -> bool {
        self.paths.iter().any(|path| path.names() == names)
    }

    /// Paths in either set.
    pub fn union(&self, other: &PathSet<'g>) -> Self {
        self.derive(self.paths.union(&other.paths).cloned().collect())
    }

    /// Paths in both sets.
    pub fn intersect(&self, other: &PathSet<'g>) -> Self {
        self.derive(self.paths.intersection(&other.paths).cloned().collect())
    }

    /// Paths of `self` not in `other`.
    pub fn difference(&self, other: &PathSet<'g>) -> Self {
        self.derive(self.paths.difference(&other.paths).cloned().collect())
    }

    /// Keep one shortest path per (start, end) pair.
    ///
    /// Among equally short paths, `QueryConfig::tie_break` decides whether
    /// the first or the last one in set order survives.
    pub fn unique(&self) -> Self {
        let tie_break = self.graph.config().tie_break;
        let mut shortest: IndexMap<(SymbolId, SymbolId), &CallPath<'g>> = IndexMap::new();
        for path in &self.paths {
            let Some(key) = path.endpoints() else {
                continue;
            };
            match shortest.entry(key) {
                Entry::Vacant(entry) => {
                    entry.insert(path);
                }
                Entry::Occupied(mut entry) => {
                    let kept = entry.get().len();
                    let replace = match tie_break {
                        TieBreak::FirstSeen => path.len() < kept,
                        TieBreak::LastSeen => path.len() <= kept,
                    };
                    if replace {
                        entry.insert(path);
                    }
                }
            }
        }
        debug!("Reduced {} paths to {}", self.len(), shortest.len());
        self.derive(shortest.into_values().cloned().collect())
    }

    /// Paths for which `predicate` holds.
    pub fn filter(&self, predicate: &Predicate) -> Self {
        self.derive(
            self.paths
                .iter()
                .filter(|path| predicate.eval(self.graph, Item::Path(path.symbols())))
                .cloned()
                .collect(),
        )
    }

    /// Every symbol appearing on any path.
    pub fn symbols(&self) -> SymbolSet<'g> {
        let members = self
            .paths
            .iter()
            .flat_map(|path| path.symbols().iter().copied())
            .collect();
        SymbolSet::with_universe(self.graph, members, self.universe.clone())
    }

    /// Every symbol on any path whose name fully matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Pattern`] if the pattern does not compile.
    pub fn symbols_matching(&self, pattern: &str) -> Result<SymbolSet<'g>> {
        let pattern = name_regex(pattern)?;
        let members = self
            .paths
            .iter()
            .flat_map(|path| path.symbols().iter().copied())
            .filter(|symbol| pattern.is_match(&symbol.name))
            .collect();
        Ok(SymbolSet::with_universe(
            self.graph,
            members,
            self.universe.clone(),
        ))
    }

    /// Sub-paths between `start` (inclusive) and `end` (exclusive).
    ///
    /// A name bound starts at, or ends just before, the first matching
    /// symbol of each path. Sub-paths that come out empty are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NotFound`] as soon as a name bound matches no
    /// symbol of some path; no partial result is produced.
    pub fn slice(&self, start: &PathBound, end: &PathBound) -> Result<Self> {
        let mut sliced = IndexSet::new();
        for path in &self.paths {
            let from = start.resolve(path, 0)?;
            let to = end.resolve(path, path.len())?;
            if let Some(symbols) = path.symbols.get(from..to) {
                if !symbols.is_empty() {
                    sliced.insert(CallPath::new(symbols.to_vec()));
                }
            }
        }
        Ok(self.derive(sliced))
    }
}

impl PartialEq for PathSet<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph)
            && self.len() == other.len()
            && self.paths.iter().all(|path| other.paths.contains(path))
    }
}

impl Eq for PathSet<'_> {}

impl std::fmt::Debug for PathSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.paths.iter().map(CallPath::names))
            .finish()
    }
}

impl std::fmt::Display for PathSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self.paths.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", rendered.join(", "))
    }
}

impl<'a, 'g> IntoIterator for &'a PathSet<'g> {
    type Item = &'a CallPath<'g>;
    type IntoIter = indexmap::set::Iter<'a, CallPath<'g>>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

//! In-memory call graph: the symbol universe queries run against.

use super::types::{Symbol, SymbolDecl, SymbolId};
use crate::config::QueryConfig;
use crate::error::{QueryError, Result};
use crate::set::SymbolSet;
use indexmap::IndexSet;
use log::{debug, info, trace, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// A whole-program call graph.
///
/// Symbols and forward "calls" edges are added explicitly; reverse adjacency
/// is finalised once by [`CallGraph::compute_callers`]. After that the graph
/// is treated as static for the rest of the query session.
#[derive(Debug)]
pub struct CallGraph {
    id: Uuid,
    config: QueryConfig,
    symbols: Vec<Symbol>,
    // Forward adjacency, indexed by SymbolId
    callees: Vec<IndexSet<SymbolId>>,
    // Reverse adjacency, None until compute_callers()
    callers: Option<Vec<IndexSet<SymbolId>>>,
    call_count: usize,
    // Set once a caller query has run without reverse adjacency
    callers_warned: AtomicBool,
}

impl Default for CallGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl CallGraph {
    /// Create an empty graph with the default [`QueryConfig`].
    pub fn new() -> Self {
        Self::with_config(QueryConfig::default())
    }

    /// Create an empty graph with the given query configuration.
    pub fn with_config(config: QueryConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            symbols: Vec::new(),
            callees: Vec::new(),
            callers: None,
            call_count: 0,
            callers_warned: AtomicBool::new(false),
        }
    }

    /// Identity of this graph instance, distinct for every graph created.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Query configuration shared by all sets built from this graph.
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Add a symbol and return its id.
    pub fn add_symbol(&mut self, decl: SymbolDecl) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        debug!("Adding symbol: id={id}, name={}, file={}", decl.name, decl.file);
        self.symbols.push(decl.into_symbol(id));
        self.callees.push(IndexSet::new());
        if let Some(callers) = self.callers.as_mut() {
            callers.push(IndexSet::new());
        }
        id
    }

    /// Record that `caller` calls `callee`. Duplicate edges are ignored.
    ///
    /// Adding an edge after [`compute_callers`](Self::compute_callers)
    /// discards the reverse adjacency; it must be computed again.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::SymbolNotFound`] if either id is unknown.
    pub fn add_call(&mut self, caller: SymbolId, callee: SymbolId) -> Result<()> {
        self.symbol(callee)?;
        let out = self
            .callees
            .get_mut(caller.index())
            .ok_or_else(|| QueryError::SymbolNotFound {
                symbol_id: caller.to_string(),
            })?;

        if out.insert(callee) {
            self.call_count += 1;
            trace!("Added call {caller} -> {callee}");
            if self.callers.take().is_some() {
                debug!("Call added after compute_callers(); reverse adjacency discarded");
            }
        }
        Ok(())
    }

    /// Add several calls at once.
    pub fn add_calls_batch(&mut self, calls: &[(SymbolId, SymbolId)]) -> Result<()> {
        debug!("Adding batch of {} calls", calls.len());
        for &(caller, callee) in calls {
            self.add_call(caller, callee)?;
        }
        Ok(())
    }

    /// Finalise reverse adjacency. Must run after all calls are added and
    /// before any caller-direction query.
    pub fn compute_callers(&mut self) {
        let mut callers = vec![IndexSet::new(); self.symbols.len()];
        for (caller, out) in self.callees.iter().enumerate() {
            for callee in out {
                callers[callee.index()].insert(SymbolId(caller as u32));
            }
        }
        info!(
            "Computed callers for {} symbols, {} calls",
            self.symbols.len(),
            self.call_count
        );
        self.callers = Some(callers);
        self.callers_warned.store(false, Ordering::Relaxed);
    }

    /// Whether [`compute_callers`](Self::compute_callers) is up to date.
    pub fn callers_computed(&self) -> bool {
        self.callers.is_some()
    }

    /// The whole program as a symbol set: the universe for complementation.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::CallersNotComputed`] if reverse adjacency has
    /// not been finalised.
    pub fn all_program_symbols(&self) -> Result<SymbolSet<'_>> {
        if !self.callers_computed() {
            return Err(QueryError::CallersNotComputed);
        }
        Ok(SymbolSet::universe(self))
    }

    /// Look up a symbol by id.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::SymbolNotFound`] if the id is unknown.
    pub fn symbol(&self, id: SymbolId) -> Result<&Symbol> {
        self.symbols
            .get(id.index())
            .ok_or_else(|| QueryError::SymbolNotFound {
                symbol_id: id.to_string(),
            })
    }

    /// All symbols in id order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Symbols called directly by `symbol`.
    pub fn callees_of<'g>(&'g self, symbol: &Symbol) -> impl Iterator<Item = &'g Symbol> + 'g {
        self.callees
            .get(symbol.id.index())
            .into_iter()
            .flatten()
            .filter_map(move |id| self.symbols.get(id.index()))
    }

    /// Symbols calling `symbol` directly. Empty until callers are computed.
    ///
    /// The first such query on a graph without reverse adjacency logs a
    /// warning; later ones stay silent until callers are computed again.
    pub fn callers_of<'g>(&'g self, symbol: &Symbol) -> impl Iterator<Item = &'g Symbol> + 'g {
        if self.callers.is_none() && !self.callers_warned.swap(true, Ordering::Relaxed) {
            warn!(
                "callers of '{}' requested before compute_callers(); caller queries yield nothing",
                symbol.name
            );
        }
        self.callers
            .as_ref()
            .and_then(|callers| callers.get(symbol.id.index()))
            .into_iter()
            .flatten()
            .filter_map(move |id| self.symbols.get(id.index()))
    }

    pub(crate) fn callers_warned(&self) -> bool {
        self.callers_warned.load(Ordering::Relaxed)
    }

    /// Whether `caller` calls `callee` directly.
    pub fn has_call(&self, caller: &Symbol, callee: &Symbol) -> bool {
        self.callees
            .get(caller.id.index())
            .is_some_and(|out| out.contains(&callee.id))
    }

    /// Number of symbols.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Number of distinct call edges.
    pub fn call_count(&self) -> usize {
        self.call_count
    }

    /// All call edges as `(caller, callee)` id pairs.
    pub fn calls(&self) -> impl Iterator<Item = (SymbolId, SymbolId)> + '_ {
        self.callees.iter().enumerate().flat_map(|(caller, out)| {
            out.iter().map(move |&callee| (SymbolId(caller as u32), callee))
        })
    }
}

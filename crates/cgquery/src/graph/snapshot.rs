//! JSON snapshots of call graphs.
//!
//! A snapshot lists symbols and the calls between them by position in the
//! `symbols` array. Several snapshots can be included into one graph; each
//! is appended after the symbols already present.

use super::callgraph::CallGraph;
use super::types::{SymbolDecl, SymbolId};
use crate::error::{QueryError, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serialized form of a call graph.
///
/// ```json
/// {
///   "symbols": [
///     {"name": "main", "file": "main.c", "line": 3},
///     {"name": "helper", "file": "util.c", "line": 10, "is_static": true}
///   ],
///   "calls": [[0, 1]]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Symbols in local-index order
    pub symbols: Vec<SymbolDecl>,
    /// `(caller, callee)` pairs of local indices
    #[serde(default)]
    pub calls: Vec<(usize, usize)>,
}

impl GraphSnapshot {
    /// Parse a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| QueryError::serialization("Failed to parse graph snapshot", Some(e)))
    }

    /// Serialize the snapshot to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| QueryError::serialization("Failed to serialize graph snapshot", Some(e)))
    }
}

impl CallGraph {
    /// Append the contents of a snapshot, returning the ids assigned to its symbols.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::SymbolNotFound`] if a call refers to an index
    /// outside the snapshot's symbol list.
    pub fn include_snapshot(&mut self, snapshot: GraphSnapshot) -> Result<Vec<SymbolId>> {
        let local_ids: Vec<SymbolId> = snapshot
            .symbols
            .into_iter()
            .map(|decl| self.add_symbol(decl))
            .collect();

        let resolve = |index: usize| {
            local_ids
                .get(index)
                .copied()
                .ok_or_else(|| QueryError::SymbolNotFound {
                    symbol_id: format!("snapshot index {index}"),
                })
        };
        for (caller, callee) in snapshot.calls {
            self.add_call(resolve(caller)?, resolve(callee)?)?;
        }

        debug!("Included snapshot with {} symbols", local_ids.len());
        Ok(local_ids)
    }

    /// Append a snapshot given as JSON text.
    pub fn include_str(&mut self, json: &str) -> Result<Vec<SymbolId>> {
        self.include_snapshot(GraphSnapshot::from_json(json)?)
    }

    /// Append a snapshot read from a file.
    pub fn include<P: AsRef<Path>>(&mut self, path: P) -> Result<Vec<SymbolId>> {
        let path = path.as_ref();
        info!("Including snapshot: {path:?}");
        let json = std::fs::read_to_string(path).map_err(|source| QueryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.include_str(&json)
    }

    /// Build a finalised graph from one or more snapshot files.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut graph = Self::new();
        for path in paths {
            graph.include(path)?;
        }
        graph.compute_callers();
        Ok(graph)
    }

    /// Capture the graph as a snapshot.
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            symbols: self.symbols().map(SymbolDecl::from).collect(),
            calls: self
                .calls()
                .map(|(caller, callee)| (caller.index(), callee.index()))
                .collect(),
        }
    }
}

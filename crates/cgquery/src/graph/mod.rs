//! The call graph collaborator.
//!
//! This module defines the symbol universe that queries run against:
//! - [`Symbol`]: a named, located program entity
//! - [`CallGraph`]: symbols plus forward and reverse "calls" adjacency
//! - [`GraphSnapshot`]: JSON form used to ingest prebuilt graphs

mod callgraph;
mod snapshot;
mod types;

pub use callgraph::CallGraph;
pub use snapshot::GraphSnapshot;
pub use types::{Symbol, SymbolDecl, SymbolId};

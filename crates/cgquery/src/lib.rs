//! # cgquery
//!
//! A composable query algebra over precomputed whole-program call graphs.
//!
//! ## Core Principles
//!
//! - **Sets all the way down**: every query starts from the whole program
//!   and narrows it with set algebra, relations and predicates
//! - **Explicit graph**: symbols and calls are added (or loaded from JSON
//!   snapshots) and finalised once with `compute_callers()`
//! - **Deterministic results**: sets and paths keep a stable order
//!
//! ## Architecture
//!
//! ```text
//! Predicates & Field Selectors (filters, comparators)
//!     ↓
//! Symbol Sets / Path Sets (algebra, relations, paths, slicing)
//!     ↓
//! Closure Engine (fixed points over callees/callers)
//!     ↓
//! Call Graph (symbols, forward and reverse adjacency)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cgquery::{CallGraph, SymbolDecl};
//!
//! # fn example() -> cgquery::Result<()> {
//! let mut graph = CallGraph::new();
//! let main = graph.add_symbol(SymbolDecl::new("main", "main.c", 3));
//! let parse = graph.add_symbol(SymbolDecl::new("parse", "parse.c", 12));
//! let lex = graph.add_symbol(SymbolDecl::new("lex", "lex.c", 40));
//! graph.add_calls_batch(&[(main, parse), (parse, lex)])?;
//! graph.compute_callers();
//!
//! let all = graph.all_program_symbols()?;
//! let from_main = all.filter_by_name("main")?;
//! assert_eq!(from_main.tcallees().len(), 2);
//!
//! let paths = from_main.paths_to_named("lex")?;
//! assert!(paths.contains_names(&["main", "parse", "lex"]));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod pattern;
pub mod predicate;
pub mod set;

// Re-export main types
pub use config::{QueryConfig, TieBreak};
pub use error::{QueryError, Result};
pub use export::{export_dot, export_dot_styled, DotOptions};
pub use graph::{CallGraph, GraphSnapshot, Symbol, SymbolDecl, SymbolId};
pub use pattern::{Address, LineSelector};
pub use predicate::{
    CmpOp, Comparator, FieldPredicate, Flag, IntField, IntOperand, Item, PathShape, Predicate,
    Relation, RelationTarget, RelationshipPredicate, SortKey, StrField, StrOperand,
};
pub use set::closure::{tclose, trclose};
pub use set::{CallPath, PathBound, PathSet, SymbolSet};

//! Export module for visualizing query results in external tools.
//!
//! - **DOT**: Graphviz rendering of the subgraph induced by a symbol set

pub mod dot;

pub use dot::{export_dot, export_dot_styled, DotOptions};

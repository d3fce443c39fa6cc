//! Symbol sets, path sets and the closure engine.

pub mod closure;
mod path_set;
mod symbol_set;

pub use path_set::{CallPath, PathBound, PathSet};
pub use symbol_set::SymbolSet;

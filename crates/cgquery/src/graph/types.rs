//! Core graph types: symbol ids, symbols and symbol declarations.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Unique identifier for a symbol (dense index into its graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub(crate) u32);

impl SymbolId {
    /// Position of the symbol in its graph's symbol table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named program entity (function or variable) owned by a [`CallGraph`](crate::CallGraph).
///
/// Symbols are immutable once the graph is built. Equality and hashing go by
/// identity only, so two symbols with the same name in different files stay
/// distinct.
#[derive(Debug, Clone)]
pub struct Symbol {
    /// Identity within the owning graph
    pub id: SymbolId,
    /// Symbol name
    pub name: String,
    /// Path of the defining source file
    pub file: String,
    /// Line of the definition (1-based)
    pub line: u32,
    /// Variable rather than function
    pub is_variable: bool,
    /// File-local linkage
    pub is_static: bool,
    /// Only declared, never defined
    pub is_declaration: bool,
}

impl Symbol {
    /// Final component of the file path (`src/main.c` -> `main.c`).
    pub fn file_base(&self) -> &str {
        Path::new(&self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.file)
    }

    /// Directory part of the file path (`src/main.c` -> `src`), empty for bare file names.
    pub fn file_dir(&self) -> &str {
        Path::new(&self.file)
            .parent()
            .and_then(|dir| dir.to_str())
            .unwrap_or("")
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Description of a symbol to add to a graph.
///
/// # Examples
///
/// ```
/// use cgquery::SymbolDecl;
///
/// let decl = SymbolDecl::new("helper", "src/util.c", 42).with_static(true);
/// assert!(decl.is_static);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolDecl {
    /// Symbol name
    pub name: String,
    /// Path of the defining source file
    pub file: String,
    /// Line of the definition
    pub line: u32,
    /// Variable rather than function
    #[serde(default)]
    pub is_variable: bool,
    /// File-local linkage
    #[serde(default)]
    pub is_static: bool,
    /// Only declared, never defined
    #[serde(default)]
    pub is_declaration: bool,
}

impl SymbolDecl {
    /// A defined, external function.
    pub fn new(name: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            line,
            is_variable: false,
            is_static: false,
            is_declaration: false,
        }
    }

    /// Mark as a variable
    pub fn with_variable(mut self, is_variable: bool) -> Self {
        self.is_variable = is_variable;
        self
    }

    /// Mark as file-local
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Mark as declaration only
    pub fn with_declaration(mut self, is_declaration: bool) -> Self {
        self.is_declaration = is_declaration;
        self
    }

    pub(crate) fn into_symbol(self, id: SymbolId) -> Symbol {
        Symbol {
            id,
            name: self.name,
            file: self.file,
            line: self.line,
            is_variable: self.is_variable,
            is_static: self.is_static,
            is_declaration: self.is_declaration,
        }
    }
}

impl From<&Symbol> for SymbolDecl {
    fn from(symbol: &Symbol) -> Self {
        Self {
            name: symbol.name.clone(),
            file: symbol.file.clone(),
            line: symbol.line,
            is_variable: symbol.is_variable,
            is_static: symbol.is_static,
            is_declaration: symbol.is_declaration,
        }
    }
}

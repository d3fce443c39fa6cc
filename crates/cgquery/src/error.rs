//! Error types for cgquery operations.
//!
//! All fallible operations return [`Result<T>`]. Failures are local and
//! synchronous: an operation either fully succeeds or fails as a whole.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Error type for all query and graph operations.
#[derive(Error, Debug)]
pub enum QueryError {
    /// An element was requested from a collection with no members
    #[error("Empty collection: cannot {operation} from an empty set")]
    EmptyCollection {
        /// Operation that required a member
        operation: String,
    },

    /// A name pattern used as a path slice endpoint matched no symbol in a path
    #[error("Not found: no symbol matching '{pattern}' in path {path}")]
    NotFound {
        /// The endpoint pattern
        pattern: String,
        /// Rendering of the path that was searched
        path: String,
    },

    /// A name or file pattern failed to compile
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        /// The pattern as supplied by the caller
        pattern: String,
        /// Regex compilation error
        #[source]
        source: regex::Error,
    },

    /// A symbol address could not be parsed
    #[error("Invalid address '{address}': {message}")]
    InvalidAddress {
        /// The address text
        address: String,
        /// What was wrong with it
        message: String,
    },

    /// The universe was requested before reverse adjacency was finalised
    #[error("Callers not computed: call compute_callers() before querying the program")]
    CallersNotComputed,

    /// Complement requested on a set built without a whole-program universe
    #[error("Invalid complement: set has no universe")]
    InvalidComplement,

    /// An operation needed the universe of a set that has none
    #[error("Missing universe: cannot {operation} on a set without a universe")]
    MissingUniverse {
        /// Operation that required the universe
        operation: String,
    },

    /// Symbol id unknown to the call graph
    #[error("Symbol not found: {symbol_id}")]
    SymbolNotFound {
        /// The unknown id
        symbol_id: String,
    },

    /// Snapshot serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error details
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Snapshot file could not be read
    #[error("IO error reading {path:?}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl QueryError {
    /// Create a pattern error from the offending pattern and the regex error.
    pub fn pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create an empty-collection error for the named operation.
    pub fn empty_collection(operation: impl Into<String>) -> Self {
        Self::EmptyCollection {
            operation: operation.into(),
        }
    }

    /// Create a missing-universe error for the named operation.
    pub fn missing_universe(operation: impl Into<String>) -> Self {
        Self::MissingUniverse {
            operation: operation.into(),
        }
    }

    /// Create a serialization error from a message and optional source.
    pub fn serialization<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Serialization {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }
}

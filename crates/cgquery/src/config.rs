//! Query behaviour configuration.

use serde::{Deserialize, Serialize};

/// Which path survives when several shortest paths share the same endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep the first shortest path in path-set order
    #[default]
    FirstSeen,
    /// Keep the last shortest path in path-set order
    LastSeen,
}

/// Configuration for query evaluation.
///
/// Attached to a [`CallGraph`](crate::CallGraph) and read by every set
/// derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Maximum number of symbols in a discovered path (None = unbounded)
    pub max_path_length: Option<usize>,

    /// Tie-break rule for `PathSet::unique`
    pub tie_break: TieBreak,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_path_length: None,
            tie_break: TieBreak::FirstSeen,
        }
    }
}

impl QueryConfig {
    /// Config for very large programs: path search stops at 32 symbols.
    pub fn bounded() -> Self {
        Self {
            max_path_length: Some(32),
            ..Default::default()
        }
    }

    /// Set the maximum path length
    pub fn with_max_path_length(mut self, length: usize) -> Self {
        self.max_path_length = Some(length);
        self
    }

    /// Set the `unique()` tie-break rule
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            crate::QueryError::serialization("Failed to parse query config", Some(e))
        })
    }
}

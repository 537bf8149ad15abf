use super::node::NodeKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Case-insensitive containment.
    #[default]
    Substring,
    /// Case-insensitive regular expression.
    Pattern,
}

/// Search across loaded modules.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct SearchQuery {
    pub term: String,
    #[serde(default)]
    pub mode: MatchMode,
    /// Restrict hits to these kinds; empty means all kinds.
    #[serde(default)]
    pub kinds: Vec<NodeKind>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

pub const DEFAULT_SEARCH_LIMIT: usize = 200;

fn default_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

impl SearchQuery {
    pub fn substring(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            mode: MatchMode::Substring,
            kinds: Vec::new(),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self {
            mode: MatchMode::Pattern,
            ..Self::substring(pattern)
        }
    }

    pub fn with_kinds(mut self, kinds: Vec<NodeKind>) -> Self {
        self.kinds = kinds;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// A search match, shaped for listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct SearchHit {
    pub module: String,
    pub name: String,
    pub oid: String,
    pub symbolic_oid: String,
    pub kind: NodeKind,
    /// Description preview, at most 100 characters.
    pub description: String,
}

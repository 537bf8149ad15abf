use super::node::Node;
use super::oid::{Oid, OidSegment};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One `REVISION` clause of a MODULE-IDENTITY.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct Revision {
    pub date: String,
    pub description: String,
}

/// The MODULE-IDENTITY block of a module.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct ModuleIdentity {
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub contact_info: String,
    #[serde(default)]
    pub revisions: Vec<Revision>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Info,
}

/// A non-fatal finding recorded while parsing a module.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Byte offset into the normalized text, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>, offset: Option<usize>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            offset,
        }
    }

    pub fn info(message: impl Into<String>, offset: Option<usize>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
            offset,
        }
    }
}

/// Source module name to the symbols imported from it, in clause order.
pub type ImportMap = IndexMap<String, Vec<String>>;

/// A branch of the OID forest. `node` names the declaration attached at
/// this exact path, if any.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct ForestEntry {
    pub segment: OidSegment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ForestEntry>,
}

impl ForestEntry {
    pub fn new(segment: OidSegment) -> Self {
        Self {
            segment,
            node: None,
            children: Vec::new(),
        }
    }

    pub fn child(&self, segment: &OidSegment) -> Option<&ForestEntry> {
        self.children
            .binary_search_by(|c| c.segment.cmp(segment))
            .ok()
            .map(|i| &self.children[i])
    }
}

/// OID forest of one module. Children are kept sorted by segment.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct Forest {
    pub roots: Vec<ForestEntry>,
    /// The first declaration seen without any OID path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_oid: Option<String>,
}

impl Forest {
    /// Find the entry at an exact path.
    pub fn get(&self, oid: &Oid) -> Option<&ForestEntry> {
        let (first, rest) = oid.segments().split_first()?;
        let mut current = self
            .roots
            .binary_search_by(|e| e.segment.cmp(first))
            .ok()
            .map(|i| &self.roots[i])?;
        for segment in rest {
            current = current.child(segment)?;
        }
        Some(current)
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.no_oid.is_none()
    }
}

/// Everything produced by parsing one module.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct ParsedModule {
    pub name: String,
    /// xxh3 of the raw source text.
    #[serde(default)]
    pub source_hash: u64,
    /// Nodes in flat-list order (sorted by OID, then name).
    pub nodes: IndexMap<String, Node>,
    #[serde(default)]
    pub imports: ImportMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<ModuleIdentity>,
    #[serde(default)]
    pub forest: Forest,
    /// Names bound by plain type assignments and MACRO definitions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedModule {
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    pub fn node_by_oid(&self, dotted: &str) -> Option<&Node> {
        let oid = Oid::parse(dotted);
        if oid.is_empty() {
            return None;
        }
        self.nodes.values().find(|n| n.oid == oid)
    }

    /// The sorted, searchable node list.
    pub fn flat_list(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// True if this module binds `symbol`, either as a node or as a type.
    pub fn defines(&self, symbol: &str) -> bool {
        self.nodes.contains_key(symbol) || self.type_names.iter().any(|t| t == symbol)
    }

    /// Count of nodes whose OID still carries symbolic or no segments.
    pub fn unresolved_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|n| !n.kind().is_type_definition() && !n.oid.is_numeric())
            .count()
    }
}

use super::module::ModuleIdentity;
use super::oid::Oid;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declaration kinds recognized by the scanner.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum NodeKind {
    ObjectType,
    ObjectIdentity,
    NotificationType,
    ModuleIdentity,
    ObjectGroup,
    NotificationGroup,
    ModuleCompliance,
    AgentCapabilities,
    ObjectIdentifier,
    TextualConvention,
    Sequence,
    TrapType,
}

impl NodeKind {
    pub const ALL: [NodeKind; 12] = [
        NodeKind::ObjectType,
        NodeKind::ObjectIdentity,
        NodeKind::NotificationType,
        NodeKind::ModuleIdentity,
        NodeKind::ObjectGroup,
        NodeKind::NotificationGroup,
        NodeKind::ModuleCompliance,
        NodeKind::AgentCapabilities,
        NodeKind::ObjectIdentifier,
        NodeKind::TextualConvention,
        NodeKind::Sequence,
        NodeKind::TrapType,
    ];

    /// The keyword spelling used in MIB source.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::ObjectType => "OBJECT-TYPE",
            NodeKind::ObjectIdentity => "OBJECT-IDENTITY",
            NodeKind::NotificationType => "NOTIFICATION-TYPE",
            NodeKind::ModuleIdentity => "MODULE-IDENTITY",
            NodeKind::ObjectGroup => "OBJECT-GROUP",
            NodeKind::NotificationGroup => "NOTIFICATION-GROUP",
            NodeKind::ModuleCompliance => "MODULE-COMPLIANCE",
            NodeKind::AgentCapabilities => "AGENT-CAPABILITIES",
            NodeKind::ObjectIdentifier => "OBJECT-IDENTIFIER",
            NodeKind::TextualConvention => "TEXTUAL-CONVENTION",
            NodeKind::Sequence => "SEQUENCE",
            NodeKind::TrapType => "TRAP-TYPE",
        }
    }

    /// Map a macro keyword to its kind. `OBJECT IDENTIFIER` is two tokens in
    /// source and is matched by the scanner directly.
    pub fn from_macro(keyword: &str) -> Option<Self> {
        match keyword {
            "OBJECT-TYPE" => Some(NodeKind::ObjectType),
            "OBJECT-IDENTITY" => Some(NodeKind::ObjectIdentity),
            "NOTIFICATION-TYPE" => Some(NodeKind::NotificationType),
            "MODULE-IDENTITY" => Some(NodeKind::ModuleIdentity),
            "OBJECT-GROUP" => Some(NodeKind::ObjectGroup),
            "NOTIFICATION-GROUP" => Some(NodeKind::NotificationGroup),
            "MODULE-COMPLIANCE" => Some(NodeKind::ModuleCompliance),
            "AGENT-CAPABILITIES" => Some(NodeKind::AgentCapabilities),
            "TRAP-TYPE" => Some(NodeKind::TrapType),
            _ => None,
        }
    }

    /// Kinds that never carry an OID of their own.
    pub fn is_type_definition(&self) -> bool {
        matches!(self, NodeKind::TextualConvention | NodeKind::Sequence)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `label(number)` entry of an enumerated INTEGER or BITS syntax.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct EnumEntry {
    pub label: String,
    pub value: i64,
}

impl EnumEntry {
    pub fn new(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// One `name Type` row of a SEQUENCE definition.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct SequenceMember {
    pub name: String,
    pub syntax: String,
}

/// Kind-specific payload of a node.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(tag = "kind", rename_all = "SCREAMING-KEBAB-CASE")]
pub enum NodeDetail {
    ObjectType {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        units: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        max_access: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        index: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        augments: Option<String>,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        defval: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        enums: Vec<EnumEntry>,
    },
    ObjectIdentity,
    NotificationType {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        objects: Vec<String>,
    },
    ModuleIdentity(ModuleIdentity),
    ObjectGroup {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        objects: Vec<String>,
    },
    NotificationGroup {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        notifications: Vec<String>,
    },
    ModuleCompliance {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        mandatory_groups: Vec<String>,
    },
    AgentCapabilities {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        product_release: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        supports: Vec<String>,
    },
    ObjectIdentifier,
    TextualConvention {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        display_hint: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        enums: Vec<EnumEntry>,
    },
    Sequence {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        members: Vec<SequenceMember>,
    },
    TrapType {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        enterprise: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        variables: Vec<String>,
    },
}

impl NodeDetail {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeDetail::ObjectType { .. } => NodeKind::ObjectType,
            NodeDetail::ObjectIdentity => NodeKind::ObjectIdentity,
            NodeDetail::NotificationType { .. } => NodeKind::NotificationType,
            NodeDetail::ModuleIdentity(_) => NodeKind::ModuleIdentity,
            NodeDetail::ObjectGroup { .. } => NodeKind::ObjectGroup,
            NodeDetail::NotificationGroup { .. } => NodeKind::NotificationGroup,
            NodeDetail::ModuleCompliance { .. } => NodeKind::ModuleCompliance,
            NodeDetail::AgentCapabilities { .. } => NodeKind::AgentCapabilities,
            NodeDetail::ObjectIdentifier => NodeKind::ObjectIdentifier,
            NodeDetail::TextualConvention { .. } => NodeKind::TextualConvention,
            NodeDetail::Sequence { .. } => NodeKind::Sequence,
            NodeDetail::TrapType { .. } => NodeKind::TrapType,
        }
    }

    /// The enumeration table, for kinds that can carry one.
    pub fn enums(&self) -> &[EnumEntry] {
        match self {
            NodeDetail::ObjectType { enums, .. } | NodeDetail::TextualConvention { enums, .. } => {
                enums
            }
            _ => &[],
        }
    }
}

/// A resolved declaration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct Node {
    pub name: String,
    pub module: String,
    pub oid: Oid,
    /// The arc expression as written, e.g. `mib-2.1.1`.
    #[serde(default)]
    pub symbolic_oid: String,
    #[serde(default)]
    pub syntax: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(flatten)]
    pub detail: NodeDetail,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.detail.kind()
    }

    pub fn enums(&self) -> &[EnumEntry] {
        self.detail.enums()
    }

    /// Dotted OID text, empty when the node has no path.
    pub fn oid_string(&self) -> String {
        self.oid.to_string()
    }
}

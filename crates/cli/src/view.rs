use mibscope_api::{EnumEntry, ImportEdge, Node, NodeDetail, ParsedModule, SearchHit};
use mibscope_core::indexing::walk;
use mibscope_core::registry::LoadedModule;
use nu_ansi_term::Color;
use tabled::Tabled;

/// One line of the `modules` listing.
#[derive(Tabled)]
pub struct ModuleRow {
    pub module: String,
    pub nodes: usize,
    pub unresolved: usize,
    pub imports: usize,
    pub diagnostics: usize,
    pub source: String,
}

impl ModuleRow {
    pub fn from_loaded(loaded: &LoadedModule) -> Self {
        let module = &loaded.parsed;
        Self {
            module: module.name.clone(),
            nodes: module.nodes.len(),
            unresolved: module.unresolved_count(),
            imports: module.imports.len(),
            diagnostics: module.diagnostics.len(),
            source: loaded.label.clone(),
        }
    }
}

#[derive(Tabled)]
pub struct HitRow {
    pub module: String,
    pub name: String,
    #[tabled(rename = "OID")]
    pub oid: String,
    pub kind: String,
    pub description: String,
}

impl From<&SearchHit> for HitRow {
    fn from(hit: &SearchHit) -> Self {
        let oid = if hit.oid.is_empty() {
            "-".to_string()
        } else {
            hit.oid.clone()
        };
        Self {
            module: hit.module.clone(),
            name: hit.name.clone(),
            oid,
            kind: hit.kind.to_string(),
            description: hit.description.clone(),
        }
    }
}

#[derive(Tabled)]
pub struct ImportRow {
    pub importer: String,
    pub exporter: String,
    pub symbols: String,
    pub status: String,
}

impl From<&ImportEdge> for ImportRow {
    fn from(edge: &ImportEdge) -> Self {
        let status = if !edge.exporter_loaded {
            "missing".to_string()
        } else if edge.undefined.is_empty() {
            "ok".to_string()
        } else {
            format!("undefined: {}", edge.undefined.join(", "))
        };
        Self {
            importer: edge.importer.clone(),
            exporter: edge.exporter.clone(),
            symbols: summarize(&edge.symbols, 4),
            status,
        }
    }
}

#[derive(Tabled)]
pub struct FieldRow {
    pub field: &'static str,
    pub value: String,
}

/// `a, b, c (+2)` once a list grows past `keep` entries.
pub fn summarize(items: &[String], keep: usize) -> String {
    if items.len() <= keep {
        return items.join(", ");
    }
    format!("{} (+{})", items[..keep].join(", "), items.len() - keep)
}

fn enum_list(enums: &[EnumEntry]) -> String {
    enums
        .iter()
        .map(|e| format!("{}({})", e.label, e.value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The populated attributes of a node, in display order.
pub fn node_fields(node: &Node) -> Vec<FieldRow> {
    let mut rows = vec![
        FieldRow {
            field: "Name",
            value: node.name.clone(),
        },
        FieldRow {
            field: "Module",
            value: node.module.clone(),
        },
        FieldRow {
            field: "Kind",
            value: node.kind().to_string(),
        },
    ];
    let mut push = |field: &'static str, value: String| {
        if !value.is_empty() {
            rows.push(FieldRow { field, value });
        }
    };

    push("OID", node.oid_string());
    push("Symbolic OID", node.symbolic_oid.clone());
    push("Syntax", node.syntax.clone());
    push("Status", node.status.clone());

    match &node.detail {
        NodeDetail::ObjectType {
            units,
            max_access,
            index,
            augments,
            defval,
            ..
        } => {
            push("Units", units.clone());
            push("Max access", max_access.clone());
            push("Index", index.join(", "));
            push("Augments", augments.clone().unwrap_or_default());
            push("Default", defval.clone());
        }
        NodeDetail::NotificationType { objects } | NodeDetail::ObjectGroup { objects } => {
            push("Objects", objects.join(", "));
        }
        NodeDetail::NotificationGroup { notifications } => {
            push("Notifications", notifications.join(", "));
        }
        NodeDetail::ModuleCompliance { mandatory_groups } => {
            push("Mandatory groups", mandatory_groups.join(", "));
        }
        NodeDetail::AgentCapabilities {
            product_release,
            supports,
        } => {
            push("Product release", product_release.clone());
            push("Supports", supports.join(", "));
        }
        NodeDetail::ModuleIdentity(identity) => {
            push("Last updated", identity.last_updated.clone());
            push("Organization", identity.organization.clone());
            push("Contact", identity.contact_info.clone());
            let dates: Vec<String> = identity.revisions.iter().map(|r| r.date.clone()).collect();
            push("Revisions", dates.join(", "));
        }
        NodeDetail::TextualConvention { display_hint, .. } => {
            push("Display hint", display_hint.clone());
        }
        NodeDetail::Sequence { members } => {
            let members: Vec<String> = members
                .iter()
                .map(|m| format!("{} {}", m.name, m.syntax))
                .collect();
            push("Members", members.join(", "));
        }
        NodeDetail::TrapType {
            enterprise,
            variables,
        } => {
            push("Enterprise", enterprise.clone());
            push("Variables", variables.join(", "));
        }
        NodeDetail::ObjectIdentity | NodeDetail::ObjectIdentifier => {}
    }

    push("Values", enum_list(node.enums()));
    push("Description", node.description.clone());
    push("Reference", node.reference.clone());
    rows
}

/// Indented OID tree of one module.
pub fn render_tree(module: &ParsedModule, color: bool) -> String {
    let paint = |c: Color, text: &str| {
        if color {
            c.paint(text).to_string()
        } else {
            text.to_string()
        }
    };

    let mut out = String::new();
    out.push_str(&paint(Color::LightBlue, &module.name));
    out.push('\n');

    for (depth, entry) in walk(&module.forest) {
        let segment = entry.segment.to_string();
        let segment = if entry.segment.is_numeric() {
            segment
        } else {
            paint(Color::Yellow, &segment)
        };
        out.push_str(&"  ".repeat(depth + 1));
        out.push_str(&segment);
        if let Some(node) = entry.node.as_deref().and_then(|name| module.node(name)) {
            out.push(' ');
            out.push_str(&paint(Color::Green, &node.name));
            out.push(' ');
            out.push_str(&paint(Color::DarkGray, &format!("({})", node.kind())));
        }
        out.push('\n');
    }

    let untethered: Vec<&Node> = module.flat_list().filter(|n| n.oid.is_empty()).collect();
    if !untethered.is_empty() {
        out.push_str("  ");
        out.push_str(&paint(Color::DarkGray, "(no OID)"));
        out.push('\n');
        for node in untethered {
            out.push_str(&format!("    {} ({})\n", node.name, node.kind()));
        }
    }
    out
}

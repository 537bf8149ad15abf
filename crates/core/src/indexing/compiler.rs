use super::flat::sort_nodes;
use super::forest::build_forest;
use crate::error::Result;
use crate::parser::fields::{extract_enums, sequence_members};
use crate::parser::{Declaration, FieldReader, normalize, scan};
use crate::resolver::{SymbolTable, resolve};
use indexmap::IndexMap;
use mibscope_api::{Diagnostic, ModuleIdentity, Node, NodeDetail, NodeKind, Oid, ParsedModule};
use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

/// Parse one module against the well-known roots.
pub fn parse_module(text: &str) -> Result<ParsedModule> {
    ModuleCompiler::new(SymbolTable::with_roots()).compile(text)
}

/// Turns raw module text into a [`ParsedModule`].
pub struct ModuleCompiler {
    seeds: SymbolTable,
}

impl ModuleCompiler {
    /// `seeds` must already contain any root arcs the module relies on.
    pub fn new(seeds: SymbolTable) -> Self {
        Self { seeds }
    }

    pub fn compile(&self, text: &str) -> Result<ParsedModule> {
        let source_hash = xxh3_64(text.as_bytes());
        let normalized = normalize(text);
        let scanned = scan(&normalized)?;
        let module = scanned.module_name;
        let mut diagnostics = scanned.diagnostics;

        let declarations = dedup(scanned.declarations, &mut diagnostics);
        let resolution = resolve(&declarations, &self.seeds);

        for &i in &resolution.unresolved {
            diagnostics.push(Diagnostic::warning(
                format!(
                    "unresolved OID for {}: {}",
                    declarations[i].name, resolution.displays[i]
                ),
                Some(declarations[i].offset),
            ));
        }
        if !resolution.unresolved.is_empty() {
            warn!(
                "{}: {} declarations left with symbolic OIDs",
                module,
                resolution.unresolved.len()
            );
        }

        let mut nodes: Vec<Node> = declarations
            .iter()
            .zip(resolution.oids)
            .zip(resolution.displays)
            .map(|((decl, oid), display)| build_node(&module, decl, oid, display))
            .collect();

        let identity = nodes.iter().find_map(|n| match &n.detail {
            NodeDetail::ModuleIdentity(identity) => Some(identity.clone()),
            _ => None,
        });
        let forest = build_forest(&nodes);
        sort_nodes(&mut nodes);

        debug!(
            "Compiled {}: {} nodes in {} resolver passes",
            module,
            nodes.len(),
            resolution.passes
        );

        Ok(ParsedModule {
            name: module,
            source_hash,
            nodes: nodes.into_iter().map(|n| (n.name.clone(), n)).collect(),
            imports: scanned.imports,
            identity,
            forest,
            type_names: scanned.type_names,
            diagnostics,
        })
    }
}

/// Collapse repeated names: the first occurrence keeps its position, the
/// last one supplies the content.
fn dedup(declarations: Vec<Declaration>, diagnostics: &mut Vec<Diagnostic>) -> Vec<Declaration> {
    let mut by_name: IndexMap<String, Declaration> = IndexMap::with_capacity(declarations.len());
    for decl in declarations {
        if by_name.contains_key(&decl.name) {
            warn!("Duplicate definition of {}, keeping the last one", decl.name);
            diagnostics.push(Diagnostic::warning(
                format!("duplicate definition of {}", decl.name),
                Some(decl.offset),
            ));
        }
        by_name.insert(decl.name.clone(), decl);
    }
    by_name.into_values().collect()
}

fn build_node(module: &str, decl: &Declaration, oid: Oid, symbolic_oid: String) -> Node {
    let fields = FieldReader::new(&decl.body);
    let mut syntax = fields.field("SYNTAX");
    let mut description = fields.quoted("DESCRIPTION");

    let detail = match decl.kind {
        NodeKind::ObjectType => {
            let max_access = match fields.field("MAX-ACCESS") {
                access if access.is_empty() => fields.field("ACCESS"),
                access => access,
            };
            let augments = fields.list("AUGMENTS").into_iter().next();
            NodeDetail::ObjectType {
                units: fields.text("UNITS"),
                max_access,
                index: fields.list("INDEX"),
                augments,
                defval: fields.field("DEFVAL"),
                enums: extract_enums(&syntax),
            }
        }
        NodeKind::ObjectIdentity => NodeDetail::ObjectIdentity,
        NodeKind::NotificationType => NodeDetail::NotificationType {
            objects: fields.list("OBJECTS"),
        },
        NodeKind::ModuleIdentity => NodeDetail::ModuleIdentity(ModuleIdentity {
            last_updated: fields.text("LAST-UPDATED"),
            organization: fields.text("ORGANIZATION"),
            contact_info: fields.quoted("CONTACT-INFO"),
            revisions: fields.revisions(),
        }),
        NodeKind::ObjectGroup => NodeDetail::ObjectGroup {
            objects: fields.list("OBJECTS"),
        },
        NodeKind::NotificationGroup => NodeDetail::NotificationGroup {
            notifications: fields.list("NOTIFICATIONS"),
        },
        NodeKind::ModuleCompliance => NodeDetail::ModuleCompliance {
            mandatory_groups: fields.list("MANDATORY-GROUPS"),
        },
        NodeKind::AgentCapabilities => NodeDetail::AgentCapabilities {
            product_release: fields.text("PRODUCT-RELEASE"),
            supports: fields.each_first_ident("SUPPORTS"),
        },
        NodeKind::ObjectIdentifier => NodeDetail::ObjectIdentifier,
        NodeKind::TextualConvention => NodeDetail::TextualConvention {
            display_hint: fields.text("DISPLAY-HINT"),
            enums: extract_enums(&syntax),
        },
        NodeKind::Sequence => {
            syntax = "SEQUENCE".to_string();
            description = decl.body.trim().to_string();
            NodeDetail::Sequence {
                members: sequence_members(&decl.body),
            }
        }
        NodeKind::TrapType => NodeDetail::TrapType {
            enterprise: fields.field("ENTERPRISE"),
            variables: fields.list("VARIABLES"),
        },
    };

    Node {
        name: decl.name.clone(),
        module: module.to_string(),
        oid,
        symbolic_oid,
        syntax,
        status: fields.field("STATUS"),
        description,
        reference: fields.quoted("REFERENCE"),
        detail,
    }
}

use crate::Commands;
use crate::view::{FieldRow, HitRow, ImportRow, ModuleRow, node_fields, render_tree};
use mibscope_api::{ApiError, MatchMode, Node, Oid, SearchQuery};
use mibscope_core::ModuleRegistry;
use serde_json::json;
use tabled::Table;
use tabled::settings::Style;

type CommandResult = Result<String, Box<dyn std::error::Error>>;

#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub json: bool,
    pub color: bool,
}

/// Run one subcommand against a loaded registry and return the text to print.
pub fn execute(command: &Commands, registry: &ModuleRegistry, output: Output) -> CommandResult {
    match command {
        Commands::Modules => modules(registry, output),
        Commands::Tree { module } => tree(registry, module.as_deref(), output),
        Commands::Show { target, module } => show(registry, target, module.as_deref(), output),
        Commands::Search {
            term,
            regex,
            kind,
            limit,
        } => {
            let query = SearchQuery {
                term: term.clone(),
                mode: if *regex {
                    MatchMode::Pattern
                } else {
                    MatchMode::Substring
                },
                kinds: kind.clone(),
                limit: *limit,
            };
            search(registry, &query, output)
        }
        Commands::Imports { module } => imports(registry, module.as_deref(), output),
    }
}

fn modules(registry: &ModuleRegistry, output: Output) -> CommandResult {
    if output.json {
        let listing: Vec<_> = registry
            .modules()
            .filter_map(|m| registry.loaded(&m.name))
            .map(|loaded| {
                let m = &loaded.parsed;
                json!({
                    "name": m.name,
                    "source": loaded.label,
                    "nodes": m.nodes.len(),
                    "unresolved": m.unresolved_count(),
                    "imports": m.imports.keys().collect::<Vec<_>>(),
                    "diagnostics": m.diagnostics,
                })
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&listing)?);
    }

    if registry.is_empty() {
        return Ok("No modules loaded.".to_string());
    }
    let rows: Vec<ModuleRow> = registry
        .modules()
        .filter_map(|m| registry.loaded(&m.name))
        .map(ModuleRow::from_loaded)
        .collect();
    Ok(Table::new(rows).with(Style::psql()).to_string())
}

fn tree(registry: &ModuleRegistry, module: Option<&str>, output: Output) -> CommandResult {
    let selected = match module {
        Some(name) => vec![registry.module(name)?],
        None => registry.modules().collect(),
    };

    if output.json {
        let forests: Vec<_> = selected
            .iter()
            .map(|m| json!({ "module": m.name, "forest": m.forest }))
            .collect();
        return Ok(serde_json::to_string_pretty(&forests)?);
    }

    Ok(selected
        .iter()
        .map(|m| render_tree(m, output.color))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Dotted numbers are looked up as an OID, anything else as a node name.
fn find_nodes<'a>(
    registry: &'a ModuleRegistry,
    target: &str,
    module: Option<&str>,
) -> Result<Vec<&'a Node>, ApiError> {
    let modules: Vec<_> = match module {
        Some(name) => vec![registry.module(name)?],
        None => registry.modules().collect(),
    };

    let by_oid = Oid::parse(target.trim_start_matches('.'));
    let found: Vec<&Node> = if by_oid.is_numeric() {
        let dotted = by_oid.to_string();
        modules
            .iter()
            .filter_map(|m| m.node_by_oid(&dotted))
            .collect()
    } else {
        modules.iter().filter_map(|m| m.node(target)).collect()
    };

    if found.is_empty() {
        return Err(ApiError::NotFound(format!("node {target}")));
    }
    Ok(found)
}

fn show(
    registry: &ModuleRegistry,
    target: &str,
    module: Option<&str>,
    output: Output,
) -> CommandResult {
    let nodes = find_nodes(registry, target, module)?;

    if output.json {
        return Ok(serde_json::to_string_pretty(&nodes)?);
    }

    Ok(nodes
        .into_iter()
        .map(|node| {
            let rows: Vec<FieldRow> = node_fields(node);
            Table::new(rows).with(Style::psql()).to_string()
        })
        .collect::<Vec<_>>()
        .join("\n\n"))
}

fn search(registry: &ModuleRegistry, query: &SearchQuery, output: Output) -> CommandResult {
    let hits = registry.search(query)?;

    if output.json {
        return Ok(serde_json::to_string_pretty(&hits)?);
    }
    if hits.is_empty() {
        return Ok(format!("No matches for '{}'.", query.term));
    }
    let rows: Vec<HitRow> = hits.iter().map(HitRow::from).collect();
    Ok(Table::new(rows).with(Style::psql()).to_string())
}

fn imports(registry: &ModuleRegistry, module: Option<&str>, output: Output) -> CommandResult {
    if let Some(name) = module {
        registry.module(name)?;
    }
    let links = registry.links();
    let edges: Vec<_> = links
        .edges
        .iter()
        .filter(|e| module.is_none_or(|name| e.importer == name))
        .collect();

    if output.json {
        return Ok(serde_json::to_string_pretty(&edges)?);
    }
    if edges.is_empty() {
        return Ok("No imports.".to_string());
    }

    let rows: Vec<ImportRow> = edges.iter().map(|e| ImportRow::from(*e)).collect();
    let mut text = Table::new(rows).with(Style::psql()).to_string();
    let missing = links.missing_modules();
    if module.is_none() && !missing.is_empty() {
        text.push_str(&format!("\n\nNot loaded: {}", missing.join(", ")));
    }
    Ok(text)
}

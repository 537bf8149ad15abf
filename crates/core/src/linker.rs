//! Cross-module import index.

use mibscope_api::{ImportEdge, LinkIndex, ParsedModule};
use std::collections::BTreeMap;
use tracing::debug;

/// Build forward and reverse import maps over `modules`.
///
/// Every import is kept, whether or not the exporter is part of the set.
/// When it is, symbols the exporter does not define are listed on the edge
/// as `undefined`.
pub fn link<'a>(modules: impl IntoIterator<Item = &'a ParsedModule>) -> LinkIndex {
    let modules: BTreeMap<&str, &ParsedModule> =
        modules.into_iter().map(|m| (m.name.as_str(), m)).collect();

    let mut index = LinkIndex::default();
    for (importer, module) in &modules {
        for (exporter, symbols) in &module.imports {
            let loaded = modules.get(exporter.as_str());
            let undefined = loaded
                .map(|m| {
                    symbols
                        .iter()
                        .filter(|s| !m.defines(s))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();

            index
                .forward
                .entry(importer.to_string())
                .or_default()
                .insert(exporter.clone(), symbols.clone());
            index
                .reverse
                .entry(exporter.clone())
                .or_default()
                .insert(importer.to_string(), symbols.clone());
            index.edges.push(ImportEdge {
                importer: importer.to_string(),
                exporter: exporter.clone(),
                symbols: symbols.clone(),
                exporter_loaded: loaded.is_some(),
                undefined,
            });
        }
    }

    debug!(
        "Linked {} modules: {} import edges, {} missing exporters",
        modules.len(),
        index.edges.len(),
        index.missing_modules().len()
    );
    index
}

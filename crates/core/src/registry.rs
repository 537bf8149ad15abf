//! The working set of loaded modules.

use crate::error::Result;
use crate::indexing::{ModuleCompiler, parse_module};
use crate::linker::link;
use crate::query::search;
use crate::resolver::SymbolTable;
use mibscope_api::{ApiError, ApiResult, LinkIndex, ParsedModule, SearchHit, SearchQuery};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};
use xxhash_rust::xxh3::xxh3_64;

/// Raw module text handed in by a consumer. `label` is free-form, usually
/// the file path.
#[derive(Debug, Clone)]
pub struct SourceText {
    pub label: String,
    pub text: String,
}

impl SourceText {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { module: String },
    /// Same text as an already loaded module; nothing was parsed.
    Unchanged { module: String },
    NoModuleHeader,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub label: String,
    pub outcome: LoadOutcome,
}

#[derive(Debug, Clone)]
pub struct LoadedModule {
    pub label: String,
    pub text: String,
    /// Result of parsing against the well-known roots only.
    base: ParsedModule,
    /// `base`, possibly improved with OIDs imported from other modules.
    pub parsed: ParsedModule,
}

#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, LoadedModule>,
    links: LinkIndex,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `sources` in parallel and add them. On a module-name collision
    /// the source loaded last wins, both within a batch and across batches.
    pub fn load(&mut self, sources: Vec<SourceText>) -> Vec<LoadReport> {
        let known: BTreeMap<u64, String> = self
            .modules
            .values()
            .map(|m| (m.base.source_hash, m.base.name.clone()))
            .collect();

        let parsed: Vec<(SourceText, std::result::Result<ParsedModule, LoadOutcome>)> = sources
            .into_par_iter()
            .map(|source| {
                let hash = xxh3_64(source.text.as_bytes());
                if let Some(module) = known.get(&hash) {
                    let outcome = LoadOutcome::Unchanged {
                        module: module.clone(),
                    };
                    return (source, Err(outcome));
                }
                let result = parse_module(&source.text).map_err(|_| LoadOutcome::NoModuleHeader);
                (source, result)
            })
            .collect();

        let skipped = parsed.iter().filter(|(_, r)| r.is_err()).count();
        if skipped > 0 {
            debug!("{} of {} sources not loaded", skipped, parsed.len());
        }

        let mut reports = Vec::with_capacity(parsed.len());
        let mut changed = false;
        for (source, result) in parsed {
            let outcome = match result {
                Ok(module) => {
                    let name = module.name.clone();
                    if let Some(previous) = self.modules.get(&name) {
                        debug!("{} replaces {} as {}", source.label, previous.label, name);
                    }
                    self.modules.insert(
                        name.clone(),
                        LoadedModule {
                            label: source.label.clone(),
                            text: source.text,
                            parsed: module.clone(),
                            base: module,
                        },
                    );
                    changed = true;
                    LoadOutcome::Loaded { module: name }
                }
                Err(outcome) => outcome,
            };
            reports.push(LoadReport {
                label: source.label,
                outcome,
            });
        }

        if changed {
            self.rebuild();
        }
        reports
    }

    pub fn remove(&mut self, name: &str) -> ApiResult<LoadedModule> {
        let removed = self
            .modules
            .remove(name)
            .ok_or_else(|| ApiError::NotFound(format!("module {name}")))?;
        self.rebuild();
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.modules.clear();
        self.links = LinkIndex::default();
    }

    pub fn module(&self, name: &str) -> ApiResult<&ParsedModule> {
        self.modules
            .get(name)
            .map(|m| &m.parsed)
            .ok_or_else(|| ApiError::NotFound(format!("module {name}")))
    }

    pub fn loaded(&self, name: &str) -> Option<&LoadedModule> {
        self.modules.get(name)
    }

    /// Modules sorted by name.
    pub fn modules(&self) -> impl Iterator<Item = &ParsedModule> {
        self.modules.values().map(|m| &m.parsed)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn links(&self) -> &LinkIndex {
        &self.links
    }

    pub fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        search(self.modules(), query)
    }

    /// Recompute everything derived from the module set: import-aware
    /// re-resolution from each module's base parse, then the link index.
    fn rebuild(&mut self) {
        for loaded in self.modules.values_mut() {
            loaded.parsed = loaded.base.clone();
        }

        let mut rounds = 0;
        while rounds < self.modules.len() {
            rounds += 1;
            let exported = self.exported_oids();
            let updates: Vec<(String, ParsedModule)> = self
                .modules
                .par_iter()
                .filter_map(|(name, loaded)| {
                    reresolve(loaded, &exported).map(|parsed| (name.clone(), parsed))
                })
                .collect();
            if updates.is_empty() {
                break;
            }
            debug!("Re-resolution round {}: {} modules improved", rounds, updates.len());
            for (name, parsed) in updates {
                if let Some(loaded) = self.modules.get_mut(&name) {
                    loaded.parsed = parsed;
                }
            }
        }

        self.links = link(self.modules());
        info!(
            "Registry rebuilt: {} modules, {} import edges, {} unresolved nodes",
            self.modules.len(),
            self.links.edges.len(),
            self.modules().map(ParsedModule::unresolved_count).sum::<usize>()
        );
    }

    /// Per module, the fully numeric OIDs of its nodes.
    fn exported_oids(&self) -> BTreeMap<&str, SymbolTable> {
        self.modules
            .iter()
            .map(|(name, loaded)| {
                let table: SymbolTable = loaded
                    .parsed
                    .flat_list()
                    .filter_map(|n| n.oid.numbers().map(|arcs| (n.name.clone(), arcs)))
                    .collect();
                (name.as_str(), table)
            })
            .collect()
    }
}

/// Parse `loaded` again with the OIDs of the symbols it imports. Returns the
/// new parse only when it leaves strictly fewer nodes unresolved.
fn reresolve(loaded: &LoadedModule, exported: &BTreeMap<&str, SymbolTable>) -> Option<ParsedModule> {
    let current = loaded.parsed.unresolved_count();
    if current == 0 {
        return None;
    }

    let mut seeds = SymbolTable::with_roots();
    let mut imported = 0;
    for (exporter, symbols) in &loaded.parsed.imports {
        let Some(table) = exported.get(exporter.as_str()) else {
            continue;
        };
        for symbol in symbols {
            if let Some(arcs) = table.get(symbol) {
                seeds.insert(symbol.clone(), arcs.to_vec());
                imported += 1;
            }
        }
    }
    if imported == 0 {
        return None;
    }

    let parsed = ModuleCompiler::new(seeds).compile(&loaded.text).ok()?;
    (parsed.unresolved_count() < current).then_some(parsed)
}

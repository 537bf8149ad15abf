use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Module name to (other module name to symbol list).
pub type ImportIndex = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// A single importer/exporter relationship.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct ImportEdge {
    pub importer: String,
    pub exporter: String,
    pub symbols: Vec<String>,
    /// Whether the exporting module is part of the linked set.
    pub exporter_loaded: bool,
    /// Symbols the loaded exporter does not define. Always empty when the
    /// exporter is not loaded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub undefined: Vec<String>,
}

/// Forward and reverse import relationships across a module set.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct LinkIndex {
    /// importer -> { exporter -> symbols }
    pub forward: ImportIndex,
    /// exporter -> { importer -> symbols }
    pub reverse: ImportIndex,
    pub edges: Vec<ImportEdge>,
}

impl LinkIndex {
    pub fn importers_of(&self, exporter: &str) -> Vec<&str> {
        self.reverse
            .get(exporter)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn imports_of(&self, importer: &str) -> Option<&BTreeMap<String, Vec<String>>> {
        self.forward.get(importer)
    }

    /// Exporters referenced by some importer but absent from the linked set.
    pub fn missing_modules(&self) -> Vec<&str> {
        let mut missing: Vec<&str> = self
            .edges
            .iter()
            .filter(|e| !e.exporter_loaded)
            .map(|e| e.exporter.as_str())
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }
}

use crate::error::{MibscopeError, Result};
use mibscope_api::{MatchMode, Node, ParsedModule, SearchHit, SearchQuery};
use regex::{Regex, RegexBuilder};

/// Longest description preview carried by a hit, in characters.
pub const PREVIEW_CHARS: usize = 100;

enum Matcher {
    Substring(String),
    Pattern(Regex),
}

impl Matcher {
    fn new(term: &str, mode: MatchMode) -> Result<Self> {
        match mode {
            MatchMode::Substring => Ok(Matcher::Substring(term.to_lowercase())),
            MatchMode::Pattern => RegexBuilder::new(term)
                .case_insensitive(true)
                .build()
                .map(Matcher::Pattern)
                .map_err(|e| MibscopeError::Pattern(e.to_string())),
        }
    }

    fn is_match(&self, field: &str) -> bool {
        match self {
            Matcher::Substring(needle) => field.to_lowercase().contains(needle.as_str()),
            Matcher::Pattern(regex) => regex.is_match(field),
        }
    }

    fn matches_node(&self, node: &Node) -> bool {
        self.is_match(&node.module)
            || self.is_match(&node.name)
            || self.is_match(&node.oid_string())
            || self.is_match(&node.symbolic_oid)
            || self.is_match(node.kind().as_str())
            || self.is_match(&node.syntax)
            || self.is_match(&node.description)
    }
}

/// Search over the flat lists of a module set.
pub struct SearchEngine<'a> {
    modules: Vec<&'a ParsedModule>,
}

impl<'a> SearchEngine<'a> {
    pub fn new(modules: impl IntoIterator<Item = &'a ParsedModule>) -> Self {
        let mut modules: Vec<&ParsedModule> = modules.into_iter().collect();
        modules.sort_by(|a, b| a.name.cmp(&b.name));
        Self { modules }
    }

    /// Hits in module-name order, then flat-list order, stopping at the
    /// query limit. The term is trimmed; a blank term matches nothing.
    pub fn execute(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        let term = query.term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let matcher = Matcher::new(term, query.mode)?;

        let mut hits = Vec::new();
        'modules: for module in &self.modules {
            for node in module.flat_list() {
                if hits.len() >= query.limit {
                    break 'modules;
                }
                if !query.kinds.is_empty() && !query.kinds.contains(&node.kind()) {
                    continue;
                }
                if matcher.matches_node(node) {
                    hits.push(to_hit(node));
                }
            }
        }
        Ok(hits)
    }
}

pub fn search<'a>(
    modules: impl IntoIterator<Item = &'a ParsedModule>,
    query: &SearchQuery,
) -> Result<Vec<SearchHit>> {
    SearchEngine::new(modules).execute(query)
}

fn to_hit(node: &Node) -> SearchHit {
    SearchHit {
        module: node.module.clone(),
        name: node.name.clone(),
        oid: node.oid_string(),
        symbolic_oid: node.symbolic_oid.clone(),
        kind: node.kind(),
        description: preview(&node.description),
    }
}

fn preview(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(PREVIEW_CHARS).collect()
}

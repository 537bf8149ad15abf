use mibscope_api::{Forest, ForestEntry, Node, OidSegment};

/// Group nodes into a forest keyed by OID segment.
///
/// Nodes are attached in the order given; a later node at an occupied path
/// replaces the earlier attachment. Of the nodes without any path only the
/// first is kept, in the `no_oid` bucket.
pub fn build_forest<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Forest {
    let mut forest = Forest::default();
    for node in nodes {
        let Some((first, rest)) = node.oid.segments().split_first() else {
            if forest.no_oid.is_none() {
                forest.no_oid = Some(node.name.clone());
            }
            continue;
        };
        let mut entry = entry_mut(&mut forest.roots, first);
        for segment in rest {
            entry = entry_mut(&mut entry.children, segment);
        }
        entry.node = Some(node.name.clone());
    }
    forest
}

/// Find or insert the entry for `segment`, keeping `entries` sorted.
fn entry_mut<'e>(entries: &'e mut Vec<ForestEntry>, segment: &OidSegment) -> &'e mut ForestEntry {
    let at = match entries.binary_search_by(|e| e.segment.cmp(segment)) {
        Ok(at) => at,
        Err(at) => {
            entries.insert(at, ForestEntry::new(segment.clone()));
            at
        }
    };
    &mut entries[at]
}

/// Depth-first walk yielding `(depth, entry)` pairs, children in order.
pub fn walk(forest: &Forest) -> Vec<(usize, &ForestEntry)> {
    fn visit<'f>(entry: &'f ForestEntry, depth: usize, out: &mut Vec<(usize, &'f ForestEntry)>) {
        out.push((depth, entry));
        for child in &entry.children {
            visit(child, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    for root in &forest.roots {
        visit(root, 0, &mut out);
    }
    out
}

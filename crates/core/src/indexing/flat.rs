use mibscope_api::Node;
use std::cmp::Ordering;

/// Flat-list ordering: fully numeric OIDs first, compared arc by arc as
/// integers, then everything else. Ties fall back to the name and then the
/// dotted OID text, so distinct nodes never compare equal.
pub fn compare_nodes(a: &Node, b: &Node) -> Ordering {
    match (a.oid.numbers(), b.oid.numbers()) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.name.cmp(&b.name)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a
            .name
            .cmp(&b.name)
            .then_with(|| a.oid_string().cmp(&b.oid_string())),
    }
}

pub fn sort_nodes(nodes: &mut [Node]) {
    nodes.sort_by(compare_nodes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use mibscope_api::{NodeDetail, Oid};

    fn node(name: &str, oid: &str) -> Node {
        Node {
            name: name.to_string(),
            module: "TEST-MIB".to_string(),
            oid: Oid::parse(oid),
            symbolic_oid: String::new(),
            syntax: String::new(),
            status: String::new(),
            description: String::new(),
            reference: String::new(),
            detail: NodeDetail::ObjectIdentifier,
        }
    }

    fn names(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn test_numeric_before_symbolic_and_empty() {
        let mut nodes = vec![
            node("tc", ""),
            node("orphan", "ifEntry.3"),
            node("b", "1.3.6.1.10"),
            node("a", "1.3.6.1.9"),
            node("root", "1"),
        ];
        sort_nodes(&mut nodes);
        assert_eq!(names(&nodes), vec!["root", "a", "b", "orphan", "tc"]);
    }

    #[test]
    fn test_same_oid_breaks_tie_by_name_case_sensitive() {
        let mut nodes = vec![node("beta", "1.1"), node("Zed", "1.1"), node("alpha", "1.1")];
        sort_nodes(&mut nodes);
        assert_eq!(names(&nodes), vec!["Zed", "alpha", "beta"]);
    }

    #[test]
    fn test_sort_is_deterministic() {
        let mut once = vec![
            node("x", "2.1"),
            node("y", "foo.1"),
            node("y", "bar.1"),
            node("z", "1.2.3"),
        ];
        sort_nodes(&mut once);
        let mut twice = once.clone();
        sort_nodes(&mut twice);
        assert_eq!(once, twice);
        assert_eq!(once[2].oid_string(), "bar.1");
    }
}

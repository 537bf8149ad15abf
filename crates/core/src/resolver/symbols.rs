use std::collections::HashMap;

/// Standard root arcs every module may reference without importing.
pub const WELL_KNOWN_ROOTS: &[(&str, &[u32])] = &[
    ("ccitt", &[0]),
    ("iso", &[1]),
    ("joint-iso-ccitt", &[2]),
    ("org", &[1, 3]),
    ("dod", &[1, 3, 6]),
    ("internet", &[1, 3, 6, 1]),
    ("directory", &[1, 3, 6, 1, 1]),
    ("mgmt", &[1, 3, 6, 1, 2]),
    ("mib-2", &[1, 3, 6, 1, 2, 1]),
    ("transmission", &[1, 3, 6, 1, 2, 1, 10]),
    ("experimental", &[1, 3, 6, 1, 3]),
    ("private", &[1, 3, 6, 1, 4]),
    ("enterprises", &[1, 3, 6, 1, 4, 1]),
    ("security", &[1, 3, 6, 1, 5]),
    ("snmpV2", &[1, 3, 6, 1, 6]),
    ("snmpDomains", &[1, 3, 6, 1, 6, 1]),
    ("snmpProxys", &[1, 3, 6, 1, 6, 2]),
    ("snmpModules", &[1, 3, 6, 1, 6, 3]),
    ("zeroDotZero", &[0, 0]),
];

/// Name to fully numeric OID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    entries: HashMap<String, Vec<u32>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding only [`WELL_KNOWN_ROOTS`].
    pub fn with_roots() -> Self {
        let mut table = Self::new();
        for (name, arcs) in WELL_KNOWN_ROOTS {
            table.insert(*name, arcs.to_vec());
        }
        table
    }

    pub fn get(&self, name: &str) -> Option<&[u32]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn insert(&mut self, name: impl Into<String>, arcs: Vec<u32>) {
        self.entries.insert(name.into(), arcs);
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<u32>> {
        self.entries.remove(name)
    }

}

impl<S: Into<String>> FromIterator<(S, Vec<u32>)> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = (S, Vec<u32>)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, arcs) in iter {
            table.insert(name, arcs);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roots_are_consistent() {
        let table = SymbolTable::with_roots();
        assert_eq!(table.get("internet"), Some(&[1, 3, 6, 1][..]));
        assert_eq!(table.get("mib-2"), Some(&[1, 3, 6, 1, 2, 1][..]));
        // Every child root extends its parent.
        let mgmt = table.get("mgmt").unwrap();
        assert!(table.get("mib-2").unwrap().starts_with(mgmt));
        let private = table.get("private").unwrap();
        assert!(table.get("enterprises").unwrap().starts_with(private));
    }

    #[test]
    fn test_collect_keeps_last_entry() {
        let table: SymbolTable = [("acme", vec![1, 3, 6, 1, 4, 1, 9]), ("acme", vec![9])]
            .into_iter()
            .collect();
        assert_eq!(table.get("acme"), Some(&[9][..]));
        assert!(table.get("iso").is_none());
    }
}

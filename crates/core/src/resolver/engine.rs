use super::arcs::ArcExpr;
use super::symbols::SymbolTable;
use crate::parser::Declaration;
use mibscope_api::Oid;
use tracing::{debug, warn};

/// Per-declaration outcome of a resolution run, indexed like the input.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub oids: Vec<Oid>,
    pub displays: Vec<String>,
    /// Declarations left with symbolic segments.
    pub unresolved: Vec<usize>,
    pub passes: usize,
    /// Seeds plus every name that reached a fully numeric OID.
    pub symbols: SymbolTable,
}

/// Fixed-point OID resolver for the declarations of one module.
pub struct OidResolver<'a> {
    declarations: &'a [Declaration],
    table: SymbolTable,
}

impl<'a> OidResolver<'a> {
    /// `seeds` are visible to every declaration, except that a name the
    /// module declares itself always refers to the local declaration.
    pub fn new(declarations: &'a [Declaration], seeds: &SymbolTable) -> Self {
        let mut table = seeds.clone();
        for decl in declarations {
            table.remove(&decl.name);
        }
        Self {
            declarations,
            table,
        }
    }

    pub fn run(mut self) -> Resolution {
        let exprs: Vec<ArcExpr> = self
            .declarations
            .iter()
            .map(|d| d.arc.as_deref().map(ArcExpr::parse).unwrap_or_default())
            .collect();
        let mut oids = vec![Oid::default(); self.declarations.len()];
        let mut pending: Vec<usize> = (0..exprs.len())
            .filter(|&i| !exprs[i].tokens.is_empty())
            .collect();

        let cap = self.declarations.len().max(1);
        let mut passes = 0;
        while !pending.is_empty() {
            passes += 1;
            let before = pending.len();
            let table = &mut self.table;
            pending.retain(|&i| {
                let oid = exprs[i].resolve(|name| table.get(name));
                let finished = match oid.numbers() {
                    Some(numbers) => {
                        table.insert(self.declarations[i].name.clone(), numbers);
                        true
                    }
                    None => false,
                };
                oids[i] = oid;
                !finished
            });
            debug!(
                "Resolver pass {}: {} finalized, {} pending",
                passes,
                before - pending.len(),
                pending.len()
            );
            if pending.len() == before || pending.is_empty() {
                break;
            }
            if passes >= cap {
                warn!(
                    "Resolver stopped after {} passes with {} declarations pending",
                    passes,
                    pending.len()
                );
                break;
            }
        }

        Resolution {
            oids,
            displays: exprs.into_iter().map(|e| e.display).collect(),
            unresolved: pending,
            passes,
            symbols: self.table,
        }
    }
}

/// Resolve `declarations` against `seeds`.
pub fn resolve(declarations: &[Declaration], seeds: &SymbolTable) -> Resolution {
    OidResolver::new(declarations, seeds).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mibscope_api::NodeKind;

    fn decl(name: &str, arc: &str) -> Declaration {
        Declaration {
            name: name.to_string(),
            kind: NodeKind::ObjectIdentifier,
            body: String::new(),
            arc: Some(arc.to_string()),
            offset: 0,
        }
    }

    fn oid_of(res: &Resolution, decls: &[Declaration], name: &str) -> String {
        let i = decls.iter().position(|d| d.name == name).unwrap();
        res.oids[i].to_string()
    }

    #[test]
    fn test_chain_from_roots() {
        let decls = vec![
            decl("internet", "iso 3 6 1"),
            decl("mib-2", "internet 2 1"),
            decl("sysDescr", "mib-2 1 1"),
        ];
        let res = resolve(&decls, &SymbolTable::with_roots());
        assert_eq!(oid_of(&res, &decls, "sysDescr"), "1.3.6.1.2.1.1");
        assert!(res.unresolved.is_empty());
        assert_eq!(res.passes, 1);
    }

    #[test]
    fn test_forward_references_are_order_independent() {
        let forward = vec![
            decl("leaf", "branch 4"),
            decl("branch", "root 2"),
            decl("root", "enterprises 99"),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let seeds = SymbolTable::with_roots();
        let a = resolve(&forward, &seeds);
        let b = resolve(&backward, &seeds);
        for name in ["leaf", "branch", "root"] {
            assert_eq!(oid_of(&a, &forward, name), oid_of(&b, &backward, name));
        }
        assert_eq!(oid_of(&a, &forward, "leaf"), "1.3.6.1.4.1.99.2.4");
        assert!(a.passes <= forward.len());
    }

    #[test]
    fn test_cycle_terminates_unresolved() {
        let decls = vec![decl("a", "b 1"), decl("b", "a 1"), decl("c", "iso 7")];
        let res = resolve(&decls, &SymbolTable::with_roots());
        assert_eq!(res.unresolved, vec![0, 1]);
        assert_eq!(oid_of(&res, &decls, "a"), "b.1");
        assert_eq!(oid_of(&res, &decls, "c"), "1.7");
        assert!(res.passes <= decls.len());
    }

    #[test]
    fn test_local_name_shadows_root() {
        // `internet` is redefined locally under a private arc.
        let decls = vec![
            decl("child", "internet 5"),
            decl("internet", "enterprises 4242"),
        ];
        let res = resolve(&decls, &SymbolTable::with_roots());
        assert_eq!(oid_of(&res, &decls, "child"), "1.3.6.1.4.1.4242.5");
    }

    #[test]
    fn test_missing_arc_gets_empty_oid() {
        let mut decls = vec![decl("x", "iso 1")];
        decls.push(Declaration {
            arc: None,
            ..decl("tc", "")
        });
        let res = resolve(&decls, &SymbolTable::with_roots());
        assert!(res.oids[1].is_empty());
        assert!(res.unresolved.is_empty());
        assert_eq!(res.displays[1], "");
    }

    #[test]
    fn test_symbols_grow_with_resolved_names() {
        let decls = vec![decl("acme", "enterprises 9"), decl("lost", "nowhere 1")];
        let res = resolve(&decls, &SymbolTable::with_roots());
        assert_eq!(res.symbols.get("acme"), Some(&[1, 3, 6, 1, 4, 1, 9][..]));
        assert!(res.symbols.get("lost").is_none());
    }
}

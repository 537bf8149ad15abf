use mibscope_api::{MatchMode, NodeKind, SearchQuery};
use mibscope_core::{LoadOutcome, ModuleRegistry, SourceText};

const SNMPV2_SMI: &str = r#"
SNMPv2-SMI DEFINITIONS ::= BEGIN

org            OBJECT IDENTIFIER ::= { iso 3 }
dod            OBJECT IDENTIFIER ::= { org 6 }
internet       OBJECT IDENTIFIER ::= { dod 1 }
mgmt           OBJECT IDENTIFIER ::= { internet 2 }
mib-2          OBJECT IDENTIFIER ::= { mgmt 1 }
snmpV2         OBJECT IDENTIFIER ::= { internet 6 }
snmpModules    OBJECT IDENTIFIER ::= { snmpV2 3 }

Counter32 ::= [APPLICATION 1] IMPLICIT INTEGER (0..4294967295)

OBJECT-TYPE MACRO ::=
BEGIN
    TYPE NOTATION ::= "SYNTAX" Syntax UnitsPart "MAX-ACCESS" Access
    VALUE NOTATION ::= value(VALUE ObjectName)
END

END
"#;

const SNMPV2_MIB: &str = r#"
SNMPv2-MIB DEFINITIONS ::= BEGIN

IMPORTS
    OBJECT-TYPE, Counter32, mib-2, snmpModules FROM SNMPv2-SMI
    DisplayString FROM SNMPv2-TC;

snmpMIB MODULE-IDENTITY
    LAST-UPDATED "200210160000Z"
    ORGANIZATION "IETF SNMPv3 Working Group"
    CONTACT-INFO "WG-EMail: snmpv3@lists.tislabs.com"
    DESCRIPTION  "The MIB module for SNMP entities."
    ::= { snmpModules 1 }

snmpMIBObjects OBJECT IDENTIFIER ::= { snmpMIB 1 }
snmpTraps      OBJECT IDENTIFIER ::= { snmpMIBObjects 5 }

system   OBJECT IDENTIFIER ::= { mib-2 1 }

sysDescr OBJECT-TYPE
    SYNTAX      DisplayString (SIZE (0..255))
    MAX-ACCESS  read-only
    STATUS      current
    DESCRIPTION "A textual description of the entity."
    ::= { system 1 }

snmpInPkts OBJECT-TYPE
    SYNTAX      Counter32
    MAX-ACCESS  read-only
    STATUS      current
    DESCRIPTION "The total number of messages delivered to the SNMP entity."
    ::= { snmp 1 }

coldStart NOTIFICATION-TYPE
    STATUS  current
    DESCRIPTION "A coldStart trap."
    ::= { snmpTraps 1 }

END
"#;

const SNMP_LOCAL: &str = r#"
SNMP-LOCAL-MIB DEFINITIONS ::= BEGIN
IMPORTS snmp FROM RFC1213-MIB;
snmpLocalCounter OBJECT IDENTIFIER ::= { snmp 99 }
END
"#;

fn loaded() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.load(vec![
        SourceText::new("SNMPv2-MIB.txt", SNMPV2_MIB),
        SourceText::new("SNMPv2-SMI.txt", SNMPV2_SMI),
        SourceText::new("SNMP-LOCAL.mib", SNMP_LOCAL),
    ]);
    registry
}

#[test]
fn test_batch_load_and_module_listing() {
    let registry = loaded();
    let names: Vec<&str> = registry.modules().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["SNMP-LOCAL-MIB", "SNMPv2-MIB", "SNMPv2-SMI"]);

    let smi = registry.module("SNMPv2-SMI").unwrap();
    assert!(smi.node("OBJECT-TYPE").is_none());
    assert!(smi.type_names.contains(&"OBJECT-TYPE".to_string()));
    assert!(smi.type_names.contains(&"Counter32".to_string()));
}

#[test]
fn test_cross_module_numbers() {
    let registry = loaded();
    let mib = registry.module("SNMPv2-MIB").unwrap();
    assert_eq!(mib.node("snmpMIB").unwrap().oid_string(), "1.3.6.1.6.3.1");
    assert_eq!(mib.node("coldStart").unwrap().oid_string(), "1.3.6.1.6.3.1.1.5.1");
    // `snmp` is neither declared nor imported here.
    assert_eq!(mib.node("snmpInPkts").unwrap().oid_string(), "snmp.1");
}

#[test]
fn test_import_edges() {
    let registry = loaded();
    let links = registry.links();
    assert_eq!(links.importers_of("SNMPv2-SMI"), vec!["SNMPv2-MIB"]);
    assert_eq!(links.missing_modules(), vec!["RFC1213-MIB", "SNMPv2-TC"]);

    let edge = links
        .edges
        .iter()
        .find(|e| e.importer == "SNMPv2-MIB" && e.exporter == "SNMPv2-SMI")
        .unwrap();
    assert!(edge.exporter_loaded);
    assert!(edge.undefined.is_empty());

    let local = links.imports_of("SNMP-LOCAL-MIB").unwrap();
    assert_eq!(local["RFC1213-MIB"], vec!["snmp"]);
}

#[test]
fn test_search_across_modules() {
    let registry = loaded();
    let hits = registry.search(&SearchQuery::substring("descr")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "sysDescr");
    assert_eq!(hits[0].module, "SNMPv2-MIB");
    assert_eq!(hits[0].oid, "1.3.6.1.2.1.1.1");

    assert!(registry
        .search(&SearchQuery::substring("no-such-thing-anywhere"))
        .unwrap()
        .is_empty());

    let notifications = registry
        .search(&SearchQuery {
            term: "cold".into(),
            mode: MatchMode::Substring,
            kinds: vec![NodeKind::NotificationType],
            limit: 10,
        })
        .unwrap();
    assert_eq!(notifications.len(), 1);
}

#[test]
fn test_search_cap_short_circuits() {
    let registry = loaded();
    let hits = registry
        .search(&SearchQuery::substring("snmp").with_limit(3))
        .unwrap();
    assert_eq!(hits.len(), 3);
    // Modules are searched in name order.
    assert_eq!(hits[0].module, "SNMP-LOCAL-MIB");
}

#[test]
fn test_reload_and_unchanged() {
    let mut registry = loaded();
    let reports = registry.load(vec![
        SourceText::new("again.txt", SNMPV2_SMI),
        SourceText::new("README", "plain notes"),
    ]);
    assert!(matches!(reports[0].outcome, LoadOutcome::Unchanged { .. }));
    assert_eq!(reports[1].outcome, LoadOutcome::NoModuleHeader);
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_remove_exporter_keeps_importer_edges() {
    let mut registry = loaded();
    registry.remove("SNMPv2-SMI").unwrap();
    let links = registry.links();
    assert!(links.missing_modules().contains(&"SNMPv2-SMI"));
    // Well-known roots still resolve without the exporter.
    let mib = registry.module("SNMPv2-MIB").unwrap();
    assert_eq!(mib.node("snmpMIB").unwrap().oid_string(), "1.3.6.1.6.3.1");
}

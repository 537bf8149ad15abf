use mibscope_api::{EnumEntry, NodeDetail, NodeKind, ParsedModule};
use mibscope_core::{MibscopeError, link, parse_module};

const IF_MIB: &str = r#"
IF-MIB DEFINITIONS ::= BEGIN

IMPORTS
    MODULE-IDENTITY, OBJECT-TYPE, Counter32, Gauge32,
    Integer32, mib-2                        FROM SNMPv2-SMI
    TEXTUAL-CONVENTION, DisplayString,
    TruthValue                              FROM SNMPv2-TC
    MODULE-COMPLIANCE, OBJECT-GROUP         FROM SNMPv2-CONF;

ifMIB MODULE-IDENTITY
    LAST-UPDATED "200006140000Z"
    ORGANIZATION "IETF Interfaces MIB Working Group"
    CONTACT-INFO
            "   Keith McCloghrie
                Cisco Systems, Inc."
    DESCRIPTION
            "The MIB module to describe generic objects for network
            interface sub-layers."
    REVISION      "200006140000Z"
    DESCRIPTION
            "Clarifications agreed upon by the Interfaces MIB WG."
    REVISION      "199602282155Z"
    DESCRIPTION
            "Revisions made by the Interfaces MIB WG."
    ::= { mib-2 31 }

ifMIBObjects OBJECT IDENTIFIER ::= { ifMIB 1 }

interfaces   OBJECT IDENTIFIER ::= { mib-2 2 }

InterfaceIndex ::= TEXTUAL-CONVENTION
    DISPLAY-HINT "d"
    STATUS       current
    DESCRIPTION
            "A unique value, greater than zero, for each interface."
    SYNTAX       Integer32 (1..2147483647)

ifTable OBJECT-TYPE
    SYNTAX      SEQUENCE OF IfEntry
    MAX-ACCESS  not-accessible
    STATUS      current
    DESCRIPTION
            "A list of interface entries."
    ::= { interfaces 2 }

-- ifEntry is declared after the objects that hang under it
ifAdminStatus OBJECT-TYPE
    SYNTAX  INTEGER {
                up(1),       -- ready to pass packets
                down(2),
                testing(3)   -- in some test mode
            }
    MAX-ACCESS  read-write
    STATUS      current
    DESCRIPTION
            "The desired state of the interface."
    ::= { ifEntry 7 }

ifEntry OBJECT-TYPE
    SYNTAX      IfEntry
    MAX-ACCESS  not-accessible
    STATUS      current
    DESCRIPTION
            "An entry containing management information applicable to a
            particular interface."
    INDEX   { ifIndex }
    ::= { ifTable 1 }

IfEntry ::=
    SEQUENCE {
        ifIndex                 InterfaceIndex,
        ifAdminStatus           INTEGER
    }

ifIndex OBJECT-TYPE
    SYNTAX      InterfaceIndex
    MAX-ACCESS  read-only
    STATUS      current
    DESCRIPTION
            "A unique value, greater than zero, for each interface."
    ::= { ifEntry 1 }

linkDown NOTIFICATION-TYPE
    OBJECTS { ifIndex, ifAdminStatus }
    STATUS  current
    DESCRIPTION
            "A linkDown trap signifies that the SNMP entity has detected
            that the ifOperStatus object is about to enter the down state."
    ::= { snmpTraps 3 }

ifGeneralGroup OBJECT-GROUP
    OBJECTS { ifIndex, ifAdminStatus }
    STATUS  current
    DESCRIPTION
            "A collection of objects providing information applicable to
            all network interfaces."
    ::= { ifMIBObjects 10 }

END
"#;

fn parse(text: &str) -> ParsedModule {
    parse_module(text).expect("module header")
}

#[test]
fn test_module_header_and_identity() {
    let module = parse(IF_MIB);
    assert_eq!(module.name, "IF-MIB");

    let identity = module.identity.as_ref().unwrap();
    assert_eq!(identity.last_updated, "200006140000Z");
    assert_eq!(identity.organization, "IETF Interfaces MIB Working Group");
    assert!(identity.contact_info.starts_with("Keith McCloghrie"));
    assert_eq!(identity.revisions.len(), 2);
    assert_eq!(identity.revisions[1].date, "199602282155Z");

    let node = module.node("ifMIB").unwrap();
    assert_eq!(node.oid_string(), "1.3.6.1.2.1.31");
    assert!(node.description.contains("network\n"));
}

#[test]
fn test_forward_references_resolve() {
    let module = parse(IF_MIB);
    let oid = |name: &str| module.node(name).unwrap().oid_string();
    assert_eq!(oid("ifTable"), "1.3.6.1.2.1.2.2");
    assert_eq!(oid("ifEntry"), "1.3.6.1.2.1.2.2.1");
    assert_eq!(oid("ifIndex"), "1.3.6.1.2.1.2.2.1.1");
    assert_eq!(oid("ifAdminStatus"), "1.3.6.1.2.1.2.2.1.7");
    assert_eq!(oid("ifGeneralGroup"), "1.3.6.1.2.1.31.1.10");
    assert_eq!(module.node("ifAdminStatus").unwrap().symbolic_oid, "ifEntry.7");
}

#[test]
fn test_order_independence() {
    let baseline = parse(IF_MIB);

    // Move ifEntry to the end of the module body.
    let start = IF_MIB.find("ifEntry OBJECT-TYPE").unwrap();
    let end = IF_MIB[start..].find("IfEntry ::=").unwrap() + start;
    let entry = &IF_MIB[start..end];
    let mut reordered = IF_MIB.replacen(entry, "", 1);
    let end_at = reordered.rfind("END").unwrap();
    reordered.insert_str(end_at, entry);

    let moved = parse(&reordered);
    for node in baseline.flat_list() {
        assert_eq!(
            moved.node(&node.name).unwrap().oid,
            node.oid,
            "{} moved",
            node.name
        );
    }
}

#[test]
fn test_unimported_parent_stays_symbolic() {
    let module = parse(IF_MIB);
    let link_down = module.node("linkDown").unwrap();
    assert_eq!(link_down.oid_string(), "snmpTraps.3");
    assert_eq!(link_down.kind(), NodeKind::NotificationType);
    match &link_down.detail {
        NodeDetail::NotificationType { objects } => {
            assert_eq!(objects, &vec!["ifIndex".to_string(), "ifAdminStatus".to_string()])
        }
        other => panic!("unexpected detail {other:?}"),
    }
    // Symbolic and empty paths sort after every numeric one, by name.
    let tail: Vec<&str> = module
        .flat_list()
        .skip_while(|n| n.oid.is_numeric())
        .map(|n| n.name.as_str())
        .collect();
    assert_eq!(tail, vec!["IfEntry", "InterfaceIndex", "linkDown"]);
}

#[test]
fn test_enums_keep_source_order() {
    let module = parse(IF_MIB);
    let admin = module.node("ifAdminStatus").unwrap();
    assert_eq!(
        admin.enums(),
        &[
            EnumEntry::new("up", 1),
            EnumEntry::new("down", 2),
            EnumEntry::new("testing", 3)
        ]
    );
    assert_eq!(admin.syntax, "INTEGER { up(1), down(2), testing(3) }");
}

#[test]
fn test_type_definitions_have_no_oid() {
    let module = parse(IF_MIB);
    let tc = module.node("InterfaceIndex").unwrap();
    assert!(tc.oid.is_empty());
    assert_eq!(tc.syntax, "Integer32 (1..2147483647)");
    match &tc.detail {
        NodeDetail::TextualConvention { display_hint, .. } => assert_eq!(display_hint, "d"),
        other => panic!("unexpected detail {other:?}"),
    }

    let seq = module.node("IfEntry").unwrap();
    assert_eq!(seq.kind(), NodeKind::Sequence);
    match &seq.detail {
        NodeDetail::Sequence { members } => {
            assert_eq!(members.len(), 2);
            assert_eq!(members[0].syntax, "InterfaceIndex");
        }
        other => panic!("unexpected detail {other:?}"),
    }
    assert_eq!(module.forest.no_oid.as_deref(), Some("InterfaceIndex"));
}

#[test]
fn test_forest_shape() {
    let module = parse(IF_MIB);
    let roots: Vec<String> = module
        .forest
        .roots
        .iter()
        .map(|r| r.segment.to_string())
        .collect();
    assert_eq!(roots, vec!["1", "snmpTraps"]);
    let entry = module
        .forest
        .get(&mibscope_api::Oid::parse("1.3.6.1.2.1.2.2.1"))
        .unwrap();
    assert_eq!(entry.node.as_deref(), Some("ifEntry"));
    assert_eq!(entry.children.len(), 2);
}

#[test]
fn test_sample_from_rfc_text() {
    let text = r#"
SAMPLE-MIB DEFINITIONS ::= BEGIN
internet OBJECT IDENTIFIER ::= { iso 3 6 1 }
mib-2 OBJECT IDENTIFIER ::= { internet 2 1 }
sysDescr OBJECT-TYPE
    SYNTAX DisplayString
    ACCESS read-only
    STATUS mandatory
    DESCRIPTION "A textual description"
    ::= { mib-2 1 1 }
END
"#;
    let module = parse(text);
    assert_eq!(module.node("sysDescr").unwrap().oid_string(), "1.3.6.1.2.1.1");
    assert_eq!(module.node_by_oid("1.3.6.1.2.1.1").unwrap().name, "sysDescr");
}

#[test]
fn test_imports_and_link() {
    let module = parse(IF_MIB);
    assert_eq!(
        module.imports.keys().collect::<Vec<_>>(),
        vec!["SNMPv2-SMI", "SNMPv2-TC", "SNMPv2-CONF"]
    );
    let index = link([&module]);
    assert_eq!(index.missing_modules(), vec!["SNMPv2-CONF", "SNMPv2-SMI", "SNMPv2-TC"]);
    assert!(index.forward["IF-MIB"]["SNMPv2-SMI"].contains(&"Counter32".to_string()));
}

#[test]
fn test_never_fails_on_garbage_after_header() {
    let text = "JUNK-MIB DEFINITIONS ::= BEGIN\n}}} ::= {{ \"open string\n@@ OBJECT-TYPE ::= ";
    let module = parse(text);
    assert_eq!(module.name, "JUNK-MIB");
    assert!(!module.diagnostics.is_empty());
}

#[test]
fn test_missing_header() {
    assert!(matches!(
        parse_module("ifIndex OBJECT-TYPE ::= { ifEntry 1 }"),
        Err(MibscopeError::NoModuleHeader)
    ));
}

#[test]
fn test_serializes_to_json() {
    let module = parse(IF_MIB);
    let json = serde_json::to_value(&module).unwrap();
    assert_eq!(json["name"], "IF-MIB");
    assert_eq!(json["nodes"]["ifIndex"]["kind"], "OBJECT-TYPE");
    let back: ParsedModule = serde_json::from_value(json).unwrap();
    assert_eq!(back, module);
}

const BROKEN_MIB: &str = r#"
BROKEN-MIB DEFINITIONS ::= BEGIN
IMPORTS
    OBJECT-TYPE, Counter32, mib-2 FROM SNMPv2-SMI
    acmeRoot                     FROM ACME-SMI

brokenObjects OBJECT IDENTIFIER ::= { mib-2 77 }

brokenCount OBJECT-TYPE
    SYNTAX      Counter32
    MAX-ACCESS  read-only
    STATUS      current
    DESCRIPTION "Counts things."
    ::= { brokenObjects 1 }

acmeBranch OBJECT IDENTIFIER ::= { acmeRoot(5) 1 }
acmeLeaf   OBJECT IDENTIFIER ::= { acmeBranch 2 }
END
"#;

#[test]
fn test_unterminated_imports_and_unknown_named_parent() {
    let module = parse(BROKEN_MIB);
    assert_eq!(module.nodes.len(), 4);
    assert_eq!(module.imports["ACME-SMI"], vec!["acmeRoot"]);

    let count = module.node("brokenCount").unwrap();
    assert_eq!(count.oid_string(), "1.3.6.1.2.1.77.1");
    assert_eq!(count.description, "Counts things.");

    // The number written next to an unknown parent is not trusted.
    let branch = module.node("acmeBranch").unwrap();
    assert_eq!(branch.oid_string(), "acmeRoot.1");
    assert!(!branch.oid.is_numeric());
    assert_eq!(branch.symbolic_oid, "acmeRoot(5).1");

    // Only numeric paths enter the symbol table, so the child keeps its
    // parent's name.
    let leaf = module.node("acmeLeaf").unwrap();
    assert_eq!(leaf.oid_string(), "acmeBranch.2");
    assert_eq!(module.unresolved_count(), 2);
}

#[test]
fn test_numeric_oids_survive_cross_module_resolution() {
    let standalone = parse(BROKEN_MIB);
    let acme_smi = "ACME-SMI DEFINITIONS ::= BEGIN\nacmeRoot OBJECT IDENTIFIER ::= { enterprises 4242 }\nEND\n";

    let mut registry = mibscope_core::ModuleRegistry::new();
    registry.load(vec![
        mibscope_core::SourceText::new("broken.mib", BROKEN_MIB),
        mibscope_core::SourceText::new("acme.mib", acme_smi),
    ]);
    let linked = registry.module("BROKEN-MIB").unwrap();

    for node in standalone.flat_list().filter(|n| n.oid.is_numeric()) {
        assert_eq!(linked.node(&node.name).unwrap().oid, node.oid, "{} regressed", node.name);
    }
    assert_eq!(linked.node("acmeBranch").unwrap().oid_string(), "1.3.6.1.4.1.4242.1");
    assert_eq!(linked.node("acmeLeaf").unwrap().oid_string(), "1.3.6.1.4.1.4242.1.2");
    assert_eq!(linked.unresolved_count(), 0);
}

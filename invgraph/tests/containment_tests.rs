//! Containment rule tests: abstract expansion, duplicate coverage,
//! rule removal and navigation-root rules

mod testutils;

use invgraph::catalog::ClassDefinition;
use invgraph::EngineError;
use testutils::TestFixture;

#[test]
fn abstract_rule_expands_to_concrete_subclasses() {
    let fixture = TestFixture::with_network_catalog();
    let containment = fixture.engine.containment();
    let rack = fixture.name("Rack");

    containment
        .add_possible_children(Some(&rack), &[fixture.name("NetworkElement")])
        .unwrap();

    let children: Vec<String> = containment
        .get_possible_children(Some(&rack))
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert!(children.contains(&fixture.name("Router")));
    assert!(children.contains(&fixture.name("Switch")));
    assert!(!children.contains(&fixture.name("NetworkElement")));

    // The declared rule still names the abstract target
    let declared = containment
        .get_possible_children_no_recursive(Some(&rack))
        .unwrap();
    assert_eq!(declared.len(), 1);
    assert_eq!(declared[0].name, fixture.name("NetworkElement"));
    assert!(declared[0].is_abstract);
}

#[test]
fn duplicate_coverage_is_rejected() {
    let fixture = TestFixture::with_network_catalog();
    let containment = fixture.engine.containment();
    let rack = fixture.name("Rack");

    containment
        .add_possible_children(Some(&rack), &[fixture.name("NetworkElement")])
        .unwrap();

    // Router is already coverable through the NetworkElement rule
    assert!(matches!(
        containment.add_possible_children(Some(&rack), &[fixture.name("Router")]),
        Err(EngineError::InvalidArgument(_))
    ));
    // A rejected add leaves no partial rule behind
    assert_eq!(
        containment
            .get_possible_children_no_recursive(Some(&rack))
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn directly_listed_concrete_child_is_rejected_twice() {
    let fixture = TestFixture::with_network_catalog();
    let containment = fixture.engine.containment();
    let rack = fixture.name("Rack");

    containment
        .add_possible_children(Some(&rack), &[fixture.name("Router")])
        .unwrap();
    assert!(matches!(
        containment.add_possible_children(Some(&rack), &[fixture.name("Router")]),
        Err(EngineError::InvalidArgument(_))
    ));
}

#[test]
fn removing_an_abstract_rule_drops_its_whole_expansion() {
    let fixture = TestFixture::with_network_catalog();
    let containment = fixture.engine.containment();
    let rack = fixture.name("Rack");

    containment
        .add_possible_children(Some(&rack), &[fixture.name("NetworkElement")])
        .unwrap();
    containment
        .remove_possible_children(Some(&rack), &[fixture.name("NetworkElement")])
        .unwrap();

    assert!(containment
        .get_possible_children(Some(&rack))
        .unwrap()
        .is_empty());
    // Router was never a declared target, only covered through the rule
    assert!(matches!(
        containment.remove_possible_children(Some(&rack), &[fixture.name("Router")]),
        Err(EngineError::MetadataObjectNotFound(_))
    ));
}

#[test]
fn new_concrete_subclass_joins_existing_abstract_rules() {
    let fixture = TestFixture::with_network_catalog();
    let containment = fixture.engine.containment();
    let rack = fixture.name("Rack");

    containment
        .add_possible_children(Some(&rack), &[fixture.name("NetworkElement")])
        .unwrap();

    fixture
        .engine
        .metadata()
        .create_class(ClassDefinition::new(
            &fixture.name("Firewall"),
            &fixture.name("NetworkElement"),
        ))
        .unwrap();

    assert!(containment.can_contain(Some(&rack), &fixture.name("Firewall")));
}

#[test]
fn recursive_children_are_grouped_by_declared_target() {
    let fixture = TestFixture::with_network_catalog();
    let metadata = fixture.engine.metadata();
    let containment = fixture.engine.containment();
    let rack = fixture.name("Rack");

    metadata
        .create_class(ClassDefinition::abstract_class(
            &fixture.name("AAppliance"),
            "InventoryObject",
        ))
        .unwrap();
    metadata
        .create_class(ClassDefinition::new(
            &fixture.name("Zebra"),
            &fixture.name("AAppliance"),
        ))
        .unwrap();
    metadata
        .create_class(ClassDefinition::new(&fixture.name("MBox"), "InventoryObject"))
        .unwrap();

    containment
        .add_possible_children(
            Some(&rack),
            &[fixture.name("AAppliance"), fixture.name("MBox")],
        )
        .unwrap();

    // AAppliance sorts before MBox, so its expansion comes first even
    // though Zebra sorts after MBox globally
    let children = containment.get_possible_children(Some(&rack)).unwrap();
    assert!(children.iter().all(|c| !c.is_abstract));
    let names: Vec<String> = children.into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec![fixture.name("Zebra"), fixture.name("MBox")]);
}

#[test]
fn navigation_root_rules_use_the_dummy_root() {
    let fixture = TestFixture::with_network_catalog();
    let containment = fixture.engine.containment();

    containment
        .add_possible_children(None, &[fixture.name("Rack")])
        .unwrap();
    assert!(containment.can_contain(None, &fixture.name("Rack")));
    assert!(!containment.can_contain(None, &fixture.name("Router")));
}

#[test]
fn non_business_classes_cannot_be_children() {
    let fixture = TestFixture::with_network_catalog();
    let containment = fixture.engine.containment();

    assert!(matches!(
        containment.add_possible_children(
            Some(&fixture.name("Rack")),
            &[fixture.name("EquipmentVendor")]
        ),
        Err(EngineError::InvalidArgument(_))
    ));
}

#[test]
fn non_business_classes_cannot_be_parents() {
    let fixture = TestFixture::with_network_catalog();
    let containment = fixture.engine.containment();

    assert!(matches!(
        containment.add_possible_children(
            Some(&fixture.name("EquipmentVendor")),
            &[fixture.name("Router")]
        ),
        Err(EngineError::InvalidArgument(_))
    ));
}

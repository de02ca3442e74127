//! Business object tests: creation under containment rules, attribute
//! mapping, delete/move/copy and child listings

mod testutils;

use invgraph::catalog::{AttributeDefinition, AttributeUpdate};
use invgraph::{AttributeValues, EngineError};
use std::collections::HashMap;
use testutils::TestFixture;

fn values(pairs: &[(&str, &[&str])]) -> AttributeValues {
    pairs
        .iter()
        .map(|(name, list)| {
            (
                name.to_string(),
                list.iter().map(|v| v.to_string()).collect(),
            )
        })
        .collect()
}

#[test]
fn containment_rules_gate_creation() {
    let fixture = TestFixture::with_network_catalog();
    let objects = fixture.engine.objects();
    let rack = fixture.name("Rack");
    let router = fixture.name("Router");

    let rack_id = objects.create_object(&rack, None, None, &Default::default()).unwrap();

    // No rule yet: Router under Rack is refused
    assert!(matches!(
        objects.create_object(&router, Some(&rack), Some(&rack_id), &Default::default()),
        Err(EngineError::OperationNotPermitted(_))
    ));

    fixture
        .engine
        .containment()
        .add_possible_children(Some(&rack), &[fixture.name("NetworkElement")])
        .unwrap();
    let router_id = objects
        .create_object(&router, Some(&rack), Some(&rack_id), &Default::default())
        .unwrap();

    let children = objects.get_object_children(&rack, &rack_id).unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, router_id);
}

#[test]
fn abstract_and_unknown_classes_cannot_be_instantiated() {
    let fixture = TestFixture::with_network_catalog();
    let objects = fixture.engine.objects();

    assert!(matches!(
        objects.create_object(&fixture.name("NetworkElement"), None, None, &Default::default()),
        Err(EngineError::OperationNotPermitted(_))
    ));
    assert!(matches!(
        objects.create_object("NoSuchClass", None, None, &Default::default()),
        Err(EngineError::MetadataObjectNotFound(_))
    ));
    // List types are not business objects
    assert!(matches!(
        objects.create_object(&fixture.name("EquipmentVendor"), None, None, &Default::default()),
        Err(EngineError::OperationNotPermitted(_))
    ));
}

#[test]
fn attribute_values_round_trip_through_object_info() {
    let fixture = TestFixture::with_network_catalog();
    let objects = fixture.engine.objects();
    let router = fixture.name("Router");

    let id = objects
        .create_object(
            &router,
            None,
            None,
            &values(&[("name", &["edge-rtr-1"]), ("vendor", &["Cisco"])]),
        )
        .unwrap();

    let info = objects.get_object_info(&router, &id).unwrap();
    assert_eq!(info.name, "edge-rtr-1");
    assert_eq!(info.class_name, router);
    assert_eq!(info.attributes["vendor"], vec!["Cisco"]);

    objects
        .update_object(&router, &id, &values(&[("vendor", &[])]))
        .unwrap();
    let info = objects.get_object_info(&router, &id).unwrap();
    assert!(!info.attributes.contains_key("vendor"));
}

#[test]
fn typed_attributes_reject_bad_literals() {
    let fixture = TestFixture::with_network_catalog();
    let metadata = fixture.engine.metadata();
    let objects = fixture.engine.objects();
    let router = fixture.name("Router");

    metadata
        .add_attribute(&router, AttributeDefinition::primitive("ports", "Integer"))
        .unwrap();

    let id = objects.create_object(&router, None, None, &Default::default()).unwrap();
    assert!(matches!(
        objects.update_object(&router, &id, &values(&[("ports", &["many"])])),
        Err(EngineError::InvalidArgument(_))
    ));
    objects
        .update_object(&router, &id, &values(&[("ports", &["48"])]))
        .unwrap();
    assert_eq!(
        objects.get_object_info(&router, &id).unwrap().attributes["ports"],
        vec!["48"]
    );
}

#[test]
fn list_type_values_replace_the_full_edge_set() {
    let fixture = TestFixture::with_network_catalog();
    let objects = fixture.engine.objects();
    let router = fixture.name("Router");
    let vendor_class = fixture.name("EquipmentVendor");

    // List-type items are not business objects; they have their own
    // creation path outside the containment tree
    assert!(matches!(
        objects.create_object(&vendor_class, None, None, &values(&[("name", &["Cisco"])])),
        Err(EngineError::OperationNotPermitted(_))
    ));

    let cisco = create_list_item(&fixture, "Cisco");
    let juniper = create_list_item(&fixture, "Juniper");
    assert_eq!(objects.get_list_type_items(&vendor_class).unwrap().len(), 2);

    let id = objects
        .create_object(&router, None, None, &values(&[("manufacturer", &[&cisco])]))
        .unwrap();
    assert_eq!(
        objects.get_object_info(&router, &id).unwrap().attributes["manufacturer"],
        vec![cisco.clone()]
    );

    objects
        .update_object(&router, &id, &values(&[("manufacturer", &[&juniper])]))
        .unwrap();
    assert_eq!(
        objects.get_object_info(&router, &id).unwrap().attributes["manufacturer"],
        vec![juniper]
    );

    // An empty list clears every edge for the attribute
    objects
        .update_object(&router, &id, &values(&[("manufacturer", &[])]))
        .unwrap();
    assert!(!objects
        .get_object_info(&router, &id)
        .unwrap()
        .attributes
        .contains_key("manufacturer"));

    // A random id is not a list-type item
    assert!(matches!(
        objects.update_object(&router, &id, &values(&[("manufacturer", &["bogus"])])),
        Err(EngineError::InvalidArgument(_))
    ));
}

#[test]
fn unique_attributes_are_enforced_across_instances() {
    let fixture = TestFixture::with_network_catalog();
    let metadata = fixture.engine.metadata();
    let objects = fixture.engine.objects();
    let router = fixture.name("Router");

    let mut serial = AttributeDefinition::primitive("serial", "String");
    serial.unique = true;
    metadata.add_attribute(&router, serial).unwrap();

    objects
        .create_object(&router, None, None, &values(&[("serial", &["SN-001"])]))
        .unwrap();
    assert!(matches!(
        objects.create_object(&router, None, None, &values(&[("serial", &["SN-001"])])),
        Err(EngineError::InvalidArgument(_))
    ));
    objects
        .create_object(&router, None, None, &values(&[("serial", &["SN-002"])]))
        .unwrap();
}

#[test]
fn read_only_attributes_refuse_updates() {
    let fixture = TestFixture::with_network_catalog();
    let metadata = fixture.engine.metadata();
    let objects = fixture.engine.objects();
    let router = fixture.name("Router");

    metadata
        .change_attribute_definition(
            &router,
            "vendor",
            AttributeUpdate {
                read_only: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

    let id = objects
        .create_object(&router, None, None, &values(&[("vendor", &["Cisco"])]))
        .unwrap();
    assert!(matches!(
        objects.update_object(&router, &id, &values(&[("vendor", &["Juniper"])])),
        Err(EngineError::OperationNotPermitted(_))
    ));
}

#[test]
fn delete_requires_releasing_extra_relationships() {
    let fixture = TestFixture::with_network_catalog();
    let objects = fixture.engine.objects();
    let router = fixture.name("Router");

    let a = objects.create_object(&router, None, None, &Default::default()).unwrap();
    let b = objects.create_object(&router, None, None, &Default::default()).unwrap();
    objects
        .create_special_relationship(&router, &a, &router, &b, "mirrors")
        .unwrap();

    let mut ids = HashMap::new();
    ids.insert(router.clone(), vec![a.clone()]);
    assert!(matches!(
        objects.delete_objects(&ids, false),
        Err(EngineError::OperationNotPermitted(_))
    ));

    objects.delete_objects(&ids, true).unwrap();
    assert!(matches!(
        objects.get_object_info(&router, &a),
        Err(EngineError::ObjectNotFound { .. })
    ));
    // The dangling edge went with the node
    assert!(objects.get_object_info(&router, &b).is_ok());
    ids.insert(router.clone(), vec![b]);
    objects.delete_objects(&ids, false).unwrap();
}

#[test]
fn move_keeps_exactly_one_parent_and_checks_containment() {
    let fixture = TestFixture::with_network_catalog();
    let objects = fixture.engine.objects();
    let containment = fixture.engine.containment();
    let rack = fixture.name("Rack");
    let router = fixture.name("Router");

    containment
        .add_possible_children(Some(&rack), &[fixture.name("NetworkElement")])
        .unwrap();
    let rack_a = objects.create_object(&rack, None, None, &Default::default()).unwrap();
    let rack_b = objects.create_object(&rack, None, None, &Default::default()).unwrap();
    let router_id = objects
        .create_object(&router, Some(&rack), Some(&rack_a), &Default::default())
        .unwrap();

    let mut ids = HashMap::new();
    ids.insert(router.clone(), vec![router_id.clone()]);
    objects.move_objects(Some(&rack), Some(&rack_b), &ids).unwrap();

    assert!(objects.get_object_children(&rack, &rack_a).unwrap().is_empty());
    let children = objects.get_object_children(&rack, &rack_b).unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, router_id);

    // Racks do not accept other racks
    let mut rack_ids = HashMap::new();
    rack_ids.insert(rack.clone(), vec![rack_a]);
    assert!(matches!(
        objects.move_objects(Some(&rack), Some(&rack_b), &rack_ids),
        Err(EngineError::OperationNotPermitted(_))
    ));
}

#[test]
fn copy_skips_no_copy_attributes_and_special_edges() {
    let fixture = TestFixture::with_network_catalog();
    let metadata = fixture.engine.metadata();
    let objects = fixture.engine.objects();
    let containment = fixture.engine.containment();
    let rack = fixture.name("Rack");
    let router = fixture.name("Router");

    metadata
        .change_attribute_definition(
            &router,
            "vendor",
            AttributeUpdate {
                no_copy: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    containment
        .add_possible_children(Some(&rack), &[fixture.name("NetworkElement")])
        .unwrap();

    let rack_a = objects.create_object(&rack, None, None, &Default::default()).unwrap();
    let rack_b = objects.create_object(&rack, None, None, &Default::default()).unwrap();
    let cisco = create_list_item(&fixture, "Cisco");
    let original = objects
        .create_object(
            &router,
            Some(&rack),
            Some(&rack_a),
            &values(&[
                ("name", &["edge-rtr-1"]),
                ("vendor", &["Cisco"]),
                ("manufacturer", &[&cisco]),
            ]),
        )
        .unwrap();
    let peer = objects.create_object(&router, None, None, &Default::default()).unwrap();
    objects
        .create_special_relationship(&router, &original, &router, &peer, "mirrors")
        .unwrap();

    let mut ids = HashMap::new();
    ids.insert(router.clone(), vec![original]);
    let new_ids = objects
        .copy_objects(Some(&rack), Some(&rack_b), &ids, false)
        .unwrap();
    assert_eq!(new_ids.len(), 1);

    let copy = objects.get_object_info(&router, &new_ids[0]).unwrap();
    assert_eq!(copy.name, "edge-rtr-1");
    assert!(!copy.attributes.contains_key("vendor"));
    assert_eq!(copy.attributes["manufacturer"], vec![cisco]);

    // The copy carries no special relationship: once its list-type
    // edge is cleared a strict delete goes through
    objects
        .update_object(&router, &new_ids[0], &values(&[("manufacturer", &[])]))
        .unwrap();
    let mut copy_ids = HashMap::new();
    copy_ids.insert(router.clone(), vec![new_ids[0].clone()]);
    objects.delete_objects(&copy_ids, false).unwrap();
}

#[test]
fn recursive_copy_duplicates_the_containment_subtree() {
    let fixture = TestFixture::with_network_catalog();
    let objects = fixture.engine.objects();
    let containment = fixture.engine.containment();
    let rack = fixture.name("Rack");
    let router = fixture.name("Router");

    containment.add_possible_children(None, &[rack.clone()]).unwrap();
    containment
        .add_possible_children(Some(&rack), &[fixture.name("NetworkElement")])
        .unwrap();

    let rack_a = objects.create_object(&rack, None, None, &Default::default()).unwrap();
    objects
        .create_object(
            &router,
            Some(&rack),
            Some(&rack_a),
            &values(&[("name", &["edge-rtr-1"])]),
        )
        .unwrap();

    let mut ids = HashMap::new();
    ids.insert(rack.clone(), vec![rack_a]);
    let new_ids = objects.copy_objects(None, None, &ids, true).unwrap();
    let copied_children = objects.get_object_children(&rack, &new_ids[0]).unwrap();
    assert_eq!(copied_children.len(), 1);
    assert_eq!(copied_children[0].name, "edge-rtr-1");
}

#[test]
fn children_listing_merges_special_children_with_cap_and_filter() {
    let fixture = TestFixture::with_network_catalog();
    let objects = fixture.engine.objects();
    let containment = fixture.engine.containment();
    let rack = fixture.name("Rack");
    let router = fixture.name("Router");
    let switch = fixture.name("Switch");

    containment
        .add_possible_children(Some(&rack), &[fixture.name("NetworkElement")])
        .unwrap();
    let rack_id = objects.create_object(&rack, None, None, &Default::default()).unwrap();
    objects
        .create_object(&router, Some(&rack), Some(&rack_id), &values(&[("name", &["r1"])]))
        .unwrap();
    objects
        .create_object(&switch, Some(&rack), Some(&rack_id), &values(&[("name", &["s1"])]))
        .unwrap();
    objects
        .create_special_object(&router, Some(&rack), Some(&rack_id), &values(&[("name", &["r2"])]))
        .unwrap();

    let all = objects
        .get_children_of_class_light(Some(&rack), Some(&rack_id), &fixture.name("NetworkElement"), 0)
        .unwrap();
    assert_eq!(all.len(), 3);
    // Direct children come first, the special child last
    assert_eq!(all[2].name, "r2");

    let routers = objects
        .get_children_of_class_light(Some(&rack), Some(&rack_id), &router, 0)
        .unwrap();
    assert_eq!(routers.len(), 2);

    let capped = objects
        .get_children_of_class_light(Some(&rack), Some(&rack_id), &fixture.name("NetworkElement"), 2)
        .unwrap();
    assert_eq!(capped.len(), 2);
}

fn create_list_item(fixture: &TestFixture, name: &str) -> String {
    fixture
        .engine
        .objects()
        .create_list_type_item(&fixture.name("EquipmentVendor"), name)
        .unwrap()
}

//! Test fixture for invgraph integration tests
//!
//! Builds an engine with a small network-inventory catalog through the
//! public API only. Class names are suffixed with a random tag so tests
//! sharing a fixture helper never collide.

use invgraph::catalog::{AttributeDefinition, AttributeMapping, ClassDefinition};
use invgraph::{Engine, EngineConfig};

/// An open engine plus the unique name tag used by this test
pub struct TestFixture {
    pub engine: Engine,
    tag: String,
}

impl TestFixture {
    /// Engine with only the bootstrapped core catalog
    pub fn empty() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let engine = Engine::open(EngineConfig::default()).expect("engine should open");
        Self {
            engine,
            tag: format!("{:x}", fastrand::u64(..)),
        }
    }

    /// Engine with a small catalog: abstract NetworkElement under
    /// InventoryObject, concrete Router and Switch beneath it (both
    /// with a vendor attribute), a Rack container, and an
    /// EquipmentVendor list type with a Router manyToOne attribute
    /// pointing at it.
    pub fn with_network_catalog() -> Self {
        let fixture = Self::empty();
        let metadata = fixture.engine.metadata();

        metadata
            .create_class(ClassDefinition::abstract_class(
                &fixture.name("NetworkElement"),
                "InventoryObject",
            ))
            .expect("abstract class");
        metadata
            .create_class(
                ClassDefinition::new(&fixture.name("Router"), &fixture.name("NetworkElement"))
                    .with_attribute(AttributeDefinition::primitive("vendor", "String")),
            )
            .expect("Router class");
        metadata
            .create_class(
                ClassDefinition::new(&fixture.name("Switch"), &fixture.name("NetworkElement"))
                    .with_attribute(AttributeDefinition::primitive("vendor", "String")),
            )
            .expect("Switch class");
        metadata
            .create_class(ClassDefinition::new(&fixture.name("Rack"), "InventoryObject"))
            .expect("Rack class");
        metadata
            .create_class(ClassDefinition::new(
                &fixture.name("EquipmentVendor"),
                "GenericObjectList",
            ))
            .expect("list type class");
        metadata
            .add_attribute(
                &fixture.name("Router"),
                AttributeDefinition::list_type(
                    "manufacturer",
                    &fixture.name("EquipmentVendor"),
                    AttributeMapping::ManyToOne,
                ),
            )
            .expect("list type attribute");
        fixture
    }

    /// Tag a class name so it is unique to this fixture
    pub fn name(&self, base: &str) -> String {
        format!("{}_{}", base, self.tag)
    }
}

// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Business object store
//!
//! CRUD, move, copy and relationship operations on instances. Every
//! mutation runs in a single transaction; schema facts (class lookups,
//! subclass checks, containment rules) come from the metadata cache.
//!
//! Instances hang off the graph as `object` nodes: one INSTANCE_OF edge
//! to their class node, one CHILD_OF (or CHILD_OF_SPECIAL) edge to their
//! parent, RELATED_TO edges carrying the attribute name for list-type
//! values, and RELATED_TO_SPECIAL edges for named cross-cutting
//! relationships.

use crate::cache::MetadataCache;
use crate::catalog::types::*;
use crate::error::{EngineError, EngineResult};
use crate::objects::types::{parse_attribute_value, AttributeValues, ObjectInfo, ObjectLight};
use crate::storage::{Direction, GraphStore, Node, Transaction, Value};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Business object operations
pub struct ObjectManager {
    store: Arc<GraphStore>,
    cache: Arc<MetadataCache>,
}

impl ObjectManager {
    pub fn new(store: Arc<GraphStore>, cache: Arc<MetadataCache>) -> Self {
        Self { store, cache }
    }

    /// Create an instance of `class_name` under the given parent, or
    /// under the navigation root when no parent is given
    pub fn create_object(
        &self,
        class_name: &str,
        parent_class_name: Option<&str>,
        parent_id: Option<&str>,
        attributes: &AttributeValues,
    ) -> EngineResult<String> {
        self.create_internal(class_name, parent_class_name, parent_id, attributes, false)
    }

    /// Like create_object but attaches through CHILD_OF_SPECIAL and
    /// skips the containment rules, for non-hierarchical composition
    pub fn create_special_object(
        &self,
        class_name: &str,
        parent_class_name: Option<&str>,
        parent_id: Option<&str>,
        attributes: &AttributeValues,
    ) -> EngineResult<String> {
        self.create_internal(class_name, parent_class_name, parent_id, attributes, true)
    }

    fn create_internal(
        &self,
        class_name: &str,
        parent_class_name: Option<&str>,
        parent_id: Option<&str>,
        attributes: &AttributeValues,
        special: bool,
    ) -> EngineResult<String> {
        let class = self.cache.get_class(class_name).ok_or_else(|| {
            EngineError::MetadataObjectNotFound(format!("Class {} not found", class_name))
        })?;
        if class.is_abstract {
            return Err(EngineError::OperationNotPermitted(format!(
                "Abstract class {} cannot be instantiated",
                class_name
            )));
        }
        if !self.cache.is_subclass(INVENTORY_OBJECT, class_name) {
            return Err(EngineError::OperationNotPermitted(format!(
                "{} is not a business-object class",
                class_name
            )));
        }

        let mut tx = self.store.begin();
        let parent = match parent_class_name {
            None => navigation_root(&tx)?,
            Some(parent_class) => {
                if !special && !self.cache.can_contain(parent_class, class_name) {
                    return Err(EngineError::OperationNotPermitted(format!(
                        "Instances of {} cannot contain instances of {}",
                        parent_class, class_name
                    )));
                }
                let parent_id = parent_id.ok_or_else(|| {
                    EngineError::InvalidArgument(
                        "A parent id is required when a parent class is given".to_string(),
                    )
                })?;
                self.resolve_instance(&tx, parent_class, parent_id)?
            }
        };

        let mut props = HashMap::new();
        props.insert(PROP_NAME.to_string(), Value::String(String::new()));
        props.insert(PROP_CREATION_DATE.to_string(), Value::Timestamp(Utc::now()));
        let object_id = tx.create_node(NODE_OBJECT, props);
        tx.create_edge(&object_id, &class.id, EDGE_INSTANCE_OF, HashMap::new())?;
        let child_edge = if special { EDGE_CHILD_OF_SPECIAL } else { EDGE_CHILD_OF };
        tx.create_edge(&object_id, &parent.id, child_edge, HashMap::new())?;

        self.apply_attribute_values(&mut tx, &class, &object_id, attributes, false)?;
        tx.commit()?;

        log::debug!("created {} instance {}", class_name, object_id);
        Ok(object_id)
    }

    /// Create an item of a list-type class. Items live outside the
    /// containment tree; they exist to be pointed at by many-to-one
    /// and many-to-many attributes.
    pub fn create_list_type_item(&self, class_name: &str, name: &str) -> EngineResult<String> {
        let class = self.cache.get_class(class_name).ok_or_else(|| {
            EngineError::MetadataObjectNotFound(format!("Class {} not found", class_name))
        })?;
        if class.is_abstract {
            return Err(EngineError::OperationNotPermitted(format!(
                "Abstract class {} cannot be instantiated",
                class_name
            )));
        }
        if !self.cache.is_subclass(GENERIC_OBJECT_LIST, class_name) {
            return Err(EngineError::InvalidArgument(format!(
                "{} is not a list-type class",
                class_name
            )));
        }

        let mut tx = self.store.begin();
        let mut props = HashMap::new();
        props.insert(PROP_NAME.to_string(), Value::String(name.to_string()));
        props.insert(PROP_CREATION_DATE.to_string(), Value::Timestamp(Utc::now()));
        let item_id = tx.create_node(NODE_OBJECT, props);
        tx.create_edge(&item_id, &class.id, EDGE_INSTANCE_OF, HashMap::new())?;
        tx.commit()?;
        Ok(item_id)
    }

    /// Items of a list-type class, ordered by name
    pub fn get_list_type_items(&self, class_name: &str) -> EngineResult<Vec<ObjectLight>> {
        let class = self.cache.get_class(class_name).ok_or_else(|| {
            EngineError::MetadataObjectNotFound(format!("Class {} not found", class_name))
        })?;
        if !self.cache.is_subclass(GENERIC_OBJECT_LIST, class_name) {
            return Err(EngineError::InvalidArgument(format!(
                "{} is not a list-type class",
                class_name
            )));
        }
        let tx = self.store.begin();
        let mut items: Vec<ObjectLight> = tx
            .edges_of(&class.id, Direction::Incoming)
            .into_iter()
            .filter(|edge| edge.label == EDGE_INSTANCE_OF)
            .filter_map(|edge| tx.get_node(&edge.from_node))
            .map(|node| ObjectLight {
                id: node.id.clone(),
                name: node.string_property(PROP_NAME),
                class_name: class_name.to_string(),
            })
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    /// Full instance view
    pub fn get_object_info(&self, class_name: &str, id: &str) -> EngineResult<ObjectInfo> {
        let tx = self.store.begin();
        let node = self.resolve_instance(&tx, class_name, id)?;
        self.object_info_at(&tx, &node)
    }

    /// Instance summary
    pub fn get_object_info_light(&self, class_name: &str, id: &str) -> EngineResult<ObjectLight> {
        let tx = self.store.begin();
        let node = self.resolve_instance(&tx, class_name, id)?;
        self.object_light_at(&tx, &node)
    }

    /// Update attribute values on an instance. Absent keys are left
    /// untouched; an empty value list clears the attribute.
    pub fn update_object(
        &self,
        class_name: &str,
        id: &str,
        attributes: &AttributeValues,
    ) -> EngineResult<()> {
        let mut tx = self.store.begin();
        let node = self.resolve_instance(&tx, class_name, id)?;
        // Attributes are interpreted against the instance's actual class,
        // which may be a subclass of the one the caller named
        let actual = self.instance_class(&tx, &node)?;
        self.apply_attribute_values(&mut tx, &actual, &node.id, attributes, true)?;
        tx.commit()?;
        Ok(())
    }

    /// Delete instances. Without `release_relationships` an instance
    /// still holding any edge beyond its own class and containment edges
    /// is refused; with it, every edge goes with the node.
    pub fn delete_objects(
        &self,
        ids_by_class: &HashMap<String, Vec<String>>,
        release_relationships: bool,
    ) -> EngineResult<()> {
        let mut tx = self.store.begin();
        for (class_name, ids) in ids_by_class {
            for id in ids {
                let node = self.resolve_instance(&tx, class_name, id)?;
                if !release_relationships {
                    for edge in tx.edges_of(&node.id, Direction::Both) {
                        let own_structural = edge.from_node == node.id
                            && matches!(edge.label.as_str(), EDGE_INSTANCE_OF | EDGE_CHILD_OF);
                        if !own_structural {
                            return Err(EngineError::OperationNotPermitted(format!(
                                "Object {} still has a {} relationship; release it first",
                                id, edge.label
                            )));
                        }
                    }
                }
                tx.delete_node(&node.id)?;
                log::debug!("deleted {} instance {}", class_name, id);
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Re-parent instances under a new container. Every object keeps
    /// exactly one CHILD_OF edge throughout.
    pub fn move_objects(
        &self,
        target_class: Option<&str>,
        target_id: Option<&str>,
        ids_by_class: &HashMap<String, Vec<String>>,
    ) -> EngineResult<()> {
        let mut tx = self.store.begin();
        let target = self.resolve_parent_ref(&tx, target_class, target_id)?;
        for (class_name, ids) in ids_by_class {
            if let Some(target_class) = target_class {
                if !self.cache.can_contain(target_class, class_name) {
                    return Err(EngineError::OperationNotPermitted(format!(
                        "Instances of {} cannot contain instances of {}",
                        target_class, class_name
                    )));
                }
            }
            for id in ids {
                let node = self.resolve_instance(&tx, class_name, id)?;
                let old_edges: Vec<String> = tx
                    .edges_of(&node.id, Direction::Outgoing)
                    .into_iter()
                    .filter(|edge| edge.label == EDGE_CHILD_OF)
                    .map(|edge| edge.id)
                    .collect();
                for edge_id in old_edges {
                    tx.delete_edge(&edge_id)?;
                }
                tx.create_edge(&node.id, &target.id, EDGE_CHILD_OF, HashMap::new())?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Duplicate instances under a new container, skipping attributes
    /// flagged no-copy. Special containment and special relationships
    /// are never duplicated.
    pub fn copy_objects(
        &self,
        target_class: Option<&str>,
        target_id: Option<&str>,
        ids_by_class: &HashMap<String, Vec<String>>,
        recursive: bool,
    ) -> EngineResult<Vec<String>> {
        let mut tx = self.store.begin();
        let target = self.resolve_parent_ref(&tx, target_class, target_id)?;
        let mut new_ids = Vec::new();
        for (class_name, ids) in ids_by_class {
            if let Some(target_class) = target_class {
                if !self.cache.can_contain(target_class, class_name) {
                    return Err(EngineError::OperationNotPermitted(format!(
                        "Instances of {} cannot contain instances of {}",
                        target_class, class_name
                    )));
                }
            }
            for id in ids {
                let node = self.resolve_instance(&tx, class_name, id)?;
                new_ids.push(self.copy_subtree(&mut tx, &node, &target.id, recursive)?);
            }
        }
        tx.commit()?;
        Ok(new_ids)
    }

    fn copy_subtree(
        &self,
        tx: &mut Transaction<'_>,
        source: &Node,
        parent_id: &str,
        recursive: bool,
    ) -> EngineResult<String> {
        let class = self.instance_class(tx, source)?;
        let no_copy: HashSet<&str> = class
            .attributes
            .iter()
            .filter(|attr| attr.no_copy)
            .map(|attr| attr.name.as_str())
            .collect();

        let mut props: HashMap<String, Value> = source
            .properties
            .iter()
            .filter(|(key, _)| !no_copy.contains(key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        props.insert(PROP_CREATION_DATE.to_string(), Value::Timestamp(Utc::now()));
        let copy_id = tx.create_node(NODE_OBJECT, props);
        tx.create_edge(&copy_id, &class.id, EDGE_INSTANCE_OF, HashMap::new())?;
        tx.create_edge(&copy_id, parent_id, EDGE_CHILD_OF, HashMap::new())?;

        for edge in tx.edges_of(&source.id, Direction::Outgoing) {
            if edge.label != EDGE_RELATED_TO {
                continue;
            }
            let attr_name = edge.string_property(PROP_NAME);
            if no_copy.contains(attr_name.as_str()) {
                continue;
            }
            tx.create_edge(&copy_id, &edge.to_node, EDGE_RELATED_TO, edge.properties.clone())?;
        }

        if recursive {
            let children: Vec<Node> = tx
                .edges_of(&source.id, Direction::Incoming)
                .into_iter()
                .filter(|edge| edge.label == EDGE_CHILD_OF)
                .filter_map(|edge| tx.get_node(&edge.from_node))
                .collect();
            for child in children {
                self.copy_subtree(tx, &child, &copy_id, true)?;
            }
        }
        Ok(copy_id)
    }

    /// Create a named RELATED_TO_SPECIAL edge between two instances
    pub fn create_special_relationship(
        &self,
        a_class: &str,
        a_id: &str,
        b_class: &str,
        b_id: &str,
        name: &str,
    ) -> EngineResult<()> {
        let mut tx = self.store.begin();
        let a = self.resolve_instance(&tx, a_class, a_id)?;
        let b = self.resolve_instance(&tx, b_class, b_id)?;
        let mut props = HashMap::new();
        props.insert(PROP_NAME.to_string(), Value::String(name.to_string()));
        tx.create_edge(&a.id, &b.id, EDGE_RELATED_TO_SPECIAL, props)?;
        tx.commit()?;
        Ok(())
    }

    /// Direct children of an instance, ordered by name
    pub fn get_object_children(
        &self,
        class_name: &str,
        id: &str,
    ) -> EngineResult<Vec<ObjectLight>> {
        let tx = self.store.begin();
        let parent = self.resolve_instance(&tx, class_name, id)?;
        let mut children = self.children_by_edge(&tx, &parent.id, EDGE_CHILD_OF)?;
        children.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(children)
    }

    /// Direct and special children filtered to a class subtree, direct
    /// children first, capped jointly across both sources. A cap of
    /// zero means unlimited.
    pub fn get_children_of_class_light(
        &self,
        parent_class: Option<&str>,
        parent_id: Option<&str>,
        class_filter: &str,
        max_results: usize,
    ) -> EngineResult<Vec<ObjectLight>> {
        let tx = self.store.begin();
        let parent = self.resolve_parent_ref(&tx, parent_class, parent_id)?;
        let mut result = Vec::new();
        for edge_label in [EDGE_CHILD_OF, EDGE_CHILD_OF_SPECIAL] {
            let mut batch = self.children_by_edge(&tx, &parent.id, edge_label)?;
            batch.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
            for child in batch {
                if max_results > 0 && result.len() >= max_results {
                    return Ok(result);
                }
                if self.cache.is_subclass(class_filter, &child.class_name) {
                    result.push(child);
                }
            }
        }
        Ok(result)
    }

    /// Full-record variant of get_children_of_class_light
    pub fn get_children_of_class(
        &self,
        parent_class: Option<&str>,
        parent_id: Option<&str>,
        class_filter: &str,
        max_results: usize,
    ) -> EngineResult<Vec<ObjectInfo>> {
        let light =
            self.get_children_of_class_light(parent_class, parent_id, class_filter, max_results)?;
        let tx = self.store.begin();
        light
            .into_iter()
            .map(|child| {
                let node = tx.get_node(&child.id).ok_or_else(|| {
                    EngineError::ObjectNotFound {
                        class: child.class_name.clone(),
                        id: child.id.clone(),
                    }
                })?;
                self.object_info_at(&tx, &node)
            })
            .collect()
    }

    /// Look up an instance, accepting subclasses of the named class
    fn resolve_instance(
        &self,
        tx: &Transaction<'_>,
        class_name: &str,
        id: &str,
    ) -> EngineResult<Node> {
        let not_found = || EngineError::ObjectNotFound {
            class: class_name.to_string(),
            id: id.to_string(),
        };
        let node = tx
            .get_node(id)
            .filter(|node| node.label == NODE_OBJECT)
            .ok_or_else(not_found)?;
        let actual = self
            .instance_class_name(tx, &node.id)
            .ok_or_else(not_found)?;
        if !self.cache.is_subclass(class_name, &actual) {
            return Err(not_found());
        }
        Ok(node)
    }

    /// Parent reference for move/copy/listing: an instance, or the
    /// navigation root when no class is given
    fn resolve_parent_ref(
        &self,
        tx: &Transaction<'_>,
        parent_class: Option<&str>,
        parent_id: Option<&str>,
    ) -> EngineResult<Node> {
        match parent_class {
            None => navigation_root(tx),
            Some(class_name) => {
                let id = parent_id.ok_or_else(|| {
                    EngineError::InvalidArgument(
                        "A parent id is required when a parent class is given".to_string(),
                    )
                })?;
                self.resolve_instance(tx, class_name, id)
            }
        }
    }

    fn instance_class_name(&self, tx: &Transaction<'_>, node_id: &str) -> Option<String> {
        tx.edges_of(node_id, Direction::Outgoing)
            .into_iter()
            .find(|edge| edge.label == EDGE_INSTANCE_OF)
            .and_then(|edge| tx.get_node(&edge.to_node))
            .map(|class_node| class_node.string_property(PROP_NAME))
    }

    fn instance_class(&self, tx: &Transaction<'_>, node: &Node) -> EngineResult<ClassMetadata> {
        let name = self.instance_class_name(tx, &node.id).ok_or_else(|| {
            EngineError::ObjectNotFound {
                class: "?".to_string(),
                id: node.id.clone(),
            }
        })?;
        self.cache.get_class(&name).ok_or_else(|| {
            EngineError::MetadataObjectNotFound(format!("Class {} not found", name))
        })
    }

    fn children_by_edge(
        &self,
        tx: &Transaction<'_>,
        parent_id: &str,
        edge_label: &str,
    ) -> EngineResult<Vec<ObjectLight>> {
        tx.edges_of(parent_id, Direction::Incoming)
            .into_iter()
            .filter(|edge| edge.label == edge_label)
            .filter_map(|edge| tx.get_node(&edge.from_node))
            .filter(|node| node.label == NODE_OBJECT)
            .map(|node| self.object_light_at(tx, &node))
            .collect()
    }

    fn object_light_at(&self, tx: &Transaction<'_>, node: &Node) -> EngineResult<ObjectLight> {
        let class_name = self.instance_class_name(tx, &node.id).ok_or_else(|| {
            EngineError::ObjectNotFound {
                class: "?".to_string(),
                id: node.id.clone(),
            }
        })?;
        Ok(ObjectLight {
            id: node.id.clone(),
            name: node.string_property(PROP_NAME),
            class_name,
        })
    }

    fn object_info_at(&self, tx: &Transaction<'_>, node: &Node) -> EngineResult<ObjectInfo> {
        let class = self.instance_class(tx, node)?;
        let mut attributes: HashMap<String, Vec<String>> = HashMap::new();
        for attr in &class.attributes {
            if attr.is_list_type() {
                let items: Vec<String> = tx
                    .edges_of(&node.id, Direction::Outgoing)
                    .into_iter()
                    .filter(|edge| edge.label == EDGE_RELATED_TO)
                    .filter(|edge| edge.string_property(PROP_NAME) == attr.name)
                    .map(|edge| edge.to_node)
                    .collect();
                if !items.is_empty() {
                    attributes.insert(attr.name.clone(), items);
                }
            } else if let Some(value) = node.get_property(&attr.name) {
                attributes.insert(attr.name.clone(), vec![value.to_string()]);
            }
        }
        let creation_date = match node.get_property(PROP_CREATION_DATE) {
            Some(Value::Timestamp(t)) => *t,
            _ => Utc::now(),
        };
        Ok(ObjectInfo {
            id: node.id.clone(),
            name: node.string_property(PROP_NAME),
            class_name: class.name,
            attributes,
            creation_date,
        })
    }

    /// Interpret and store caller-supplied attribute values on a node
    fn apply_attribute_values(
        &self,
        tx: &mut Transaction<'_>,
        class: &ClassMetadata,
        object_id: &str,
        values: &AttributeValues,
        updating: bool,
    ) -> EngineResult<()> {
        for (attr_name, raw_values) in values {
            let attr = class.attribute(attr_name).ok_or_else(|| {
                EngineError::MetadataObjectNotFound(format!(
                    "Class {} has no attribute {}",
                    class.name, attr_name
                ))
            })?;
            if updating && attr.read_only {
                return Err(EngineError::OperationNotPermitted(format!(
                    "Attribute {} of class {} is read only",
                    attr_name, class.name
                )));
            }
            match attr.mapping {
                AttributeMapping::Binary => {
                    return Err(EngineError::InvalidArgument(format!(
                        "Attribute {} is binary; use the binary attribute interface",
                        attr_name
                    )));
                }
                AttributeMapping::ManyToOne | AttributeMapping::ManyToMany => {
                    self.set_list_values(tx, attr, object_id, raw_values)?;
                }
                _ => {
                    if raw_values.is_empty() {
                        tx.remove_property(object_id, attr_name)?;
                        continue;
                    }
                    if raw_values.len() != 1 {
                        return Err(EngineError::InvalidArgument(format!(
                            "Attribute {} takes exactly one value",
                            attr_name
                        )));
                    }
                    let value = parse_attribute_value(attr, &raw_values[0])?;
                    if attr.unique && self.value_taken(tx, class, attr, &value, object_id) {
                        return Err(EngineError::InvalidArgument(format!(
                            "Value {} for unique attribute {} is already in use",
                            raw_values[0], attr_name
                        )));
                    }
                    tx.set_property(object_id, attr_name, value)?;
                }
            }
        }
        Ok(())
    }

    /// Replace the full relationship set for a list-type attribute.
    /// An empty value list deletes every existing edge and adds none.
    fn set_list_values(
        &self,
        tx: &mut Transaction<'_>,
        attr: &AttributeMetadata,
        object_id: &str,
        raw_values: &[String],
    ) -> EngineResult<()> {
        if attr.mapping == AttributeMapping::ManyToOne && raw_values.len() > 1 {
            return Err(EngineError::InvalidArgument(format!(
                "Attribute {} relates to at most one item",
                attr.name
            )));
        }
        let stale: Vec<String> = tx
            .edges_of(object_id, Direction::Outgoing)
            .into_iter()
            .filter(|edge| edge.label == EDGE_RELATED_TO)
            .filter(|edge| edge.string_property(PROP_NAME) == attr.name)
            .map(|edge| edge.id)
            .collect();
        for edge_id in stale {
            tx.delete_edge(&edge_id)?;
        }
        for item_id in raw_values {
            let item = tx
                .get_node(item_id)
                .filter(|node| node.label == NODE_OBJECT)
                .ok_or_else(|| {
                    EngineError::InvalidArgument(format!(
                        "{} is not the id of a {} item",
                        item_id, attr.value_type
                    ))
                })?;
            let item_class = self.instance_class_name(tx, &item.id).unwrap_or_default();
            if !self.cache.is_subclass(&attr.value_type, &item_class) {
                return Err(EngineError::InvalidArgument(format!(
                    "{} is a {}, not a {}",
                    item_id, item_class, attr.value_type
                )));
            }
            let mut props = HashMap::new();
            props.insert(PROP_NAME.to_string(), Value::String(attr.name.clone()));
            tx.create_edge(object_id, item_id, EDGE_RELATED_TO, props)?;
        }
        Ok(())
    }

    /// Uniqueness scan over the class and its concrete subclasses
    fn value_taken(
        &self,
        tx: &Transaction<'_>,
        class: &ClassMetadata,
        attr: &AttributeMetadata,
        value: &Value,
        exclude_id: &str,
    ) -> bool {
        for class_name in self.cache.concrete_descendants(&class.name) {
            let Some(class_node) = tx.index_lookup(NODE_CLASS, &class_name).into_iter().next()
            else {
                continue;
            };
            for edge in tx.edges_of(&class_node.id, Direction::Incoming) {
                if edge.label != EDGE_INSTANCE_OF || edge.from_node == exclude_id {
                    continue;
                }
                if let Some(instance) = tx.get_node(&edge.from_node) {
                    if instance.get_property(&attr.name) == Some(value) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

/// The synthetic top-level container every parentless object hangs off
pub(crate) fn navigation_root(tx: &Transaction<'_>) -> EngineResult<Node> {
    tx.index_scan(NODE_DUMMY_ROOT)
        .into_iter()
        .next()
        .ok_or_else(|| {
            EngineError::ApplicationObjectNotFound("Navigation root node is missing".to_string())
        })
}

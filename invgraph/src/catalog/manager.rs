// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Metadata catalog manager
//!
//! Owns every class, attribute and category operation. All mutations run
//! inside one store transaction; the matching cache patch is applied only
//! after the commit succeeds, so readers never observe uncommitted schema.
//!
//! A new class materializes copies of every ancestor attribute definition
//! instead of referencing them. Later edits to an ancestor attribute must
//! not retroactively change descendants; the copy at creation time is the
//! contract, not an optimization.

use crate::cache::MetadataCache;
use crate::catalog::types::*;
use crate::error::{EngineError, EngineResult};
use crate::storage::{Direction, GraphStore, Node, Transaction, Value};
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// Catalog operations over classes, attributes and categories
pub struct MetadataManager {
    store: Arc<GraphStore>,
    cache: Arc<MetadataCache>,
}

impl MetadataManager {
    pub fn new(store: Arc<GraphStore>, cache: Arc<MetadataCache>) -> Self {
        Self { store, cache }
    }

    /// Create a class, copying every ancestor attribute onto it
    pub fn create_class(&self, def: ClassDefinition) -> EngineResult<String> {
        let mut tx = self.store.begin();

        if let Some(existing) = class_node_by_name(&tx, &def.name) {
            // Root creation is idempotent-guarded; everything else is a clash
            if def.parent_name.is_none() && def.name == ROOT_CLASS {
                return Ok(existing.id);
            }
            return Err(EngineError::InvalidArgument(format!(
                "A class named {} already exists",
                def.name
            )));
        }

        let parent_node = match &def.parent_name {
            None => {
                if def.name != ROOT_CLASS {
                    return Err(EngineError::InvalidArgument(format!(
                        "Only {} may be created without a parent",
                        ROOT_CLASS
                    )));
                }
                None
            }
            Some(parent_name) => Some(class_node_by_name(&tx, parent_name).ok_or_else(|| {
                EngineError::MetadataObjectNotFound(format!("Class {} not found", parent_name))
            })?),
        };

        // Effective attribute set: ancestor copies first, own definitions after
        let inherited = match &parent_node {
            Some(parent) => class_attributes(&tx, &parent.id),
            None => Vec::new(),
        };
        let mut attribute_names: Vec<String> =
            inherited.iter().map(|attr| attr.name.clone()).collect();
        for own in &def.attributes {
            if attribute_names.contains(&own.name) {
                return Err(EngineError::InvalidArgument(format!(
                    "Attribute {} is already defined on an ancestor of {}",
                    own.name, def.name
                )));
            }
            attribute_names.push(own.name.clone());
            validate_attribute_mapping(&tx, own.mapping, &own.value_type)?;
        }

        let now = Utc::now();
        let mut props = HashMap::new();
        props.insert(PROP_NAME.to_string(), Value::String(def.name.clone()));
        props.insert("abstract".to_string(), Value::Boolean(def.is_abstract));
        props.insert("custom".to_string(), Value::Boolean(def.is_custom));
        props.insert("countable".to_string(), Value::Boolean(def.is_countable));
        if let Some(color) = &def.color {
            props.insert("color".to_string(), Value::String(color.clone()));
        }
        if let Some(icon) = &def.icon {
            props.insert("icon".to_string(), Value::String(icon.clone()));
        }
        props.insert(PROP_CREATION_DATE.to_string(), Value::Timestamp(now));
        let class_id = tx.create_node(NODE_CLASS, props);

        if let Some(parent) = &parent_node {
            tx.create_edge(&class_id, &parent.id, EDGE_EXTENDS, HashMap::new())?;
        }

        if let Some(category_name) = &def.category {
            let category = category_node_by_name(&tx, category_name).ok_or_else(|| {
                EngineError::MetadataObjectNotFound(format!(
                    "Category {} not found",
                    category_name
                ))
            })?;
            tx.create_edge(&class_id, &category.id, EDGE_BELONGS_TO_CATEGORY, HashMap::new())?;
        }

        for attr in &inherited {
            let attr_id = tx.create_node(NODE_ATTRIBUTE, attribute_node_props(attr));
            tx.create_edge(&class_id, &attr_id, EDGE_HAS_ATTRIBUTE, HashMap::new())?;
        }
        for own in &def.attributes {
            let attr = AttributeMetadata {
                id: String::new(), // the attribute node's id serves as the id
                name: own.name.clone(),
                display_name: own.display_name.clone().unwrap_or_else(|| own.name.clone()),
                value_type: own.value_type.clone(),
                mapping: own.mapping,
                visible: own.visible,
                administrative: own.administrative,
                read_only: own.read_only,
                no_copy: own.no_copy,
                no_serialize: own.no_serialize,
                unique: own.unique,
                creation_date: now,
            };
            let attr_id = tx.create_node(NODE_ATTRIBUTE, attribute_node_props(&attr));
            tx.create_edge(&class_id, &attr_id, EDGE_HAS_ATTRIBUTE, HashMap::new())?;
        }

        let class_node = tx.get_node(&class_id).ok_or_else(|| {
            EngineError::MetadataObjectNotFound(format!("Class with id {} not found", class_id))
        })?;
        let metadata = class_metadata_at(&tx, &class_node);
        tx.commit()?;

        log::debug!("created class {} ({})", metadata.name, class_id);
        self.cache.put_class(metadata);
        if !def.is_abstract {
            self.patch_inherited_containment(&def.name);
        }
        Ok(class_id)
    }

    /// A freshly created concrete class becomes coverable under every
    /// parent whose rules name one of its ancestors
    fn patch_inherited_containment(&self, class_name: &str) {
        let tx = self.store.begin();
        let mut current = class_node_by_name(&tx, class_name)
            .and_then(|node| parent_class_node(&tx, &node.id));
        while let Some(ancestor) = current {
            for edge in tx.edges_of(&ancestor.id, Direction::Incoming) {
                if edge.label != EDGE_POSSIBLE_CHILD {
                    continue;
                }
                if let Some(rule_parent) = tx.get_node(&edge.from_node) {
                    let key = containment_key(&rule_parent);
                    self.cache
                        .add_possible_children(&key, vec![class_name.to_string()]);
                }
            }
            current = parent_class_node(&tx, &ancestor.id);
        }
    }

    /// Update class properties; renaming re-keys the cache
    pub fn change_class_definition(&self, class_id: &str, update: ClassUpdate) -> EngineResult<()> {
        let mut tx = self.store.begin();
        let node = class_node_by_id(&tx, class_id)?;
        let old_name = node.string_property(PROP_NAME);
        let was_abstract = node.bool_property("abstract");

        let renamed = match &update.name {
            Some(new_name) if *new_name != old_name => {
                if is_core_class(&old_name) {
                    return Err(EngineError::OperationNotPermitted(format!(
                        "Core class {} cannot be renamed",
                        old_name
                    )));
                }
                if class_node_by_name(&tx, new_name).is_some() {
                    return Err(EngineError::InvalidArgument(format!(
                        "A class named {} already exists",
                        new_name
                    )));
                }
                tx.set_property(class_id, PROP_NAME, Value::String(new_name.clone()))?;
                true
            }
            _ => false,
        };

        if let Some(is_abstract) = update.is_abstract {
            if is_abstract && !was_abstract && has_instances(&tx, class_id) {
                return Err(EngineError::OperationNotPermitted(format!(
                    "Class {} has instances and cannot be made abstract",
                    old_name
                )));
            }
            tx.set_property(class_id, "abstract", Value::Boolean(is_abstract))?;
        }
        if let Some(is_custom) = update.is_custom {
            tx.set_property(class_id, "custom", Value::Boolean(is_custom))?;
        }
        if let Some(is_countable) = update.is_countable {
            tx.set_property(class_id, "countable", Value::Boolean(is_countable))?;
        }
        if let Some(color) = &update.color {
            tx.set_property(class_id, "color", Value::String(color.clone()))?;
        }
        if let Some(icon) = &update.icon {
            tx.set_property(class_id, "icon", Value::String(icon.clone()))?;
        }
        if let Some(category_name) = &update.category {
            let category = category_node_by_name(&tx, category_name).ok_or_else(|| {
                EngineError::MetadataObjectNotFound(format!(
                    "Category {} not found",
                    category_name
                ))
            })?;
            let existing: Vec<String> = tx
                .edges_of(class_id, Direction::Outgoing)
                .into_iter()
                .filter(|edge| edge.label == EDGE_BELONGS_TO_CATEGORY)
                .map(|edge| edge.id)
                .collect();
            for edge_id in existing {
                tx.delete_edge(&edge_id)?;
            }
            tx.create_edge(class_id, &category.id, EDGE_BELONGS_TO_CATEGORY, HashMap::new())?;
        }

        tx.commit()?;

        let abstract_changed = update.is_abstract.map_or(false, |a| a != was_abstract);
        if renamed {
            let new_name = update.name.as_deref().unwrap_or(&old_name);
            self.cache.rename_class(&old_name, new_name);
        }
        if abstract_changed {
            // Flattened child sets depend on which classes are concrete
            self.cache.load(&self.store)?;
        } else {
            self.refresh_cached_class(class_id);
        }
        Ok(())
    }

    /// Delete a class, its owned attribute nodes and all of its edges
    pub fn delete_class(&self, name: &str) -> EngineResult<()> {
        let tx = self.store.begin();
        let node = class_node_by_name(&tx, name).ok_or_else(|| {
            EngineError::MetadataObjectNotFound(format!("Class {} not found", name))
        })?;
        let id = node.id.clone();
        drop(tx);
        self.delete_class_with_id(&id)
    }

    pub fn delete_class_with_id(&self, class_id: &str) -> EngineResult<()> {
        let mut tx = self.store.begin();
        let node = class_node_by_id(&tx, class_id)?;
        let name = node.string_property(PROP_NAME);

        if is_core_class(&name) {
            return Err(EngineError::OperationNotPermitted(format!(
                "Core class {} cannot be deleted",
                name
            )));
        }
        let has_subclasses = tx
            .edges_of(class_id, Direction::Incoming)
            .iter()
            .any(|edge| edge.label == EDGE_EXTENDS);
        if has_subclasses {
            return Err(EngineError::OperationNotPermitted(format!(
                "Class {} still has subclasses",
                name
            )));
        }
        if has_instances(&tx, class_id) {
            return Err(EngineError::OperationNotPermitted(format!(
                "Class {} still has instances",
                name
            )));
        }

        let attribute_ids: Vec<String> = tx
            .edges_of(class_id, Direction::Outgoing)
            .into_iter()
            .filter(|edge| edge.label == EDGE_HAS_ATTRIBUTE)
            .map(|edge| edge.to_node)
            .collect();
        for attr_id in attribute_ids {
            tx.delete_node(&attr_id)?;
        }
        tx.delete_node(class_id)?;
        tx.commit()?;

        log::debug!("deleted class {} ({})", name, class_id);
        self.cache.remove_class(&name);
        Ok(())
    }

    /// Add an attribute to a class (does not propagate to subclasses)
    pub fn add_attribute(&self, class_name: &str, def: AttributeDefinition) -> EngineResult<()> {
        let mut tx = self.store.begin();
        let class_node = class_node_by_name(&tx, class_name).ok_or_else(|| {
            EngineError::MetadataObjectNotFound(format!("Class {} not found", class_name))
        })?;

        if class_attributes(&tx, &class_node.id)
            .iter()
            .any(|attr| attr.name == def.name)
        {
            return Err(EngineError::InvalidArgument(format!(
                "Attribute {} already exists on class {}",
                def.name, class_name
            )));
        }
        validate_attribute_mapping(&tx, def.mapping, &def.value_type)?;

        let attr = AttributeMetadata {
            id: String::new(),
            name: def.name.clone(),
            display_name: def.display_name.clone().unwrap_or_else(|| def.name.clone()),
            value_type: def.value_type.clone(),
            mapping: def.mapping,
            visible: def.visible,
            administrative: def.administrative,
            read_only: def.read_only,
            no_copy: def.no_copy,
            no_serialize: def.no_serialize,
            unique: def.unique,
            creation_date: Utc::now(),
        };
        let attr_id = tx.create_node(NODE_ATTRIBUTE, attribute_node_props(&attr));
        tx.create_edge(&class_node.id, &attr_id, EDGE_HAS_ATTRIBUTE, HashMap::new())?;
        let class_id = class_node.id.clone();
        tx.commit()?;

        self.refresh_cached_class(&class_id);
        Ok(())
    }

    /// Update a direct attribute of a class; inherited copies on
    /// descendants are left untouched
    pub fn change_attribute_definition(
        &self,
        class_name: &str,
        attribute_name: &str,
        update: AttributeUpdate,
    ) -> EngineResult<()> {
        let mut tx = self.store.begin();
        let class_node = class_node_by_name(&tx, class_name).ok_or_else(|| {
            EngineError::MetadataObjectNotFound(format!("Class {} not found", class_name))
        })?;
        let attrs = class_attributes(&tx, &class_node.id);
        let attr = attrs
            .iter()
            .find(|attr| attr.name == attribute_name)
            .ok_or_else(|| {
                EngineError::MetadataObjectNotFound(format!(
                    "Attribute {} not found on class {}",
                    attribute_name, class_name
                ))
            })?;

        if let Some(new_name) = &update.name {
            if new_name != attribute_name && attrs.iter().any(|a| a.name == *new_name) {
                return Err(EngineError::InvalidArgument(format!(
                    "Attribute {} already exists on class {}",
                    new_name, class_name
                )));
            }
        }
        let mapping = update.mapping.unwrap_or(attr.mapping);
        let value_type = update.value_type.clone().unwrap_or_else(|| attr.value_type.clone());
        validate_attribute_mapping(&tx, mapping, &value_type)?;

        let attr_id = attr.id.clone();
        if let Some(new_name) = &update.name {
            tx.set_property(&attr_id, PROP_NAME, Value::String(new_name.clone()))?;
        }
        if let Some(display_name) = &update.display_name {
            tx.set_property(&attr_id, "display_name", Value::String(display_name.clone()))?;
        }
        if update.value_type.is_some() {
            tx.set_property(&attr_id, "type", Value::String(value_type))?;
        }
        if update.mapping.is_some() {
            tx.set_property(&attr_id, "mapping", Value::String(mapping.as_str().to_string()))?;
        }
        for (key, flag) in [
            ("visible", update.visible),
            ("administrative", update.administrative),
            ("read_only", update.read_only),
            ("no_copy", update.no_copy),
            ("no_serialize", update.no_serialize),
            ("unique", update.unique),
        ] {
            if let Some(flag) = flag {
                tx.set_property(&attr_id, key, Value::Boolean(flag))?;
            }
        }
        let class_id = class_node.id.clone();
        tx.commit()?;

        self.refresh_cached_class(&class_id);
        Ok(())
    }

    /// Remove a direct attribute of a class
    pub fn delete_attribute(&self, class_name: &str, attribute_name: &str) -> EngineResult<()> {
        let mut tx = self.store.begin();
        let class_node = class_node_by_name(&tx, class_name).ok_or_else(|| {
            EngineError::MetadataObjectNotFound(format!("Class {} not found", class_name))
        })?;
        let attr = class_attributes(&tx, &class_node.id)
            .into_iter()
            .find(|attr| attr.name == attribute_name)
            .ok_or_else(|| {
                EngineError::MetadataObjectNotFound(format!(
                    "Attribute {} not found on class {}",
                    attribute_name, class_name
                ))
            })?;
        tx.delete_node(&attr.id)?;
        let class_id = class_node.id.clone();
        tx.commit()?;

        self.refresh_cached_class(&class_id);
        Ok(())
    }

    /// Full class definition with resolved attributes
    pub fn get_class(&self, name: &str) -> EngineResult<ClassMetadata> {
        self.cache.get_class(name).ok_or_else(|| {
            EngineError::MetadataObjectNotFound(format!("Class {} not found", name))
        })
    }

    pub fn get_class_with_id(&self, class_id: &str) -> EngineResult<ClassMetadata> {
        let tx = self.store.begin();
        let node = class_node_by_id(&tx, class_id)?;
        Ok(class_metadata_at(&tx, &node))
    }

    /// Lightweight summaries of every business-object class
    ///
    /// Lexicographic by name, except the business-object root is pinned
    /// first; peripheral callers rely on that ordering.
    pub fn get_light_metadata(&self, include_list_types: bool) -> Vec<ClassMetadataLight> {
        self.listed_classes(include_list_types)
            .into_iter()
            .map(|class| class.to_light())
            .collect()
    }

    /// Full definitions, same ordering contract as get_light_metadata
    pub fn get_metadata(&self, include_list_types: bool) -> Vec<ClassMetadata> {
        self.listed_classes(include_list_types)
    }

    fn listed_classes(&self, include_list_types: bool) -> Vec<ClassMetadata> {
        let mut classes: Vec<ClassMetadata> = Vec::new();
        for class in self.all_cached_classes() {
            let in_inventory = self.cache.is_subclass(INVENTORY_OBJECT, &class.name);
            let in_list_types = self.cache.is_subclass(GENERIC_OBJECT_LIST, &class.name);
            if in_inventory || (include_list_types && in_list_types) {
                classes.push(class);
            }
        }
        classes.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(pos) = classes.iter().position(|c| c.name == INVENTORY_OBJECT) {
            let root = classes.remove(pos);
            classes.insert(0, root);
        }
        classes
    }

    fn all_cached_classes(&self) -> Vec<ClassMetadata> {
        self.cache.all_classes()
    }

    /// Create a category
    pub fn create_category(&self, def: CategoryDefinition) -> EngineResult<String> {
        let mut tx = self.store.begin();
        if category_node_by_name(&tx, &def.name).is_some() {
            return Err(EngineError::InvalidArgument(format!(
                "A category named {} already exists",
                def.name
            )));
        }
        let mut props = HashMap::new();
        props.insert(PROP_NAME.to_string(), Value::String(def.name.clone()));
        props.insert(
            "display_name".to_string(),
            Value::String(def.display_name.unwrap_or_else(|| def.name.clone())),
        );
        props.insert(
            "description".to_string(),
            Value::String(def.description.unwrap_or_default()),
        );
        props.insert(PROP_CREATION_DATE.to_string(), Value::Timestamp(Utc::now()));
        let id = tx.create_node(NODE_CATEGORY, props);
        tx.commit()?;
        Ok(id)
    }

    pub fn get_category(&self, name: &str) -> EngineResult<Category> {
        let tx = self.store.begin();
        let node = category_node_by_name(&tx, name).ok_or_else(|| {
            EngineError::MetadataObjectNotFound(format!("Category {} not found", name))
        })?;
        Ok(category_from_node(&node))
    }

    pub fn change_category_definition(
        &self,
        category_id: &str,
        update: CategoryUpdate,
    ) -> EngineResult<()> {
        let mut tx = self.store.begin();
        let node = tx
            .get_node(category_id)
            .filter(|node| node.label == NODE_CATEGORY)
            .ok_or_else(|| {
                EngineError::MetadataObjectNotFound(format!(
                    "Category with id {} not found",
                    category_id
                ))
            })?;
        let old_name = node.string_property(PROP_NAME);
        let renamed = match &update.name {
            Some(name) if *name != old_name => {
                if category_node_by_name(&tx, name).is_some() {
                    return Err(EngineError::InvalidArgument(format!(
                        "A category named {} already exists",
                        name
                    )));
                }
                tx.set_property(category_id, PROP_NAME, Value::String(name.clone()))?;
                true
            }
            _ => false,
        };
        if let Some(display_name) = &update.display_name {
            tx.set_property(category_id, "display_name", Value::String(display_name.clone()))?;
        }
        if let Some(description) = &update.description {
            tx.set_property(category_id, "description", Value::String(description.clone()))?;
        }
        tx.commit()?;

        if renamed {
            if let Some(new_name) = &update.name {
                self.cache.rename_category(&old_name, new_name);
            }
        }
        Ok(())
    }

    fn refresh_cached_class(&self, class_id: &str) {
        let tx = self.store.begin();
        if let Some(node) = tx.get_node(class_id) {
            self.cache.put_class(class_metadata_at(&tx, &node));
        }
    }
}

/// Core classes are bootstrapped and immutable
fn is_core_class(name: &str) -> bool {
    matches!(name, ROOT_CLASS | INVENTORY_OBJECT | GENERIC_OBJECT_LIST)
}

pub(crate) fn class_node_by_name(tx: &Transaction<'_>, name: &str) -> Option<Node> {
    tx.index_lookup(NODE_CLASS, name).into_iter().next()
}

fn class_node_by_id(tx: &Transaction<'_>, class_id: &str) -> EngineResult<Node> {
    tx.get_node(class_id)
        .filter(|node| node.label == NODE_CLASS)
        .ok_or_else(|| {
            EngineError::MetadataObjectNotFound(format!("Class with id {} not found", class_id))
        })
}

fn category_node_by_name(tx: &Transaction<'_>, name: &str) -> Option<Node> {
    tx.index_lookup(NODE_CATEGORY, name).into_iter().next()
}

fn has_instances(tx: &Transaction<'_>, class_id: &str) -> bool {
    tx.edges_of(class_id, Direction::Incoming)
        .iter()
        .any(|edge| edge.label == EDGE_INSTANCE_OF)
}

/// Parent class node following the EXTENDS edge, if any
pub(crate) fn parent_class_node(tx: &Transaction<'_>, class_id: &str) -> Option<Node> {
    tx.edges_of(class_id, Direction::Outgoing)
        .into_iter()
        .find(|edge| edge.label == EDGE_EXTENDS)
        .and_then(|edge| tx.get_node(&edge.to_node))
}

/// Direct attribute definitions of a class, ordered by name
pub(crate) fn class_attributes(tx: &Transaction<'_>, class_id: &str) -> Vec<AttributeMetadata> {
    let mut attrs: Vec<AttributeMetadata> = tx
        .edges_of(class_id, Direction::Outgoing)
        .into_iter()
        .filter(|edge| edge.label == EDGE_HAS_ATTRIBUTE)
        .filter_map(|edge| tx.get_node(&edge.to_node))
        .map(|node| attribute_from_node(&node))
        .collect();
    attrs.sort_by(|a, b| a.name.cmp(&b.name));
    attrs
}

/// Check subclass relationship by walking EXTENDS edges in-transaction
pub(crate) fn is_subclass_at(tx: &Transaction<'_>, ancestor: &str, name: &str) -> bool {
    let Some(mut current) = class_node_by_name(tx, name) else {
        return false;
    };
    loop {
        if current.string_property(PROP_NAME) == ancestor {
            return true;
        }
        match parent_class_node(tx, &current.id) {
            Some(parent) => current = parent,
            None => return false,
        }
    }
}

/// Concrete classes at or below the given class node, by name
pub(crate) fn concrete_descendants_at(tx: &Transaction<'_>, class_id: &str) -> Vec<Node> {
    let mut result = Vec::new();
    let mut stack = vec![class_id.to_string()];
    while let Some(current) = stack.pop() {
        if let Some(node) = tx.get_node(&current) {
            if !node.bool_property("abstract") {
                result.push(node.clone());
            }
        }
        for edge in tx.edges_of(&current, Direction::Incoming) {
            if edge.label == EDGE_EXTENDS {
                stack.push(edge.from_node);
            }
        }
    }
    result
}

/// Cache key a rule parent is filed under
pub(crate) fn containment_key(parent: &Node) -> String {
    if parent.label == NODE_DUMMY_ROOT {
        DUMMY_ROOT.to_string()
    } else {
        parent.string_property(PROP_NAME)
    }
}

fn validate_attribute_mapping(
    tx: &Transaction<'_>,
    mapping: AttributeMapping,
    value_type: &str,
) -> EngineResult<()> {
    if matches!(mapping, AttributeMapping::ManyToOne | AttributeMapping::ManyToMany) {
        if class_node_by_name(tx, value_type).is_none() {
            return Err(EngineError::MetadataObjectNotFound(format!(
                "List type class {} not found",
                value_type
            )));
        }
        if !is_subclass_at(tx, GENERIC_OBJECT_LIST, value_type) {
            return Err(EngineError::InvalidArgument(format!(
                "{} is not a subclass of {} and cannot back a list-type attribute",
                value_type, GENERIC_OBJECT_LIST
            )));
        }
    }
    Ok(())
}

fn attribute_node_props(attr: &AttributeMetadata) -> HashMap<String, Value> {
    let mut props = HashMap::new();
    props.insert(PROP_NAME.to_string(), Value::String(attr.name.clone()));
    props.insert(
        "display_name".to_string(),
        Value::String(attr.display_name.clone()),
    );
    props.insert("type".to_string(), Value::String(attr.value_type.clone()));
    props.insert(
        "mapping".to_string(),
        Value::String(attr.mapping.as_str().to_string()),
    );
    props.insert("visible".to_string(), Value::Boolean(attr.visible));
    props.insert(
        "administrative".to_string(),
        Value::Boolean(attr.administrative),
    );
    props.insert("read_only".to_string(), Value::Boolean(attr.read_only));
    props.insert("no_copy".to_string(), Value::Boolean(attr.no_copy));
    props.insert("no_serialize".to_string(), Value::Boolean(attr.no_serialize));
    props.insert("unique".to_string(), Value::Boolean(attr.unique));
    props.insert(
        PROP_CREATION_DATE.to_string(),
        Value::Timestamp(attr.creation_date),
    );
    props
}

fn attribute_from_node(node: &Node) -> AttributeMetadata {
    AttributeMetadata {
        id: node.id.clone(),
        name: node.string_property(PROP_NAME),
        display_name: node.string_property("display_name"),
        value_type: node.string_property("type"),
        mapping: AttributeMapping::parse(&node.string_property("mapping"))
            .unwrap_or(AttributeMapping::Primitive),
        visible: node.bool_property("visible"),
        administrative: node.bool_property("administrative"),
        read_only: node.bool_property("read_only"),
        no_copy: node.bool_property("no_copy"),
        no_serialize: node.bool_property("no_serialize"),
        unique: node.bool_property("unique"),
        creation_date: timestamp_property(node, PROP_CREATION_DATE),
    }
}

/// Resolve a class node into its full metadata record
pub(crate) fn class_metadata_at(tx: &Transaction<'_>, node: &Node) -> ClassMetadata {
    let parent_name =
        parent_class_node(tx, &node.id).map(|parent| parent.string_property(PROP_NAME));
    let category = tx
        .edges_of(&node.id, Direction::Outgoing)
        .into_iter()
        .find(|edge| edge.label == EDGE_BELONGS_TO_CATEGORY)
        .and_then(|edge| tx.get_node(&edge.to_node))
        .map(|category| category.string_property(PROP_NAME));

    ClassMetadata {
        id: node.id.clone(),
        name: node.string_property(PROP_NAME),
        parent_name,
        is_abstract: node.bool_property("abstract"),
        is_custom: node.bool_property("custom"),
        is_countable: node.bool_property("countable"),
        color: node.get_property("color").map(|v| v.to_string()),
        icon: node.get_property("icon").map(|v| v.to_string()),
        category,
        attributes: class_attributes(tx, &node.id),
        creation_date: timestamp_property(node, PROP_CREATION_DATE),
    }
}

fn category_from_node(node: &Node) -> Category {
    Category {
        id: node.id.clone(),
        name: node.string_property(PROP_NAME),
        display_name: node.string_property("display_name"),
        description: node.string_property("description"),
        creation_date: timestamp_property(node, PROP_CREATION_DATE),
    }
}

fn timestamp_property(node: &Node, key: &str) -> chrono::DateTime<Utc> {
    match node.get_property(key) {
        Some(Value::Timestamp(t)) => *t,
        _ => Utc.timestamp_opt(0, 0).single().unwrap_or_else(Utc::now),
    }
}

/// Scan the whole catalog for a cache rebuild: every class definition and
/// every containment rule as (parent key, child class name) pairs
pub(crate) fn scan_catalog(
    store: &GraphStore,
) -> EngineResult<(Vec<ClassMetadata>, Vec<(String, String)>)> {
    let tx = store.begin();
    let class_nodes = tx.index_scan(NODE_CLASS);
    let classes: Vec<ClassMetadata> = class_nodes
        .iter()
        .map(|node| class_metadata_at(&tx, node))
        .collect();

    let mut rules: Vec<(String, String)> = Vec::new();
    let mut rule_parents = class_nodes;
    rule_parents.extend(tx.index_scan(NODE_DUMMY_ROOT));
    for parent in &rule_parents {
        for edge in tx.edges_of(&parent.id, Direction::Outgoing) {
            if edge.label != EDGE_POSSIBLE_CHILD {
                continue;
            }
            if let Some(child) = tx.get_node(&edge.to_node) {
                rules.push((containment_key(parent), child.string_property(PROP_NAME)));
            }
        }
    }
    Ok((classes, rules))
}

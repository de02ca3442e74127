// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Containment rules
//!
//! A rule says "instances of parent may contain instances of child".
//! Rule targets may be abstract; the cache flattens them to the concrete
//! classes they cover. Two rules on the same parent must never cover the
//! same concrete class, so removing a rule can simply drop its expansion
//! from the flattened set.

use crate::cache::MetadataCache;
use crate::catalog::manager::{
    class_node_by_name, concrete_descendants_at, containment_key, is_subclass_at,
};
use crate::catalog::types::*;
use crate::error::{EngineError, EngineResult};
use crate::storage::{Direction, GraphStore, Node, Transaction};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Containment rule operations
pub struct ContainmentManager {
    store: Arc<GraphStore>,
    cache: Arc<MetadataCache>,
}

impl ContainmentManager {
    pub fn new(store: Arc<GraphStore>, cache: Arc<MetadataCache>) -> Self {
        Self { store, cache }
    }

    /// Declare that `parent` (or the navigation root, when None) may
    /// contain instances of each class in `children`
    pub fn add_possible_children(
        &self,
        parent: Option<&str>,
        children: &[String],
    ) -> EngineResult<()> {
        let mut tx = self.store.begin();
        let parent_node = resolve_parent(&tx, parent)?;
        let key = containment_key(&parent_node);
        if parent_node.label == NODE_CLASS && !is_subclass_at(&tx, INVENTORY_OBJECT, &key) {
            return Err(EngineError::InvalidArgument(format!(
                "{} is not a business-object class and cannot declare children",
                key
            )));
        }

        // Concrete classes already covered by this parent's rules
        let mut covered = BTreeSet::new();
        for target in declared_targets(&tx, &parent_node.id) {
            for node in concrete_descendants_at(&tx, &target.id) {
                covered.insert(node.string_property(PROP_NAME));
            }
        }

        let mut added_concrete: Vec<String> = Vec::new();
        for child in children {
            let child_node = class_node_by_name(&tx, child).ok_or_else(|| {
                EngineError::MetadataObjectNotFound(format!("Class {} not found", child))
            })?;
            if !is_subclass_at(&tx, INVENTORY_OBJECT, child) {
                return Err(EngineError::InvalidArgument(format!(
                    "{} is not a business-object class and cannot be a possible child",
                    child
                )));
            }
            for node in concrete_descendants_at(&tx, &child_node.id) {
                let name = node.string_property(PROP_NAME);
                if !covered.insert(name.clone()) {
                    return Err(EngineError::InvalidArgument(format!(
                        "{} is already a possible child of {} through another rule",
                        name, key
                    )));
                }
                added_concrete.push(name);
            }
            tx.create_edge(
                &parent_node.id,
                &child_node.id,
                EDGE_POSSIBLE_CHILD,
                Default::default(),
            )?;
        }
        tx.commit()?;

        log::debug!("containment: {} may now contain {:?}", key, children);
        self.cache.add_possible_children(&key, added_concrete);
        Ok(())
    }

    /// Retract previously declared rules. Each name must match a declared
    /// rule target, not a class merely covered through an abstract target
    pub fn remove_possible_children(
        &self,
        parent: Option<&str>,
        children: &[String],
    ) -> EngineResult<()> {
        let mut tx = self.store.begin();
        let parent_node = resolve_parent(&tx, parent)?;
        let key = containment_key(&parent_node);

        let mut removed_concrete: Vec<String> = Vec::new();
        for child in children {
            let edge = tx
                .edges_of(&parent_node.id, Direction::Outgoing)
                .into_iter()
                .filter(|edge| edge.label == EDGE_POSSIBLE_CHILD)
                .find(|edge| {
                    tx.get_node(&edge.to_node)
                        .map_or(false, |node| node.string_property(PROP_NAME) == *child)
                })
                .ok_or_else(|| {
                    EngineError::MetadataObjectNotFound(format!(
                        "{} is not a declared possible child of {}",
                        child, key
                    ))
                })?;
            if let Some(target) = tx.get_node(&edge.to_node) {
                for node in concrete_descendants_at(&tx, &target.id) {
                    removed_concrete.push(node.string_property(PROP_NAME));
                }
            }
            tx.delete_edge(&edge.id)?;
        }
        tx.commit()?;

        self.cache.remove_possible_children(&key, &removed_concrete);
        Ok(())
    }

    /// Concrete classes instances of `parent` may contain, grouped by
    /// declared rule target in name order: each target is followed by
    /// its concrete expansion, the target itself first when concrete
    pub fn get_possible_children(
        &self,
        parent: Option<&str>,
    ) -> EngineResult<Vec<ClassMetadataLight>> {
        let tx = self.store.begin();
        let parent_node = resolve_parent(&tx, parent)?;
        let mut targets = declared_targets(&tx, &parent_node.id);
        targets.sort_by_key(|node| node.string_property(PROP_NAME));

        let mut seen = BTreeSet::new();
        let mut children = Vec::new();
        for target in &targets {
            let mut members = concrete_descendants_at(&tx, &target.id);
            members.sort_by_key(|node| node.string_property(PROP_NAME));
            if let Some(pos) = members.iter().position(|node| node.id == target.id) {
                let own = members.remove(pos);
                members.insert(0, own);
            }
            for member in members {
                if seen.insert(member.id.clone()) {
                    children.push(light_from_node(&member));
                }
            }
        }
        Ok(children)
    }

    /// Declared rule targets as written, abstract targets included
    pub fn get_possible_children_no_recursive(
        &self,
        parent: Option<&str>,
    ) -> EngineResult<Vec<ClassMetadataLight>> {
        let tx = self.store.begin();
        let parent_node = resolve_parent(&tx, parent)?;
        let mut targets: Vec<ClassMetadataLight> = declared_targets(&tx, &parent_node.id)
            .iter()
            .map(light_from_node)
            .collect();
        targets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(targets)
    }

    /// Check a single containment pair against the flattened rules
    pub fn can_contain(&self, parent: Option<&str>, child: &str) -> bool {
        self.cache
            .can_contain(parent.unwrap_or(DUMMY_ROOT), child)
    }
}

/// Rule parents are class nodes or the navigation dummy root
fn resolve_parent(tx: &Transaction<'_>, parent: Option<&str>) -> EngineResult<Node> {
    match parent {
        Some(name) if name != DUMMY_ROOT => class_node_by_name(tx, name).ok_or_else(|| {
            EngineError::MetadataObjectNotFound(format!("Class {} not found", name))
        }),
        _ => tx
            .index_scan(NODE_DUMMY_ROOT)
            .into_iter()
            .next()
            .ok_or_else(|| {
                EngineError::ApplicationObjectNotFound(
                    "Navigation root node is missing".to_string(),
                )
            }),
    }
}

fn light_from_node(node: &Node) -> ClassMetadataLight {
    ClassMetadataLight {
        id: node.id.clone(),
        name: node.string_property(PROP_NAME),
        is_abstract: node.bool_property("abstract"),
        is_custom: node.bool_property("custom"),
    }
}

fn declared_targets(tx: &Transaction<'_>, parent_id: &str) -> Vec<Node> {
    tx.edges_of(parent_id, Direction::Outgoing)
        .into_iter()
        .filter(|edge| edge.label == EDGE_POSSIBLE_CHILD)
        .filter_map(|edge| tx.get_node(&edge.to_node))
        .collect()
}

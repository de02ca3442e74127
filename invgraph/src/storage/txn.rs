// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Transactions over the shared graph
//!
//! A transaction stages node and edge mutations in an overlay. Reads
//! inside the transaction see base-plus-overlay; nothing becomes visible
//! to other callers before `commit`, which applies the whole staged set
//! under a single write lock. Dropping a transaction without committing
//! discards every staged change.

use crate::storage::graph::INDEXED_PROPERTY;
use crate::storage::store::GraphStore;
use crate::storage::types::{Direction, Edge, GraphError, Node};
use crate::storage::value::Value;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// A staged unit of work against a [`GraphStore`]
pub struct Transaction<'a> {
    store: &'a GraphStore,
    /// New or modified nodes, by id
    dirty: HashMap<String, Node>,
    /// Subset of `dirty` that does not exist in the base graph yet
    new_nodes: HashSet<String>,
    /// Base nodes staged for deletion
    deleted_nodes: HashSet<String>,
    /// Edges created in this transaction, by id
    added_edges: HashMap<String, Edge>,
    /// Base edges staged for deletion
    deleted_edges: HashSet<String>,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(store: &'a GraphStore) -> Self {
        Self {
            store,
            dirty: HashMap::new(),
            new_nodes: HashSet::new(),
            deleted_nodes: HashSet::new(),
            added_edges: HashMap::new(),
            deleted_edges: HashSet::new(),
        }
    }

    /// Create a node, returning its store-assigned id
    pub fn create_node(&mut self, label: &str, properties: HashMap<String, Value>) -> String {
        let id = Uuid::new_v4().to_string();
        let node = Node {
            id: id.clone(),
            label: label.to_string(),
            properties,
        };
        self.dirty.insert(id.clone(), node);
        self.new_nodes.insert(id.clone());
        id
    }

    /// Delete a node together with every edge touching it
    pub fn delete_node(&mut self, node_id: &str) -> Result<(), GraphError> {
        if self.get_node(node_id).is_none() {
            return Err(GraphError::NodeNotFound(node_id.to_string()));
        }

        let incident: Vec<String> = self
            .edges_of(node_id, Direction::Both)
            .into_iter()
            .map(|edge| edge.id)
            .collect();
        for edge_id in incident {
            self.delete_edge(&edge_id)?;
        }

        if self.new_nodes.remove(node_id) {
            self.dirty.remove(node_id);
        } else {
            self.dirty.remove(node_id);
            self.deleted_nodes.insert(node_id.to_string());
        }
        Ok(())
    }

    /// Create a directed typed edge, returning its id
    pub fn create_edge(
        &mut self,
        from: &str,
        to: &str,
        label: &str,
        properties: HashMap<String, Value>,
    ) -> Result<String, GraphError> {
        if self.get_node(from).is_none() || self.get_node(to).is_none() {
            return Err(GraphError::InvalidEdge {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        let id = Uuid::new_v4().to_string();
        let edge = Edge {
            id: id.clone(),
            from_node: from.to_string(),
            to_node: to.to_string(),
            label: label.to_string(),
            properties,
        };
        self.added_edges.insert(id.clone(), edge);
        Ok(id)
    }

    /// Delete an edge
    pub fn delete_edge(&mut self, edge_id: &str) -> Result<(), GraphError> {
        if self.added_edges.remove(edge_id).is_some() {
            return Ok(());
        }
        if self.deleted_edges.contains(edge_id) || self.store.read(|g| g.get_edge(edge_id).is_none())
        {
            return Err(GraphError::EdgeNotFound(edge_id.to_string()));
        }
        self.deleted_edges.insert(edge_id.to_string());
        Ok(())
    }

    /// Set a property on a node
    pub fn set_property(&mut self, node_id: &str, key: &str, value: Value) -> Result<(), GraphError> {
        let mut node = self
            .get_node(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;
        node.set_property(key.to_string(), value);
        self.dirty.insert(node_id.to_string(), node);
        Ok(())
    }

    /// Remove a property from a node
    pub fn remove_property(&mut self, node_id: &str, key: &str) -> Result<(), GraphError> {
        let mut node = self
            .get_node(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;
        node.remove_property(key);
        self.dirty.insert(node_id.to_string(), node);
        Ok(())
    }

    /// Get a node as seen by this transaction
    pub fn get_node(&self, node_id: &str) -> Option<Node> {
        if self.deleted_nodes.contains(node_id) {
            return None;
        }
        if let Some(node) = self.dirty.get(node_id) {
            return Some(node.clone());
        }
        self.store.read(|g| g.get_node(node_id).cloned())
    }

    /// All edges touching a node, as seen by this transaction
    pub fn edges_of(&self, node_id: &str, direction: Direction) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self.store.read(|g| {
            g.edges_of(node_id, direction)
                .into_iter()
                .filter(|edge| !self.deleted_edges.contains(&edge.id))
                .cloned()
                .collect()
        });
        edges.extend(
            self.added_edges
                .values()
                .filter(|edge| edge.touches(node_id, direction))
                .cloned(),
        );
        edges
    }

    /// Exact index lookup as seen by this transaction
    pub fn index_lookup(&self, label: &str, name: &str) -> Vec<Node> {
        let mut nodes: Vec<Node> = self.store.read(|g| {
            g.index_lookup(label, name)
                .into_iter()
                .filter(|node| {
                    !self.deleted_nodes.contains(&node.id) && !self.dirty.contains_key(&node.id)
                })
                .cloned()
                .collect()
        });
        nodes.extend(self.dirty.values().cloned().filter(|node| {
            node.label == label
                && matches!(node.get_property(INDEXED_PROPERTY), Some(Value::String(s)) if s == name)
        }));
        nodes
    }

    /// Wildcard label scan as seen by this transaction
    pub fn index_scan(&self, label: &str) -> Vec<Node> {
        let mut nodes: Vec<Node> = self.store.read(|g| {
            g.index_scan(label)
                .into_iter()
                .filter(|node| {
                    !self.deleted_nodes.contains(&node.id) && !self.dirty.contains_key(&node.id)
                })
                .cloned()
                .collect()
        });
        nodes.extend(
            self.dirty
                .values()
                .filter(|node| node.label == label)
                .cloned(),
        );
        nodes
    }

    /// Apply all staged changes atomically
    pub fn commit(self) -> Result<(), GraphError> {
        self.store.write(|g| {
            for edge_id in &self.deleted_edges {
                g.remove_edge(edge_id)?;
            }
            for node_id in &self.deleted_nodes {
                g.remove_node(node_id)?;
            }
            for (id, node) in self.dirty {
                if self.new_nodes.contains(&id) {
                    g.add_node(node)?;
                } else {
                    g.put_node(node)?;
                }
            }
            for (_, edge) in self.added_edges {
                g.add_edge(edge)?;
            }
            Ok(())
        })
    }

    /// Discard all staged changes
    pub fn rollback(self) {
        // Dropping the overlay is the rollback; nothing reached the store.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::store::GraphStore;

    fn name_props(name: &str) -> HashMap<String, Value> {
        let mut props = HashMap::new();
        props.insert(
            INDEXED_PROPERTY.to_string(),
            Value::String(name.to_string()),
        );
        props
    }

    #[test]
    fn staged_changes_invisible_until_commit() {
        let store = GraphStore::new();
        let mut tx = store.begin();
        let id = tx.create_node("class", name_props("Router"));

        assert!(tx.get_node(&id).is_some());
        assert!(store.read(|g| g.get_node(&id).is_none()));

        tx.commit().unwrap();
        assert!(store.read(|g| g.get_node(&id).is_some()));
        assert_eq!(store.read(|g| g.index_lookup("class", "Router").len()), 1);
    }

    #[test]
    fn rollback_discards_everything() {
        let store = GraphStore::new();
        let base_id = {
            let mut tx = store.begin();
            let id = tx.create_node("object", name_props("keep"));
            tx.commit().unwrap();
            id
        };

        let mut tx = store.begin();
        tx.create_node("object", name_props("doomed"));
        tx.delete_node(&base_id).unwrap();
        tx.rollback();

        assert!(store.read(|g| g.get_node(&base_id).is_some()));
        assert!(store.read(|g| g.index_lookup("object", "doomed").is_empty()));
    }

    #[test]
    fn overlay_reads_see_pending_edges() {
        let store = GraphStore::new();
        let mut tx = store.begin();
        let a = tx.create_node("object", name_props("a"));
        let b = tx.create_node("object", name_props("b"));
        let edge_id = tx
            .create_edge(&a, &b, "CHILD_OF", HashMap::new())
            .unwrap();

        let out = tx.edges_of(&a, Direction::Outgoing);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, edge_id);

        tx.delete_edge(&edge_id).unwrap();
        assert!(tx.edges_of(&a, Direction::Outgoing).is_empty());
    }

    #[test]
    fn delete_node_cascades_base_edges() {
        let store = GraphStore::new();
        let (a, b) = {
            let mut tx = store.begin();
            let a = tx.create_node("object", name_props("a"));
            let b = tx.create_node("object", name_props("b"));
            tx.create_edge(&a, &b, "RELATED_TO", HashMap::new()).unwrap();
            tx.commit().unwrap();
            (a, b)
        };

        let mut tx = store.begin();
        tx.delete_node(&a).unwrap();
        tx.commit().unwrap();

        assert!(store.read(|g| g.get_node(&a).is_none()));
        assert!(store.read(|g| g.edges_of(&b, Direction::Both).is_empty()));
    }
}

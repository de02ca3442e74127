// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory graph data with indices for fast lookups
//!
//! Provides graph storage using HashMap for nodes/edges and adjacency
//! lists for efficient traversal. Every label carries a property index
//! on `name`, mirroring the single-property indices the engine relies on
//! for class and object lookups.

use crate::storage::types::{Direction, Edge, GraphError, Node};
use crate::storage::value::Value;
use std::collections::{HashMap, HashSet};

/// Property that every label index is keyed by
pub const INDEXED_PROPERTY: &str = "name";

/// In-memory graph with label, property, and adjacency indices
#[derive(Debug, Default)]
pub struct GraphData {
    /// All nodes indexed by ID
    nodes: HashMap<String, Node>,

    /// All edges indexed by ID
    edges: HashMap<String, Edge>,

    /// Index: label -> node IDs with that label
    node_labels: HashMap<String, HashSet<String>>,

    /// Index: (label, name value) -> node IDs
    name_index: HashMap<String, HashMap<String, Vec<String>>>,

    /// Adjacency list: node_id -> outgoing edge IDs
    adjacency_out: HashMap<String, Vec<String>>,

    /// Adjacency list: node_id -> incoming edge IDs
    adjacency_in: HashMap<String, Vec<String>>,
}

impl GraphData {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.nodes.contains_key(&node.id) {
            return Err(GraphError::NodeAlreadyExists(node.id));
        }

        self.node_labels
            .entry(node.label.clone())
            .or_default()
            .insert(node.id.clone());

        if let Some(Value::String(name)) = node.get_property(INDEXED_PROPERTY) {
            self.name_index
                .entry(node.label.clone())
                .or_default()
                .entry(name.clone())
                .or_default()
                .push(node.id.clone());
        }

        self.adjacency_out.insert(node.id.clone(), Vec::new());
        self.adjacency_in.insert(node.id.clone(), Vec::new());

        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Replace a node in place, keeping its edges and refreshing the name index
    pub fn put_node(&mut self, node: Node) -> Result<(), GraphError> {
        match self.nodes.get(&node.id) {
            None => self.add_node(node),
            Some(existing) => {
                let old_name = match existing.get_property(INDEXED_PROPERTY) {
                    Some(Value::String(s)) => Some(s.clone()),
                    _ => None,
                };
                let label = existing.label.clone();
                self.unindex_name(&label, old_name.as_deref(), &node.id);

                if let Some(Value::String(name)) = node.get_property(INDEXED_PROPERTY) {
                    self.name_index
                        .entry(label)
                        .or_default()
                        .entry(name.clone())
                        .or_default()
                        .push(node.id.clone());
                }
                self.nodes.insert(node.id.clone(), node);
                Ok(())
            }
        }
    }

    /// Remove a node together with all of its incident edges
    pub fn remove_node(&mut self, node_id: &str) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;

        let label = node.label.clone();
        let name = match node.get_property(INDEXED_PROPERTY) {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        };

        let mut incident: Vec<String> = self
            .adjacency_out
            .get(node_id)
            .cloned()
            .unwrap_or_default();
        incident.extend(self.adjacency_in.get(node_id).cloned().unwrap_or_default());
        for edge_id in incident {
            // Self-loops appear in both adjacency lists
            let _ = self.remove_edge(&edge_id);
        }

        if let Some(ids) = self.node_labels.get_mut(&label) {
            ids.remove(node_id);
        }
        self.unindex_name(&label, name.as_deref(), node_id);
        self.adjacency_out.remove(node_id);
        self.adjacency_in.remove(node_id);
        self.nodes.remove(node_id);
        Ok(())
    }

    /// Add an edge to the graph
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        if self.edges.contains_key(&edge.id) {
            return Err(GraphError::EdgeAlreadyExists(edge.id));
        }
        if !self.nodes.contains_key(&edge.from_node) || !self.nodes.contains_key(&edge.to_node) {
            return Err(GraphError::InvalidEdge {
                from: edge.from_node.clone(),
                to: edge.to_node.clone(),
            });
        }

        self.adjacency_out
            .get_mut(&edge.from_node)
            .expect("adjacency list exists for every node")
            .push(edge.id.clone());
        self.adjacency_in
            .get_mut(&edge.to_node)
            .expect("adjacency list exists for every node")
            .push(edge.id.clone());

        self.edges.insert(edge.id.clone(), edge);
        Ok(())
    }

    /// Remove an edge from the graph
    pub fn remove_edge(&mut self, edge_id: &str) -> Result<(), GraphError> {
        let edge = self
            .edges
            .remove(edge_id)
            .ok_or_else(|| GraphError::EdgeNotFound(edge_id.to_string()))?;

        if let Some(out) = self.adjacency_out.get_mut(&edge.from_node) {
            out.retain(|id| id != edge_id);
        }
        if let Some(inc) = self.adjacency_in.get_mut(&edge.to_node) {
            inc.retain(|id| id != edge_id);
        }
        Ok(())
    }

    /// Get a node by ID
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get an edge by ID
    pub fn get_edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Check if a node exists
    pub fn has_node(&self, node_id: &str) -> bool {
        self.nodes.contains_key(node_id)
    }

    /// All edges touching a node in the given direction
    pub fn edges_of(&self, node_id: &str, direction: Direction) -> Vec<&Edge> {
        let mut edge_ids: Vec<&String> = Vec::new();
        if matches!(direction, Direction::Outgoing | Direction::Both) {
            if let Some(out) = self.adjacency_out.get(node_id) {
                edge_ids.extend(out.iter());
            }
        }
        if matches!(direction, Direction::Incoming | Direction::Both) {
            if let Some(inc) = self.adjacency_in.get(node_id) {
                edge_ids.extend(inc.iter());
            }
        }
        let mut seen = HashSet::new();
        edge_ids
            .into_iter()
            .filter(|id| seen.insert(id.as_str()))
            .filter_map(|id| self.edges.get(id))
            .collect()
    }

    /// Exact index lookup: nodes of `label` whose `name` equals `value`
    pub fn index_lookup(&self, label: &str, value: &str) -> Vec<&Node> {
        self.name_index
            .get(label)
            .and_then(|by_name| by_name.get(value))
            .map(|ids| ids.iter().filter_map(|id| self.nodes.get(id)).collect())
            .unwrap_or_default()
    }

    /// Wildcard index scan: all nodes carrying the given label
    pub fn index_scan(&self, label: &str) -> Vec<&Node> {
        self.node_labels
            .get(label)
            .map(|ids| ids.iter().filter_map(|id| self.nodes.get(id)).collect())
            .unwrap_or_default()
    }

    fn unindex_name(&mut self, label: &str, name: Option<&str>, node_id: &str) {
        if let Some(name) = name {
            if let Some(ids) = self
                .name_index
                .get_mut(label)
                .and_then(|by_name| by_name.get_mut(name))
            {
                ids.retain(|id| id != node_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named_node(id: &str, label: &str, name: &str) -> Node {
        let mut node = Node::new(id.to_string(), label.to_string());
        node.set_property(
            INDEXED_PROPERTY.to_string(),
            Value::String(name.to_string()),
        );
        node
    }

    #[test]
    fn index_follows_renames() {
        let mut graph = GraphData::new();
        graph.add_node(named_node("n1", "class", "Router")).unwrap();
        assert_eq!(graph.index_lookup("class", "Router").len(), 1);

        let mut renamed = graph.get_node("n1").unwrap().clone();
        renamed.set_property(
            INDEXED_PROPERTY.to_string(),
            Value::String("Switch".to_string()),
        );
        graph.put_node(renamed).unwrap();

        assert!(graph.index_lookup("class", "Router").is_empty());
        assert_eq!(graph.index_lookup("class", "Switch").len(), 1);
    }

    #[test]
    fn remove_node_drops_incident_edges() {
        let mut graph = GraphData::new();
        graph.add_node(named_node("a", "object", "a")).unwrap();
        graph.add_node(named_node("b", "object", "b")).unwrap();
        graph
            .add_edge(Edge::new(
                "e1".into(),
                "a".into(),
                "b".into(),
                "CHILD_OF".into(),
            ))
            .unwrap();

        graph.remove_node("a").unwrap();
        assert!(graph.get_edge("e1").is_none());
        assert!(graph.edges_of("b", Direction::Both).is_empty());
    }
}

// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph data structures and error types
//!
//! Defines Node and Edge structures for the in-memory graph,
//! along with error types for graph and storage operations.

use crate::storage::value::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error types for graph operations
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Edge not found: {0}")]
    EdgeNotFound(String),

    #[error("Node already exists: {0}")]
    NodeAlreadyExists(String),

    #[error("Edge already exists: {0}")]
    EdgeAlreadyExists(String),

    #[error("Invalid edge: from node {from} to node {to} - one or both nodes don't exist")]
    InvalidEdge { from: String, to: String },

    #[error("Property error: {0}")]
    PropertyError(String),
}

/// Error types for storage operations surfaced to the engine
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Edge direction relative to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

/// Graph node with id, a single label, and properties
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub properties: HashMap<String, Value>,
}

impl Node {
    /// Create a new node with the given id and label
    pub fn new(id: String, label: String) -> Self {
        Self {
            id,
            label,
            properties: HashMap::new(),
        }
    }

    /// Set a property value
    pub fn set_property(&mut self, key: String, value: Value) {
        self.properties.insert(key, value);
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Remove a property
    pub fn remove_property(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }

    /// Check if the node has a specific property
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Read a string property, empty when absent or non-string
    pub fn string_property(&self, key: &str) -> String {
        match self.properties.get(key) {
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        }
    }

    /// Read a boolean property, false when absent
    pub fn bool_property(&self, key: &str) -> bool {
        matches!(self.properties.get(key), Some(Value::Boolean(true)))
    }
}

/// Graph edge with id, from/to nodes, label, and properties
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Edge {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
    pub label: String,
    pub properties: HashMap<String, Value>,
}

impl Edge {
    /// Create a new edge
    pub fn new(id: String, from_node: String, to_node: String, label: String) -> Self {
        Self {
            id,
            from_node,
            to_node,
            label,
            properties: HashMap::new(),
        }
    }

    /// Set a property value
    pub fn set_property(&mut self, key: String, value: Value) {
        self.properties.insert(key, value);
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Read a string property, empty when absent or non-string
    pub fn string_property(&self, key: &str) -> String {
        match self.properties.get(key) {
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        }
    }

    /// Check if this edge goes from node1 to node2
    pub fn goes_from_to(&self, from: &str, to: &str) -> bool {
        self.from_node == from && self.to_node == to
    }

    /// Check if this edge touches the given node in the given direction
    pub fn touches(&self, node_id: &str, direction: Direction) -> bool {
        match direction {
            Direction::Outgoing => self.from_node == node_id,
            Direction::Incoming => self.to_node == node_id,
            Direction::Both => self.from_node == node_id || self.to_node == node_id,
        }
    }
}

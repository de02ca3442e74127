// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph storage for the object graph engine
//!
//! This module provides:
//! - Value type system for graph properties
//! - In-memory graph storage with adjacency lists and name indices
//! - Transactions with staged overlays and all-or-nothing commit
//! - Declarative pattern queries with positional parameter binding

pub mod graph;
pub mod pattern;
pub mod store;
pub mod txn;
pub mod types;
pub mod value;

pub use pattern::{Comparison, JoinClause, LogicalConnector, PatternPredicate, PatternQuery, PatternRow};
pub use store::GraphStore;
pub use txn::Transaction;
pub use types::{Direction, Edge, GraphError, Node, StorageError};
pub use value::Value;

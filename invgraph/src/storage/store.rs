// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Shared graph store facade
//!
//! Wraps the in-memory graph behind a reader-writer lock and hands out
//! transactions. All engine mutations go through [`GraphStore::begin`];
//! pattern queries and cache rebuilds read a consistent snapshot under
//! the read lock.

use crate::storage::graph::GraphData;
use crate::storage::pattern::{PatternQuery, PatternRow};
use crate::storage::txn::Transaction;
use crate::storage::types::StorageError;
use parking_lot::RwLock;

/// Thread-safe graph store with atomic transactions
#[derive(Default)]
pub struct GraphStore {
    data: RwLock<GraphData>,
}

impl GraphStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            data: RwLock::new(GraphData::new()),
        }
    }

    /// Begin a transaction; commit applies all staged changes atomically
    pub fn begin(&self) -> Transaction<'_> {
        Transaction::new(self)
    }

    /// Execute a compiled pattern query against the current graph
    pub fn execute_pattern(&self, query: &PatternQuery) -> Result<Vec<PatternRow>, StorageError> {
        let data = self.data.read();
        query.execute(&data)
    }

    /// Run a closure under the read lock
    pub(crate) fn read<R>(&self, f: impl FnOnce(&GraphData) -> R) -> R {
        f(&self.data.read())
    }

    /// Run a closure under the write lock
    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut GraphData) -> R) -> R {
        f(&mut self.data.write())
    }
}

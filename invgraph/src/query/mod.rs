// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Structured queries: description types, the compiler lowering them to
//! graph patterns, and the executor flattening matches into records

pub mod compiler;
pub mod executor;
pub mod types;

pub use compiler::{compile, CompiledQuery};
pub use types::{
    Comparison, ConditionTerm, GraphQuery, LogicalConnector, QueryCondition, ResultRecord,
};

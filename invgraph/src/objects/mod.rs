// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Business object instances: records and the object store

pub mod manager;
pub mod types;

pub use manager::ObjectManager;
pub use types::{AttributeValues, ObjectInfo, ObjectLight};

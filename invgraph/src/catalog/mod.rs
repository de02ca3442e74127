// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Class catalog: metadata records, the metadata manager and the
//! containment rule manager

pub mod containment;
pub mod manager;
pub mod types;

pub use containment::ContainmentManager;
pub use manager::MetadataManager;
pub use types::*;

pub(crate) use manager::scan_catalog;

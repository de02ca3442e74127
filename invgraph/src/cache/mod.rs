// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Metadata caching for hot-path schema checks

pub mod metadata_cache;

pub use metadata_cache::MetadataCache;

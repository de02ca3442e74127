// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Engine configuration

use serde::{Deserialize, Serialize};

/// Construction-time configuration for [`crate::Engine`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Page size used by queries that request pagination without an
    /// explicit page size
    pub default_page_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
        }
    }
}

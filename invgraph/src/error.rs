// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for the object graph engine
//!
//! The five domain kinds are recoverable by the caller; `Storage` wraps
//! unexpected store failures and always follows a rollback.

use crate::storage::{GraphError, StorageError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Metadata object not found: {0}")]
    MetadataObjectNotFound(String),

    #[error("Object of class {class} with id {id} not found")]
    ObjectNotFound { class: String, id: String },

    #[error("Application object not found: {0}")]
    ApplicationObjectNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation not permitted: {0}")]
    OperationNotPermitted(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),
}

impl From<GraphError> for EngineError {
    fn from(err: GraphError) -> Self {
        EngineError::Storage(StorageError::Graph(err))
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

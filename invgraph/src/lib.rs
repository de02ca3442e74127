// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Invgraph - A metadata-driven inventory object graph engine
//!
//! Invgraph stores a network/IT inventory whose schema is itself data:
//! classes, attributes and containment rules live in a catalog editable
//! at runtime, and every business object is a graph node instantiating
//! one of those dynamically defined classes.
//!
//! # Features
//!
//! - **Dynamic catalog**: classes and attributes are records, with
//!   single inheritance materialized by copying ancestor attributes at
//!   class-creation time
//! - **Containment rules**: which classes may host instances of which
//!   other classes, with abstract targets flattened to concrete sets
//! - **Metadata cache**: read-mostly mirror of the catalog, patched
//!   only after the store transaction it depends on has committed
//! - **Object store**: create/update/move/copy/delete of instances with
//!   polymorphic attribute mapping onto node properties and named edges
//! - **Structured queries**: compiled to graph patterns with joins over
//!   list-type attributes, pagination and a stable header-first result
//!   shape
//!
//! # Usage
//!
//! ```no_run
//! use invgraph::{Engine, EngineConfig};
//! use invgraph::catalog::ClassDefinition;
//!
//! let engine = Engine::open(EngineConfig::default()).unwrap();
//! engine
//!     .metadata()
//!     .create_class(ClassDefinition::new("Router", "InventoryObject"))
//!     .unwrap();
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod objects;
pub mod query;
pub mod storage;

pub use cache::MetadataCache;
pub use catalog::{ContainmentManager, MetadataManager};
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use objects::{AttributeValues, ObjectInfo, ObjectLight, ObjectManager};
pub use query::{Comparison, GraphQuery, LogicalConnector, QueryCondition, ResultRecord};
pub use storage::Value;

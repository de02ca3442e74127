// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Engine facade
//!
//! Wires the graph store, the metadata cache and the managers together
//! and bootstraps the core catalog: the hierarchy root, the
//! business-object root, the list-type root and the navigation dummy
//! root. Opening an engine yields a ready catalog an application can
//! immediately define classes against.

use crate::cache::MetadataCache;
use crate::catalog::types::*;
use crate::catalog::{ContainmentManager, MetadataManager};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::objects::ObjectManager;
use crate::query::{compile, executor, GraphQuery, ResultRecord};
use crate::storage::{GraphStore, Value};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

/// The metadata and object graph engine
pub struct Engine {
    config: EngineConfig,
    store: Arc<GraphStore>,
    cache: Arc<MetadataCache>,
    metadata: MetadataManager,
    containment: ContainmentManager,
    objects: ObjectManager,
}

impl Engine {
    /// Open an engine over a fresh store and bootstrap the core catalog
    pub fn open(config: EngineConfig) -> EngineResult<Self> {
        let store = Arc::new(GraphStore::new());
        let cache = Arc::new(MetadataCache::new());
        let metadata = MetadataManager::new(Arc::clone(&store), Arc::clone(&cache));
        let containment = ContainmentManager::new(Arc::clone(&store), Arc::clone(&cache));
        let objects = ObjectManager::new(Arc::clone(&store), Arc::clone(&cache));

        let mut tx = store.begin();
        let mut props = HashMap::new();
        props.insert(PROP_NAME.to_string(), Value::String(DUMMY_ROOT.to_string()));
        props.insert(PROP_CREATION_DATE.to_string(), Value::Timestamp(Utc::now()));
        tx.create_node(NODE_DUMMY_ROOT, props);
        tx.commit()?;

        // Every class inherits a name attribute from the hierarchy root
        let mut root = ClassDefinition {
            name: ROOT_CLASS.to_string(),
            parent_name: None,
            is_abstract: true,
            is_custom: false,
            is_countable: false,
            color: None,
            icon: None,
            category: None,
            attributes: vec![AttributeDefinition::primitive(PROP_NAME, "String")],
        };
        metadata.create_class(root.clone())?;

        root.name = INVENTORY_OBJECT.to_string();
        root.parent_name = Some(ROOT_CLASS.to_string());
        root.attributes = Vec::new();
        metadata.create_class(root.clone())?;

        root.name = GENERIC_OBJECT_LIST.to_string();
        metadata.create_class(root)?;

        cache.load(&store)?;
        log::info!("engine open, core catalog bootstrapped");

        Ok(Self {
            config,
            store,
            cache,
            metadata,
            containment,
            objects,
        })
    }

    pub fn metadata(&self) -> &MetadataManager {
        &self.metadata
    }

    pub fn containment(&self) -> &ContainmentManager {
        &self.containment
    }

    pub fn objects(&self) -> &ObjectManager {
        &self.objects
    }

    /// Compile and run a structured query
    pub fn execute_query(&self, query: &GraphQuery) -> EngineResult<Vec<ResultRecord>> {
        let compiled = compile(&self.cache, query, self.config.default_page_size)?;
        executor::execute(&self.store, &self.cache, &compiled)
    }

    /// Rebuild the metadata cache from the store
    pub fn reload_cache(&self) -> EngineResult<()> {
        self.cache.load(&self.store)
    }
}

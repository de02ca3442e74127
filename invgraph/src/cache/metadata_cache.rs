// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Process-wide metadata cache
//!
//! Read-mostly mirror of the class catalog and the containment rules.
//! Subclass checks and possible-children lookups are hot paths for the
//! object store and the query compiler, so both are answered from
//! in-memory maps instead of re-querying the graph. Patch methods are
//! called by the managers strictly after their transaction commits; the
//! cache never reflects uncommitted state.

use crate::catalog::types::ClassMetadata;
use crate::error::EngineResult;
use crate::storage::GraphStore;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};

#[derive(Default)]
struct Inner {
    /// Class name -> full metadata
    classes: HashMap<String, ClassMetadata>,
    /// Parent class name (or DummyRoot) -> flattened set of concrete
    /// class names its instances may contain
    possible_children: HashMap<String, BTreeSet<String>>,
}

/// Read-through cache over the metadata catalog
#[derive(Default)]
pub struct MetadataCache {
    inner: RwLock<Inner>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full rebuild from a store scan; called once at engine start
    pub fn load(&self, store: &GraphStore) -> EngineResult<()> {
        let (classes, rules) = crate::catalog::scan_catalog(store)?;

        let mut inner = Inner::default();
        for class in classes {
            inner.classes.insert(class.name.clone(), class);
        }
        for (parent, child) in rules {
            let expanded = expand_to_concrete(&inner.classes, &child);
            inner
                .possible_children
                .entry(parent)
                .or_default()
                .extend(expanded);
        }

        let mut guard = self.inner.write();
        *guard = inner;
        log::debug!(
            "metadata cache loaded: {} classes, {} containment parents",
            guard.classes.len(),
            guard.possible_children.len()
        );
        Ok(())
    }

    /// Get the cached definition of a class
    pub fn get_class(&self, name: &str) -> Option<ClassMetadata> {
        self.inner.read().classes.get(name).cloned()
    }

    /// Every cached class definition, unordered
    pub fn all_classes(&self) -> Vec<ClassMetadata> {
        self.inner.read().classes.values().cloned().collect()
    }

    /// Check whether `name` is `ancestor` or one of its descendants
    pub fn is_subclass(&self, ancestor: &str, name: &str) -> bool {
        let inner = self.inner.read();
        let mut current = name;
        loop {
            if current == ancestor {
                return true;
            }
            match inner.classes.get(current).and_then(|c| c.parent_name.as_deref()) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Flattened set of concrete classes `parent` may contain
    pub fn get_possible_children(&self, parent: &str) -> BTreeSet<String> {
        self.inner
            .read()
            .possible_children
            .get(parent)
            .cloned()
            .unwrap_or_default()
    }

    /// Check a single containment pair
    pub fn can_contain(&self, parent: &str, child: &str) -> bool {
        self.inner
            .read()
            .possible_children
            .get(parent)
            .map_or(false, |children| children.contains(child))
    }

    /// All concrete classes at or below `name`, unordered
    pub fn concrete_descendants(&self, name: &str) -> Vec<String> {
        let inner = self.inner.read();
        inner
            .classes
            .values()
            .filter(|class| !class.is_abstract)
            .filter(|class| is_subclass_in(&inner.classes, name, &class.name))
            .map(|class| class.name.clone())
            .collect()
    }

    /// Insert or replace a class definition
    pub fn put_class(&self, class: ClassMetadata) {
        self.inner.write().classes.insert(class.name.clone(), class);
    }

    /// Remove a class and every containment entry mentioning it
    pub fn remove_class(&self, name: &str) {
        let mut inner = self.inner.write();
        inner.classes.remove(name);
        inner.possible_children.remove(name);
        for children in inner.possible_children.values_mut() {
            children.remove(name);
        }
    }

    /// Re-key a renamed class, fixing child parent pointers and
    /// containment sets
    pub fn rename_class(&self, old_name: &str, new_name: &str) {
        let mut inner = self.inner.write();
        if let Some(mut class) = inner.classes.remove(old_name) {
            class.name = new_name.to_string();
            inner.classes.insert(new_name.to_string(), class);
        }
        for class in inner.classes.values_mut() {
            if class.parent_name.as_deref() == Some(old_name) {
                class.parent_name = Some(new_name.to_string());
            }
        }
        if let Some(children) = inner.possible_children.remove(old_name) {
            inner.possible_children.insert(new_name.to_string(), children);
        }
        for children in inner.possible_children.values_mut() {
            if children.remove(old_name) {
                children.insert(new_name.to_string());
            }
        }
    }

    /// Re-point cached classes at a renamed category
    pub fn rename_category(&self, old_name: &str, new_name: &str) {
        let mut inner = self.inner.write();
        for class in inner.classes.values_mut() {
            if class.category.as_deref() == Some(old_name) {
                class.category = Some(new_name.to_string());
            }
        }
    }

    /// Add concrete class names to a parent's flattened child set
    pub fn add_possible_children<I>(&self, parent: &str, children: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.inner
            .write()
            .possible_children
            .entry(parent.to_string())
            .or_default()
            .extend(children);
    }

    /// Remove concrete class names from a parent's flattened child set
    pub fn remove_possible_children(&self, parent: &str, children: &[String]) {
        let mut inner = self.inner.write();
        if let Some(set) = inner.possible_children.get_mut(parent) {
            for child in children {
                set.remove(child);
            }
        }
    }
}

fn is_subclass_in(classes: &HashMap<String, ClassMetadata>, ancestor: &str, name: &str) -> bool {
    let mut current = name;
    loop {
        if current == ancestor {
            return true;
        }
        match classes.get(current).and_then(|c| c.parent_name.as_deref()) {
            Some(parent) => current = parent,
            None => return false,
        }
    }
}

/// Expand a rule target to the concrete classes it covers: itself when
/// concrete, plus every concrete class below it
pub(crate) fn expand_to_concrete(
    classes: &HashMap<String, ClassMetadata>,
    child: &str,
) -> Vec<String> {
    classes
        .values()
        .filter(|c| !c.is_abstract)
        .filter(|c| is_subclass_in(classes, child, &c.name))
        .map(|c| c.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn class(name: &str, parent: Option<&str>, is_abstract: bool) -> ClassMetadata {
        ClassMetadata {
            id: name.to_lowercase(),
            name: name.to_string(),
            parent_name: parent.map(|p| p.to_string()),
            is_abstract,
            is_custom: false,
            is_countable: true,
            color: None,
            icon: None,
            category: None,
            attributes: Vec::new(),
            creation_date: Utc::now(),
        }
    }

    fn sample_cache() -> MetadataCache {
        let cache = MetadataCache::new();
        cache.put_class(class("RootObject", None, true));
        cache.put_class(class("InventoryObject", Some("RootObject"), true));
        cache.put_class(class("NetworkElement", Some("InventoryObject"), true));
        cache.put_class(class("Router", Some("NetworkElement"), false));
        cache.put_class(class("Switch", Some("NetworkElement"), false));
        cache
    }

    #[test]
    fn subclass_walk() {
        let cache = sample_cache();
        assert!(cache.is_subclass("InventoryObject", "Router"));
        assert!(cache.is_subclass("NetworkElement", "Switch"));
        assert!(cache.is_subclass("Router", "Router"));
        assert!(!cache.is_subclass("Router", "Switch"));
        assert!(!cache.is_subclass("Router", "NetworkElement"));
    }

    #[test]
    fn concrete_descendants_skip_abstract() {
        let cache = sample_cache();
        let mut descendants = cache.concrete_descendants("NetworkElement");
        descendants.sort();
        assert_eq!(descendants, vec!["Router", "Switch"]);
    }

    #[test]
    fn containment_patches() {
        let cache = sample_cache();
        cache.add_possible_children("Rack", vec!["Router".to_string(), "Switch".to_string()]);
        assert!(cache.can_contain("Rack", "Router"));

        cache.remove_possible_children("Rack", &["Router".to_string()]);
        assert!(!cache.can_contain("Rack", "Router"));
        assert!(cache.can_contain("Rack", "Switch"));
    }

    #[test]
    fn rename_fixes_parent_pointers() {
        let cache = sample_cache();
        cache.add_possible_children("Rack", vec!["Router".to_string()]);
        cache.rename_class("Router", "CoreRouter");

        assert!(cache.get_class("Router").is_none());
        assert!(cache.is_subclass("NetworkElement", "CoreRouter"));
        assert!(cache.can_contain("Rack", "CoreRouter"));
    }
}

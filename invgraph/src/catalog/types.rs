// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Metadata records for the class catalog
//!
//! Classes, attributes and categories are runtime data, not compile-time
//! types. These records mirror what is stored on catalog nodes; the
//! engine resolves a class's effective attribute set by materializing
//! copies of every ancestor attribute at class-creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Absolute root of the inheritance hierarchy
pub const ROOT_CLASS: &str = "RootObject";
/// Root of all business-object classes
pub const INVENTORY_OBJECT: &str = "InventoryObject";
/// Root of all classes usable as list-type attribute targets
pub const GENERIC_OBJECT_LIST: &str = "GenericObjectList";
/// Synthetic container standing in for "no explicit parent"
pub const DUMMY_ROOT: &str = "DummyRoot";

/// Node labels used by the engine
pub const NODE_CLASS: &str = "class";
pub const NODE_ATTRIBUTE: &str = "attribute";
pub const NODE_CATEGORY: &str = "category";
pub const NODE_OBJECT: &str = "object";
pub const NODE_DUMMY_ROOT: &str = "dummy_root";

/// Edge labels used by the engine
pub const EDGE_EXTENDS: &str = "EXTENDS";
pub const EDGE_INSTANCE_OF: &str = "INSTANCE_OF";
pub const EDGE_HAS_ATTRIBUTE: &str = "HAS_ATTRIBUTE";
pub const EDGE_BELONGS_TO_CATEGORY: &str = "BELONGS_TO_CATEGORY";
pub const EDGE_POSSIBLE_CHILD: &str = "POSSIBLE_CHILD";
pub const EDGE_CHILD_OF: &str = "CHILD_OF";
pub const EDGE_CHILD_OF_SPECIAL: &str = "CHILD_OF_SPECIAL";
pub const EDGE_RELATED_TO: &str = "RELATED_TO";
pub const EDGE_RELATED_TO_SPECIAL: &str = "RELATED_TO_SPECIAL";

/// Property carrying the display name on nodes and the relationship
/// name on value/special edges
pub const PROP_NAME: &str = "name";
pub const PROP_CREATION_DATE: &str = "creation_date";

/// How an attribute's values map onto the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeMapping {
    /// Plain value stored inline as a node property
    Primitive,
    /// Calendar date stored inline
    Date,
    /// Point-in-time stored inline
    Timestamp,
    /// Single named edge to a list-type item
    ManyToOne,
    /// Any number of named edges to list-type items
    ManyToMany,
    /// Opaque payload; rejected by the generic set/update path
    Binary,
}

/// Full attribute definition as stored on an attribute node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeMetadata {
    pub id: String,
    pub name: String,
    pub display_name: String,
    /// Primitive type name or, for list mappings, the list-type class name
    pub value_type: String,
    pub mapping: AttributeMapping,
    pub visible: bool,
    pub administrative: bool,
    pub read_only: bool,
    pub no_copy: bool,
    pub no_serialize: bool,
    pub unique: bool,
    pub creation_date: DateTime<Utc>,
}

impl AttributeMapping {
    /// Stable string form stored on attribute nodes
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeMapping::Primitive => "primitive",
            AttributeMapping::Date => "date",
            AttributeMapping::Timestamp => "timestamp",
            AttributeMapping::ManyToOne => "many_to_one",
            AttributeMapping::ManyToMany => "many_to_many",
            AttributeMapping::Binary => "binary",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "primitive" => Some(AttributeMapping::Primitive),
            "date" => Some(AttributeMapping::Date),
            "timestamp" => Some(AttributeMapping::Timestamp),
            "many_to_one" => Some(AttributeMapping::ManyToOne),
            "many_to_many" => Some(AttributeMapping::ManyToMany),
            "binary" => Some(AttributeMapping::Binary),
            _ => None,
        }
    }
}

impl AttributeMetadata {
    /// List-mapped attributes store their values as named edges
    pub fn is_list_type(&self) -> bool {
        matches!(
            self.mapping,
            AttributeMapping::ManyToOne | AttributeMapping::ManyToMany
        )
    }
}

/// Attribute definition input used by create/add operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,
    pub display_name: Option<String>,
    pub value_type: String,
    pub mapping: AttributeMapping,
    pub visible: bool,
    pub administrative: bool,
    pub read_only: bool,
    pub no_copy: bool,
    pub no_serialize: bool,
    pub unique: bool,
}

impl AttributeDefinition {
    /// A visible primitive attribute with default flags
    pub fn primitive(name: &str, value_type: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: None,
            value_type: value_type.to_string(),
            mapping: AttributeMapping::Primitive,
            visible: true,
            administrative: false,
            read_only: false,
            no_copy: false,
            no_serialize: false,
            unique: false,
        }
    }

    /// A list-type attribute pointing at the given list-type class
    pub fn list_type(name: &str, list_class: &str, mapping: AttributeMapping) -> Self {
        Self {
            name: name.to_string(),
            display_name: None,
            value_type: list_class.to_string(),
            mapping,
            visible: true,
            administrative: false,
            read_only: false,
            no_copy: false,
            no_serialize: false,
            unique: false,
        }
    }
}

/// Partial attribute update for change_attribute_definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeUpdate {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub value_type: Option<String>,
    pub mapping: Option<AttributeMapping>,
    pub visible: Option<bool>,
    pub administrative: Option<bool>,
    pub read_only: Option<bool>,
    pub no_copy: Option<bool>,
    pub no_serialize: Option<bool>,
    pub unique: Option<bool>,
}

/// Full class definition as resolved from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetadata {
    pub id: String,
    pub name: String,
    /// None only for the hierarchy root
    pub parent_name: Option<String>,
    pub is_abstract: bool,
    pub is_custom: bool,
    pub is_countable: bool,
    /// Opaque display blobs owned by the presentation layer
    pub color: Option<String>,
    pub icon: Option<String>,
    pub category: Option<String>,
    /// Effective attribute set, materialized at creation time
    pub attributes: Vec<AttributeMetadata>,
    pub creation_date: DateTime<Utc>,
}

impl ClassMetadata {
    /// Find an attribute of this class by name
    pub fn attribute(&self, name: &str) -> Option<&AttributeMetadata> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Lightweight summary of this class
    pub fn to_light(&self) -> ClassMetadataLight {
        ClassMetadataLight {
            id: self.id.clone(),
            name: self.name.clone(),
            is_abstract: self.is_abstract,
            is_custom: self.is_custom,
        }
    }
}

/// Class definition input for create_class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub name: String,
    /// None only when bootstrapping the hierarchy root
    pub parent_name: Option<String>,
    pub is_abstract: bool,
    pub is_custom: bool,
    pub is_countable: bool,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub category: Option<String>,
    pub attributes: Vec<AttributeDefinition>,
}

impl ClassDefinition {
    /// A concrete custom class extending the given parent
    pub fn new(name: &str, parent: &str) -> Self {
        Self {
            name: name.to_string(),
            parent_name: Some(parent.to_string()),
            is_abstract: false,
            is_custom: true,
            is_countable: true,
            color: None,
            icon: None,
            category: None,
            attributes: Vec::new(),
        }
    }

    pub fn abstract_class(name: &str, parent: &str) -> Self {
        let mut def = Self::new(name, parent);
        def.is_abstract = true;
        def
    }

    pub fn with_attribute(mut self, attribute: AttributeDefinition) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// Partial class update for change_class_definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassUpdate {
    pub name: Option<String>,
    pub is_abstract: Option<bool>,
    pub is_custom: Option<bool>,
    pub is_countable: Option<bool>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub category: Option<String>,
}

/// Lightweight class summary for listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetadataLight {
    pub id: String,
    pub name: String,
    pub is_abstract: bool,
    pub is_custom: bool,
}

/// Category grouping related classes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub creation_date: DateTime<Utc>,
}

/// Category definition input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
}

/// Partial category update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
}

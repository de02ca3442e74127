// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Structured query descriptions and tabular results

use serde::{Deserialize, Serialize};

pub use crate::storage::{Comparison, LogicalConnector};

/// Structured filter over the instances of one class
///
/// Conditions either compare an attribute against a literal or, for
/// list-type attributes, nest a sub-query over the related items. One
/// connector applies uniformly across all conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQuery {
    pub class_name: String,
    pub logical_connector: LogicalConnector,
    pub conditions: Vec<QueryCondition>,
    /// Attribute names projected into result columns, in caller order
    pub visible_attributes: Vec<String>,
    /// 1-based page; zero disables pagination
    pub page: usize,
    /// Zero falls back to the engine's configured default
    pub page_size: usize,
}

impl GraphQuery {
    pub fn new(class_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            logical_connector: LogicalConnector::And,
            conditions: Vec::new(),
            visible_attributes: vec!["name".to_string()],
            page: 0,
            page_size: 0,
        }
    }

    pub fn with_connector(mut self, connector: LogicalConnector) -> Self {
        self.logical_connector = connector;
        self
    }

    pub fn with_condition(mut self, condition: QueryCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_visible_attributes(mut self, attributes: &[&str]) -> Self {
        self.visible_attributes = attributes.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }
}

/// One filter condition of a [`GraphQuery`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryCondition {
    pub attribute_name: String,
    pub comparison: Comparison,
    pub term: ConditionTerm,
}

impl QueryCondition {
    /// Compare an attribute against a literal
    pub fn value(attribute: &str, comparison: Comparison, value: &str) -> Self {
        Self {
            attribute_name: attribute.to_string(),
            comparison,
            term: ConditionTerm::Value(Some(value.to_string())),
        }
    }

    /// Assert an attribute holds no value
    pub fn is_null(attribute: &str) -> Self {
        Self {
            attribute_name: attribute.to_string(),
            comparison: Comparison::Equal,
            term: ConditionTerm::Value(None),
        }
    }

    /// Filter through a list-type attribute with a nested query over
    /// the related items
    pub fn join(attribute: &str, inner: GraphQuery) -> Self {
        Self {
            attribute_name: attribute.to_string(),
            comparison: Comparison::Equal,
            term: ConditionTerm::Join(Box::new(inner)),
        }
    }
}

/// Right-hand side of a condition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConditionTerm {
    /// A literal, or None for an explicit null check
    Value(Option<String>),
    /// A nested query over the items of a list-type attribute
    Join(Box<GraphQuery>),
}

/// One row of a query result
///
/// The first record of every result is a header: `id` is None and
/// `columns` carries the column names. Data records carry the matched
/// instance plus its projected values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: Option<String>,
    pub name: String,
    pub class_name: String,
    pub columns: Vec<String>,
}

impl ResultRecord {
    pub fn is_header(&self) -> bool {
        self.id.is_none()
    }
}

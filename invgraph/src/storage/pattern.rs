// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Declarative pattern queries over the graph
//!
//! A [`PatternQuery`] is the intermediate plan the query compiler renders
//! into: instance anchoring over a set of class names, predicates with
//! positional parameter binding, relationship joins through named value
//! edges, ordering and pagination. The store evaluates the plan under a
//! single read lock and returns rows of instance plus joined nodes.

use crate::storage::graph::GraphData;
use crate::storage::types::{Direction, Node, StorageError};
use crate::storage::value::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Connector applied uniformly across all predicates and joins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalConnector {
    And,
    Or,
}

/// Comparison operators supported by pattern predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Equal,
    Like,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
}

/// Predicate on a node property, bound to a positional parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternPredicate {
    pub property: String,
    pub op: Comparison,
    /// Index into [`PatternQuery::params`]
    pub param: usize,
    /// Case-insensitive string equality (dropped for non-string parameters)
    pub case_insensitive: bool,
}

/// Join from the instance through a named value edge to a related node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinClause {
    /// Edge label to traverse (value relationships)
    pub edge_label: String,
    /// Required value of the edge's `name` property
    pub edge_name: String,
    /// Connector for the join's own predicates
    pub connector: LogicalConnector,
    pub predicates: Vec<PatternPredicate>,
    /// Assert the relationship is absent instead of matching it
    pub require_absent: bool,
    /// Properties projected from the joined node into the result
    pub projected: Vec<String>,
}

/// Compiled graph pattern with bound parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternQuery {
    /// Label of the class nodes instances anchor to
    pub class_label: String,
    /// Edge label connecting instances to their class node
    pub instance_edge_label: String,
    /// Class names whose instances match the pattern
    pub anchor_classes: Vec<String>,
    pub connector: LogicalConnector,
    pub predicates: Vec<PatternPredicate>,
    pub joins: Vec<JoinClause>,
    /// Positional parameters referenced by predicates
    pub params: Vec<Value>,
    /// Instance property the result is ordered by, ascending
    pub order_by: String,
    pub skip: usize,
    pub limit: Option<usize>,
}

/// One matched instance with its joined nodes, in join declaration order
#[derive(Debug, Clone)]
pub struct PatternRow {
    pub instance: Node,
    pub class_name: String,
    /// First matching joined node per join clause, None when unmatched
    pub joined: Vec<Option<Node>>,
}

impl PatternQuery {
    /// Evaluate the pattern against a graph snapshot
    pub(crate) fn execute(&self, g: &GraphData) -> Result<Vec<PatternRow>, StorageError> {
        let mut rows: Vec<PatternRow> = Vec::new();

        for class_name in &self.anchor_classes {
            for class_node in g.index_lookup(&self.class_label, class_name) {
                for edge in g.edges_of(&class_node.id, Direction::Incoming) {
                    if edge.label != self.instance_edge_label {
                        continue;
                    }
                    let Some(instance) = g.get_node(&edge.from_node) else {
                        continue;
                    };
                    if let Some(row) = self.match_instance(g, instance, class_name)? {
                        rows.push(row);
                    }
                }
            }
        }

        rows.sort_by(|a, b| {
            let by_name = a
                .instance
                .string_property(&self.order_by)
                .cmp(&b.instance.string_property(&self.order_by));
            if by_name == Ordering::Equal {
                a.instance.id.cmp(&b.instance.id)
            } else {
                by_name
            }
        });

        let mut rows: Vec<PatternRow> = rows.into_iter().skip(self.skip).collect();
        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    fn match_instance(
        &self,
        g: &GraphData,
        instance: &Node,
        class_name: &str,
    ) -> Result<Option<PatternRow>, StorageError> {
        let mut terms: Vec<bool> = Vec::with_capacity(self.predicates.len() + self.joins.len());
        for predicate in &self.predicates {
            terms.push(self.eval_predicate(instance, predicate)?);
        }

        let mut joined: Vec<Option<Node>> = Vec::with_capacity(self.joins.len());
        for join in &self.joins {
            let (satisfied, node) = self.eval_join(g, instance, join)?;
            terms.push(satisfied);
            joined.push(node);
        }

        let matched = match self.connector {
            LogicalConnector::And => terms.iter().all(|t| *t),
            LogicalConnector::Or => terms.is_empty() || terms.iter().any(|t| *t),
        };

        if matched {
            Ok(Some(PatternRow {
                instance: instance.clone(),
                class_name: class_name.to_string(),
                joined,
            }))
        } else {
            Ok(None)
        }
    }

    fn eval_join(
        &self,
        g: &GraphData,
        instance: &Node,
        join: &JoinClause,
    ) -> Result<(bool, Option<Node>), StorageError> {
        let targets: Vec<&Node> = g
            .edges_of(&instance.id, Direction::Outgoing)
            .into_iter()
            .filter(|edge| edge.label == join.edge_label && edge.string_property("name") == join.edge_name)
            .filter_map(|edge| g.get_node(&edge.to_node))
            .collect();

        if join.require_absent {
            return Ok((targets.is_empty(), None));
        }

        for target in targets {
            let mut terms = Vec::with_capacity(join.predicates.len());
            for predicate in &join.predicates {
                terms.push(self.eval_predicate(target, predicate)?);
            }
            let matched = match join.connector {
                LogicalConnector::And => terms.iter().all(|t| *t),
                LogicalConnector::Or => terms.is_empty() || terms.iter().any(|t| *t),
            };
            if matched {
                return Ok((true, Some(target.clone())));
            }
        }
        Ok((false, None))
    }

    fn eval_predicate(&self, node: &Node, predicate: &PatternPredicate) -> Result<bool, StorageError> {
        let param = self.params.get(predicate.param).ok_or_else(|| {
            StorageError::InvalidOperation(format!(
                "predicate references unbound parameter {}",
                predicate.param
            ))
        })?;

        let actual = node.get_property(&predicate.property);

        // A null parameter asserts absence of the property
        if param.is_null() {
            return Ok(matches!(predicate.op, Comparison::Equal)
                && actual.map_or(true, |v| v.is_null()));
        }

        let Some(actual) = actual else {
            return Ok(false);
        };

        let matched = match predicate.op {
            Comparison::Equal => {
                if predicate.case_insensitive {
                    actual.eq_ignore_case(param)
                } else {
                    actual.compare(param) == Some(Ordering::Equal)
                }
            }
            Comparison::Like => actual.contains_ignore_case(param),
            Comparison::GreaterThan => actual.compare(param) == Some(Ordering::Greater),
            Comparison::LessThan => actual.compare(param) == Some(Ordering::Less),
            Comparison::GreaterOrEqual => matches!(
                actual.compare(param),
                Some(Ordering::Greater) | Some(Ordering::Equal)
            ),
            Comparison::LessOrEqual => matches!(
                actual.compare(param),
                Some(Ordering::Less) | Some(Ordering::Equal)
            ),
        };
        Ok(matched)
    }
}

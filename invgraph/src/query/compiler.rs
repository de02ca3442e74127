// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query compiler
//!
//! Lowers a [`GraphQuery`] into a [`PatternQuery`] plan: abstract target
//! classes are expanded to their concrete descendants, literals are
//! coerced to each attribute's declared type, and list-type conditions
//! become joins through named value edges. The plan carries positional
//! parameters; no query text is ever assembled by string concatenation.

use crate::cache::MetadataCache;
use crate::catalog::types::{
    AttributeMapping, AttributeMetadata, ClassMetadata, EDGE_INSTANCE_OF, EDGE_RELATED_TO,
    NODE_CLASS, PROP_NAME,
};
use crate::error::{EngineError, EngineResult};
use crate::objects::types::parse_typed_literal;
use crate::query::types::{ConditionTerm, GraphQuery, QueryCondition};
use crate::storage::{Comparison, JoinClause, PatternPredicate, PatternQuery, Value};
use chrono::{DateTime, NaiveDate, Utc};

/// A lowered query plan plus the result shape it produces
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub pattern: PatternQuery,
    /// Column names: the caller's visible attributes followed by each
    /// join's visible attributes, in join declaration order
    pub header: Vec<String>,
    /// Instance attributes rendered into data rows, name excluded
    pub instance_columns: Vec<String>,
}

/// Lower a structured query into an executable pattern
pub fn compile(
    cache: &MetadataCache,
    query: &GraphQuery,
    default_page_size: usize,
) -> EngineResult<CompiledQuery> {
    let class = cache.get_class(&query.class_name).ok_or_else(|| {
        EngineError::MetadataObjectNotFound(format!("Class {} not found", query.class_name))
    })?;

    let mut anchor_classes = if class.is_abstract {
        cache.concrete_descendants(&class.name)
    } else {
        vec![class.name.clone()]
    };
    anchor_classes.sort();

    let mut params: Vec<Value> = Vec::new();
    let mut predicates: Vec<PatternPredicate> = Vec::new();
    let mut joins: Vec<JoinClause> = Vec::new();
    let mut header: Vec<String> = query.visible_attributes.clone();

    for condition in &query.conditions {
        let attr = resolve_attribute(&class, &condition.attribute_name)?;
        match &condition.term {
            ConditionTerm::Value(Some(raw)) => {
                if attr.is_list_type() {
                    return Err(EngineError::InvalidArgument(format!(
                        "Attribute {} relates to {} items; filter it with a nested query",
                        attr.name, attr.value_type
                    )));
                }
                predicates.push(literal_predicate(attr, condition, raw, &mut params)?);
            }
            ConditionTerm::Value(None) => {
                if attr.is_list_type() {
                    joins.push(JoinClause {
                        edge_label: EDGE_RELATED_TO.to_string(),
                        edge_name: attr.name.clone(),
                        connector: query.logical_connector,
                        predicates: Vec::new(),
                        require_absent: true,
                        projected: Vec::new(),
                    });
                } else {
                    params.push(Value::Null);
                    predicates.push(PatternPredicate {
                        property: attr.name.clone(),
                        op: Comparison::Equal,
                        param: params.len() - 1,
                        case_insensitive: false,
                    });
                }
            }
            ConditionTerm::Join(inner) => {
                let join = compile_join(cache, attr, inner, &mut params)?;
                header.extend(inner.visible_attributes.iter().cloned());
                joins.push(join);
            }
        }
    }

    let page_size = if query.page_size > 0 {
        query.page_size
    } else {
        default_page_size
    };
    let (skip, limit) = if query.page > 0 {
        (page_size * (query.page - 1), Some(page_size))
    } else {
        (0, None)
    };

    let instance_columns: Vec<String> = query
        .visible_attributes
        .iter()
        .filter(|attr| attr.as_str() != PROP_NAME)
        .cloned()
        .collect();

    Ok(CompiledQuery {
        pattern: PatternQuery {
            class_label: NODE_CLASS.to_string(),
            instance_edge_label: EDGE_INSTANCE_OF.to_string(),
            anchor_classes,
            connector: query.logical_connector,
            predicates,
            joins,
            params,
            order_by: PROP_NAME.to_string(),
            skip,
            limit,
        },
        header,
        instance_columns,
    })
}

fn compile_join(
    cache: &MetadataCache,
    attr: &AttributeMetadata,
    inner: &GraphQuery,
    params: &mut Vec<Value>,
) -> EngineResult<JoinClause> {
    if !attr.is_list_type() {
        return Err(EngineError::InvalidArgument(format!(
            "Attribute {} holds an inline value and cannot be joined",
            attr.name
        )));
    }
    let item_class = cache.get_class(&inner.class_name).ok_or_else(|| {
        EngineError::MetadataObjectNotFound(format!(
            "List type class {} not found",
            inner.class_name
        ))
    })?;
    if !cache.is_subclass(&attr.value_type, &item_class.name) {
        return Err(EngineError::InvalidArgument(format!(
            "Attribute {} relates to {} items, not {}",
            attr.name, attr.value_type, item_class.name
        )));
    }

    let mut predicates = Vec::with_capacity(inner.conditions.len());
    for condition in &inner.conditions {
        let item_attr = resolve_attribute(&item_class, &condition.attribute_name)?;
        match &condition.term {
            ConditionTerm::Value(Some(raw)) => {
                predicates.push(literal_predicate(item_attr, condition, raw, params)?);
            }
            ConditionTerm::Value(None) => {
                params.push(Value::Null);
                predicates.push(PatternPredicate {
                    property: item_attr.name.clone(),
                    op: Comparison::Equal,
                    param: params.len() - 1,
                    case_insensitive: false,
                });
            }
            ConditionTerm::Join(_) => {
                return Err(EngineError::InvalidArgument(
                    "Nested queries may only be one level deep".to_string(),
                ));
            }
        }
    }

    Ok(JoinClause {
        edge_label: EDGE_RELATED_TO.to_string(),
        edge_name: attr.name.clone(),
        connector: inner.logical_connector,
        predicates,
        require_absent: false,
        projected: inner.visible_attributes.clone(),
    })
}

/// Coerce a literal to the attribute's declared type and bind it
fn literal_predicate(
    attr: &AttributeMetadata,
    condition: &QueryCondition,
    raw: &str,
    params: &mut Vec<Value>,
) -> EngineResult<PatternPredicate> {
    let value = match attr.mapping {
        AttributeMapping::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|_| coercion_error(attr, raw))?,
        AttributeMapping::Timestamp => DateTime::parse_from_rfc3339(raw)
            .map(|ts| Value::Timestamp(ts.with_timezone(&Utc)))
            .map_err(|_| coercion_error(attr, raw))?,
        _ => parse_typed_literal(&attr.value_type, raw).ok_or_else(|| coercion_error(attr, raw))?,
    };

    let is_string = matches!(value, Value::String(_));
    if condition.comparison == Comparison::Like && !is_string {
        return Err(EngineError::InvalidArgument(format!(
            "Attribute {} is {} and does not support substring matching",
            attr.name, attr.value_type
        )));
    }

    params.push(value);
    Ok(PatternPredicate {
        property: attr.name.clone(),
        op: condition.comparison,
        param: params.len() - 1,
        // Equality on strings is case-insensitive; other types compare directly
        case_insensitive: is_string && condition.comparison == Comparison::Equal,
    })
}

fn resolve_attribute<'a>(
    class: &'a ClassMetadata,
    name: &str,
) -> EngineResult<&'a AttributeMetadata> {
    class.attribute(name).ok_or_else(|| {
        EngineError::MetadataObjectNotFound(format!(
            "Class {} has no attribute {}",
            class.name, name
        ))
    })
}

fn coercion_error(attr: &AttributeMetadata, raw: &str) -> EngineError {
    EngineError::InvalidArgument(format!(
        "{} cannot be read as {} for attribute {}",
        raw, attr.value_type, attr.name
    ))
}

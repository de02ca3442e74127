// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Business object records and attribute value parsing

use crate::catalog::types::{AttributeMapping, AttributeMetadata};
use crate::error::{EngineError, EngineResult};
use crate::storage::Value;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Attribute values as they arrive from callers: attribute name to a
/// list of strings. An empty list clears the attribute; for list-type
/// attributes each string is the id of a list-type item instance.
pub type AttributeValues = HashMap<String, Vec<String>>;

/// Instance summary: just enough to render a tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectLight {
    pub id: String,
    pub name: String,
    pub class_name: String,
}

/// Full instance view with every attribute rendered back to strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub id: String,
    pub name: String,
    pub class_name: String,
    /// Primitive values rendered to strings; list-type values as the
    /// ids of the related items
    pub attributes: HashMap<String, Vec<String>>,
    pub creation_date: DateTime<Utc>,
}

impl ObjectInfo {
    pub fn to_light(&self) -> ObjectLight {
        ObjectLight {
            id: self.id.clone(),
            name: self.name.clone(),
            class_name: self.class_name.clone(),
        }
    }
}

/// Parse a caller-supplied string into the attribute's declared type
pub(crate) fn parse_attribute_value(
    attr: &AttributeMetadata,
    raw: &str,
) -> EngineResult<Value> {
    match attr.mapping {
        AttributeMapping::Date => {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                EngineError::InvalidArgument(format!(
                    "{} is not a valid date for attribute {}",
                    raw, attr.name
                ))
            })?;
            Ok(Value::Date(date))
        }
        AttributeMapping::Timestamp => {
            let ts = DateTime::parse_from_rfc3339(raw).map_err(|_| {
                EngineError::InvalidArgument(format!(
                    "{} is not a valid timestamp for attribute {}",
                    raw, attr.name
                ))
            })?;
            Ok(Value::Timestamp(ts.with_timezone(&Utc)))
        }
        AttributeMapping::Primitive => parse_typed_literal(&attr.value_type, raw).ok_or_else(|| {
            EngineError::InvalidArgument(format!(
                "{} cannot be read as {} for attribute {}",
                raw, attr.value_type, attr.name
            ))
        }),
        AttributeMapping::ManyToOne | AttributeMapping::ManyToMany | AttributeMapping::Binary => {
            Err(EngineError::InvalidArgument(format!(
                "Attribute {} does not hold an inline value",
                attr.name
            )))
        }
    }
}

/// Parse a literal according to a primitive type name. Unknown type
/// names fall back to plain strings.
pub(crate) fn parse_typed_literal(value_type: &str, raw: &str) -> Option<Value> {
    match value_type {
        "Integer" | "Long" => raw.trim().parse::<i64>().ok().map(Value::Integer),
        "Float" | "Double" => raw.trim().parse::<f64>().ok().map(Value::Float),
        "Boolean" => match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Some(Value::Boolean(true)),
            "false" => Some(Value::Boolean(false)),
            _ => None,
        },
        _ => Some(Value::String(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::AttributeDefinition;
    use chrono::Utc;

    fn attr(value_type: &str) -> AttributeMetadata {
        let def = AttributeDefinition::primitive("speed", value_type);
        AttributeMetadata {
            id: "a1".to_string(),
            name: def.name,
            display_name: "Speed".to_string(),
            value_type: def.value_type,
            mapping: def.mapping,
            visible: true,
            administrative: false,
            read_only: false,
            no_copy: false,
            no_serialize: false,
            unique: false,
            creation_date: Utc::now(),
        }
    }

    #[test]
    fn typed_parse_and_rejects() {
        assert_eq!(
            parse_attribute_value(&attr("Integer"), "42").unwrap(),
            Value::Integer(42)
        );
        assert_eq!(
            parse_attribute_value(&attr("Boolean"), "TRUE").unwrap(),
            Value::Boolean(true)
        );
        assert!(parse_attribute_value(&attr("Integer"), "fast").is_err());
        assert!(matches!(
            parse_attribute_value(&attr("String"), "anything").unwrap(),
            Value::String(_)
        ));
    }

    #[test]
    fn unknown_type_names_stay_strings() {
        assert_eq!(
            parse_typed_literal("Color", "red"),
            Some(Value::String("red".to_string()))
        );
    }
}

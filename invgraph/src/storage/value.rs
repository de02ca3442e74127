// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Value type system for graph properties
//!
//! Supports the data types an inventory attribute can carry:
//! - Basic types: String, Integer, Float, Boolean, Null
//! - Temporal types: Date, Timestamp

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Property value stored on a node or edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Null,
}

impl Value {
    /// Human-readable kind name, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "String",
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::Boolean(_) => "Boolean",
            Value::Date(_) => "Date",
            Value::Timestamp(_) => "Timestamp",
            Value::Null => "Null",
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Ordered comparison between values of the same kind
    ///
    /// Integer and Float compare against each other numerically. Returns
    /// `None` for kind mismatches, which callers surface as a coercion error.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Case-insensitive equality for string values; falls back to plain
    /// equality for everything else
    pub fn eq_ignore_case(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a.eq_ignore_ascii_case(b),
            _ => self == other,
        }
    }

    /// Case-insensitive substring match; only meaningful for string values
    pub fn contains_ignore_case(&self, needle: &Value) -> bool {
        match (self, needle) {
            (Value::String(haystack), Value::String(needle)) => haystack
                .to_ascii_lowercase()
                .contains(&needle.to_ascii_lowercase()),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            Value::Null => write!(f, "null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_same_kind() {
        assert_eq!(
            Value::Integer(3).compare(&Value::Integer(7)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::String("b".into()).compare(&Value::String("a".into())),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn compare_numeric_interop() {
        assert_eq!(
            Value::Integer(2).compare(&Value::Float(2.0)),
            Some(Ordering::Equal)
        );
        assert_eq!(
            Value::Float(1.5).compare(&Value::Integer(2)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn compare_kind_mismatch_is_none() {
        assert_eq!(Value::Integer(1).compare(&Value::String("1".into())), None);
        assert_eq!(Value::Boolean(true).compare(&Value::Integer(1)), None);
    }

    #[test]
    fn string_matching_is_case_insensitive() {
        let cisco = Value::String("Cisco".into());
        assert!(cisco.eq_ignore_case(&Value::String("cisco".into())));
        assert!(cisco.contains_ignore_case(&Value::String("ISC".into())));
        assert!(!cisco.contains_ignore_case(&Value::String("juniper".into())));
    }
}

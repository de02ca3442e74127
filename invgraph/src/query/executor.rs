// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query executor
//!
//! Runs a compiled pattern and flattens the matched rows into tabular
//! records. The header record is always emitted, even for an empty
//! result, so callers can rely on the column layout.

use crate::cache::MetadataCache;
use crate::catalog::types::{EDGE_RELATED_TO, PROP_NAME};
use crate::error::EngineResult;
use crate::query::compiler::CompiledQuery;
use crate::query::types::ResultRecord;
use crate::storage::{Direction, GraphStore, Node, Transaction};

/// Execute a compiled query and flatten the result
pub fn execute(
    store: &GraphStore,
    cache: &MetadataCache,
    compiled: &CompiledQuery,
) -> EngineResult<Vec<ResultRecord>> {
    let rows = store.execute_pattern(&compiled.pattern)?;

    let mut records = Vec::with_capacity(rows.len() + 1);
    records.push(ResultRecord {
        id: None,
        name: String::new(),
        class_name: String::new(),
        columns: compiled.header.clone(),
    });

    let tx = store.begin();
    for row in rows {
        let mut columns = Vec::with_capacity(compiled.header.len());
        for attr_name in &compiled.instance_columns {
            columns.push(render_instance_column(
                &tx,
                cache,
                &row.instance,
                &row.class_name,
                attr_name,
            ));
        }
        for (join, node) in compiled.pattern.joins.iter().zip(&row.joined) {
            for attr_name in &join.projected {
                let value = node
                    .as_ref()
                    .and_then(|n| n.get_property(attr_name))
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                columns.push(value);
            }
        }
        records.push(ResultRecord {
            id: Some(row.instance.id.clone()),
            name: row.instance.string_property(PROP_NAME),
            class_name: row.class_name,
            columns,
        });
    }

    log::debug!("query returned {} data rows", records.len() - 1);
    Ok(records)
}

/// Render one projected attribute of a matched instance. List-type
/// attributes render as the related item names, semicolon separated.
fn render_instance_column(
    tx: &Transaction<'_>,
    cache: &MetadataCache,
    instance: &Node,
    class_name: &str,
    attr_name: &str,
) -> String {
    let is_list = cache
        .get_class(class_name)
        .and_then(|class| class.attribute(attr_name).map(|attr| attr.is_list_type()))
        .unwrap_or(false);

    if is_list {
        let names: Vec<String> = tx
            .edges_of(&instance.id, Direction::Outgoing)
            .into_iter()
            .filter(|edge| edge.label == EDGE_RELATED_TO)
            .filter(|edge| edge.string_property(PROP_NAME) == attr_name)
            .filter_map(|edge| tx.get_node(&edge.to_node))
            .map(|item| item.string_property(PROP_NAME))
            .collect();
        names.join(";")
    } else {
        instance
            .get_property(attr_name)
            .map(|value| value.to_string())
            .unwrap_or_default()
    }
}

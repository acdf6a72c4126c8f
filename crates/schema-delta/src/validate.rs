//! Shape checks for table documents.
//!
//! A table document is an object with a scalar `id` and an optional
//! `properties` object mapping column names to attribute objects. An absent
//! or null document, or an object with neither `id` nor `properties`, stands
//! for "no table" and is valid.

use crate::error::{DeltaError, Result};
use crate::node::{ObjectNode, SchemaNode};

/// Checks that a document has the table shape the op compiler expects.
pub fn validate_document(document: &SchemaNode) -> Result<()> {
    if document.is_nullish() {
        return Ok(());
    }

    let Some(fields) = document.as_object() else {
        return Err(DeltaError::schema_shape(
            "",
            format!("expected a table object, found {}", kind_name(document)),
        ));
    };

    let properties = document.get("properties");
    let table = match fields.get("id") {
        None if properties.is_absent() => return Ok(()),
        None => return Err(DeltaError::schema_shape("id", "missing table id")),
        Some(id) => id.as_name().ok_or_else(|| {
            DeltaError::schema_shape(
                "id",
                format!("table id must be a scalar name, found {}", kind_name(id)),
            )
        })?,
    };

    if properties.is_absent() {
        return Ok(());
    }
    let Some(columns) = properties.as_object() else {
        return Err(DeltaError::schema_shape(
            "properties",
            format!("expected an object of columns, found {}", kind_name(properties)),
        ));
    };

    for (column, definition) in columns {
        if definition.as_object().is_none() {
            return Err(DeltaError::column_shape(
                &table,
                column,
                format!("expected an attribute object, found {}", kind_name(definition)),
            ));
        }
        match definition.get("type") {
            SchemaNode::Absent => {
                return Err(DeltaError::column_shape(
                    &table,
                    column,
                    "missing 'type' attribute",
                ));
            }
            SchemaNode::String(_) => {}
            other => {
                return Err(DeltaError::column_shape(
                    &table,
                    column,
                    format!("'type' must be a string, found {}", kind_name(other)),
                ));
            }
        }
    }

    Ok(())
}

/// Brings a valid document into the canonical form the compiler walks.
///
/// "No table" documents become the empty object. Table documents get `id`
/// first and `properties` second, so the table operation is emitted before
/// column operations, and a missing `properties` becomes an empty object so
/// column changes always surface at `properties.<column>`.
#[must_use]
pub fn normalize_document(document: &SchemaNode) -> SchemaNode {
    match document {
        SchemaNode::Object(fields) if fields.contains_key("id") => {
            let mut normalized = ObjectNode::with_capacity(fields.len() + 1);
            normalized.insert("id".to_string(), document.get("id").clone());
            let properties = match document.get("properties") {
                SchemaNode::Absent => SchemaNode::empty_object(),
                properties => properties.clone(),
            };
            normalized.insert("properties".to_string(), properties);
            for (key, value) in fields {
                if !normalized.contains_key(key) {
                    normalized.insert(key.clone(), value.clone());
                }
            }
            SchemaNode::Object(normalized)
        }
        SchemaNode::Object(_) => document.clone(),
        _ => SchemaNode::empty_object(),
    }
}

fn kind_name(node: &SchemaNode) -> &'static str {
    match node {
        SchemaNode::Absent => "nothing",
        SchemaNode::Null => "null",
        SchemaNode::Bool(_) => "a boolean",
        SchemaNode::Number(_) => "a number",
        SchemaNode::String(_) => "a string",
        SchemaNode::Object(_) => "an object",
        SchemaNode::Array(_) => "an array",
    }
}

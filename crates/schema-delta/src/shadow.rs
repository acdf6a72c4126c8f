//! Shadow clones: the shape of `to` filled with the content of `from`.
//!
//! Rename inference in the delta tree only pairs sibling fields. The op
//! compiler looks up a clone built here to recover what a position held
//! before the change, for example the old table name.

use crate::node::SchemaNode;

/// Builds a node shaped like `to` whose leaves are taken from `from`.
///
/// Positions `from` does not have resolve to [`SchemaNode::Null`].
#[must_use]
pub fn shadow_clone(from: &SchemaNode, to: &SchemaNode) -> SchemaNode {
    match to {
        SchemaNode::Object(fields) => fields
            .iter()
            .map(|(key, value)| (key.clone(), shadow_clone(from.get(key), value)))
            .collect(),
        SchemaNode::Array(items) => {
            let old = from.as_sequence();
            SchemaNode::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, value)| shadow_clone(old.get(i).unwrap_or(&SchemaNode::Absent), value))
                    .collect(),
            )
        }
        _ if from.is_absent() => SchemaNode::Null,
        _ => from.clone(),
    }
}

//! Projection of a delta tree back into a plain document.
//!
//! The projection keeps the `to` side of every comparison and drops whatever
//! was deleted, which is the value the migration should end up with.

use crate::compare::DeltaTag;
use crate::delta::{DeltaArray, DeltaNode, DeltaObject};
use crate::node::SchemaNode;

/// Extracts the reconciled value of a delta node.
///
/// Deleted leaves and arrays project to [`SchemaNode::Absent`].
#[must_use]
pub fn project(node: &DeltaNode) -> SchemaNode {
    match node {
        DeltaNode::Leaf(leaf) if leaf.tag == DeltaTag::Deleted => SchemaNode::Absent,
        DeltaNode::Leaf(leaf) => leaf.data.clone(),
        DeltaNode::Array(array) => project_array(array),
        DeltaNode::Object(fields) => project_object(fields),
    }
}

fn project_array(array: &DeltaArray) -> SchemaNode {
    if array.tag == DeltaTag::Deleted {
        return SchemaNode::Absent;
    }

    SchemaNode::Array(
        array
            .items
            .iter()
            .filter(|item| item.tag != DeltaTag::Deleted)
            .map(|item| item.value.clone())
            .collect(),
    )
}

fn project_object(fields: &DeltaObject) -> SchemaNode {
    fields
        .iter()
        .map(|(key, node)| (key.clone(), project(node)))
        .filter(|(_, value)| !value.is_absent())
        .collect()
}

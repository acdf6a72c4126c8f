//! Structural comparison of schema nodes.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::{ObjectNode, SchemaNode};

/// Classification of a node pair at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaTag {
    /// Both sides are structurally equal.
    Unchanged,
    /// Only the new side has a value.
    Created,
    /// Only the old side has a value.
    Deleted,
    /// A new field carries the unchanged value of a removed sibling.
    Renamed,
    /// Both sides have values that differ.
    Modified,
}

impl DeltaTag {
    /// Returns true for everything but [`DeltaTag::Unchanged`].
    #[must_use]
    pub const fn is_change(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

impl fmt::Display for DeltaTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unchanged => "unchanged",
            Self::Created => "created",
            Self::Deleted => "deleted",
            Self::Renamed => "renamed",
            Self::Modified => "modified",
        };
        f.write_str(s)
    }
}

/// Compares two nodes and classifies the difference.
///
/// Never yields [`DeltaTag::Renamed`]; renames are a property of sibling
/// fields and are inferred by the delta builder.
#[must_use]
pub fn compare(a: &SchemaNode, b: &SchemaNode) -> DeltaTag {
    match (a, b) {
        (SchemaNode::Absent, SchemaNode::Absent) => DeltaTag::Unchanged,
        (SchemaNode::Absent, _) => DeltaTag::Created,
        (_, SchemaNode::Absent) => DeltaTag::Deleted,
        (SchemaNode::Object(x), SchemaNode::Object(y)) => compare_objects(x, y),
        (SchemaNode::Array(x), SchemaNode::Array(y)) => compare_arrays(x, y),
        (x, y) if x.is_scalar() && x == y => DeltaTag::Unchanged,
        _ => DeltaTag::Modified,
    }
}

/// Returns true if both nodes are structurally equal.
#[must_use]
pub fn structurally_equal(a: &SchemaNode, b: &SchemaNode) -> bool {
    compare(a, b) == DeltaTag::Unchanged
}

fn compare_objects(a: &ObjectNode, b: &ObjectNode) -> DeltaTag {
    if a.len() != b.len() {
        return DeltaTag::Modified;
    }

    let a_keys: BTreeSet<&str> = a.keys().map(String::as_str).collect();
    let b_keys: BTreeSet<&str> = b.keys().map(String::as_str).collect();
    if a_keys != b_keys {
        return DeltaTag::Modified;
    }

    let any_changed = a
        .iter()
        .any(|(key, value)| compare(value, b.get(key).unwrap_or(&SchemaNode::Absent)).is_change());
    if any_changed {
        DeltaTag::Modified
    } else {
        DeltaTag::Unchanged
    }
}

fn compare_arrays(a: &[SchemaNode], b: &[SchemaNode]) -> DeltaTag {
    if a.len() != b.len() {
        return DeltaTag::Modified;
    }

    if a.iter().zip(b).any(|(x, y)| compare(x, y).is_change()) {
        DeltaTag::Modified
    } else {
        DeltaTag::Unchanged
    }
}

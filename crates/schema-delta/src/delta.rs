//! Delta tree construction.
//!
//! [`build`] compares a `from` and a `to` document position by position and
//! produces a [`DeltaNode`] tree tagged with [`DeltaTag`]s. Arrays are diffed
//! as sets of values. Object fields that disappear and reappear under a new
//! key with a structurally equal value are reported as renames.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::compare::{compare, structurally_equal, DeltaTag};
use crate::node::{ObjectNode, SchemaNode};

/// Field name to delta, in emission order.
pub type DeltaObject = IndexMap<String, DeltaNode>;

/// Comparison result for a scalar, or for a value compared as a whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaLeaf {
    /// Classification of the pair.
    pub tag: DeltaTag,
    /// The `to` side of the pair.
    pub data: SchemaNode,
    /// Key the value was renamed from. Set only when `tag` is `Renamed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_key: Option<String>,
}

/// One distinct element of a set-wise array diff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaItem {
    /// `Unchanged`, `Created` or `Deleted`.
    pub tag: DeltaTag,
    /// The element value.
    pub value: SchemaNode,
}

/// Set-wise comparison of two arrays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaArray {
    /// Positional comparison of the arrays as a whole.
    pub tag: DeltaTag,
    /// Distinct elements: `from`'s elements first, then new `to` elements.
    pub items: Vec<DeltaItem>,
}

impl DeltaArray {
    /// Iterates over the created and deleted elements only.
    pub fn changes(&self) -> impl Iterator<Item = &DeltaItem> {
        self.items.iter().filter(|item| item.tag.is_change())
    }

    /// Iterates over the deleted element values.
    pub fn deleted(&self) -> impl Iterator<Item = &SchemaNode> {
        self.items_tagged(DeltaTag::Deleted)
    }

    /// Iterates over the created element values.
    pub fn created(&self) -> impl Iterator<Item = &SchemaNode> {
        self.items_tagged(DeltaTag::Created)
    }

    fn items_tagged(&self, tag: DeltaTag) -> impl Iterator<Item = &SchemaNode> {
        self.items
            .iter()
            .filter(move |item| item.tag == tag)
            .map(|item| &item.value)
    }
}

/// A node of the delta tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DeltaNode {
    /// Scalar or whole-value comparison.
    Leaf(DeltaLeaf),
    /// Set-wise array comparison.
    Array(DeltaArray),
    /// Field-by-field object comparison.
    Object(DeltaObject),
}

impl DeltaNode {
    /// Returns the tag of a leaf or array node; `None` for objects.
    #[must_use]
    pub const fn tag(&self) -> Option<DeltaTag> {
        match self {
            Self::Leaf(leaf) => Some(leaf.tag),
            Self::Array(array) => Some(array.tag),
            Self::Object(_) => None,
        }
    }

    /// Returns the children of an object node.
    #[must_use]
    pub const fn as_object(&self) -> Option<&DeltaObject> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Returns the node if it is a leaf.
    #[must_use]
    pub const fn as_leaf(&self) -> Option<&DeltaLeaf> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Returns the node if it is an array diff.
    #[must_use]
    pub const fn as_array(&self) -> Option<&DeltaArray> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Looks up a field of an object node.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_object().and_then(|fields| fields.get(key))
    }

    /// Returns true if this node is a leaf with the given tag.
    #[must_use]
    pub fn is_leaf_tagged(&self, tag: DeltaTag) -> bool {
        self.as_leaf().is_some_and(|leaf| leaf.tag == tag)
    }
}

/// Builds the delta tree between two nodes.
#[must_use]
pub fn build(from: &SchemaNode, to: &SchemaNode) -> DeltaNode {
    match (from, to) {
        (SchemaNode::Array(_), _) | (_, SchemaNode::Array(_)) => {
            DeltaNode::Array(build_array(from, to))
        }
        (SchemaNode::Object(f), SchemaNode::Object(t)) => DeltaNode::Object(build_object(f, t)),
        _ => DeltaNode::Leaf(DeltaLeaf {
            tag: compare(from, to),
            data: to.clone(),
            prev_key: None,
        }),
    }
}

fn build_array(from: &SchemaNode, to: &SchemaNode) -> DeltaArray {
    let old = from.as_sequence();
    let new = to.as_sequence();

    let removals = old.iter().map(|value| {
        let tag = if new.contains(value) {
            DeltaTag::Unchanged
        } else {
            DeltaTag::Deleted
        };
        (tag, value)
    });
    let additions = new.iter().map(|value| {
        let tag = if old.contains(value) {
            DeltaTag::Unchanged
        } else {
            DeltaTag::Created
        };
        (tag, value)
    });

    let mut items: Vec<DeltaItem> = Vec::new();
    for (tag, value) in removals.chain(additions) {
        if !items.iter().any(|item| item.tag == tag && item.value == *value) {
            items.push(DeltaItem {
                tag,
                value: value.clone(),
            });
        }
    }

    DeltaArray {
        tag: compare(from, to),
        items,
    }
}

fn build_object(from: &ObjectNode, to: &ObjectNode) -> DeltaObject {
    let absent = SchemaNode::Absent;

    let mut fields: Vec<(&str, DeltaNode)> = Vec::with_capacity(from.len() + to.len());
    for (key, old) in from {
        fields.push((key.as_str(), build(old, to.get(key).unwrap_or(&absent))));
    }
    for (key, new) in to {
        if !from.contains_key(key) {
            fields.push((key.as_str(), build(&absent, new)));
        }
    }

    let renames = infer_renames(from, to, &fields);
    let consumed: HashSet<&str> = renames.iter().map(|(_, old)| *old).collect();

    fields
        .into_iter()
        .filter(|(key, _)| !consumed.contains(key))
        .map(|(key, node)| {
            let renamed_from = renames
                .iter()
                .find(|(new, _)| *new == key)
                .map(|(_, old)| (*old).to_string());
            let node = match (node, renamed_from) {
                (DeltaNode::Leaf(leaf), Some(prev)) => DeltaNode::Leaf(DeltaLeaf {
                    tag: DeltaTag::Renamed,
                    data: leaf.data,
                    prev_key: Some(prev),
                }),
                (node, _) => node,
            };
            (key.to_string(), node)
        })
        .collect()
}

/// Pairs created composite fields with deleted fields carrying the same value.
///
/// Returns `(new_key, old_key)` pairs. Candidates are scanned in `from`'s key
/// order and each old key is consumed at most once. Only deleted fields are
/// candidates; a field that survives in `to` is never a rename source.
fn infer_renames<'a>(
    from: &'a ObjectNode,
    to: &'a ObjectNode,
    fields: &[(&'a str, DeltaNode)],
) -> Vec<(&'a str, &'a str)> {
    let deleted: HashSet<&str> = fields
        .iter()
        .filter(|(_, node)| node.is_leaf_tagged(DeltaTag::Deleted))
        .map(|(key, _)| *key)
        .collect();

    let mut consumed: HashSet<&str> = HashSet::new();
    let mut renames = Vec::new();

    for (new_key, node) in fields {
        if !node.is_leaf_tagged(DeltaTag::Created) {
            continue;
        }
        let Some(new_value) = to.get(*new_key) else {
            continue;
        };
        if new_value.is_scalar() {
            continue;
        }

        let matched = from.iter().find(|(old_key, old_value)| {
            deleted.contains(old_key.as_str())
                && !consumed.contains(old_key.as_str())
                && structurally_equal(new_value, old_value)
        });

        if let Some((old_key, _)) = matched {
            debug!(from = %old_key, to = %new_key, "inferred field rename");
            consumed.insert(old_key.as_str());
            renames.push((*new_key, old_key.as_str()));
        }
    }

    renames
}

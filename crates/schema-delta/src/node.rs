//! Schema document nodes.
//!
//! A [`SchemaNode`] is one position in a hierarchical schema document: a
//! scalar leaf, a keyed object, or an ordered sequence. The variant is the
//! discriminant, so classification never re-inspects the value's shape.
//!
//! [`SchemaNode::Absent`] marks a field that does not exist at all and is
//! distinct from [`SchemaNode::Null`]. The comparator relies on that
//! difference to tell created and deleted fields apart from nulled ones.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// Keyed children of an object node, in document order.
///
/// Equality ignores key order.
pub type ObjectNode = IndexMap<String, SchemaNode>;

static ABSENT: SchemaNode = SchemaNode::Absent;

/// Structural shape of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// String, number, boolean, null or absent.
    Scalar,
    /// Keyed mapping.
    Object,
    /// Ordered sequence.
    Array,
}

/// One node of a schema document.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SchemaNode {
    /// The field does not exist.
    #[default]
    Absent,
    /// Explicit null.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Numeric scalar.
    Number(Number),
    /// String scalar.
    String(String),
    /// Keyed mapping.
    Object(ObjectNode),
    /// Ordered sequence.
    Array(Vec<SchemaNode>),
}

/// Classifies a node by its shape.
#[must_use]
pub const fn classify(node: &SchemaNode) -> NodeKind {
    node.kind()
}

impl SchemaNode {
    /// Creates an empty object node.
    #[must_use]
    pub fn empty_object() -> Self {
        Self::Object(ObjectNode::new())
    }

    /// Returns the shape of this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Object(_) => NodeKind::Object,
            Self::Array(_) => NodeKind::Array,
            Self::Absent | Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_) => {
                NodeKind::Scalar
            }
        }
    }

    /// Returns true if this node marks a missing field.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns true for absent and null nodes.
    #[must_use]
    pub const fn is_nullish(&self) -> bool {
        matches!(self, Self::Absent | Self::Null)
    }

    /// Returns true if this node is a scalar leaf.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self.kind(), NodeKind::Scalar)
    }

    /// Looks up a field of an object node.
    ///
    /// Missing fields and non-object nodes yield [`SchemaNode::Absent`].
    #[must_use]
    pub fn get(&self, key: &str) -> &Self {
        match self {
            Self::Object(map) => map.get(key).unwrap_or(&ABSENT),
            _ => &ABSENT,
        }
    }

    /// Returns the children of an object node.
    #[must_use]
    pub const fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the elements of an array node.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the contents of a string node.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the node as an identifier (table or column name).
    ///
    /// Strings are used verbatim; numbers and booleans are formatted.
    #[must_use]
    pub fn as_name(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Views this node as a sequence.
    ///
    /// Arrays are returned as-is, absent and null become empty, and any
    /// other node becomes a one-element sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Vec<Self> {
        match self {
            Self::Array(items) => items.clone(),
            Self::Absent | Self::Null => Vec::new(),
            other => vec![other.clone()],
        }
    }

    /// Converts into a JSON value. Absent nodes have no JSON form.
    #[must_use]
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Absent => None,
            Self::Null => Some(Value::Null),
            Self::Bool(b) => Some(Value::Bool(b)),
            Self::Number(n) => Some(Value::Number(n)),
            Self::String(s) => Some(Value::String(s)),
            Self::Object(map) => Some(Value::Object(
                map.into_iter()
                    .filter_map(|(k, v)| v.into_json().map(|v| (k, v)))
                    .collect(),
            )),
            Self::Array(items) => Some(Value::Array(
                items
                    .into_iter()
                    .map(|v| v.into_json().unwrap_or(Value::Null))
                    .collect(),
            )),
        }
    }
}

impl From<Value> for SchemaNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for SchemaNode {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for SchemaNode {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for SchemaNode {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for SchemaNode {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<ObjectNode> for SchemaNode {
    fn from(map: ObjectNode) -> Self {
        Self::Object(map)
    }
}

impl FromIterator<(String, Self)> for SchemaNode {
    fn from_iter<I: IntoIterator<Item = (String, Self)>>(iter: I) -> Self {
        Self::Object(iter.into_iter().collect())
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent | Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Object(map) => map.serialize(serializer),
            Self::Array(items) => items.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for SchemaNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

impl fmt::Display for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_absent() {
            return f.write_str("<absent>");
        }
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify() {
        assert_eq!(classify(&SchemaNode::Absent), NodeKind::Scalar);
        assert_eq!(classify(&SchemaNode::Null), NodeKind::Scalar);
        assert_eq!(classify(&SchemaNode::from("x")), NodeKind::Scalar);
        assert_eq!(classify(&SchemaNode::from(json!(1.5))), NodeKind::Scalar);
        assert_eq!(classify(&SchemaNode::from(json!({"a": 1}))), NodeKind::Object);
        assert_eq!(classify(&SchemaNode::from(json!([1, 2]))), NodeKind::Array);
    }

    #[test]
    fn test_object_equality_ignores_key_order() {
        let a = SchemaNode::from(json!({"type": "int", "allowNull": false}));
        let b = SchemaNode::from(json!({"allowNull": false, "type": "int"}));
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_json_preserves_key_order() {
        let node = SchemaNode::from(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let keys: Vec<&str> = node
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_get_missing_is_absent() {
        let node = SchemaNode::from(json!({"id": "users"}));
        assert_eq!(node.get("id"), &SchemaNode::from("users"));
        assert!(node.get("properties").is_absent());
        assert!(SchemaNode::from("users").get("id").is_absent());
    }

    #[test]
    fn test_as_sequence() {
        assert!(SchemaNode::Absent.as_sequence().is_empty());
        assert!(SchemaNode::Null.as_sequence().is_empty());
        assert_eq!(
            SchemaNode::from("a").as_sequence(),
            vec![SchemaNode::from("a")]
        );
        assert_eq!(SchemaNode::from(json!([1, 2])).as_sequence().len(), 2);
    }

    #[test]
    fn test_as_name() {
        assert_eq!(SchemaNode::from("users").as_name().as_deref(), Some("users"));
        assert_eq!(SchemaNode::from(42).as_name().as_deref(), Some("42"));
        assert_eq!(SchemaNode::Null.as_name(), None);
        assert_eq!(SchemaNode::from(json!({})).as_name(), None);
    }

    #[test]
    fn test_json_conversion() {
        let value = json!({"id": "t", "tags": ["a", null], "n": 3});
        let node = SchemaNode::from(value.clone());
        assert_eq!(node.clone().into_json(), Some(value.clone()));
        assert_eq!(serde_json::to_value(&node).unwrap(), value);

        let back: SchemaNode = serde_json::from_value(value).unwrap();
        assert_eq!(back, node);
        assert_eq!(SchemaNode::Absent.into_json(), None);
    }

    #[test]
    fn test_into_json_drops_absent_fields() {
        let node: SchemaNode = vec![
            ("a".to_string(), SchemaNode::from(1)),
            ("b".to_string(), SchemaNode::Absent),
        ]
        .into_iter()
        .collect();
        assert_eq!(node.into_json(), Some(json!({"a": 1})));
    }

    #[test]
    fn test_display() {
        assert_eq!(SchemaNode::from("x").to_string(), "\"x\"");
        assert_eq!(SchemaNode::Absent.to_string(), "<absent>");
        assert_eq!(SchemaNode::from(json!([1, true])).to_string(), "[1,true]");
    }
}

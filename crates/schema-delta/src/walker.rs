//! Depth-first traversal of a delta tree.

use tracing::trace;

use crate::compare::DeltaTag;
use crate::delta::{DeltaArray, DeltaLeaf, DeltaNode, DeltaObject};
use crate::error::Result;
use crate::node::SchemaNode;
use crate::project::project;

/// What the walker reports for each leaf or array delta.
#[derive(Debug)]
pub struct Visit<'a> {
    /// Keys from the root to this node.
    pub path: &'a [&'a str],
    /// Tag of the visited node.
    pub tag: DeltaTag,
    /// Projected (`to`-side) value of the visited node.
    pub value: SchemaNode,
    /// What the position held before: the shadow clone's value, or the
    /// `from` document's value where the shadow has nothing.
    pub previous: &'a SchemaNode,
    /// Object delta that contains the visited node.
    pub parent: &'a DeltaObject,
    /// The visited node itself.
    pub node: &'a DeltaNode,
}

impl Visit<'_> {
    /// Returns the last key of the path.
    #[must_use]
    pub fn key(&self) -> &str {
        self.path.last().copied().unwrap_or_default()
    }
}

/// Walks `delta` depth-first in field order, calling `visitor` for every
/// leaf and array node.
///
/// `source` is the `from` document and `shadow` its shadow clone; both are
/// descended in step with the delta. A non-object root has no fields and is
/// not visited.
pub fn walk<F>(delta: &DeltaNode, source: &SchemaNode, shadow: &SchemaNode, mut visitor: F) -> Result<()>
where
    F: FnMut(&Visit<'_>) -> Result<()>,
{
    let Some(fields) = delta.as_object() else {
        return Ok(());
    };
    let mut path = Vec::new();
    walk_fields(fields, source, shadow, &mut path, &mut visitor)
}

fn walk_fields<'d, F>(
    fields: &'d DeltaObject,
    source: &SchemaNode,
    shadow: &SchemaNode,
    path: &mut Vec<&'d str>,
    visitor: &mut F,
) -> Result<()>
where
    F: FnMut(&Visit<'_>) -> Result<()>,
{
    for (key, node) in fields {
        path.push(key.as_str());

        match node {
            DeltaNode::Object(children) => {
                walk_fields(children, source.get(key), shadow.get(key), path, visitor)?;
            }
            DeltaNode::Leaf(DeltaLeaf { tag, .. }) | DeltaNode::Array(DeltaArray { tag, .. }) => {
                let previous = match shadow.get(key) {
                    old if old.is_nullish() => source.get(key),
                    old => old,
                };
                let visit = Visit {
                    path: path.as_slice(),
                    tag: *tag,
                    value: project(node),
                    previous,
                    parent: fields,
                    node,
                };
                trace!(path = %visit.path.join("."), tag = %visit.tag, "visiting delta");
                visitor(&visit)?;
            }
        }

        path.pop();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::build;
    use crate::shadow::shadow_clone;
    use serde_json::json;

    fn node(value: serde_json::Value) -> SchemaNode {
        SchemaNode::from(value)
    }

    fn collect(from: &SchemaNode, to: &SchemaNode) -> Vec<(String, DeltaTag, SchemaNode, SchemaNode)> {
        let delta = build(from, to);
        let shadow = shadow_clone(from, to);
        let mut seen = Vec::new();
        walk(&delta, from, &shadow, |visit| {
            seen.push((
                visit.path.join("."),
                visit.tag,
                visit.value.clone(),
                visit.previous.clone(),
            ));
            Ok(())
        })
        .unwrap();
        seen
    }

    #[test]
    fn test_visits_leaves_in_order() {
        let from = node(json!({"id": "t", "properties": {"b": {"type": "int"}, "a": {"type": "int"}}}));
        let to = node(json!({"id": "t", "properties": {"a": {"type": "int"}, "c": {"type": "text"}}}));
        let paths: Vec<String> = collect(&from, &to).into_iter().map(|v| v.0).collect();
        assert_eq!(
            paths,
            vec!["id", "properties.b", "properties.a.type", "properties.c"]
        );
    }

    #[test]
    fn test_previous_comes_from_shadow() {
        let from = node(json!({"id": "users"}));
        let to = node(json!({"id": "accounts"}));
        let seen = collect(&from, &to);
        assert_eq!(
            seen,
            vec![(
                "id".to_string(),
                DeltaTag::Modified,
                node(json!("accounts")),
                node(json!("users")),
            )]
        );
    }

    #[test]
    fn test_previous_falls_back_to_source() {
        let from = node(json!({"id": "users"}));
        let to = node(json!({}));
        let seen = collect(&from, &to);
        assert_eq!(seen[0].1, DeltaTag::Deleted);
        assert!(seen[0].2.is_absent());
        assert_eq!(seen[0].3, node(json!("users")));
    }

    #[test]
    fn test_arrays_are_visited_whole() {
        let from = node(json!({"enum": ["a", "b"]}));
        let to = node(json!({"enum": ["b", "c"]}));
        let seen = collect(&from, &to);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "enum");
        assert_eq!(seen[0].2, node(json!(["b", "c"])));
    }

    #[test]
    fn test_visit_exposes_parent_and_key() {
        let from = node(json!({"col": {"type": "int"}}));
        let to = node(json!({"col": {"type": "int", "unique": true}}));
        let delta = build(&from, &to);
        let shadow = shadow_clone(&from, &to);
        let mut keys = Vec::new();
        walk(&delta, &from, &shadow, |visit| {
            assert!(visit.parent.contains_key("type"));
            keys.push(visit.key().to_string());
            Ok(())
        })
        .unwrap();
        assert_eq!(keys, vec!["type", "unique"]);
    }

    #[test]
    fn test_non_object_root_is_not_visited() {
        let delta = build(&node(json!("a")), &node(json!("b")));
        let mut count = 0;
        walk(&delta, &SchemaNode::Absent, &SchemaNode::Absent, |_| {
            count += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(count, 0);
    }
}

//! Integration tests for the diff pipeline.
//!
//! These tests run whole table documents through validation, delta
//! building, shadow cloning and compilation, and check the operations that
//! come out.

use schema_delta::prelude::*;
use serde_json::{json, Value};

fn node(value: Value) -> SchemaNode {
    SchemaNode::from(value)
}

fn ops(from: Value, to: Value) -> Vec<MutationOp> {
    diff_schemas(&node(from), &node(to), &CompileOptions::default()).unwrap()
}

// =============================================================================
// Table and column scenarios
// =============================================================================

#[test]
fn rename_table() {
    assert_eq!(
        ops(json!({"id": "users"}), json!({"id": "accounts"})),
        vec![MutationOp::rename_table("users", "accounts")]
    );
}

#[test]
fn rename_column() {
    assert_eq!(
        ops(
            json!({"id": "t", "properties": {"name": {"type": "string"}}}),
            json!({"id": "t", "properties": {"label": {"type": "string"}}}),
        ),
        vec![MutationOp::rename_column("t", "name", "label")]
    );
}

#[test]
fn change_column_with_added_attribute() {
    assert_eq!(
        ops(
            json!({"id": "t", "properties": {"age": {"type": "int"}}}),
            json!({"id": "t", "properties": {"age": {"type": "int", "allowNull": false}}}),
        ),
        vec![MutationOp::change_column(
            "t",
            "age",
            ColumnAttrs::of_type("int").with("allowNull", false),
        )]
    );
}

#[test]
fn add_column_to_table_without_properties() {
    assert_eq!(
        ops(
            json!({"id": "t"}),
            json!({"id": "t", "properties": {"email": {"type": "string"}}}),
        ),
        vec![MutationOp::add_column(
            "t",
            "email",
            ColumnAttrs::of_type("string"),
        )]
    );
}

#[test]
fn remove_last_column() {
    assert_eq!(
        ops(
            json!({"id": "t", "properties": {"x": {"type": "int"}}}),
            json!({"id": "t"}),
        ),
        vec![MutationOp::remove_column("t", "x")]
    );
}

#[test]
fn create_then_drop_round_trip() {
    let table = json!({
        "id": "posts",
        "properties": {
            "id": {"type": "integer", "primaryKey": true},
            "status": {"type": "enum", "enum": ["draft", "published"]},
        },
    });

    let created = diff_schemas(
        &SchemaNode::Absent,
        &node(table.clone()),
        &CompileOptions::default(),
    )
    .unwrap();
    assert_eq!(created.len(), 1);
    let MutationOp::CreateTable { name, columns, .. } = &created[0] else {
        panic!("Expected CreateTable, got {:?}", created[0]);
    };
    assert_eq!(name, "posts");
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "status"]);
    assert_eq!(
        columns[1].attrs.enum_values().unwrap(),
        &[node(json!("draft")), node(json!("published"))]
    );

    let dropped =
        diff_schemas(&node(table), &SchemaNode::Absent, &CompileOptions::default()).unwrap();
    assert_eq!(dropped, vec![MutationOp::drop_table("posts")]);
    assert_eq!(created[0].reverse().unwrap(), dropped[0]);
}

#[test]
fn mixed_changes_follow_traversal_order() {
    let from = json!({
        "id": "users",
        "properties": {
            "id": {"type": "integer"},
            "name": {"type": "string", "allowNull": false},
            "age": {"type": "int"},
            "legacy": {"type": "text"},
        },
    });
    let to = json!({
        "id": "people",
        "properties": {
            "id": {"type": "integer"},
            "full_name": {"type": "string", "allowNull": false},
            "age": {"type": "bigint"},
            "email": {"type": "string", "unique": true},
        },
    });

    assert_eq!(
        ops(from, to),
        vec![
            MutationOp::rename_table("users", "people"),
            MutationOp::change_column("people", "age", ColumnAttrs::of_type("bigint")),
            MutationOp::remove_column("people", "legacy"),
            MutationOp::rename_column("people", "name", "full_name"),
            MutationOp::add_column(
                "people",
                "email",
                ColumnAttrs::of_type("string").with("unique", true),
            ),
        ]
    );
}

#[test]
fn rename_never_reuses_a_consumed_column() {
    let result = ops(
        json!({"id": "t", "properties": {"a": {"type": "int"}}}),
        json!({"id": "t", "properties": {"b": {"type": "int"}, "c": {"type": "int"}}}),
    );
    assert_eq!(
        result,
        vec![
            MutationOp::rename_column("t", "a", "b"),
            MutationOp::add_column("t", "c", ColumnAttrs::of_type("int")),
        ]
    );
}

#[test]
fn missing_type_is_a_column_shape_error() {
    let err = diff_schemas(
        &node(json!({"id": "t"})),
        &node(json!({"id": "t", "properties": {"email": {"unique": true}}})),
        &CompileOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, DeltaError::ColumnShape { .. }));
    assert_eq!(err.path(), "properties.email");
}

// =============================================================================
// Engine properties
// =============================================================================

#[test]
fn build_then_project_is_identity() {
    let documents = [
        json!({"id": "t"}),
        json!({"id": "t", "properties": {"a": {"type": "int", "enum": [1, 2, 3]}}}),
        json!({"nested": {"deep": [{"x": null}, "y"]}, "flag": false}),
        json!([]),
        json!("scalar"),
    ];
    for document in documents {
        let x = node(document);
        assert_eq!(project(&build(&x, &x)), x);
    }
}

#[test]
fn compare_presence_rules() {
    let present = node(json!({"type": "int"}));
    assert_eq!(compare(&present, &present), DeltaTag::Unchanged);
    assert_eq!(compare(&SchemaNode::Absent, &present), DeltaTag::Created);
    assert_eq!(compare(&present, &SchemaNode::Absent), DeltaTag::Deleted);
}

#[test]
fn array_diff_collapses_duplicates() {
    let delta = build(&node(json!([1, 2, 2, 3])), &node(json!([2, 3, 4])));
    let array = delta.as_array().unwrap();
    let deleted: Vec<&SchemaNode> = array.deleted().collect();
    let created: Vec<&SchemaNode> = array.created().collect();
    assert_eq!(deleted, vec![&node(json!(1))]);
    assert_eq!(created, vec![&node(json!(4))]);
}

#[test]
fn shadow_clone_matches_to_shape() {
    let from = node(json!({"id": "users", "properties": {"a": {"type": "int"}}}));
    let to = node(json!({"id": "accounts", "properties": {"b": {"type": "int"}}, "options": {}}));
    let shadow = shadow_clone(&from, &to);
    assert_eq!(
        shadow,
        node(json!({"id": "users", "properties": {"b": {"type": null}}, "options": {}}))
    );
}

#[test]
fn ops_serialize_for_renderers() {
    let result = ops(json!({"id": "users"}), json!({"id": "accounts"}));
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!([{"op": "rename_table", "from": "users", "to": "accounts"}])
    );
}

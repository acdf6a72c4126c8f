//! Renders mutation operations as `queryInterface` migration script text.
//!
//! Every operation becomes one call statement. Column bodies list the type as
//! `dataTypes.<type>` exactly as declared, followed by the scalar attributes of the column. Table
//! options are passed as a trailing argument.

use schema_delta::prelude::*;

/// Renders the forward (`up`) statements for `ops`.
pub fn render_up(ops: &[MutationOp], indent: usize) -> String {
    let pad = " ".repeat(indent);
    ops.iter()
        .map(|op| render_op(op, &pad))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the rollback (`down`) statements for `ops`.
///
/// Reversible operations are undone in reverse order. Operations without an
/// inverse are skipped.
pub fn render_down(ops: &[MutationOp], indent: usize) -> String {
    let reversed: Vec<MutationOp> = ops.iter().rev().filter_map(MutationOp::reverse).collect();
    render_up(&reversed, indent)
}

fn render_op(op: &MutationOp, pad: &str) -> String {
    match op {
        MutationOp::CreateTable {
            name,
            columns,
            options,
        } => {
            let mut lines = vec![format!("{pad}queryInterface.createTable({}, {{", quote(name))];
            for column in columns {
                lines.push(format!("{pad}  {}: {{", column.name));
                lines.extend(column_body(&column.attrs, &format!("{pad}    ")));
                lines.push(format!("{pad}  }},"));
            }
            lines.push(format!("{pad}}}{});", trailing_options(options.as_ref(), pad)));
            lines.join("\n")
        }
        MutationOp::DropTable { name, options } => format!(
            "{pad}queryInterface.dropTable({}{});",
            quote(name),
            trailing_options(options.as_ref(), pad)
        ),
        MutationOp::RenameTable { from, to, options } => format!(
            "{pad}queryInterface.renameTable({}, {}{});",
            quote(from),
            quote(to),
            trailing_options(options.as_ref(), pad)
        ),
        MutationOp::AddColumn { table, name, attrs } => {
            column_call("addColumn", table, name, attrs, pad)
        }
        MutationOp::RemoveColumn { table, name } => {
            format!(
                "{pad}queryInterface.removeColumn({}, {});",
                quote(table),
                quote(name)
            )
        }
        MutationOp::RenameColumn { table, from, to } => {
            format!(
                "{pad}queryInterface.renameColumn({}, {}, {});",
                quote(table),
                quote(from),
                quote(to)
            )
        }
        MutationOp::ChangeColumn { table, name, attrs } => {
            column_call("changeColumn", table, name, attrs, pad)
        }
    }
}

fn column_call(method: &str, table: &str, name: &str, attrs: &ColumnAttrs, pad: &str) -> String {
    let mut lines = vec![format!(
        "{pad}queryInterface.{method}({}, {}, {{",
        quote(table),
        quote(name)
    )];
    lines.extend(column_body(attrs, &format!("{pad}  ")));
    lines.push(format!("{pad}}});"));
    lines.join("\n")
}

fn column_body(attrs: &ColumnAttrs, prefix: &str) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(column_type) = attrs.column_type() {
        let suffix = attrs
            .enum_values()
            .map(|values| format!("({})", join_values(values, 0)))
            .unwrap_or_default();
        lines.push(format!("{prefix}type: dataTypes.{column_type}{suffix},"));
    }

    for (key, value) in attrs.scalar_attrs() {
        lines.push(format!("{prefix}{key}: {},", literal(value, 0)));
    }

    lines
}

fn trailing_options(options: Option<&SchemaNode>, pad: &str) -> String {
    options
        .filter(|options| !options.is_nullish())
        .map(|options| format!(", {}", literal(options, pad.len())))
        .unwrap_or_default()
}

fn join_values(values: &[SchemaNode], depth: usize) -> String {
    values
        .iter()
        .map(|value| literal(value, depth))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Single-quotes a string for the script, escaping backslashes and quotes.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Formats a node as a script literal.
fn literal(node: &SchemaNode, depth: usize) -> String {
    match node {
        SchemaNode::Absent => "undefined".to_string(),
        SchemaNode::Null => "null".to_string(),
        SchemaNode::Bool(b) => b.to_string(),
        SchemaNode::Number(n) => n.to_string(),
        SchemaNode::String(s) => quote(s),
        SchemaNode::Array(items) => format!("[{}]", join_values(items, depth)),
        SchemaNode::Object(fields) => {
            let pad = " ".repeat(depth);
            let mut lines = vec!["{".to_string()];
            for (key, value) in fields {
                if value.is_absent() {
                    continue;
                }
                lines.push(format!("{pad}  {key}: {},", literal(value, depth + 2)));
            }
            lines.push(format!("{pad}}}"));
            lines.join("\n")
        }
    }
}

//! Compiles a delta tree into mutation operations.
//!
//! The compiler expects table documents: a scalar `id` naming the table and
//! a `properties` object mapping column names to attribute objects. It walks
//! the delta tree and turns every tagged leaf under `id` or `properties` into
//! at most one [`MutationOp`], so the operations come out in traversal order.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::compare::DeltaTag;
use crate::delta::{build, DeltaNode};
use crate::error::{DeltaError, Result};
use crate::node::SchemaNode;
use crate::operations::{Column, ColumnAttrs, MutationOp};
use crate::project::project;
use crate::shadow::shadow_clone;
use crate::validate::{normalize_document, validate_document};
use crate::walker::{walk, Visit};

/// Options for the op compiler.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Emit `ChangeColumn` for modified columns that declare an `enum`.
    pub emit_enum_changes: bool,
    /// When a single attribute is added to a column, emit only `type` and
    /// that attribute instead of the full attribute set.
    pub minimal_attribute_changes: bool,
}

impl CompileOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables `ChangeColumn` for enumerated columns.
    #[must_use]
    pub fn with_enum_changes(mut self) -> Self {
        self.emit_enum_changes = true;
        self
    }

    /// Enables minimal attribute sets for single-attribute additions.
    #[must_use]
    pub fn with_minimal_attribute_changes(mut self) -> Self {
        self.minimal_attribute_changes = true;
        self
    }
}

/// Turns delta trees of table documents into mutation operations.
#[derive(Debug, Default)]
pub struct OpCompiler {
    options: CompileOptions,
}

/// Accumulated output of one compile.
#[derive(Default)]
struct Emitter {
    ops: Vec<MutationOp>,
    changed_columns: HashSet<String>,
}

impl Emitter {
    fn emit(&mut self, op: MutationOp) {
        debug!(op = %op.description(), "emitting mutation");
        self.ops.push(op);
    }
}

impl OpCompiler {
    /// Creates a compiler with default options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: CompileOptions::default(),
        }
    }

    /// Creates a compiler with custom options.
    #[must_use]
    pub const fn with_options(options: CompileOptions) -> Self {
        Self { options }
    }

    /// Returns the options in effect.
    #[must_use]
    pub const fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Validates two table documents and returns the operations that turn
    /// `from` into `to`.
    ///
    /// An absent or null document means the table does not exist on that
    /// side, which yields `CreateTable` or `DropTable`.
    pub fn diff(&self, from: &SchemaNode, to: &SchemaNode) -> Result<Vec<MutationOp>> {
        validate_document(from)?;
        validate_document(to)?;

        let from = normalize_document(from);
        let to = normalize_document(to);

        let delta = build(&from, &to);
        let shadow = shadow_clone(&from, &to);
        self.compile(&from, &delta, &shadow)
    }

    /// Compiles a delta tree built from `source` into operations.
    ///
    /// `shadow` must be the shadow clone of the same `from`/`to` pair.
    pub fn compile(
        &self,
        source: &SchemaNode,
        delta: &DeltaNode,
        shadow: &SchemaNode,
    ) -> Result<Vec<MutationOp>> {
        let table = delta.get("id").map(project).and_then(|id| id.as_name());
        let mut emitter = Emitter::default();

        walk(delta, source, shadow, |visit| match visit.path {
            ["id"] => self.table_op(visit, delta, &mut emitter),
            ["properties", column, rest @ ..] => {
                self.column_op(visit, delta, table.as_deref(), column, rest, &mut emitter)
            }
            _ => Ok(()),
        })?;

        Ok(emitter.ops)
    }

    fn table_op(&self, visit: &Visit<'_>, root: &DeltaNode, emitter: &mut Emitter) -> Result<()> {
        let options = table_options(root);

        match visit.tag {
            DeltaTag::Created => {
                let name = table_name(&visit.value)?;
                let columns = match root.get("properties") {
                    Some(properties) if properties.is_leaf_tagged(DeltaTag::Created) => {
                        table_columns(&name, &project(properties))?
                    }
                    _ => Vec::new(),
                };
                emitter.emit(MutationOp::create_table(name, columns).with_options(options));
            }
            DeltaTag::Deleted => {
                let name = table_name(visit.previous)?;
                emitter.emit(MutationOp::drop_table(name).with_options(options));
            }
            DeltaTag::Modified => {
                let from = table_name(visit.previous)?;
                let to = table_name(&visit.value)?;
                emitter.emit(MutationOp::rename_table(from, to).with_options(options));
            }
            DeltaTag::Unchanged | DeltaTag::Renamed => {}
        }

        Ok(())
    }

    fn column_op(
        &self,
        visit: &Visit<'_>,
        root: &DeltaNode,
        table: Option<&str>,
        column: &str,
        rest: &[&str],
        emitter: &mut Emitter,
    ) -> Result<()> {
        if !visit.tag.is_change() {
            return Ok(());
        }
        let table = table
            .ok_or_else(|| DeltaError::schema_shape("id", "column changes require a table id"))?;

        match (visit.tag, rest.first().copied()) {
            (DeltaTag::Created, None) => {
                let attrs = column_attrs(table, column, visit.value.clone())?;
                emitter.emit(MutationOp::add_column(table, column, attrs));
            }
            (DeltaTag::Renamed, None) => {
                if let Some(prev) = visit.node.as_leaf().and_then(|leaf| leaf.prev_key.as_ref()) {
                    emitter.emit(MutationOp::rename_column(table, prev.as_str(), column));
                }
            }
            (DeltaTag::Deleted, None) => {
                emitter.emit(MutationOp::remove_column(table, column));
            }
            (DeltaTag::Modified, _) => {
                self.change_column(root, table, column, None, emitter)?;
            }
            // A renamed attribute is a new attribute on the same column
            (DeltaTag::Created | DeltaTag::Renamed, Some(attribute)) => {
                self.change_column(root, table, column, Some(attribute), emitter)?;
            }
            _ => {}
        }

        Ok(())
    }

    fn change_column(
        &self,
        root: &DeltaNode,
        table: &str,
        column: &str,
        added_attribute: Option<&str>,
        emitter: &mut Emitter,
    ) -> Result<()> {
        if emitter.changed_columns.contains(column) {
            return Ok(());
        }

        let Some(column_delta) = root.get("properties").and_then(|p| p.get(column)) else {
            return Ok(());
        };
        let declares_enum = column_delta.get("enum").is_some();

        if added_attribute.is_none() && declares_enum && !self.options.emit_enum_changes {
            warn!(table, column, "skipping change to enumerated column");
            return Ok(());
        }

        let full = column_attrs(table, column, project(column_delta))?;
        let attrs = match added_attribute {
            Some(attribute) if self.options.minimal_attribute_changes && !declares_enum => {
                minimal_attrs(&full, attribute)
            }
            _ => full,
        };

        emitter.changed_columns.insert(column.to_string());
        emitter.emit(MutationOp::change_column(table, column, attrs));
        Ok(())
    }
}

/// Validates and diffs two table documents with the given options.
pub fn diff_schemas(
    from: &SchemaNode,
    to: &SchemaNode,
    options: &CompileOptions,
) -> Result<Vec<MutationOp>> {
    OpCompiler::with_options(options.clone()).diff(from, to)
}

fn table_name(id: &SchemaNode) -> Result<String> {
    id.as_name()
        .ok_or_else(|| DeltaError::schema_shape("id", format!("expected a table name, found {}", id)))
}

/// Projected table-level `options`, unless they were removed.
fn table_options(root: &DeltaNode) -> Option<SchemaNode> {
    let options = root.get("options")?;
    if options.tag() == Some(DeltaTag::Deleted) {
        return None;
    }
    Some(project(options)).filter(|value| !value.is_absent())
}

fn table_columns(table: &str, properties: &SchemaNode) -> Result<Vec<Column>> {
    let Some(columns) = properties.as_object() else {
        return Err(DeltaError::schema_shape(
            "properties",
            "expected an object of columns",
        ));
    };

    columns
        .iter()
        .map(|(name, definition)| {
            column_attrs(table, name, definition.clone()).map(|attrs| Column::new(name, attrs))
        })
        .collect()
}

fn column_attrs(table: &str, column: &str, definition: SchemaNode) -> Result<ColumnAttrs> {
    let attrs = ColumnAttrs::from_node(definition)
        .ok_or_else(|| DeltaError::column_shape(table, column, "expected an attribute object"))?;
    if attrs.column_type().is_none() {
        return Err(DeltaError::column_shape(
            table,
            column,
            "missing 'type' attribute",
        ));
    }
    Ok(attrs)
}

fn minimal_attrs(full: &ColumnAttrs, attribute: &str) -> ColumnAttrs {
    let mut attrs = ColumnAttrs::default();
    if let Some(column_type) = full.get("type") {
        attrs = attrs.with("type", column_type.clone());
    }
    if let Some(value) = full.get(attribute) {
        attrs = attrs.with(attribute, value.clone());
    }
    attrs
}

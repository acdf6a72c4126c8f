//! Schema mutation operations.
//!
//! This module defines the abstract changes a diff compiles into. They carry
//! names and attribute maps only; turning them into migration source text or
//! calls against a database is left to the caller.

use serde::{Deserialize, Serialize};

use crate::node::{ObjectNode, SchemaNode};

/// Attribute object of a column (`type`, optional `enum`, `options`, ...).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnAttrs(ObjectNode);

impl ColumnAttrs {
    /// Creates attributes from an attribute map.
    #[must_use]
    pub const fn new(attrs: ObjectNode) -> Self {
        Self(attrs)
    }

    /// Creates attributes holding only a type.
    #[must_use]
    pub fn of_type(column_type: impl Into<String>) -> Self {
        Self::default().with("type", SchemaNode::String(column_type.into()))
    }

    /// Wraps an object node; `None` for any other shape.
    #[must_use]
    pub fn from_node(node: SchemaNode) -> Option<Self> {
        match node {
            SchemaNode::Object(attrs) => Some(Self(attrs)),
            _ => None,
        }
    }

    /// Sets an attribute.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SchemaNode>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns the declared type name.
    #[must_use]
    pub fn column_type(&self) -> Option<&str> {
        self.0.get("type").and_then(SchemaNode::as_str)
    }

    /// Returns the allowed values of an enumerated column.
    #[must_use]
    pub fn enum_values(&self) -> Option<&[SchemaNode]> {
        self.0.get("enum").and_then(SchemaNode::as_array)
    }

    /// Returns the free-form `options` metadata.
    #[must_use]
    pub fn options(&self) -> Option<&ObjectNode> {
        self.0.get("options").and_then(SchemaNode::as_object)
    }

    /// Looks up an attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SchemaNode> {
        self.0.get(key)
    }

    /// Iterates over scalar attributes other than `type`, in document order.
    pub fn scalar_attrs(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.0
            .iter()
            .filter(|(key, value)| key.as_str() != "type" && value.is_scalar())
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the underlying attribute map.
    #[must_use]
    pub const fn as_map(&self) -> &ObjectNode {
        &self.0
    }
}

/// A column of a table being created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Column attributes.
    pub attrs: ColumnAttrs,
}

impl Column {
    /// Creates a column.
    #[must_use]
    pub fn new(name: impl Into<String>, attrs: ColumnAttrs) -> Self {
        Self {
            name: name.into(),
            attrs,
        }
    }
}

/// A single schema mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MutationOp {
    /// Create a new table.
    CreateTable {
        /// Table name.
        name: String,
        /// Column definitions.
        columns: Vec<Column>,
        /// Table-level options.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<SchemaNode>,
    },

    /// Drop a table.
    DropTable {
        /// Table name.
        name: String,
        /// Table-level options.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<SchemaNode>,
    },

    /// Rename a table.
    RenameTable {
        /// Old table name.
        from: String,
        /// New table name.
        to: String,
        /// Table-level options.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<SchemaNode>,
    },

    /// Add a column to a table.
    AddColumn {
        /// Table name.
        table: String,
        /// Column name.
        name: String,
        /// Column attributes.
        attrs: ColumnAttrs,
    },

    /// Remove a column from a table.
    RemoveColumn {
        /// Table name.
        table: String,
        /// Column name.
        name: String,
    },

    /// Rename a column.
    RenameColumn {
        /// Table name.
        table: String,
        /// Old column name.
        from: String,
        /// New column name.
        to: String,
    },

    /// Redefine an existing column.
    ChangeColumn {
        /// Table name.
        table: String,
        /// Column name.
        name: String,
        /// Attributes the column should end up with.
        attrs: ColumnAttrs,
    },
}

impl MutationOp {
    // Convenience constructors

    /// Creates a `CreateTable` operation.
    #[must_use]
    pub fn create_table(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self::CreateTable {
            name: name.into(),
            columns,
            options: None,
        }
    }

    /// Creates a `DropTable` operation.
    #[must_use]
    pub fn drop_table(name: impl Into<String>) -> Self {
        Self::DropTable {
            name: name.into(),
            options: None,
        }
    }

    /// Creates a `RenameTable` operation.
    #[must_use]
    pub fn rename_table(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::RenameTable {
            from: from.into(),
            to: to.into(),
            options: None,
        }
    }

    /// Creates an `AddColumn` operation.
    #[must_use]
    pub fn add_column(table: impl Into<String>, name: impl Into<String>, attrs: ColumnAttrs) -> Self {
        Self::AddColumn {
            table: table.into(),
            name: name.into(),
            attrs,
        }
    }

    /// Creates a `RemoveColumn` operation.
    #[must_use]
    pub fn remove_column(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::RemoveColumn {
            table: table.into(),
            name: name.into(),
        }
    }

    /// Creates a `RenameColumn` operation.
    #[must_use]
    pub fn rename_column(
        table: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self::RenameColumn {
            table: table.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Creates a `ChangeColumn` operation.
    #[must_use]
    pub fn change_column(
        table: impl Into<String>,
        name: impl Into<String>,
        attrs: ColumnAttrs,
    ) -> Self {
        Self::ChangeColumn {
            table: table.into(),
            name: name.into(),
            attrs,
        }
    }

    /// Attaches table-level options. No effect on column operations.
    #[must_use]
    pub fn with_options(mut self, table_options: Option<SchemaNode>) -> Self {
        match &mut self {
            Self::CreateTable { options, .. }
            | Self::DropTable { options, .. }
            | Self::RenameTable { options, .. } => *options = table_options,
            _ => {}
        }
        self
    }

    /// Returns the table this operation applies to.
    ///
    /// For `RenameTable` this is the new name.
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::CreateTable { name, .. } | Self::DropTable { name, .. } => name,
            Self::RenameTable { to, .. } => to,
            Self::AddColumn { table, .. }
            | Self::RemoveColumn { table, .. }
            | Self::RenameColumn { table, .. }
            | Self::ChangeColumn { table, .. } => table,
        }
    }

    /// Returns the reverse operation for rollback.
    ///
    /// Returns `None` if the operation is not reversible.
    #[must_use]
    pub fn reverse(&self) -> Option<Self> {
        match self {
            Self::CreateTable { name, options, .. } => {
                Some(Self::drop_table(name.clone()).with_options(options.clone()))
            }

            // The dropped definition is not part of the operation
            Self::DropTable { .. } => None,

            Self::RenameTable { from, to, options } => {
                Some(Self::rename_table(to.clone(), from.clone()).with_options(options.clone()))
            }

            Self::AddColumn { table, name, .. } => {
                Some(Self::remove_column(table.clone(), name.clone()))
            }

            Self::RemoveColumn { .. } => None,

            Self::RenameColumn { table, from, to } => Some(Self::rename_column(
                table.clone(),
                to.clone(),
                from.clone(),
            )),

            // Only the new attributes are known
            Self::ChangeColumn { .. } => None,
        }
    }

    /// Returns true if this operation can be reversed.
    #[must_use]
    pub const fn is_reversible(&self) -> bool {
        match self {
            Self::CreateTable { .. }
            | Self::RenameTable { .. }
            | Self::AddColumn { .. }
            | Self::RenameColumn { .. } => true,
            Self::DropTable { .. } | Self::RemoveColumn { .. } | Self::ChangeColumn { .. } => false,
        }
    }

    /// Returns a human-readable description of this operation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateTable { name, columns, .. } => {
                format!("Create table '{}' with {} column(s)", name, columns.len())
            }
            Self::DropTable { name, .. } => format!("Drop table '{}'", name),
            Self::RenameTable { from, to, .. } => {
                format!("Rename table '{}' to '{}'", from, to)
            }
            Self::AddColumn { table, name, .. } => {
                format!("Add column '{}' to table '{}'", name, table)
            }
            Self::RemoveColumn { table, name } => {
                format!("Remove column '{}' from table '{}'", name, table)
            }
            Self::RenameColumn { table, from, to } => format!(
                "Rename column '{}' to '{}' in table '{}'",
                from, to, table
            ),
            Self::ChangeColumn { table, name, .. } => {
                format!("Change column '{}' in table '{}'", name, table)
            }
        }
    }
}

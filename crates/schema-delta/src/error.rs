//! Error types for schema diffing.

/// Errors raised when a schema document does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeltaError {
    /// The document or its `id`/`properties` fields are malformed.
    #[error("Invalid schema at '{path}': {message}")]
    SchemaShape {
        /// Dotted key path of the offending node (empty for the root).
        path: String,
        /// What is wrong with it.
        message: String,
    },

    /// A `properties` entry is not a valid column definition.
    #[error("Invalid column '{column}' in table '{table}': {message}")]
    ColumnShape {
        /// Table the column belongs to.
        table: String,
        /// Column name.
        column: String,
        /// What is wrong with it.
        message: String,
    },
}

impl DeltaError {
    /// Creates a `SchemaShape` error.
    pub fn schema_shape(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaShape {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a `ColumnShape` error.
    pub fn column_shape(
        table: impl Into<String>,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ColumnShape {
            table: table.into(),
            column: column.into(),
            message: message.into(),
        }
    }

    /// Returns the dotted key path of the offending node.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::SchemaShape { path, .. } => path.clone(),
            Self::ColumnShape { column, .. } => format!("properties.{}", column),
        }
    }
}

/// Result type for schema diffing.
pub type Result<T> = std::result::Result<T, DeltaError>;

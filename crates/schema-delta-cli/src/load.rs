//! Loading schema documents from disk.

use std::path::Path;

use anyhow::{Context, Result};
use schema_delta::node::SchemaNode;
use tracing::debug;

/// Reads a JSON schema document.
pub fn load_document(path: &Path) -> Result<SchemaNode> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema document {}", path.display()))?;
    let document: SchemaNode = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse schema document {}", path.display()))?;
    debug!(path = %path.display(), "loaded schema document");
    Ok(document)
}

/// Reads a document if a path is given. No path means "no table".
pub fn load_optional(path: Option<&Path>) -> Result<SchemaNode> {
    path.map_or(Ok(SchemaNode::Absent), load_document)
}

//! Structural diffs of schema documents, compiled into migration operations.
//!
//! `schema-delta` compares two versions of a table document and produces the
//! ordered list of schema mutations that turns one into the other:
//! - Documents are compared structurally, ignoring key order
//! - Arrays are compared as sets of values
//! - A column that disappears and reappears under a new name with identical
//!   attributes is reported as a rename
//!
//! # Architecture
//!
//! - **Node** - `SchemaNode`, the document model, and its classifier
//! - **Compare** - the structural equality oracle producing a `DeltaTag`
//! - **Delta** - builds the tagged delta tree, including rename inference
//! - **Project** - recovers the `to` document from a delta tree
//! - **Shadow** - clones `to`'s shape with `from`'s content
//! - **Walker** - depth-first traversal reporting every tagged leaf
//! - **Compiler** - turns the walk into `MutationOp`s
//!
//! Nothing here performs I/O. Loading documents and rendering the operations
//! into migration source text is up to the caller.
//!
//! # Example
//!
//! ```rust
//! use schema_delta::prelude::*;
//! use serde_json::json;
//!
//! let from = SchemaNode::from(json!({
//!     "id": "users",
//!     "properties": {"name": {"type": "string"}},
//! }));
//! let to = SchemaNode::from(json!({
//!     "id": "users",
//!     "properties": {"label": {"type": "string"}},
//! }));
//!
//! let ops = OpCompiler::new().diff(&from, &to)?;
//! assert_eq!(ops, vec![MutationOp::rename_column("users", "name", "label")]);
//! # Ok::<(), DeltaError>(())
//! ```

pub mod compare;
pub mod compiler;
pub mod delta;
pub mod error;
pub mod node;
pub mod operations;
pub mod project;
pub mod shadow;
pub mod validate;
pub mod walker;

pub use compiler::diff_schemas;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::compare::{compare, structurally_equal, DeltaTag};
    pub use crate::compiler::{diff_schemas, CompileOptions, OpCompiler};
    pub use crate::delta::{build, DeltaArray, DeltaItem, DeltaLeaf, DeltaNode, DeltaObject};
    pub use crate::error::{DeltaError, Result};
    pub use crate::node::{classify, NodeKind, ObjectNode, SchemaNode};
    pub use crate::operations::{Column, ColumnAttrs, MutationOp};
    pub use crate::project::project;
    pub use crate::shadow::shadow_clone;
    pub use crate::validate::{normalize_document, validate_document};
    pub use crate::walker::{walk, Visit};
}

//! Errors raised by tree construction and editing.

use crate::NodeId;

/// A violated node invariant.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IrError {
    /// An optional field was read where the caller requires it.
    #[error("{node} has no {field}")]
    MissingField {
        node: &'static str,
        field: &'static str,
    },

    /// A node was built without a part its own invariant requires.
    #[error("malformed {node}: {reason}")]
    Malformed { node: &'static str, reason: String },

    /// An in-place edit targeted something other than a block statement.
    #[error("node {0} is not a block statement")]
    NotABlock(NodeId),

    #[error("index {index} is out of range for a block of {len} statements")]
    IndexOutOfRange { index: usize, len: usize },
}

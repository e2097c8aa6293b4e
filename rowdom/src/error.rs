use thiserror::Error;

use crate::element::NodeId;

/// Errors raised by tree operations on a [`Dom`](crate::Dom).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node was never created or has been removed.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// The node is not a child of the given parent.
    #[error("node {child} is not a child of {parent}")]
    NotAChild {
        /// The expected parent.
        parent: NodeId,
        /// The node that was not found among its children.
        child: NodeId,
    },

    /// Attaching the node would make it its own ancestor.
    #[error("node {child} is an ancestor of {parent}")]
    Cycle {
        /// The would-be parent.
        parent: NodeId,
        /// The node that already contains `parent`.
        child: NodeId,
    },
}

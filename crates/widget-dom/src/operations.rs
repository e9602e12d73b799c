//! DOM Node Operations
//!
//! Error type shared by the tree mutation primitives.

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Handle does not name a node of this tree
    #[error("Node not found: {0:?}")]
    NotFound(NodeId),
    /// Inserting a node into itself or one of its descendants
    #[error("Hierarchy request error: {child:?} cannot be placed under {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    /// Node type cannot take part in the operation
    #[error("Invalid node type: {0:?}")]
    InvalidNodeType(NodeId),
    /// Reference node is not a child of the given parent
    #[error("Node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
    /// Sibling-relative insertion against a node without a parent
    #[error("Node {0:?} has no parent")]
    NoParent(NodeId),
}

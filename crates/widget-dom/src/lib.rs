//! fOS Widget DOM - host document tree
//!
//! Arena-based document tree that widgets render into. Nodes are addressed
//! by [`NodeId`] handles; parent and sibling links are indices, not pointers.

mod attributes;
mod classlist;
mod dataset;
mod document;
mod events;
mod node;
mod operations;
mod selector;
mod tree;

pub use attributes::{Attr, NamedNodeMap};
pub use classlist::DOMTokenList;
pub use dataset::DOMStringMap;
pub use document::Document;
pub use events::DomEvent;
pub use node::{ElementData, Node, NodeData};
pub use operations::{DomError, DomResult};
pub use selector::{Selector, SelectorList, SimpleSelector};
pub use tree::{Children, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID (the document node)
    pub const ROOT: NodeId = NodeId(0);
    /// Null handle
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this is not the null handle
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Convert to `Option`, mapping the null handle to `None`
    #[inline]
    pub fn some(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

//! Ownership tree
//!
//! Single-parent/multi-child graph over component handles. Links are
//! indices into the arena, so a cascading destroy is a walk over handles.
//! Slots are never reused: a destroyed node stays behind as a tombstone.

use crate::{Result, WidgetError};

/// Component identifier (index into the ownership arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) u32);

impl ComponentId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
struct LifeCycleNode {
    parent: Option<ComponentId>,
    children: Vec<ComponentId>,
    destroyed: bool,
}

/// Arena holding the ownership links of every component
///
/// # Panics
///
/// Handles are only meaningful for the arena that created them; passing a
/// handle from another arena panics like an out-of-bounds index.
#[derive(Debug, Default)]
pub struct LifeCycleArena {
    nodes: Vec<LifeCycleNode>,
}

impl LifeCycleArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh, parentless node
    pub fn create(&mut self) -> ComponentId {
        let id = ComponentId(self.nodes.len() as u32);
        self.nodes.push(LifeCycleNode::default());
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.nodes[id.index()].parent
    }

    /// Snapshot of the children, in the order they were attached
    pub fn children(&self, id: ComponentId) -> Vec<ComponentId> {
        self.nodes[id.index()].children.clone()
    }

    pub fn is_destroyed(&self, id: ComponentId) -> bool {
        self.nodes[id.index()].destroyed
    }

    /// Whether `ancestor` is `id` or one of its owners
    pub fn is_ancestor(&self, ancestor: ComponentId, id: ComponentId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Move `id` under `parent`, leaving its previous parent's children.
    ///
    /// Reassigning the current parent re-appends the node at the end.
    pub fn set_parent(&mut self, id: ComponentId, parent: Option<ComponentId>) -> Result<()> {
        if let Some(parent) = parent {
            if self.is_ancestor(id, parent) {
                return Err(WidgetError::OwnershipCycle { child: id, parent });
            }
        }

        if let Some(old) = self.nodes[id.index()].parent.take() {
            self.nodes[old.index()].children.retain(|&child| child != id);
        }
        self.nodes[id.index()].parent = parent;
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        Ok(())
    }

    /// Destroy `id` and, first, every node it owns
    pub fn destroy(&mut self, id: ComponentId) {
        for child in self.children(id) {
            self.destroy(child);
        }
        self.finalize(id);
    }

    /// Leave the parent and mark destroyed; children must already be gone
    pub(crate) fn finalize(&mut self, id: ComponentId) {
        if let Some(old) = self.nodes[id.index()].parent.take() {
            self.nodes[old.index()].children.retain(|&child| child != id);
        }
        self.nodes[id.index()].destroyed = true;
    }
}

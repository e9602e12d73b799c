//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed; a removed node simply becomes a detached
//! subtree root that can be inserted again later.

use crate::{DOMStringMap, DOMTokenList, DomError, DomResult, ElementData, Node, NodeId, SelectorList};

/// Arena-based DOM tree for memory efficiency
#[derive(Debug, Default)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new empty DOM tree (no document node)
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Create a tree whose first node is the document root
    pub fn with_root() -> Self {
        let mut tree = Self::new();
        tree.push(Node::document());
        tree
    }

    /// Document root, or `NodeId::NONE` for a rootless tree
    pub fn root(&self) -> NodeId {
        match self.nodes.first() {
            Some(node) if matches!(node.data, crate::NodeData::Document) => NodeId::ROOT,
            _ => NodeId::NONE,
        }
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.push(Node::element(tag_name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::text(text))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::comment(text))
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Element data of `id`, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Mutable element data of `id`, if it is an element
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    fn link(&self, id: NodeId, pick: impl Fn(&Node) -> NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| pick(node).some())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |n| n.parent)
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |n| n.first_child)
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |n| n.last_child)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |n| n.next_sibling)
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |n| n.prev_sibling)
    }

    /// Iterate over direct children as `(id, node)` pairs
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// Ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// All descendants of `id` in document (pre-)order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).map(|(child, _)| child).collect();
        stack.reverse();
        while let Some(current) = stack.pop() {
            out.push(current);
            let mark = stack.len();
            stack.extend(self.children(current).map(|(child, _)| child));
            stack[mark..].reverse();
        }
        out
    }

    /// Inclusive containment, like `Node.contains`
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if self.get(node).is_none() || self.get(ancestor).is_none() {
            return false;
        }
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Propagation path of an event targeted at `target`: target first, root last
    pub fn event_path(&self, target: NodeId) -> Vec<NodeId> {
        if self.get(target).is_none() {
            return Vec::new();
        }
        std::iter::once(target).chain(self.ancestors(target)).collect()
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    fn check(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    /// Unlink `id` from its parent; no-op when already detached
    pub fn remove(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        match self.get_mut(prev) {
            Some(p) => p.next_sibling = next,
            None => self.nodes[parent.index()].first_child = next,
        }
        match self.get_mut(next) {
            Some(n) => n.prev_sibling = prev,
            None => self.nodes[parent.index()].last_child = prev,
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Insert `child` under `parent` before `reference` (append when `None`).
    ///
    /// The child is detached from its previous position first.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> DomResult<NodeId> {
        if !self.check(parent)?.is_container() {
            return Err(DomError::InvalidNodeType(parent));
        }
        if matches!(self.check(child)?.data, crate::NodeData::Document) {
            return Err(DomError::InvalidNodeType(child));
        }
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        let mut reference = reference;
        if let Some(r) = reference {
            if self.parent(r) != Some(parent) {
                return Err(DomError::NotAChild { parent, child: r });
            }
            if r == child {
                reference = self.next_sibling(child);
            }
        }

        self.remove(child);

        let prev = match reference {
            Some(r) => self.nodes[r.index()].prev_sibling,
            None => self.nodes[parent.index()].last_child,
        };
        let next = reference.unwrap_or(NodeId::NONE);

        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = next;
        }
        match self.get_mut(prev) {
            Some(p) => p.next_sibling = child,
            None => self.nodes[parent.index()].first_child = child,
        }
        match self.get_mut(next) {
            Some(n) => n.prev_sibling = child,
            None => self.nodes[parent.index()].last_child = child,
        }

        Ok(child)
    }

    /// Append `child` as last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` as first child of `parent`
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        let first = self.first_child(parent);
        self.insert_before(parent, child, first)
    }

    /// Replace `old` (a child of `parent`) with `new`, returning `old`
    pub fn replace_child(&mut self, parent: NodeId, new: NodeId, old: NodeId) -> DomResult<NodeId> {
        self.check(new)?;
        if self.parent(old) != Some(parent) {
            return Err(DomError::NotAChild { parent, child: old });
        }
        if new == old {
            return Ok(old);
        }
        if self.contains(new, parent) {
            return Err(DomError::HierarchyRequest { parent, child: new });
        }

        let mut next = self.next_sibling(old);
        if next == Some(new) {
            next = self.next_sibling(new);
        }
        self.remove(old);
        self.insert_before(parent, new, next)?;
        Ok(old)
    }

    /// Replace all children of `id` with a single text node
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        if !self.check(id)?.is_container() {
            return Err(DomError::InvalidNodeType(id));
        }
        while let Some(child) = self.first_child(id) {
            self.remove(child);
        }
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node)?;
        }
        Ok(())
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }

    // ------------------------------------------------------------------
    // Element data
    // ------------------------------------------------------------------

    pub fn add_class(&mut self, id: NodeId, class: &str) -> bool {
        self.element_mut(id).is_some_and(|e| e.classes.add(class))
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> bool {
        self.element_mut(id).is_some_and(|e| e.classes.remove(class))
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.classes.contains(class))
    }

    pub fn class_list(&self, id: NodeId) -> Option<&DOMTokenList> {
        self.element(id).map(|e| &e.classes)
    }

    /// `data-*` attributes of `id`, empty for non-elements
    pub fn dataset(&self, id: NodeId) -> DOMStringMap {
        self.element(id)
            .map(|e| DOMStringMap::from_attributes(&e.attrs))
            .unwrap_or_default()
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let elem = self.element_mut(id).ok_or(DomError::InvalidNodeType(id))?;
        elem.set_attribute(name, value);
        Ok(())
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.element(id).and_then(|e| e.get_attribute(name))
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_attribute(name))
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        self.element_mut(id).is_some_and(|e| e.remove_attribute(name))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Check `id` against a selector list; unparsable selectors match nothing
    pub fn matches(&self, id: NodeId, selector: &str) -> bool {
        SelectorList::parse(selector).is_some_and(|list| list.matches(self, id))
    }

    /// Descendants of `scope` matching `selector`, in document order
    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let Some(list) = SelectorList::parse(selector) else {
            tracing::debug!("Ignoring unparsable selector {:?}", selector);
            return Vec::new();
        };
        self.descendants(scope)
            .into_iter()
            .filter(|&d| list.matches(self, d))
            .collect()
    }

    /// First descendant of `scope` matching `selector`
    pub fn query_selector(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        self.query_selector_all(scope, selector).into_iter().next()
    }

    /// Descendant elements of `id` carrying attribute `name`
    pub fn descendants_with_attribute(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&d| self.has_attribute(d, name))
            .collect()
    }
}

/// Iterator over the direct children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling.some();
        Some((id, node))
    }
}

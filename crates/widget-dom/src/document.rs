//! Document - High-level document API

use crate::{DomEvent, DomTree, NodeId};

/// HTML Document
///
/// The tree is reachable only through [`Document::tree`] and
/// [`Document::tree_mut`]; it cannot be replaced wholesale.
///
/// ```compile_fail
/// let mut doc = widget_dom::Document::new("about:blank");
/// doc.tree = widget_dom::DomTree::new();
/// ```
pub struct Document {
    tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with the basic html/head/body structure
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::with_root();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh detached elements under a container never fail to link.
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        tracing::debug!("Created document {}", url);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure, no root)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Document root node, `NodeId::NONE` for an empty document
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Check that the document has a tree root to attach to
    pub fn has_root(&self) -> bool {
        self.root().is_valid()
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Whether `node` is reachable from the document root
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.has_root() && self.tree.contains(self.root(), node)
    }

    /// Get connected element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.root())
            .into_iter()
            .find(|&node| self.tree.element(node).and_then(|e| e.id()) == Some(id))
    }

    /// Create a generic event object
    pub fn create_event(&self, event_type: &str) -> DomEvent {
        DomEvent::new(event_type)
    }

    /// Create a payload-carrying event object
    pub fn create_custom_event(&self, event_type: &str, detail: &str) -> DomEvent {
        DomEvent::custom(event_type, detail)
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.url)
            .field("nodes", &self.tree.len())
            .finish()
    }
}

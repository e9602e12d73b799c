//! DOM Node - Compact representation
//!
//! Links between nodes are `NodeId` indices into the owning `DomTree`
//! arena, with `NodeId::NONE` standing in for a missing link.

use crate::{DOMTokenList, NamedNodeMap, NodeId};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag_name)))
    }

    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Text(content.into()))
    }

    /// Create a comment node
    pub fn comment(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Comment(content.into()))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Check if this node may hold children
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self.data, NodeData::Document | NodeData::Element(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name, lowercased
    pub tag_name: String,
    /// Attributes other than `class`
    pub attrs: NamedNodeMap,
    /// Class list, kept apart so the `class` attribute stays tokenized
    pub classes: DOMTokenList,
}

impl ElementData {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: NamedNodeMap::new(),
            classes: DOMTokenList::new(),
        }
    }

    /// Get an attribute value
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        if name == "class" {
            return (!self.classes.is_empty()).then(|| self.classes.value());
        }
        self.attrs.get_attribute(name).map(str::to_string)
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if name == "class" {
            self.classes.set_value(value);
        } else {
            self.attrs.set_attribute(name, value);
        }
    }

    /// Check if attribute exists
    pub fn has_attribute(&self, name: &str) -> bool {
        if name == "class" {
            return !self.classes.is_empty();
        }
        self.attrs.has_attribute(name)
    }

    /// Remove an attribute, returning whether it was present
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        if name == "class" {
            let had = !self.classes.is_empty();
            self.classes = DOMTokenList::new();
            return had;
        }
        self.attrs.remove_named_item(name).is_some()
    }

    /// Cached `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.attrs.get_attribute("id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_name_lowercased() {
        let elem = ElementData::new("SPAN");
        assert_eq!(elem.tag_name, "span");
    }

    #[test]
    fn test_class_attribute_routes_to_class_list() {
        let mut elem = ElementData::new("div");
        elem.set_attribute("class", "a  b");
        assert!(elem.classes.contains("a"));
        assert!(elem.classes.contains("b"));
        assert_eq!(elem.get_attribute("class").as_deref(), Some("a b"));
        assert!(!elem.attrs.has_attribute("class"));

        assert!(elem.remove_attribute("class"));
        assert!(!elem.has_attribute("class"));
    }

    #[test]
    fn test_node_kinds() {
        assert!(Node::element("p").is_element());
        assert!(Node::text("hi").is_text());
        assert!(Node::document().is_container());
        assert!(!Node::comment("c").is_container());
        assert_eq!(Node::text("hi").as_text(), Some("hi"));
    }
}

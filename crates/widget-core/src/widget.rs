//! DOM-attached widgets
//!
//! A widget owns exactly one element of the host document. The toolkit keeps
//! a side table from element to widget so the document never has to know
//! about ownership.

use widget_dom::{DomTree, NodeId, SelectorList};

use crate::{ComponentId, Listener, Result, WidgetError};

/// Handle of a component that owns an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub(crate) ComponentId);

impl WidgetId {
    pub fn component(self) -> ComponentId {
        self.0
    }
}

impl From<WidgetId> for ComponentId {
    fn from(id: WidgetId) -> Self {
        id.0
    }
}

impl PartialEq<ComponentId> for WidgetId {
    fn eq(&self, other: &ComponentId) -> bool {
        self.0 == *other
    }
}

impl PartialEq<WidgetId> for ComponentId {
    fn eq(&self, other: &WidgetId) -> bool {
        *self == other.0
    }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug)]
pub(crate) struct WidgetState {
    pub element: NodeId,
    pub appended: bool,
    /// Parentage was assigned by hand; tree position no longer decides it
    pub explicit_parent: bool,
}

impl WidgetState {
    pub fn new(element: NodeId) -> Self {
        Self {
            element,
            appended: false,
            explicit_parent: false,
        }
    }
}

/// Declared DOM event: `"type"` binds on the widget element itself,
/// `"type selector"` only for events from descendants matching `selector`.
#[derive(Debug, Clone)]
pub struct DomBinding {
    event_type: String,
    selector: Option<SelectorList>,
    listener: Listener,
}

impl DomBinding {
    pub(crate) fn parse(key: &str, listener: Listener) -> Result<Self> {
        let key = key.trim();
        let (event_type, selector) = match key.split_once(char::is_whitespace) {
            Some((event_type, rest)) => (event_type, Some(rest.trim())),
            None => (key, None),
        };
        if event_type.is_empty() {
            return Err(WidgetError::InvalidDomEvent(key.to_string()));
        }
        let selector = selector
            .map(|s| SelectorList::parse(s).ok_or_else(|| WidgetError::InvalidDomEvent(key.to_string())))
            .transpose()?;

        Ok(Self {
            event_type: event_type.to_string(),
            selector,
            listener,
        })
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn is_delegated(&self) -> bool {
        self.selector.is_some()
    }

    pub(crate) fn listener(&self) -> &Listener {
        &self.listener
    }

    /// Nodes on `path` (target first, stopping before the widget element)
    /// this binding fires for
    pub(crate) fn matching(&self, tree: &DomTree, path: &[NodeId], element: NodeId) -> Vec<NodeId> {
        match &self.selector {
            None => vec![element],
            Some(list) => path.iter().copied().filter(|&n| list.matches(tree, n)).collect(),
        }
    }
}

//! DOM Events
//!
//! Native event objects dispatched through the document tree.

use crate::NodeId;

/// DOM event
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    pub event_type: String,
    pub target: NodeId,
    pub current_target: Option<NodeId>,
    /// Payload of a custom event
    pub detail: Option<String>,
    pub bubbles: bool,
}

impl DomEvent {
    /// Create a generic bubbling event
    pub fn new(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            target: NodeId::NONE,
            current_target: None,
            detail: None,
            bubbles: true,
        }
    }

    /// Create a payload-carrying custom event
    pub fn custom(event_type: &str, detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Self::new(event_type)
        }
    }

    /// Create a non-bubbling event
    pub fn non_bubbling(event_type: &str) -> Self {
        Self {
            bubbles: false,
            ..Self::new(event_type)
        }
    }

    /// Retarget the event
    pub fn with_target(mut self, target: NodeId) -> Self {
        self.target = target;
        self
    }

    /// Copy of this event as seen from `current`
    pub fn seen_from(&self, current: NodeId) -> Self {
        Self {
            current_target: Some(current),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_event() {
        let event = DomEvent::custom("select", "row-3").with_target(NodeId(5));

        assert_eq!(event.event_type, "select");
        assert_eq!(event.target, NodeId(5));
        assert_eq!(event.detail.as_deref(), Some("row-3"));
        assert!(event.bubbles);
        assert_eq!(event.current_target, None);
    }

    #[test]
    fn test_seen_from() {
        let event = DomEvent::non_bubbling("focus").with_target(NodeId(2));
        let seen = event.seen_from(NodeId(1));

        assert_eq!(seen.current_target, Some(NodeId(1)));
        assert_eq!(seen.target, NodeId(2));
        assert!(!seen.bubbles);
    }
}

//! Event dispatching
//!
//! Per-instance listener registry. Registrations keep their multiplicity:
//! the same listener registered twice runs twice and is removed by a single
//! `off`. Dispatch works on a snapshot taken when `trigger` starts, so
//! listeners added mid-dispatch wait for the next trigger and listeners
//! removed mid-dispatch still run this time.

use std::collections::HashMap;
use std::rc::Rc;

use widget_dom::DomEvent;

use crate::{Change, Toolkit, Value};

/// Emitted on a widget right before its teardown starts
pub const DESTROYING: &str = "destroying";
/// Emitted when a widget's element becomes reachable from the document root
pub const APPENDED_TO_DOM: &str = "appendedToDom";
/// Emitted when a widget's element stops being reachable from the document root
pub const REMOVED_FROM_DOM: &str = "removedFromDom";

type Callback = dyn Fn(&mut Toolkit, &Event);

/// Shared event callback.
///
/// Identity is the identity of the shared closure: clones of one `Listener`
/// are the same callback for `off`, two `Listener::new` calls never are.
#[derive(Clone)]
pub struct Listener(Rc<Callback>);

impl Listener {
    pub fn new(f: impl Fn(&mut Toolkit, &Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn same(&self, other: &Listener) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }

    pub(crate) fn call(&self, toolkit: &mut Toolkit, event: &Event) {
        (self.0)(toolkit, event)
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener({:p})", Rc::as_ptr(&self.0))
    }
}

/// What an event carries
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    Empty,
    Value(Value),
    Change(Change),
    Dom(DomEvent),
}

/// Event handed to listeners
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    kind: String,
    detail: Detail,
    this: Option<Value>,
}

impl Event {
    /// Generic named event without payload
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            detail: Detail::Empty,
            this: None,
        }
    }

    /// Named event carrying `value` as its detail
    pub fn custom(kind: &str, value: impl Into<Value>) -> Self {
        Self {
            detail: Detail::Value(value.into()),
            ..Self::new(kind)
        }
    }

    /// Wrap a native document event; the kind is the DOM event type
    pub fn from_dom(event: DomEvent) -> Self {
        Self {
            kind: event.event_type.clone(),
            detail: Detail::Dom(event),
            this: None,
        }
    }

    pub(crate) fn change(change: Change) -> Self {
        Self {
            kind: format!("change:{}", change.key),
            detail: Detail::Change(change),
            this: None,
        }
    }

    pub(crate) fn bound(&self, this: Option<Value>) -> Self {
        Self { this, ..self.clone() }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn detail(&self) -> &Detail {
        &self.detail
    }

    /// Call-context of the running listener
    pub fn this(&self) -> Option<&Value> {
        self.this.as_ref()
    }

    pub fn value(&self) -> Option<&Value> {
        match &self.detail {
            Detail::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn change_detail(&self) -> Option<&Change> {
        match &self.detail {
            Detail::Change(c) => Some(c),
            _ => None,
        }
    }

    pub fn dom(&self) -> Option<&DomEvent> {
        match &self.detail {
            Detail::Dom(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Registration {
    listener: Listener,
    context: Option<Value>,
}

/// Listener registry of one component
#[derive(Debug, Default)]
pub struct Listeners {
    by_kind: HashMap<String, Vec<Registration>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: &str, listener: Listener, context: Option<Value>) {
        self.by_kind
            .entry(kind.to_string())
            .or_default()
            .push(Registration { listener, context });
    }

    /// Remove every registration of `listener` for `kind`, returning how many went
    pub fn remove(&mut self, kind: &str, listener: &Listener) -> usize {
        let Some(stack) = self.by_kind.get_mut(kind) else {
            return 0;
        };
        let before = stack.len();
        stack.retain(|r| !r.listener.same(listener));
        let removed = before - stack.len();
        if stack.is_empty() {
            self.by_kind.remove(kind);
        }
        removed
    }

    /// Registrations for `kind` in registration order
    pub fn snapshot(&self, kind: &str) -> Vec<(Listener, Option<Value>)> {
        self.by_kind
            .get(kind)
            .map(|stack| {
                stack
                    .iter()
                    .map(|r| (r.listener.clone(), r.context.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.by_kind.get(kind).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_kind.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Listener {
        Listener::new(|_, _| {})
    }

    #[test]
    fn test_identity() {
        let a = noop();
        let b = noop();
        assert!(a.same(&a.clone()));
        assert!(!a.same(&b));
    }

    #[test]
    fn test_remove_all_occurrences() {
        let mut listeners = Listeners::new();
        let a = noop();
        let b = noop();
        listeners.add("test", a.clone(), None);
        listeners.add("test", b.clone(), None);
        listeners.add("test", a.clone(), None);

        assert_eq!(listeners.count("test"), 3);
        assert_eq!(listeners.remove("test", &a), 2);
        assert_eq!(listeners.count("test"), 1);
        assert!(listeners.snapshot("test")[0].0.same(&b));
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut listeners = Listeners::new();
        assert_eq!(listeners.remove("test", &noop()), 0);
        listeners.add("other", noop(), None);
        assert_eq!(listeners.remove("other", &noop()), 0);
        assert_eq!(listeners.count("other"), 1);
    }

    #[test]
    fn test_snapshot_keeps_context_and_order() {
        let mut listeners = Listeners::new();
        let a = noop();
        let b = noop();
        listeners.add("test", a.clone(), Some(Value::from("ctx")));
        listeners.add("test", b.clone(), None);

        let snapshot = listeners.snapshot("test");
        assert!(snapshot[0].0.same(&a));
        assert_eq!(snapshot[0].1, Some(Value::from("ctx")));
        assert!(snapshot[1].0.same(&b));
        assert_eq!(snapshot[1].1, None);

        listeners.clear();
        assert!(listeners.is_empty());
        assert!(listeners.snapshot("test").is_empty());
    }

    #[test]
    fn test_event_constructors() {
        assert_eq!(Event::new("x").detail(), &Detail::Empty);
        assert_eq!(Event::custom("x", 5).value(), Some(&Value::from(5)));

        let dom = DomEvent::custom("click", "left");
        let event = Event::from_dom(dom.clone());
        assert_eq!(event.kind(), "click");
        assert_eq!(event.dom(), Some(&dom));
        assert_eq!(event.this(), None);
    }
}

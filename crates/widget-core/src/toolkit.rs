//! Toolkit
//!
//! Owns the host document, the ownership arena and the per-component state
//! (listeners, attributes, widget element). Every operation runs to
//! completion synchronously; listeners get `&mut Toolkit` and may reenter.

use std::collections::HashMap;
use std::rc::Rc;

use widget_dom::{Document, DomError, DomEvent, NodeId};

use crate::events::{APPENDED_TO_DOM, DESTROYING, REMOVED_FROM_DOM};
use crate::properties::Assignment;
use crate::widget::{DomBinding, WidgetState};
use crate::{
    Accessor, Attributes, Change, Class, ComponentId, Config, Event, LifeCycleArena, Listener, Listeners,
    Result, Value, WidgetError, WidgetId,
};

struct Slot {
    class: Rc<Class>,
    listeners: Listeners,
    attributes: Attributes,
    /// Instance fields, private storage for custom accessors
    fields: HashMap<String, Value>,
    widget: Option<WidgetState>,
    tearing_down: bool,
}

impl Slot {
    fn new(class: &Rc<Class>) -> Self {
        Self {
            class: Rc::clone(class),
            listeners: Listeners::new(),
            attributes: Attributes::new(),
            fields: HashMap::new(),
            widget: None,
            tearing_down: false,
        }
    }
}

/// Component factory bound to one host document.
///
/// # Panics
///
/// Component handles index the toolkit that created them; a handle from
/// another toolkit panics like an out-of-bounds index.
pub struct Toolkit {
    config: Config,
    document: Document,
    lifecycle: LifeCycleArena,
    slots: Vec<Slot>,
    /// Element -> owning widget
    owners: HashMap<NodeId, WidgetId>,
}

impl Toolkit {
    /// Create a toolkit with the default configuration
    pub fn new(document: Document) -> Result<Self> {
        Self::with_config(document, Config::default())
    }

    pub fn with_config(document: Document, config: Config) -> Result<Self> {
        config.validate()?;
        if !document.has_root() {
            tracing::error!("Document {} has no tree root", document.url());
            return Err(WidgetError::MissingRoot);
        }
        tracing::debug!("Created toolkit for {}", document.url());

        Ok(Self {
            config,
            document,
            lifecycle: LifeCycleArena::new(),
            slots: Vec::new(),
            owners: HashMap::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Number of components created so far, destroyed ones included
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot(&self, id: ComponentId) -> &Slot {
        &self.slots[id.index()]
    }

    fn slot_mut(&mut self, id: ComponentId) -> &mut Slot {
        &mut self.slots[id.index()]
    }

    pub fn class(&self, id: impl Into<ComponentId>) -> &Rc<Class> {
        &self.slot(id.into()).class
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Create a component without an element, with its declared events installed
    pub fn create(&mut self, class: &Rc<Class>) -> ComponentId {
        let id = self.lifecycle.create();
        let mut slot = Slot::new(class);
        for (event, listener) in class.events() {
            slot.listeners.add(event, listener.clone(), Some(Value::Component(id)));
        }
        self.slots.push(slot);

        tracing::debug!("Created {} {}", class.name(), id);
        id
    }

    /// Create a widget: build its element, apply declared class tokens and
    /// attributes, register it as the element's owner, then render.
    pub fn create_widget(&mut self, class: &Rc<Class>) -> Result<WidgetId> {
        let widget = WidgetId(self.create(class));
        let tag = class.tag_name().unwrap_or(&self.config.default_tag_name).to_string();
        let marker = self.config.marker_attribute.clone();

        let tree = self.document.tree_mut();
        let element = tree.create_element(&tag);
        for token in class.class_name().split_whitespace() {
            tree.add_class(element, token);
        }
        for (name, value) in class.attributes() {
            tree.set_attribute(element, name, value)?;
        }
        tree.set_attribute(element, &marker, "")?;

        self.owners.insert(element, widget);
        self.slot_mut(widget.0).widget = Some(WidgetState::new(element));

        if let Some(render) = class.render().cloned() {
            if let Err(err) = render(self, widget) {
                tracing::warn!("Render of {} {} failed: {}", class.name(), widget, err);
                self.destroy(widget);
                return Err(err);
            }
        }
        Ok(widget)
    }

    /// Create a widget and give it an explicit owner
    pub fn create_widget_with_parent(
        &mut self,
        class: &Rc<Class>,
        parent: impl Into<ComponentId>,
    ) -> Result<WidgetId> {
        let widget = self.create_widget(class)?;
        self.set_parent(widget, Some(parent.into()))?;
        Ok(widget)
    }

    // ------------------------------------------------------------------
    // Ownership
    // ------------------------------------------------------------------

    pub fn parent(&self, id: impl Into<ComponentId>) -> Option<ComponentId> {
        self.lifecycle.parent(id.into())
    }

    /// Snapshot of owned children in attach order
    pub fn children(&self, id: impl Into<ComponentId>) -> Vec<ComponentId> {
        self.lifecycle.children(id.into())
    }

    pub fn is_destroyed(&self, id: impl Into<ComponentId>) -> bool {
        self.lifecycle.is_destroyed(id.into())
    }

    /// Assign the owner by hand.
    ///
    /// For widgets this pins parentage: document position stops deciding the
    /// owner until parentage is cleared with `None`.
    ///
    /// A parent that is destroyed or being torn down is refused: the call
    /// logs a warning and leaves parentage unchanged.
    pub fn set_parent(&mut self, id: impl Into<ComponentId>, parent: Option<ComponentId>) -> Result<()> {
        let id = id.into();
        if let Some(parent) = parent.filter(|&p| self.is_closing(p)) {
            tracing::warn!("Refusing destroyed parent {} for {}", parent, id);
            return Ok(());
        }
        self.lifecycle.set_parent(id, parent)?;
        if let Some(state) = self.slot_mut(id).widget.as_mut() {
            state.explicit_parent = parent.is_some();
        }
        Ok(())
    }

    /// Destroyed, or in the middle of its teardown
    fn is_closing(&self, id: ComponentId) -> bool {
        self.lifecycle.is_destroyed(id) || self.slot(id).tearing_down
    }

    /// Destroy a component and everything it owns, children first.
    ///
    /// Widgets announce `destroying` beforehand and leave the document.
    /// Destroying twice, or from a listener during teardown, does nothing.
    pub fn destroy(&mut self, id: impl Into<ComponentId>) {
        let id = id.into();
        if self.is_closing(id) {
            return;
        }
        self.slot_mut(id).tearing_down = true;

        if self.slot(id).widget.is_some() {
            self.trigger(id, DESTROYING);
        }
        // Children still tearing down leave the list on their own finalize.
        loop {
            let pending: Vec<_> = self
                .lifecycle
                .children(id)
                .into_iter()
                .filter(|&child| !self.slot(child).tearing_down)
                .collect();
            if pending.is_empty() {
                break;
            }
            for child in pending {
                self.destroy(child);
            }
        }
        if let Some(element) = self.slot(id).widget.as_ref().map(|s| s.element) {
            self.document.tree_mut().remove(element);
            self.owners.remove(&element);
        }
        self.slot_mut(id).listeners.clear();
        self.lifecycle.finalize(id);

        tracing::debug!("Destroyed {} {}", self.slot(id).class.name(), id);
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Register `listener`; it runs without a call-context
    pub fn on(&mut self, id: impl Into<ComponentId>, kind: &str, listener: Listener) -> &mut Self {
        self.slot_mut(id.into()).listeners.add(kind, listener, None);
        self
    }

    /// Register `listener`; it sees `context` as [`Event::this`]
    pub fn on_with_context(
        &mut self,
        id: impl Into<ComponentId>,
        kind: &str,
        listener: Listener,
        context: impl Into<Value>,
    ) -> &mut Self {
        self.slot_mut(id.into()).listeners.add(kind, listener, Some(context.into()));
        self
    }

    /// Remove every registration of `listener` for `kind`
    pub fn off(&mut self, id: impl Into<ComponentId>, kind: &str, listener: &Listener) -> &mut Self {
        self.slot_mut(id.into()).listeners.remove(kind, listener);
        self
    }

    pub fn listener_count(&self, id: impl Into<ComponentId>, kind: &str) -> usize {
        self.slot(id.into()).listeners.count(kind)
    }

    /// Trigger a payload-less event
    pub fn trigger(&mut self, id: impl Into<ComponentId>, kind: &str) -> &mut Self {
        self.trigger_event(id, Event::new(kind))
    }

    /// Trigger an event carrying `payload` as its detail
    pub fn trigger_with(&mut self, id: impl Into<ComponentId>, kind: &str, payload: impl Into<Value>) -> &mut Self {
        self.trigger_event(id, Event::custom(kind, payload))
    }

    /// Dispatch an already-built event as-is
    pub fn trigger_event(&mut self, id: impl Into<ComponentId>, event: Event) -> &mut Self {
        let id = id.into();
        let snapshot = self.slot(id).listeners.snapshot(event.kind());
        if self.config.trace_dispatch {
            tracing::trace!("Trigger {} on {} ({} listeners)", event.kind(), id, snapshot.len());
        }
        for (listener, this) in snapshot {
            listener.call(self, &event.bound(this));
        }
        self
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    /// Read `key` through its custom getter, else from the attribute store
    pub fn get(&self, id: impl Into<ComponentId>, key: &str) -> Option<Value> {
        let id = id.into();
        let slot = self.slot(id);
        match slot.class.accessor(key).and_then(Accessor::get_fn) {
            Some(getter) => getter(self, id),
            None => slot.attributes.get(key).cloned(),
        }
    }

    /// Write `key` through its custom setter, else store it and emit
    /// `change:<key>` when the value differs from the stored one
    pub fn set(&mut self, id: impl Into<ComponentId>, key: &str, value: impl Into<Value>) -> &mut Self {
        let id = id.into();
        let value = value.into();

        let setter = self.slot(id).class.accessor(key).and_then(Accessor::set_fn).cloned();
        if let Some(setter) = setter {
            setter(self, id, value);
            return self;
        }

        if let Assignment::Changed { old } = self.slot_mut(id).attributes.assign(key, value.clone()) {
            let change = Change {
                key: key.to_string(),
                old,
                new: value,
                model: id,
            };
            self.trigger_event(id, Event::change(change));
        }
        self
    }

    /// Apply several assignments in iteration order
    pub fn set_many<K, V>(&mut self, id: impl Into<ComponentId>, entries: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        let id = id.into();
        for (key, value) in entries {
            self.set(id, key.as_ref(), value);
        }
        self
    }

    /// Raw attribute store, bypassing custom getters
    pub fn attributes(&self, id: impl Into<ComponentId>) -> &Attributes {
        &self.slot(id.into()).attributes
    }

    pub fn field(&self, id: impl Into<ComponentId>, name: &str) -> Option<&Value> {
        self.slot(id.into()).fields.get(name)
    }

    pub fn set_field(&mut self, id: impl Into<ComponentId>, name: &str, value: impl Into<Value>) {
        self.slot_mut(id.into()).fields.insert(name.to_string(), value.into());
    }

    // ------------------------------------------------------------------
    // Widgets
    // ------------------------------------------------------------------

    fn widget_state(&self, widget: WidgetId) -> Option<&WidgetState> {
        self.slot(widget.0).widget.as_ref()
    }

    /// Element owned by `widget`
    pub fn element(&self, widget: WidgetId) -> NodeId {
        self.widget_state(widget).map_or(NodeId::NONE, |s| s.element)
    }

    /// Whether the widget's element was reachable from the document root at
    /// the last synchronization
    pub fn is_appended(&self, widget: WidgetId) -> bool {
        self.widget_state(widget).is_some_and(|s| s.appended)
    }

    pub fn has_explicit_parent(&self, widget: WidgetId) -> bool {
        self.widget_state(widget).is_some_and(|s| s.explicit_parent)
    }

    /// Owning widget of a document node
    pub fn lookup_component(&self, node: NodeId) -> Option<WidgetId> {
        if !node.is_valid() {
            return None;
        }
        self.owners.get(&node).copied()
    }

    /// Descendants of the widget's element matching `selector`
    pub fn find(&self, widget: WidgetId, selector: &str) -> Vec<NodeId> {
        self.document.tree().query_selector_all(self.element(widget), selector)
    }

    /// Element of a live widget; destroyed widgets are inert
    fn attachable(&self, widget: WidgetId) -> Option<NodeId> {
        if self.is_destroyed(widget) {
            tracing::warn!("Ignoring attach operation on destroyed widget {}", widget);
            return None;
        }
        self.widget_state(widget).map(|s| s.element)
    }

    fn parent_of(&self, target: NodeId) -> Result<NodeId> {
        Ok(self.document.tree().parent(target).ok_or(DomError::NoParent(target))?)
    }

    /// Insert the element as last child of `target`
    pub fn append_to(&mut self, widget: WidgetId, target: NodeId) -> Result<&mut Self> {
        if let Some(element) = self.attachable(widget) {
            self.document.tree_mut().append_child(target, element)?;
            self.check_appended(widget);
        }
        Ok(self)
    }

    /// Insert the element as first child of `target`
    pub fn prepend_to(&mut self, widget: WidgetId, target: NodeId) -> Result<&mut Self> {
        if let Some(element) = self.attachable(widget) {
            self.document.tree_mut().prepend_child(target, element)?;
            self.check_appended(widget);
        }
        Ok(self)
    }

    /// Insert the element right after `target`
    pub fn insert_after(&mut self, widget: WidgetId, target: NodeId) -> Result<&mut Self> {
        if let Some(element) = self.attachable(widget) {
            let parent = self.parent_of(target)?;
            let tree = self.document.tree_mut();
            let next = tree.next_sibling(target);
            tree.insert_before(parent, element, next)?;
            self.check_appended(widget);
        }
        Ok(self)
    }

    /// Insert the element right before `target`
    pub fn insert_before(&mut self, widget: WidgetId, target: NodeId) -> Result<&mut Self> {
        if let Some(element) = self.attachable(widget) {
            let parent = self.parent_of(target)?;
            self.document.tree_mut().insert_before(parent, element, Some(target))?;
            self.check_appended(widget);
        }
        Ok(self)
    }

    /// Put the element where `target` is, detaching `target`
    pub fn replace(&mut self, widget: WidgetId, target: NodeId) -> Result<&mut Self> {
        if let Some(element) = self.attachable(widget) {
            let parent = self.parent_of(target)?;
            self.document.tree_mut().replace_child(parent, element, target)?;
            self.check_appended(widget);
        }
        Ok(self)
    }

    /// Take the element out of the document tree
    pub fn detach(&mut self, widget: WidgetId) -> &mut Self {
        if let Some(element) = self.attachable(widget) {
            self.document.tree_mut().remove(element);
            self.check_appended(widget);
        }
        self
    }

    /// Synchronize ownership and attachment state with the document after a move
    fn check_appended(&mut self, widget: WidgetId) {
        let id = widget.component();
        let Some(state) = self.widget_state(widget) else {
            return;
        };
        let (element, explicit, appended) = (state.element, state.explicit_parent, state.appended);

        if !explicit {
            let inferred = self
                .document
                .tree()
                .ancestors(element)
                .find_map(|node| self.owners.get(&node).copied())
                .map(ComponentId::from);
            if let Some(parent) = inferred.filter(|&p| self.is_closing(p)) {
                tracing::warn!("Ignoring destroyed parent {} inferred for {}", parent, widget);
            } else if inferred != self.lifecycle.parent(id) {
                match self.lifecycle.set_parent(id, inferred) {
                    Ok(()) => tracing::debug!("Inferred parent {:?} for {}", inferred, widget),
                    Err(err) => tracing::warn!("Keeping previous parent of {}: {}", widget, err),
                }
            }
        }

        let connected = self.document.is_connected(element);
        if connected == appended {
            return;
        }
        tracing::debug!(
            "Widget {} {} document",
            widget,
            if connected { "appended to" } else { "removed from" }
        );

        self.set_appended(widget, connected);
        let nested = self
            .document
            .tree()
            .descendants_with_attribute(element, &self.config.marker_attribute);
        for node in nested {
            if let Some(child) = self.lookup_component(node) {
                self.set_appended(child, connected);
            }
        }
    }

    fn set_appended(&mut self, widget: WidgetId, appended: bool) {
        if let Some(state) = self.slot_mut(widget.0).widget.as_mut() {
            state.appended = appended;
        }
        self.trigger(widget, if appended { APPENDED_TO_DOM } else { REMOVED_FROM_DOM });
    }

    /// Dispatch a native event at `target` through the declared DOM events of
    /// every widget on its propagation path. Returns how many handlers ran.
    pub fn dispatch_dom_event(&mut self, target: NodeId, event: DomEvent) -> usize {
        let event = event.with_target(target);
        let path = self.document.tree().event_path(target);
        let reach = if event.bubbles { path.len() } else { path.len().min(1) };

        let mut invoked = 0;
        for (depth, &node) in path.iter().enumerate().take(reach) {
            let Some(owner) = self.lookup_component(node) else {
                continue;
            };
            let bindings: Vec<DomBinding> = self
                .class(owner)
                .dom_events()
                .iter()
                .filter(|b| b.event_type() == event.event_type)
                .cloned()
                .collect();

            for binding in bindings {
                if self.is_destroyed(owner) {
                    break;
                }
                for current in binding.matching(self.document.tree(), &path[..depth], node) {
                    let seen = Event::from_dom(event.seen_from(current)).bound(Some(owner.into()));
                    binding.listener().call(self, &seen);
                    invoked += 1;
                }
            }
        }

        tracing::trace!("Dispatched {} at {:?} to {} handlers", event.event_type, target, invoked);
        invoked
    }
}

impl std::fmt::Debug for Toolkit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolkit")
            .field("document", &self.document)
            .field("components", &self.slots.len())
            .field("widgets", &self.owners.len())
            .field("config", &self.config)
            .finish()
    }
}

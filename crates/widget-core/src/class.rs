//! Component classes
//!
//! A class is the per-type declaration table: declared events, DOM events,
//! methods, accessors and rendering metadata. Tables are merged with the
//! parent class once, in [`ClassBuilder::build`]; an entry declared by the
//! subclass replaces the inherited entry of the same name and leaves the
//! others alone.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::widget::DomBinding;
use crate::{Accessor, Event, Listener, Result, Toolkit, WidgetError, WidgetId};

/// Render hook, run once at widget construction
pub type RenderHook = Rc<dyn Fn(&mut Toolkit, WidgetId) -> Result<()>>;

/// Declared event handler
#[derive(Debug, Clone)]
pub enum Handler {
    /// Called with the owning instance as its call-context
    Function(Listener),
    /// Name of a class method, bound to the instance
    Method(String),
}

impl Handler {
    pub fn function(f: impl Fn(&mut Toolkit, &Event) + 'static) -> Self {
        Self::Function(Listener::new(f))
    }

    pub fn method(name: &str) -> Self {
        Self::Method(name.to_string())
    }

    fn resolve(&self, class: &str, methods: &HashMap<String, Listener>) -> Result<Listener> {
        match self {
            Self::Function(listener) => Ok(listener.clone()),
            Self::Method(name) => methods.get(name).cloned().ok_or_else(|| WidgetError::UnknownMethod {
                class: class.to_string(),
                method: name.clone(),
            }),
        }
    }
}

/// Merged, resolved declaration table of a component type
pub struct Class {
    name: String,
    parent: Option<Rc<Class>>,
    // Unresolved declarations, kept so subclasses re-resolve method names
    // against their own method table.
    event_decls: BTreeMap<String, Handler>,
    dom_event_decls: BTreeMap<String, Handler>,
    events: BTreeMap<String, Listener>,
    dom_events: Vec<DomBinding>,
    methods: HashMap<String, Listener>,
    accessors: HashMap<String, Accessor>,
    tag_name: Option<String>,
    class_name: String,
    attributes: Vec<(String, String)>,
    render: Option<RenderHook>,
}

impl Class {
    /// Root class: no declarations, default rendering.
    ///
    /// One instance per thread, so every class built here descends from the
    /// same root.
    pub fn base() -> Rc<Class> {
        thread_local! {
            static BASE: Rc<Class> = Rc::new(Class::root());
        }
        BASE.with(Rc::clone)
    }

    fn root() -> Self {
        Self {
            name: "Widget".to_string(),
            parent: None,
            event_decls: BTreeMap::new(),
            dom_event_decls: BTreeMap::new(),
            events: BTreeMap::new(),
            dom_events: Vec::new(),
            methods: HashMap::new(),
            accessors: HashMap::new(),
            tag_name: None,
            class_name: String::new(),
            attributes: Vec::new(),
            render: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Rc<Class>> {
        self.parent.as_ref()
    }

    /// Whether `other` is this class or one of its ancestors, by identity
    pub fn inherits(&self, other: &Class) -> bool {
        std::ptr::eq(self, other) || self.parent.as_ref().is_some_and(|p| p.inherits(other))
    }

    /// Merged declared events, resolved to listeners
    pub fn events(&self) -> impl Iterator<Item = (&str, &Listener)> {
        self.events.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn dom_events(&self) -> &[DomBinding] {
        &self.dom_events
    }

    pub fn method(&self, name: &str) -> Option<&Listener> {
        self.methods.get(name)
    }

    pub fn accessor(&self, key: &str) -> Option<&Accessor> {
        self.accessors.get(key)
    }

    /// Declared tag name, `None` to use the configured default
    pub fn tag_name(&self) -> Option<&str> {
        self.tag_name.as_deref()
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn render(&self) -> Option<&RenderHook> {
        self.render.as_ref()
    }
}

impl std::fmt::Debug for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut accessors: Vec<String> = Vec::new();
        for (key, accessor) in &self.accessors {
            if accessor.get_fn().is_some() {
                accessors.push(crate::accessor_method_name("get", key));
            }
            if accessor.set_fn().is_some() {
                accessors.push(crate::accessor_method_name("set", key));
            }
        }
        accessors.sort();

        f.debug_struct("Class")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("events", &self.events.keys().collect::<Vec<_>>())
            .field("dom_events", &self.dom_event_decls.keys().collect::<Vec<_>>())
            .field("accessors", &accessors)
            .field("tag_name", &self.tag_name)
            .field("class_name", &self.class_name)
            .finish()
    }
}

/// Builder for [`Class`]
pub struct ClassBuilder {
    name: String,
    parent: Option<Rc<Class>>,
    events: BTreeMap<String, Handler>,
    dom_events: BTreeMap<String, Handler>,
    methods: HashMap<String, Listener>,
    accessors: HashMap<String, Accessor>,
    tag_name: Option<String>,
    class_name: Option<String>,
    attributes: Option<Vec<(String, String)>>,
    render: Option<RenderHook>,
}

impl ClassBuilder {
    /// Start a class extending [`Class::base`]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: Some(Class::base()),
            events: BTreeMap::new(),
            dom_events: BTreeMap::new(),
            methods: HashMap::new(),
            accessors: HashMap::new(),
            tag_name: None,
            class_name: None,
            attributes: None,
            render: None,
        }
    }

    pub fn extends(mut self, parent: &Rc<Class>) -> Self {
        self.parent = Some(Rc::clone(parent));
        self
    }

    /// Declare a handler installed on every instance for `event`
    pub fn event(mut self, event: &str, handler: Handler) -> Self {
        self.events.insert(event.to_string(), handler);
        self
    }

    /// Declare a DOM event binding, `"type"` or `"type selector"`
    pub fn dom_event(mut self, key: &str, handler: Handler) -> Self {
        self.dom_events.insert(key.to_string(), handler);
        self
    }

    pub fn method(mut self, name: &str, f: impl Fn(&mut Toolkit, &Event) + 'static) -> Self {
        self.methods.insert(name.to_string(), Listener::new(f));
        self
    }

    pub fn accessor(mut self, key: &str, accessor: Accessor) -> Self {
        self.accessors.insert(key.to_string(), accessor);
        self
    }

    pub fn tag_name(mut self, tag: &str) -> Self {
        self.tag_name = Some(tag.to_string());
        self
    }

    /// Space-separated class tokens applied to the element
    pub fn class_name(mut self, class_name: &str) -> Self {
        self.class_name = Some(class_name.to_string());
        self
    }

    /// Add an element attribute; declaring any replaces the inherited set
    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes
            .get_or_insert_with(Vec::new)
            .push((name.to_string(), value.to_string()));
        self
    }

    pub fn render(mut self, hook: impl Fn(&mut Toolkit, WidgetId) -> Result<()> + 'static) -> Self {
        self.render = Some(Rc::new(hook));
        self
    }

    pub fn build(self) -> Result<Rc<Class>> {
        let parent = self.parent;
        let inherited = parent.as_deref();

        let mut methods = inherited.map(|p| p.methods.clone()).unwrap_or_default();
        methods.extend(self.methods);

        let mut accessors = inherited.map(|p| p.accessors.clone()).unwrap_or_default();
        for (key, accessor) in self.accessors {
            let merged = match accessors.get(&key) {
                Some(previous) => accessor.over(previous),
                None => accessor,
            };
            accessors.insert(key, merged);
        }

        let mut event_decls = inherited.map(|p| p.event_decls.clone()).unwrap_or_default();
        event_decls.extend(self.events);
        let mut dom_event_decls = inherited.map(|p| p.dom_event_decls.clone()).unwrap_or_default();
        dom_event_decls.extend(self.dom_events);

        let events = event_decls
            .iter()
            .map(|(event, handler)| Ok((event.clone(), handler.resolve(&self.name, &methods)?)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        let dom_events = dom_event_decls
            .iter()
            .map(|(key, handler)| DomBinding::parse(key, handler.resolve(&self.name, &methods)?))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "Built class {} ({} events, {} dom events)",
            self.name,
            events.len(),
            dom_events.len()
        );

        Ok(Rc::new(Class {
            tag_name: self.tag_name.or_else(|| inherited.and_then(|p| p.tag_name.clone())),
            class_name: self
                .class_name
                .or_else(|| inherited.map(|p| p.class_name.clone()))
                .unwrap_or_default(),
            attributes: self
                .attributes
                .or_else(|| inherited.map(|p| p.attributes.clone()))
                .unwrap_or_default(),
            render: self.render.or_else(|| inherited.and_then(|p| p.render.clone())),
            name: self.name,
            parent,
            event_decls,
            dom_event_decls,
            events,
            dom_events,
            methods,
            accessors,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(class: &Class) -> Vec<&str> {
        class.events().map(|(k, _)| k).collect()
    }

    #[test]
    fn test_events_merge_through_ancestry() {
        let a = ClassBuilder::new("A")
            .event("one", Handler::function(|_, _| {}))
            .event("two", Handler::function(|_, _| {}))
            .build()
            .unwrap();
        let override_two = Listener::new(|_, _| {});
        let b = ClassBuilder::new("B")
            .extends(&a)
            .event("two", Handler::Function(override_two.clone()))
            .event("three", Handler::function(|_, _| {}))
            .build()
            .unwrap();

        assert_eq!(names(&a), ["one", "two"]);
        assert_eq!(names(&b), ["one", "three", "two"]);

        let two = b.events().find(|(k, _)| *k == "two").map(|(_, l)| l.clone()).unwrap();
        assert!(two.same(&override_two));
        let one_a = a.events().next().map(|(_, l)| l.clone()).unwrap();
        let one_b = b.events().next().map(|(_, l)| l.clone()).unwrap();
        assert!(one_a.same(&one_b));
    }

    #[test]
    fn test_method_handler_resolves_against_subclass() {
        let a = ClassBuilder::new("A")
            .method("test", |_, _| {})
            .event("test", Handler::method("test"))
            .build()
            .unwrap();
        let b = ClassBuilder::new("B").extends(&a).method("test", |_, _| {}).build().unwrap();

        let resolved_a = a.events().next().map(|(_, l)| l.clone()).unwrap();
        let resolved_b = b.events().next().map(|(_, l)| l.clone()).unwrap();
        assert!(resolved_a.same(a.method("test").unwrap()));
        assert!(resolved_b.same(b.method("test").unwrap()));
        assert!(!resolved_a.same(&resolved_b));
    }

    #[test]
    fn test_unknown_method_fails_build() {
        let err = ClassBuilder::new("Broken").event("test", Handler::method("missing")).build().unwrap_err();
        assert_eq!(
            err,
            WidgetError::UnknownMethod { class: "Broken".to_string(), method: "missing".to_string() }
        );
    }

    #[test]
    fn test_rendering_metadata_inherits_as_a_whole() {
        let a = ClassBuilder::new("A")
            .tag_name("span")
            .class_name("a")
            .attribute("id", "x")
            .attribute("role", "note")
            .build()
            .unwrap();
        let b = ClassBuilder::new("B").extends(&a).attribute("title", "t").build().unwrap();

        assert_eq!(b.tag_name(), Some("span"));
        assert_eq!(b.class_name(), "a");
        assert_eq!(b.attributes(), [("title".to_string(), "t".to_string())]);
        assert!(b.inherits(&a));
        assert!(!a.inherits(&b));
        assert_eq!(Class::base().tag_name(), None);
    }

    #[test]
    fn test_every_class_descends_from_base() {
        let a = ClassBuilder::new("A").build().unwrap();
        let b = ClassBuilder::new("B").extends(&a).build().unwrap();
        let c = ClassBuilder::new("C").extends(&Class::base()).build().unwrap();

        assert!(Rc::ptr_eq(&Class::base(), &Class::base()));
        for class in [&a, &b, &c] {
            assert!(class.inherits(&Class::base()));
        }
        assert!(Class::base().parent().is_none());
        assert!(!c.inherits(&a));
    }

    #[test]
    fn test_debug_names_accessors() {
        let class = ClassBuilder::new("A")
            .accessor("stuff", Accessor::new().getter(|_, _| None).setter(|_, _, _| {}))
            .build()
            .unwrap();
        let debug = format!("{class:?}");
        assert!(debug.contains("getStuff"));
        assert!(debug.contains("setStuff"));
    }
}

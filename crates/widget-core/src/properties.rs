//! Attribute store
//!
//! Keyed values with `change:<key>` notification on strict inequality, and
//! per-key custom accessors that take over storage for their key.

use std::collections::HashMap;
use std::rc::Rc;

use crate::{ComponentId, Toolkit, Value};

/// Payload of a `change:<key>` event
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub key: String,
    /// Previous value, `None` when the key was never set
    pub old: Option<Value>,
    pub new: Value,
    /// Component whose attribute changed
    pub model: ComponentId,
}

/// Outcome of storing a value
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    Unchanged,
    Changed { old: Option<Value> },
}

/// Generic attribute storage of one component
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    values: HashMap<String, Value>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Store `value` unless it is identical to the stored one
    pub fn assign(&mut self, key: &str, value: Value) -> Assignment {
        if self.values.get(key) == Some(&value) {
            return Assignment::Unchanged;
        }
        Assignment::Changed {
            old: self.values.insert(key.to_string(), value),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

pub type Getter = Rc<dyn Fn(&Toolkit, ComponentId) -> Option<Value>>;
pub type Setter = Rc<dyn Fn(&mut Toolkit, ComponentId, Value)>;

/// Custom accessor pair for one key.
///
/// A setter takes full responsibility for storage and notification of its
/// key; the generic store and `change:<key>` are bypassed.
#[derive(Clone, Default)]
pub struct Accessor {
    getter: Option<Getter>,
    setter: Option<Setter>,
}

impl Accessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn getter(mut self, f: impl Fn(&Toolkit, ComponentId) -> Option<Value> + 'static) -> Self {
        self.getter = Some(Rc::new(f));
        self
    }

    pub fn setter(mut self, f: impl Fn(&mut Toolkit, ComponentId, Value) + 'static) -> Self {
        self.setter = Some(Rc::new(f));
        self
    }

    pub(crate) fn get_fn(&self) -> Option<&Getter> {
        self.getter.as_ref()
    }

    pub(crate) fn set_fn(&self) -> Option<&Setter> {
        self.setter.as_ref()
    }

    /// Fill the halves this accessor leaves open from an inherited one
    pub(crate) fn over(&self, inherited: &Accessor) -> Accessor {
        Accessor {
            getter: self.getter.clone().or_else(|| inherited.getter.clone()),
            setter: self.setter.clone().or_else(|| inherited.setter.clone()),
        }
    }
}

impl std::fmt::Debug for Accessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accessor")
            .field("getter", &self.getter.is_some())
            .field("setter", &self.setter.is_some())
            .finish()
    }
}

/// Conventional method name of an accessor: `prefix` + key with its
/// first character uppercased.
pub fn accessor_method_name(prefix: &str, key: &str) -> String {
    let mut chars = key.chars();
    let mut name = String::with_capacity(prefix.len() + key.len());
    name.push_str(prefix);
    if let Some(first) = chars.next() {
        name.extend(first.to_uppercase());
        name.push_str(chars.as_str());
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_reports_change_only_on_difference() {
        let mut attrs = Attributes::new();
        assert_eq!(attrs.assign("test", Value::from(3)), Assignment::Changed { old: None });
        assert_eq!(attrs.assign("test", Value::from(3)), Assignment::Unchanged);
        assert_eq!(
            attrs.assign("test", Value::from(4)),
            Assignment::Changed { old: Some(Value::from(3)) }
        );
        assert_eq!(attrs.get("test"), Some(&Value::from(4)));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_assign_nan_always_changes() {
        let mut attrs = Attributes::new();
        attrs.assign("n", Value::from(f64::NAN));
        assert!(matches!(attrs.assign("n", Value::from(f64::NAN)), Assignment::Changed { .. }));
    }

    #[test]
    fn test_accessor_method_name() {
        assert_eq!(accessor_method_name("get", "stuff"), "getStuff");
        assert_eq!(accessor_method_name("set", "thing"), "setThing");
        assert_eq!(accessor_method_name("set", "x"), "setX");
        assert_eq!(accessor_method_name("get", "éclair"), "getÉclair");
        assert_eq!(accessor_method_name("get", ""), "get");
    }

    #[test]
    fn test_accessor_inherits_missing_half() {
        let parent = Accessor::new().getter(|_, _| Some(Value::from(1))).setter(|_, _, _| {});
        let child = Accessor::new().getter(|_, _| Some(Value::from(2)));
        let merged = child.over(&parent);

        assert!(merged.get_fn().is_some());
        assert!(merged.set_fn().is_some());
        assert!(Accessor::new().over(&Accessor::new()).get_fn().is_none());
    }
}

//! Dynamic values stored in properties and carried by events

use std::any::Any;
use std::rc::Rc;

use crate::{ComponentId, WidgetId};

/// A property or payload value.
///
/// Equality is strict identity: scalars compare by value (so `NaN` never
/// equals itself) and `Shared` values compare by allocation.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Component(ComponentId),
    Shared(Rc<dyn Any>),
}

impl Value {
    /// Wrap an arbitrary value; clones of the result are identical to it
    pub fn shared<T: Any>(value: T) -> Self {
        Self::Shared(Rc::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<ComponentId> {
        match self {
            Self::Component(id) => Some(*id),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Shared(any) => any.downcast_ref(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Component(a), Self::Component(b)) => a == b,
            (Self::Shared(a), Self::Shared(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Number(n) => write!(f, "Number({n})"),
            Self::Str(s) => write!(f, "Str({s:?})"),
            Self::Component(id) => write!(f, "Component({id})"),
            Self::Shared(any) => write!(f, "Shared({:p})", Rc::as_ptr(any)),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<ComponentId> for Value {
    fn from(id: ComponentId) -> Self {
        Self::Component(id)
    }
}

impl From<WidgetId> for Value {
    fn from(id: WidgetId) -> Self {
        Self::Component(id.into())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

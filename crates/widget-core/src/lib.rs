//! fOS Widgets - component toolkit
//!
//! Components with an ownership tree, instance events and observable
//! attributes. Widgets add a DOM element, declarative DOM event delegation
//! and automatic attach/detach notifications.
//!
//! ```rust,ignore
//! use widget_core::{ClassBuilder, Document, Toolkit};
//!
//! let mut toolkit = Toolkit::new(Document::new("about:blank"))?;
//! let label = ClassBuilder::new("Label").tag_name("span").build()?;
//! let widget = toolkit.create_widget(&label)?;
//! let body = toolkit.document().body();
//! toolkit.append_to(widget, body)?;
//! assert!(toolkit.is_appended(widget));
//! ```

mod class;
mod config;
mod error;
mod events;
mod lifecycle;
mod properties;
mod toolkit;
mod value;
mod widget;

pub use class::{Class, ClassBuilder, Handler, RenderHook};
pub use config::Config;
pub use error::{Result, WidgetError};
pub use events::{APPENDED_TO_DOM, DESTROYING, Detail, Event, Listener, Listeners, REMOVED_FROM_DOM};
pub use lifecycle::{ComponentId, LifeCycleArena};
pub use properties::{Accessor, Assignment, Attributes, Change, Getter, Setter, accessor_method_name};
pub use toolkit::Toolkit;
pub use value::Value;
pub use widget::{DomBinding, WidgetId};

pub use widget_dom as dom;
pub use widget_dom::{Document, DomEvent, NodeId};

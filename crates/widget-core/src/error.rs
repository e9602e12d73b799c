//! Widget errors

use widget_dom::DomError;

use crate::ComponentId;

/// Result type for toolkit operations
pub type Result<T> = std::result::Result<T, WidgetError>;

/// Toolkit errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WidgetError {
    /// The host document has no tree root to attach widgets to
    #[error("Document has no root; widgets require a document with a tree root")]
    MissingRoot,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A declared string handler names a method the class does not have
    #[error("Class {class} declares handler {method:?} but has no such method")]
    UnknownMethod { class: String, method: String },

    /// A declared DOM event key could not be parsed
    #[error("Invalid DOM event declaration: {0:?}")]
    InvalidDomEvent(String),

    /// Assigning the parent would make a component its own ancestor
    #[error("Ownership cycle: {parent} cannot own its ancestor {child}")]
    OwnershipCycle { child: ComponentId, parent: ComponentId },

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}

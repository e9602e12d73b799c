//! Toolkit configuration

use serde::{Deserialize, Serialize};
use widget_dom::DOMStringMap;

use crate::{Result, WidgetError};

/// Toolkit configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Element tag for classes that declare none
    pub default_tag_name: String,
    /// Attribute marking an element as owned by a widget
    pub marker_attribute: String,
    /// Log every trigger with its listener count at trace level
    pub trace_dispatch: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_tag_name: "div".to_string(),
            marker_attribute: "data-widget".to_string(),
            trace_dispatch: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.default_tag_name.trim().is_empty() {
            return Err(WidgetError::InvalidConfig("default_tag_name is empty".to_string()));
        }
        if !DOMStringMap::is_data_attribute(&self.marker_attribute) {
            return Err(WidgetError::InvalidConfig(format!(
                "marker_attribute {:?} is not a data-* attribute",
                self.marker_attribute
            )));
        }
        Ok(())
    }
}

//! DOMStringMap (dataset)
//!
//! camelCase view over an element's `data-*` attributes.

use std::collections::BTreeMap;

use crate::NamedNodeMap;

/// Snapshot of `data-*` attributes keyed by camelCase name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMStringMap {
    data: BTreeMap<String, String>,
}

impl DOMStringMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the `data-*` entries of an attribute map
    pub fn from_attributes(attrs: &NamedNodeMap) -> Self {
        let data = attrs
            .iter()
            .filter_map(|attr| {
                let key = attr.name.strip_prefix("data-")?;
                Some((to_camel_case(key), attr.value.clone()))
            })
            .collect();
        Self { data }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    /// Attribute name backing a camelCase key: `userId` -> `data-user-id`
    pub fn to_attribute_name(key: &str) -> String {
        format!("data-{}", to_kebab_case(key))
    }

    /// Whether `name` is a usable `data-*` attribute name
    pub fn is_data_attribute(name: &str) -> bool {
        name.strip_prefix("data-").is_some_and(|rest| {
            !rest.is_empty()
                && rest
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        })
    }
}

fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut upper = false;
    for c in s.chars() {
        match c {
            '-' => upper = true,
            c if upper => {
                out.push(c.to_ascii_uppercase());
                upper = false;
            }
            c => out.push(c),
        }
    }
    out
}

fn to_kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

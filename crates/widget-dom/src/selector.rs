//! Selectors
//!
//! The small selector subset used for scoped queries and event delegation:
//! tag, `.class`, `#id`, `[attr]`, `[attr=value]` and `*`, combined into
//! compounds (`span.item`), descendant chains (`ul .item`) and comma lists.

use crate::{DomTree, ElementData, NodeId};

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Tag(String),
    Class(String),
    Id(String),
    Attribute { name: String, value: Option<String> },
    Universal,
}

impl SimpleSelector {
    /// Parse a compound selector such as `span.item[data-x]`
    pub fn parse_compound(s: &str) -> Option<Vec<Self>> {
        let mut out = Vec::new();
        let mut rest = s.trim();
        if rest.is_empty() {
            return None;
        }

        while let Some(first) = rest.chars().next() {
            let (simple, tail) = match first {
                '*' => (Self::Universal, &rest[1..]),
                '.' | '#' => {
                    let body = &rest[1..];
                    let end = body.find(is_compound_boundary).unwrap_or(body.len());
                    if end == 0 {
                        return None;
                    }
                    let name = body[..end].to_string();
                    let simple = if first == '.' { Self::Class(name) } else { Self::Id(name) };
                    (simple, &body[end..])
                }
                '[' => {
                    let close = rest.find(']')?;
                    (Self::parse_attribute(&rest[1..close])?, &rest[close + 1..])
                }
                _ => {
                    let end = rest.find(is_compound_boundary).unwrap_or(rest.len());
                    (Self::Tag(rest[..end].to_ascii_lowercase()), &rest[end..])
                }
            };
            out.push(simple);
            rest = tail;
        }

        Some(out)
    }

    fn parse_attribute(inner: &str) -> Option<Self> {
        let inner = inner.trim();
        let (name, value) = match inner.split_once('=') {
            Some((name, value)) => {
                let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                (name.trim(), Some(value.to_string()))
            }
            None => (inner, None),
        };
        if name.is_empty() {
            return None;
        }
        Some(Self::Attribute { name: name.to_string(), value })
    }

    /// Check an element against this selector
    pub fn matches(&self, elem: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => elem.tag_name.eq_ignore_ascii_case(tag),
            Self::Id(id) => elem.id() == Some(id.as_str()),
            Self::Class(class) => elem.classes.contains(class),
            Self::Attribute { name, value: None } => elem.has_attribute(name),
            Self::Attribute { name, value: Some(value) } => {
                elem.get_attribute(name).as_deref() == Some(value.as_str())
            }
        }
    }
}

fn is_compound_boundary(c: char) -> bool {
    matches!(c, '.' | '#' | '[')
}

/// Descendant-combined chain of compounds, outermost first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Vec<SimpleSelector>>,
}

impl Selector {
    pub fn parse(s: &str) -> Option<Self> {
        let compounds = s
            .split_whitespace()
            .map(SimpleSelector::parse_compound)
            .collect::<Option<Vec<_>>>()?;
        if compounds.is_empty() {
            return None;
        }
        Some(Self { compounds })
    }

    /// Match `node` against the chain, resolving ancestors through `tree`
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some((last, outer)) = self.compounds.split_last() else {
            return false;
        };
        if !compound_matches(tree, node, last) {
            return false;
        }

        let mut cursor = tree.parent(node);
        for compound in outer.iter().rev() {
            loop {
                match cursor {
                    Some(id) => {
                        cursor = tree.parent(id);
                        if compound_matches(tree, id, compound) {
                            break;
                        }
                    }
                    None => return false,
                }
            }
        }
        true
    }
}

fn compound_matches(tree: &DomTree, node: NodeId, compound: &[SimpleSelector]) -> bool {
    tree.element(node)
        .is_some_and(|elem| compound.iter().all(|simple| simple.matches(elem)))
}

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(Vec<Selector>);

impl SelectorList {
    pub fn parse(s: &str) -> Option<Self> {
        let selectors = s.split(',').map(Selector::parse).collect::<Option<Vec<_>>>()?;
        Some(Self(selectors))
    }

    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.0.iter().any(|selector| selector.matches(tree, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_selector_parse() {
        assert_eq!(SimpleSelector::parse_compound("DIV"), Some(vec![SimpleSelector::Tag("div".into())]));
        assert_eq!(SimpleSelector::parse_compound(".class"), Some(vec![SimpleSelector::Class("class".into())]));
        assert_eq!(SimpleSelector::parse_compound("#id"), Some(vec![SimpleSelector::Id("id".into())]));
        assert_eq!(SimpleSelector::parse_compound("*"), Some(vec![SimpleSelector::Universal]));
        assert!(SimpleSelector::parse_compound("").is_none());
        assert!(SimpleSelector::parse_compound(".").is_none());
        assert!(SimpleSelector::parse_compound("[]").is_none());
    }

    #[test]
    fn test_compound_parse() {
        let parsed = SimpleSelector::parse_compound("span.item#main[data-x='1']").unwrap();
        assert_eq!(
            parsed,
            vec![
                SimpleSelector::Tag("span".into()),
                SimpleSelector::Class("item".into()),
                SimpleSelector::Id("main".into()),
                SimpleSelector::Attribute { name: "data-x".into(), value: Some("1".into()) },
            ]
        );
    }

    #[test]
    fn test_element_matches() {
        let mut elem = ElementData::new("div");
        elem.set_attribute("id", "main");
        elem.set_attribute("class", "container active");
        elem.set_attribute("data-widget", "");

        assert!(SimpleSelector::Tag("div".into()).matches(&elem));
        assert!(SimpleSelector::Id("main".into()).matches(&elem));
        assert!(SimpleSelector::Class("container".into()).matches(&elem));
        assert!(SimpleSelector::Attribute { name: "data-widget".into(), value: None }.matches(&elem));
        assert!(!SimpleSelector::Attribute { name: "data-widget".into(), value: Some("x".into()) }.matches(&elem));
        assert!(SimpleSelector::Universal.matches(&elem));
    }

    #[test]
    fn test_descendant_chain() {
        let mut tree = DomTree::with_root();
        let list = tree.create_element("ul");
        let item = tree.create_element("li");
        tree.add_class(item, "item");
        tree.append_child(NodeId::ROOT, list).unwrap();
        tree.append_child(list, item).unwrap();

        assert!(Selector::parse("ul .item").unwrap().matches(&tree, item));
        assert!(!Selector::parse("ol .item").unwrap().matches(&tree, item));
        assert!(SelectorList::parse("ol li, ul li").unwrap().matches(&tree, item));
        assert!(Selector::parse("   ").is_none());
    }
}

//! In-memory element tree used by the integration tests.

#![allow(dead_code, reason = "Each test binary uses a subset of the helpers")]

use core::error::Error;
use css_orchestrator::types::{StyleRule, Stylesheet};
use css_orchestrator::{AttributeResolver, Origin, TreeResolver};

#[derive(Default)]
struct Node {
    tag: String,
    parent: Option<usize>,
    children: Vec<usize>,
    attrs: Vec<(String, String)>,
    hint: Option<String>,
    visited: bool,
    hover: bool,
}

/// Elements addressed by index; index 0 is the first inserted element.
#[derive(Default)]
pub struct Dom {
    nodes: Vec<Node>,
}

impl Dom {
    /// Append an element under `parent` and return its index.
    pub fn element(&mut self, parent: Option<usize>, tag: &str, attrs: &[(&str, &str)]) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node {
            tag: tag.to_owned(),
            parent,
            attrs: attrs
                .iter()
                .map(|&(name, value)| (name.to_owned(), value.to_owned()))
                .collect(),
            ..Node::default()
        });
        if let Some(parent_node) = parent.and_then(|index| self.nodes.get_mut(index)) {
            parent_node.children.push(id);
        }
        id
    }

    pub fn set_attr(&mut self, element: usize, name: &str, value: &str) {
        let Some(node) = self.nodes.get_mut(element) else {
            return;
        };
        node.attrs.retain(|(existing, _)| existing != name);
        node.attrs.push((name.to_owned(), value.to_owned()));
    }

    pub fn set_hint(&mut self, element: usize, text: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.hint = Some(text.to_owned());
        }
    }

    pub fn set_visited(&mut self, element: usize, visited: bool) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.visited = visited;
        }
    }

    pub fn set_hover(&mut self, element: usize, hover: bool) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.hover = hover;
        }
    }

    fn attr(&self, element: usize, name: &str) -> Option<&str> {
        self.nodes.get(element).and_then(|node| {
            node.attrs
                .iter()
                .find(|(existing, _)| existing == name)
                .map(|(_, value)| value.as_str())
        })
    }

    fn siblings(&self, element: usize) -> Option<&[usize]> {
        let parent = self.nodes.get(element)?.parent?;
        self.nodes.get(parent).map(|node| node.children.as_slice())
    }
}

impl AttributeResolver<usize> for Dom {
    fn attribute_value(&self, element: usize, _namespace: Option<&str>, name: &str) -> Option<&str> {
        self.attr(element, name)
    }

    fn class(&self, element: usize) -> Option<&str> {
        self.attr(element, "class")
    }

    fn id(&self, element: usize) -> Option<&str> {
        self.attr(element, "id")
    }

    fn lang(&self, element: usize) -> Option<&str> {
        self.attr(element, "lang")
    }

    fn is_link(&self, element: usize) -> bool {
        self.nodes.get(element).is_some_and(|node| node.tag == "a") && self.attr(element, "href").is_some()
    }

    fn element_styling(&self, element: usize) -> Option<&str> {
        self.attr(element, "style")
    }

    fn non_css_styling(&self, element: usize) -> Option<&str> {
        self.nodes.get(element).and_then(|node| node.hint.as_deref())
    }

    fn is_visited(&self, element: usize) -> bool {
        self.nodes.get(element).is_some_and(|node| node.visited)
    }

    fn is_hover(&self, element: usize) -> bool {
        self.nodes.get(element).is_some_and(|node| node.hover)
    }
}

impl TreeResolver<usize> for Dom {
    fn parent_element(&self, element: usize) -> Option<usize> {
        self.nodes.get(element).and_then(|node| node.parent)
    }

    fn is_first_child_element(&self, element: usize) -> bool {
        self.siblings(element)
            .is_some_and(|siblings| siblings.first() == Some(&element))
    }

    fn is_last_child_element(&self, element: usize) -> bool {
        self.siblings(element)
            .is_some_and(|siblings| siblings.last() == Some(&element))
    }

    fn position_of_element(&self, element: usize) -> Option<usize> {
        self.siblings(element)?
            .iter()
            .position(|&sibling| sibling == element)
    }

    fn matches_element(&self, element: usize, _namespace: Option<&str>, name: &str) -> bool {
        self.nodes
            .get(element)
            .is_some_and(|node| node.tag.eq_ignore_ascii_case(name))
    }
}

/// Stylesheet of `(selectors, declaration block)` pairs.
///
/// # Errors
/// Returns an error if a selector cannot be parsed.
pub fn sheet(origin: Origin, rules: &[(&str, &str)]) -> Result<Stylesheet, Box<dyn Error>> {
    let mut sheet = Stylesheet::new(origin);
    for (prelude, block) in rules {
        sheet = sheet.with_rule(StyleRule::parse(prelude, block)?);
    }
    Ok(sheet)
}

/// Install the test logger once per binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

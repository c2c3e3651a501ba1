//! Selectors Level 3 — simple selector conditions, selector chains and specificity.
//! Reference: <https://www.w3.org/TR/selectors-3/>
//!
//! This crate holds the pure, stateless half of selector matching:
//! - `Condition`: one simple-selector facet tested against one element
//! - `CompoundSelector` / `ComplexSelector`: conditions joined by combinator axes
//! - `Specificity`: the four-part weight used to order rules in the cascade
//! - a compact selector notation parser for hosts that do not bring their own
//!
//! Tree walking and memoization live in `css_orchestrator`; this crate never keeps state.

#![forbid(unsafe_code)]

mod condition;
mod error;
mod parser;
mod selector;
mod specificity;

pub use condition::{AttributeSelector, Condition, parse_nth_child};
pub use error::SelectorError;
pub use parser::{parse_complex_selector, parse_selector_list};
pub use selector::{Axis, ComplexSelector, CompoundSelector, DynamicPseudoClasses};
pub use specificity::Specificity;

/// Host access to element attributes and element-level styling text.
///
/// Every lookup may fail; a missing fact makes the dependent condition fail
/// instead of raising an error.
pub trait AttributeResolver<E> {
    /// Value of the attribute `name` in `namespace` (`None` means no namespace).
    fn attribute_value(&self, element: E, namespace: Option<&str>, name: &str) -> Option<&str>;

    /// The raw `class` attribute, a whitespace separated token list.
    fn class(&self, element: E) -> Option<&str>;

    /// The element id.
    fn id(&self, element: E) -> Option<&str>;

    /// The language of the element, e.g. `en-US`.
    fn lang(&self, element: E) -> Option<&str>;

    /// Whether the element is a hyperlink source anchor.
    fn is_link(&self, element: E) -> bool;

    /// Inline style text (the `style` attribute).
    fn element_styling(&self, element: E) -> Option<&str>;

    /// Style text derived from presentational attributes (`align`, `bgcolor`, ...).
    fn non_css_styling(&self, element: E) -> Option<&str>;

    /// Whether the link has been visited. Hosts that do not track history keep the default.
    fn is_visited(&self, element: E) -> bool {
        let _ = element;
        false
    }

    /// Whether the pointer is over the element.
    fn is_hover(&self, element: E) -> bool {
        let _ = element;
        false
    }

    /// Whether the element is being activated.
    fn is_active(&self, element: E) -> bool {
        let _ = element;
        false
    }

    /// Whether the element has focus.
    fn is_focus(&self, element: E) -> bool {
        let _ = element;
        false
    }
}

/// Host access to tree structure.
pub trait TreeResolver<E> {
    /// Parent element, `None` for the document root element.
    fn parent_element(&self, element: E) -> Option<E>;

    /// Whether the element is the first element child of its parent.
    fn is_first_child_element(&self, element: E) -> bool;

    /// Whether the element is the last element child of its parent.
    fn is_last_child_element(&self, element: E) -> bool;

    /// Zero-based index of the element among its parent's element children.
    fn position_of_element(&self, element: E) -> Option<usize>;

    /// Type selector test. `namespace` of `None` matches any namespace.
    fn matches_element(&self, element: E, namespace: Option<&str>, name: &str) -> bool;
}

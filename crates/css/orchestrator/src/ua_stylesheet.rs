//! User-agent stylesheet implementation.
//!
//! Provides default styling rules for HTML elements according to browser defaults
//! and the HTML5 specification.

use crate::types::{StyleRule, Stylesheet};
use css_cascade::{Declaration, Origin};
use css_selectors::{
    AttributeSelector, ComplexSelector, CompoundSelector, Condition, DynamicPseudoClasses,
};

/// HTML metadata elements that are never rendered.
const HIDDEN_ELEMENTS: [&str; 9] = [
    "head", "meta", "title", "link", "style", "script", "base", "template", "noscript",
];

/// Block-level HTML elements from the HTML5 spec.
const BLOCK_ELEMENTS: [&str; 38] = [
    "html", "body", "div", "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "dl",
    "dt", "dd", "blockquote", "pre", "table", "thead", "tbody", "tfoot", "tr", "form",
    "fieldset", "legend", "section", "article", "aside", "header", "footer", "main", "nav",
    "address", "figure", "figcaption", "details", "summary",
];

/// Heading sizes based on Chrome/Firefox user-agent stylesheets.
const HEADING_SIZES: [(&str, &str); 6] = [
    ("h1", "2em"),
    ("h2", "1.5em"),
    ("h3", "1.17em"),
    ("h4", "1em"),
    ("h5", "0.83em"),
    ("h6", "0.67em"),
];

/// Helper to create a UA rule with given selector and declarations.
fn make_ua_rule(selector: CompoundSelector, props: &[(&str, &str)]) -> StyleRule {
    StyleRule::new(
        vec![ComplexSelector::new(selector)],
        props
            .iter()
            .map(|&(name, value)| Declaration::new(name, value).with_origin(Origin::UserAgent))
            .collect(),
    )
}

/// Form controls and links.
fn interactive_rules() -> Vec<StyleRule> {
    let input_type = |kind: &str| {
        CompoundSelector::element("input")
            .with_condition(Condition::AttributeEquals(AttributeSelector::new("type", kind)))
    };
    vec![
        make_ua_rule(
            CompoundSelector::element("input"),
            &[("display", "inline-block"), ("padding", "8px 12px"), ("border", "2px solid")],
        ),
        make_ua_rule(input_type("checkbox"), &[("padding", "0"), ("border", "0")]),
        make_ua_rule(input_type("radio"), &[("padding", "0"), ("border", "0")]),
        make_ua_rule(
            CompoundSelector::element("a").with_condition(Condition::Link),
            &[("color", "#0000ee"), ("text-decoration", "underline")],
        ),
        make_ua_rule(
            CompoundSelector::element("a")
                .with_condition(Condition::Link)
                .with_pseudo_classes(DynamicPseudoClasses::VISITED),
            &[("color", "#551a8b")],
        ),
    ]
}

/// Create the user-agent stylesheet: hidden metadata, block display, form
/// controls, links and heading defaults.
pub fn create_ua_stylesheet() -> Stylesheet {
    let mut sheet = Stylesheet::new(Origin::UserAgent)
        .with_rule(make_ua_rule(CompoundSelector::element("html"), &[("color", "#000")]));
    for tag in HIDDEN_ELEMENTS {
        sheet = sheet.with_rule(make_ua_rule(CompoundSelector::element(tag), &[("display", "none")]));
    }
    for tag in BLOCK_ELEMENTS {
        sheet = sheet.with_rule(make_ua_rule(CompoundSelector::element(tag), &[("display", "block")]));
    }
    for rule in interactive_rules() {
        sheet = sheet.with_rule(rule);
    }
    for (tag, size) in HEADING_SIZES {
        sheet = sheet.with_rule(make_ua_rule(
            CompoundSelector::element(tag),
            &[("font-weight", "700"), ("font-size", size)],
        ));
    }
    sheet
}

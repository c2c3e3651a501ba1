//! Parsed stylesheet shapes consumed by the selector table.

use css_cascade::{Declaration, Origin};
use css_selectors::{ComplexSelector, SelectorError, parse_selector_list};
use css_style_attr::parse_style_attribute;

/// A stylesheet: an origin and its rules in source order.
#[derive(Clone, Debug, Default)]
pub struct Stylesheet {
    pub origin: Origin,
    pub rules: Vec<CssRule>,
}

impl Stylesheet {
    #[inline]
    pub const fn new(origin: Origin) -> Self {
        Self {
            origin,
            rules: Vec::new(),
        }
    }

    /// Append a style rule.
    #[inline]
    #[must_use]
    pub fn with_rule(mut self, rule: StyleRule) -> Self {
        self.rules.push(CssRule::Style(rule));
        self
    }

    /// Append an `@media` block.
    #[inline]
    #[must_use]
    pub fn with_media(mut self, rule: MediaRule) -> Self {
        self.rules.push(CssRule::Media(rule));
        self
    }
}

/// Top-level rule kinds the selector table understands.
#[derive(Clone, Debug)]
pub enum CssRule {
    Style(StyleRule),
    Media(MediaRule),
}

/// `selectors { declarations }`.
#[derive(Clone, Debug, Default)]
pub struct StyleRule {
    pub selectors: Vec<ComplexSelector>,
    /// Declarations in source order. Their origin is replaced by the sheet's at registration.
    pub declarations: Vec<Declaration>,
}

impl StyleRule {
    #[inline]
    pub const fn new(selectors: Vec<ComplexSelector>, declarations: Vec<Declaration>) -> Self {
        Self {
            selectors,
            declarations,
        }
    }

    /// Build a rule from a selector list and a declaration block body,
    /// e.g. `StyleRule::parse("p.warn", "color: red")`.
    ///
    /// # Errors
    /// Returns the selector parser's error for an unreadable prelude.
    pub fn parse(prelude: &str, block: &str) -> Result<Self, SelectorError> {
        Ok(Self {
            selectors: parse_selector_list(prelude)?,
            declarations: parse_style_attribute(block, Origin::Author),
        })
    }
}

/// `@media <list> { rules }`. Nested media blocks are not represented.
#[derive(Clone, Debug, Default)]
pub struct MediaRule {
    /// Media types the block is restricted to; empty means all media.
    pub media: Vec<String>,
    pub rules: Vec<StyleRule>,
}

impl MediaRule {
    #[inline]
    pub fn new(media: impl IntoIterator<Item = impl Into<String>>, rules: Vec<StyleRule>) -> Self {
        Self {
            media: media.into_iter().map(Into::into).collect(),
            rules,
        }
    }
}

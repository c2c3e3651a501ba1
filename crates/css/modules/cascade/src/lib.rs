//! CSS Cascading and Inheritance Level 4 — origins, importance and cascade order.
//! Reference: <https://www.w3.org/TR/css-cascade-4/>
//!
//! Declarations are opaque here: a property name, its value text, an importance
//! flag and the origin they came from. This crate decides only their order.

#![forbid(unsafe_code)]

mod style;

pub use style::CascadedStyle;

use css_selectors::Specificity;

/// Where a declaration came from.
/// Reference: Section 6.2 — Cascading Origins
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Origin {
    /// Built-in browser defaults.
    UserAgent,
    /// Reader preferences.
    User,
    /// Document stylesheets, presentational hints and `style` attributes.
    #[default]
    Author,
}

/// Origin and importance folded into one ordinal, lowest precedence first.
/// Reference: Section 6.1 — Cascade Sorting Order
///
/// User-agent declarations keep their tier whether or not they are important.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CascadeTier {
    /// User-agent declarations, normal or important.
    UserAgent,
    /// Normal user declarations.
    UserNormal,
    /// Normal author declarations.
    AuthorNormal,
    /// Important author declarations.
    AuthorImportant,
    /// Important user declarations.
    UserImportant,
}

impl CascadeTier {
    /// Tier of a declaration with the given origin and importance.
    #[inline]
    pub const fn of(origin: Origin, important: bool) -> Self {
        match (origin, important) {
            (Origin::UserAgent, _) => Self::UserAgent,
            (Origin::User, false) => Self::UserNormal,
            (Origin::Author, false) => Self::AuthorNormal,
            (Origin::Author, true) => Self::AuthorImportant,
            (Origin::User, true) => Self::UserImportant,
        }
    }
}

/// Total order over selector table entries: tier, then specificity, then
/// source sequence. The derived ordering compares fields top to bottom.
/// Reference: Section 6.1 — Cascade Sorting Order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderKey {
    /// Origin and importance.
    pub tier: CascadeTier,
    /// Selector specificity.
    pub specificity: Specificity,
    /// Position of the selector across all registered stylesheets.
    pub sequence: u32,
}

impl OrderKey {
    /// Construct an order key from its parts.
    #[inline]
    pub const fn new(tier: CascadeTier, specificity: Specificity, sequence: u32) -> Self {
        Self {
            tier,
            specificity,
            sequence,
        }
    }

    /// Whether a declaration ranked by `self` overrides one ranked by `other`.
    #[inline]
    pub fn wins_over(&self, other: &Self) -> bool {
        self > other
    }
}

/// A single property declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Declaration {
    /// Property name, ASCII lowercase.
    pub property: String,
    /// Raw value text.
    pub value: String,
    /// Whether the declaration carried `!important`.
    pub important: bool,
    /// Origin the declaration was parsed for.
    pub origin: Origin,
}

impl Declaration {
    /// A normal author declaration.
    #[inline]
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            important: false,
            origin: Origin::Author,
        }
    }

    /// Mark the declaration `!important`.
    #[inline]
    #[must_use]
    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }

    /// Re-stamp the declaration with another origin.
    #[inline]
    #[must_use]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Cascade tier of this declaration.
    #[inline]
    pub const fn tier(&self) -> CascadeTier {
        CascadeTier::of(self.origin, self.important)
    }
}

/// Parser for declaration blocks that arrive as text: `style` attributes and
/// presentational hints.
pub trait StylesheetFactory {
    /// Parse `text` into declarations stamped with `origin`, in source order.
    /// Malformed items are skipped.
    fn parse_style_declaration(
        &self,
        origin: Origin,
        text: &str,
        base_uri: Option<&str>,
    ) -> Vec<Declaration>;
}

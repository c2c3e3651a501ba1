//! CSS selector specificity calculation.
//! Reference: <https://www.w3.org/TR/CSS2/cascade.html#specificity>

use core::ops::Add;

/// Specificity `(a, b, c, d)`: style attribute flag, id count,
/// class/attribute/pseudo-class count, type/pseudo-element count.
///
/// The derived ordering is lexicographic, left to right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity(pub u16, pub u16, pub u16, pub u16);

impl Specificity {
    /// Specificity of a rule with no selectors at all (presentational hints).
    pub const ZERO: Self = Self(0, 0, 0, 0);
}

impl Add for Specificity {
    type Output = Self;

    /// Component-wise saturating sum, used to accumulate compounds along a chain.
    #[inline]
    fn add(self, other: Self) -> Self {
        Self(
            self.0.saturating_add(other.0),
            self.1.saturating_add(other.1),
            self.2.saturating_add(other.2),
            self.3.saturating_add(other.3),
        )
    }
}

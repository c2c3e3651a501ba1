//! Errors raised while building selectors.

use core::error::Error;
use core::fmt;

/// Failure to construct or register a selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorError {
    /// An immediate-sibling combinator reached the matcher. Sibling selectors must
    /// be rejected or rewritten before registration.
    UnsupportedAxis,
    /// `:nth-child()` argument that is neither a keyword, an integer nor `an+b`.
    InvalidNth(String),
    /// Selector text the compact notation parser cannot read.
    InvalidSelector(String),
}

impl fmt::Display for SelectorError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedAxis => {
                formatter.write_str("immediate sibling combinator is not supported by the matcher")
            }
            Self::InvalidNth(text) => write!(formatter, "invalid nth-child argument: {text:?}"),
            Self::InvalidSelector(text) => write!(formatter, "invalid selector: {text:?}"),
        }
    }
}

impl Error for SelectorError {}

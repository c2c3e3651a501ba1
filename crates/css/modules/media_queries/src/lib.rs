//! Media Queries Level 3 — media type evaluation for `@media` rules.
//! Reference: <https://www.w3.org/TR/mediaqueries-3/>
//!
//! Only media types are evaluated. Media features and the `not`/`only`
//! prefixes are the host's concern.

#![forbid(unsafe_code)]

/// The medium a document is styled for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaEnvironment {
    /// Media type name, e.g. `screen` or `print`.
    medium: String,
}

impl Default for MediaEnvironment {
    #[inline]
    fn default() -> Self {
        Self::new("screen")
    }
}

impl MediaEnvironment {
    /// Environment for `medium`. The name is compared case-insensitively.
    #[inline]
    pub fn new(medium: impl Into<String>) -> Self {
        Self {
            medium: medium.into(),
        }
    }

    /// Configured media type.
    #[inline]
    pub fn medium(&self) -> &str {
        &self.medium
    }

    /// Whether a rule restricted to `media` applies.
    ///
    /// An empty list and the `all` type match every medium.
    /// Reference: Section 2 — Media Queries (media types)
    pub fn matches_media_list(&self, media: &[String]) -> bool {
        media.is_empty()
            || media.iter().any(|entry| {
                let name = entry.trim();
                name.eq_ignore_ascii_case("all") || name.eq_ignore_ascii_case(&self.medium)
            })
    }
}

//! Per-element cascaded declaration lists.

use crate::Declaration;
use core::slice;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Shared instance returned for every element nothing applies to.
static EMPTY: Lazy<Arc<CascadedStyle>> = Lazy::new(|| Arc::new(CascadedStyle::default()));

/// Declarations applying to one element (or pseudo-element), lowest
/// precedence first. Later entries for a property override earlier ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CascadedStyle {
    /// Declarations in ascending precedence.
    declarations: Box<[Declaration]>,
}

impl CascadedStyle {
    /// The shared empty style.
    #[inline]
    pub fn empty() -> Arc<Self> {
        Arc::clone(&EMPTY)
    }

    /// Assemble a style from presentational hints, the declarations of each
    /// matched rule (ascending order key) and the `style` attribute.
    ///
    /// The concatenation is stable-sorted by cascade tier only, so specificity,
    /// source order and the inline position survive inside each tier.
    pub fn assemble<'decl>(
        presentational: &[Declaration],
        matched: impl IntoIterator<Item = &'decl [Declaration]>,
        inline: &[Declaration],
    ) -> Arc<Self> {
        let mut declarations: Vec<Declaration> = presentational.to_vec();
        for block in matched {
            declarations.extend_from_slice(block);
        }
        declarations.extend_from_slice(inline);
        Self::from_declarations(declarations)
    }

    /// Stable-sort `declarations` by tier and wrap them, reusing the shared
    /// empty style when there is nothing to keep.
    pub fn from_declarations(mut declarations: Vec<Declaration>) -> Arc<Self> {
        if declarations.is_empty() {
            return Self::empty();
        }
        declarations.sort_by_key(Declaration::tier);
        Arc::new(Self {
            declarations: declarations.into_boxed_slice(),
        })
    }

    /// All declarations, lowest precedence first.
    #[inline]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// The winning declaration for `property`, if any.
    pub fn property(&self, property: &str) -> Option<&Declaration> {
        self.declarations
            .iter()
            .rev()
            .find(|decl| decl.property.eq_ignore_ascii_case(property))
    }

    /// Number of declarations.
    #[inline]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether no declaration applies.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Iterate declarations, lowest precedence first.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Declaration> {
        self.declarations.iter()
    }
}

impl<'style> IntoIterator for &'style CascadedStyle {
    type Item = &'style Declaration;
    type IntoIter = slice::Iter<'style, Declaration>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

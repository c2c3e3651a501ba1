//! Compound and complex selectors.
//! Reference: Selectors Level 3 §5 (type selectors), §8 (combinators), §7 (pseudo-elements)

use crate::{AttributeResolver, Condition, SelectorError, Specificity, TreeResolver};
use bitflags::bitflags;
use core::iter;

/// Tree relationship that links a compound selector to the one before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Whitespace combinator: any ancestor.
    Descendant,
    /// `>`: the immediate parent.
    Child,
    /// `+`: the immediately preceding sibling. Representable so that upstream
    /// parsers can report it, but rejected at registration.
    Sibling,
}

bitflags! {
    /// Dynamic (user-action and history) pseudo-classes carried by a compound selector.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DynamicPseudoClasses: u8 {
        /// `:hover`
        const HOVER = 1;
        /// `:active`
        const ACTIVE = 1 << 1;
        /// `:focus`
        const FOCUS = 1 << 2;
        /// `:visited`
        const VISITED = 1 << 3;
    }
}

/// A sequence of simple selectors with no combinator, e.g. `a.external:hover::before`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    /// Namespace of the type selector; `None` matches any namespace.
    pub namespace: Option<String>,
    /// Element name; `None` or `*` matches any element.
    pub element_name: Option<String>,
    /// Conditions that must all hold.
    pub conditions: Vec<Condition>,
    /// Dynamic pseudo-classes that must all hold.
    pub pseudo_classes: DynamicPseudoClasses,
    /// Pseudo-element this compound styles, e.g. `first-line`.
    pub pseudo_element: Option<String>,
}

impl CompoundSelector {
    /// The universal compound selector `*`.
    #[inline]
    pub fn any() -> Self {
        Self::default()
    }

    /// A type selector for `name`.
    #[inline]
    pub fn element(name: impl Into<String>) -> Self {
        Self {
            element_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Add a condition.
    #[inline]
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add dynamic pseudo-classes.
    #[inline]
    #[must_use]
    pub fn with_pseudo_classes(mut self, classes: DynamicPseudoClasses) -> Self {
        self.pseudo_classes |= classes;
        self
    }

    /// Set the pseudo-element.
    #[inline]
    #[must_use]
    pub fn with_pseudo_element(mut self, name: impl Into<String>) -> Self {
        self.pseudo_element = Some(name.into());
        self
    }

    /// Restrict the type selector to a namespace.
    #[inline]
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Test the element name and every condition. Dynamic pseudo-classes are
    /// checked separately by `matches_dynamic`.
    pub fn matches<E: Copy>(
        &self,
        element: E,
        attributes: Option<&dyn AttributeResolver<E>>,
        tree: Option<&dyn TreeResolver<E>>,
    ) -> bool {
        if let Some(name) = self.element_name.as_deref()
            && name != "*"
            && !tree.is_some_and(|resolver| {
                resolver.matches_element(element, self.namespace.as_deref(), name)
            })
        {
            return false;
        }
        self.conditions
            .iter()
            .all(|condition| condition.matches(element, attributes, tree))
    }

    /// Ask the host whether every dynamic pseudo-class of this compound currently holds.
    pub fn matches_dynamic<E: Copy>(
        &self,
        element: E,
        attributes: Option<&dyn AttributeResolver<E>>,
    ) -> bool {
        if self.pseudo_classes.is_empty() {
            return true;
        }
        let Some(resolver) = attributes else {
            return false;
        };
        let checks = [
            (DynamicPseudoClasses::VISITED, resolver.is_visited(element)),
            (DynamicPseudoClasses::HOVER, resolver.is_hover(element)),
            (DynamicPseudoClasses::ACTIVE, resolver.is_active(element)),
            (DynamicPseudoClasses::FOCUS, resolver.is_focus(element)),
        ];
        checks
            .iter()
            .all(|&(flag, holds)| !self.pseudo_classes.contains(flag) || holds)
    }

    /// Specificity contribution of this compound.
    pub fn specificity(&self) -> Specificity {
        let mut ids = 0u16;
        let mut classes = 0u16;
        let mut types = 0u16;
        for condition in &self.conditions {
            if condition.is_id() {
                ids = ids.saturating_add(1);
            } else {
                classes = classes.saturating_add(1);
            }
        }
        let dynamic = u16::try_from(self.pseudo_classes.bits().count_ones()).unwrap_or(u16::MAX);
        classes = classes.saturating_add(dynamic);
        if self.element_name.as_deref().is_some_and(|name| name != "*") {
            types = types.saturating_add(1);
        }
        if self.pseudo_element.is_some() {
            types = types.saturating_add(1);
        }
        Specificity(0, ids, classes, types)
    }
}

/// Compound selectors joined by combinators, stored left to right:
/// `first` is the outermost compound and the last entry of `rest` is the subject.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComplexSelector {
    /// Leftmost compound.
    pub first: CompoundSelector,
    /// Each following compound with the axis that relates it to its predecessor.
    pub rest: Vec<(Axis, CompoundSelector)>,
}

impl ComplexSelector {
    /// A selector made of a single compound.
    #[inline]
    pub fn new(first: CompoundSelector) -> Self {
        Self {
            first,
            rest: Vec::new(),
        }
    }

    /// Append `compound` with the descendant combinator.
    #[inline]
    #[must_use]
    pub fn descendant(self, compound: CompoundSelector) -> Self {
        self.then(Axis::Descendant, compound)
    }

    /// Append `compound` with the child combinator.
    #[inline]
    #[must_use]
    pub fn child(self, compound: CompoundSelector) -> Self {
        self.then(Axis::Child, compound)
    }

    /// Append `compound` with an arbitrary axis.
    #[inline]
    #[must_use]
    pub fn then(mut self, axis: Axis, compound: CompoundSelector) -> Self {
        self.rest.push((axis, compound));
        self
    }

    /// Number of compounds in the chain.
    #[inline]
    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }

    /// Always false: a complex selector holds at least one compound.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The compound matched against the styled element itself.
    #[inline]
    pub fn subject(&self) -> &CompoundSelector {
        self.rest.last().map_or(&self.first, |(_, compound)| compound)
    }

    /// Compounds paired with the axis that leads into them, left to right.
    /// The leftmost compound is reported with the descendant axis: it may match
    /// at any depth below the document.
    pub fn segments(&self) -> impl Iterator<Item = (Axis, &CompoundSelector)> {
        iter::once((Axis::Descendant, &self.first))
            .chain(self.rest.iter().map(|(axis, compound)| (*axis, compound)))
    }

    /// Sum of the compound specificities.
    pub fn specificity(&self) -> Specificity {
        self.segments()
            .fold(Specificity::ZERO, |total, (_, compound)| total + compound.specificity())
    }

    /// Reject chains the matcher cannot walk.
    ///
    /// # Errors
    /// Returns `SelectorError::UnsupportedAxis` when any combinator is the sibling axis,
    /// and `SelectorError::InvalidSelector` when a pseudo-element sits before the subject.
    pub fn validate(&self) -> Result<(), SelectorError> {
        if self.rest.iter().any(|(axis, _)| *axis == Axis::Sibling) {
            return Err(SelectorError::UnsupportedAxis);
        }
        let mut leading = self.segments().take(self.rest.len());
        if let Some(name) = leading.find_map(|(_, compound)| compound.pseudo_element.as_deref()) {
            return Err(SelectorError::InvalidSelector(format!("::{name}")));
        }
        Ok(())
    }
}

impl From<CompoundSelector> for ComplexSelector {
    #[inline]
    fn from(first: CompoundSelector) -> Self {
        Self::new(first)
    }
}

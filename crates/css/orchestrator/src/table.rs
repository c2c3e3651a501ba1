//! Flattened selector table built once from the active stylesheets.
//!
//! Every compound of every selector chain becomes one `Selector` entry with its
//! own id. Entries of one chain share the chain's order key and declarations,
//! and each non-subject entry points at the next compound through `chained`.

use crate::types::{CssRule, MediaRule, StyleRule, Stylesheet};
use css_cascade::{CascadeTier, Declaration, OrderKey, Origin};
use css_selectors::{
    AttributeResolver, Axis, ComplexSelector, CompoundSelector, DynamicPseudoClasses,
    SelectorError, Specificity, TreeResolver,
};
use log::debug;
use std::sync::Arc;

/// Handle of one table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectorId(u32);

impl SelectorId {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// One compound of a registered selector chain.
#[derive(Clone, Debug)]
pub struct Selector {
    id: SelectorId,
    axis: Axis,
    compound: CompoundSelector,
    chained: Option<SelectorId>,
    order_key: OrderKey,
    origin: Origin,
    important: bool,
    declarations: Arc<[Declaration]>,
}

impl Selector {
    #[inline]
    pub const fn id(&self) -> SelectorId {
        self.id
    }

    /// Relationship to the element matched by the previous compound.
    #[inline]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    #[inline]
    pub const fn compound(&self) -> &CompoundSelector {
        &self.compound
    }

    /// Next compound towards the subject; `None` for the subject itself.
    #[inline]
    pub const fn chained(&self) -> Option<SelectorId> {
        self.chained
    }

    #[inline]
    pub const fn order_key(&self) -> OrderKey {
        self.order_key
    }

    /// Specificity of the whole chain.
    #[inline]
    pub const fn specificity(&self) -> Specificity {
        self.order_key.specificity
    }

    #[inline]
    pub const fn origin(&self) -> Origin {
        self.origin
    }

    #[inline]
    pub const fn important(&self) -> bool {
        self.important
    }

    /// Declarations applied when the chain matches.
    #[inline]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    #[inline]
    pub fn pseudo_element(&self) -> Option<&str> {
        self.compound.pseudo_element.as_deref()
    }

    #[inline]
    pub const fn pseudo_classes(&self) -> DynamicPseudoClasses {
        self.compound.pseudo_classes
    }

    /// Element name and conditions of this compound against `element`.
    #[inline]
    pub fn matches<E: Copy>(
        &self,
        element: E,
        attributes: Option<&dyn AttributeResolver<E>>,
        tree: Option<&dyn TreeResolver<E>>,
    ) -> bool {
        self.compound.matches(element, attributes, tree)
    }
}

/// All registered selector entries plus the chain heads in cascade order.
#[derive(Clone, Debug, Default)]
pub struct SelectorTable {
    selectors: Vec<Selector>,
    heads: Vec<SelectorId>,
}

impl SelectorTable {
    #[inline]
    pub fn get(&self, id: SelectorId) -> Option<&Selector> {
        usize::try_from(id.0)
            .ok()
            .and_then(|index| self.selectors.get(index))
    }

    /// First compound of every chain, ascending by order key.
    #[inline]
    pub fn heads(&self) -> &[SelectorId] {
        &self.heads
    }

    /// Number of entries, counting every compound of every chain.
    #[inline]
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Selector> {
        self.selectors.iter()
    }

    /// Flatten `selector` into consecutive entries and record its head.
    fn register(
        &mut self,
        selector: &ComplexSelector,
        order_key: OrderKey,
        origin: Origin,
        important: bool,
        declarations: &Arc<[Declaration]>,
    ) {
        let start = self.selectors.len();
        let segments = selector.len();
        for (offset, (axis, compound)) in selector.segments().enumerate() {
            let id = entry_id(start.saturating_add(offset));
            let chained = (offset.saturating_add(1) < segments)
                .then(|| entry_id(start.saturating_add(offset).saturating_add(1)));
            self.selectors.push(Selector {
                id,
                axis,
                compound: compound.clone(),
                chained,
                order_key,
                origin,
                important,
                declarations: Arc::clone(declarations),
            });
        }
        self.heads.push(entry_id(start));
    }
}

/// Id for the entry stored at `index`.
fn entry_id(index: usize) -> SelectorId {
    SelectorId(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Build the selector table from `sheets` in order.
///
/// Media blocks contribute their rules only when `gate` accepts them. Every
/// selector gets the next sequence number; a rule with important declarations
/// registers each selector a second time in its important tier, holding only
/// those declarations.
///
/// # Errors
/// Returns `SelectorError::UnsupportedAxis` when a chain uses the sibling axis.
pub fn build_table<'sheet>(
    sheets: impl IntoIterator<Item = &'sheet Stylesheet>,
    mut gate: impl FnMut(&MediaRule) -> bool,
) -> Result<SelectorTable, SelectorError> {
    let mut table = SelectorTable::default();
    let mut sequence = 0u32;
    let mut rule_count = 0usize;
    let mut skipped_media = 0usize;
    for sheet in sheets {
        for rule in &sheet.rules {
            match rule {
                CssRule::Style(style) => {
                    register_rule(&mut table, style, sheet.origin, &mut sequence)?;
                    rule_count = rule_count.saturating_add(1);
                }
                CssRule::Media(media) if gate(media) => {
                    for style in &media.rules {
                        register_rule(&mut table, style, sheet.origin, &mut sequence)?;
                        rule_count = rule_count.saturating_add(1);
                    }
                }
                CssRule::Media(_) => skipped_media = skipped_media.saturating_add(1),
            }
        }
    }
    table
        .heads
        .sort_by_key(|id| table_order_key(&table.selectors, *id));
    debug!(
        "selector table: {} rules, {} chains, {} entries, {} media blocks skipped",
        rule_count,
        table.heads.len(),
        table.selectors.len(),
        skipped_media
    );
    Ok(table)
}

/// Order key of an entry, used for sorting before the table is complete.
fn table_order_key(selectors: &[Selector], id: SelectorId) -> Option<OrderKey> {
    usize::try_from(id.0)
        .ok()
        .and_then(|index| selectors.get(index))
        .map(Selector::order_key)
}

/// Register every selector of one style rule.
fn register_rule(
    table: &mut SelectorTable,
    rule: &StyleRule,
    origin: Origin,
    sequence: &mut u32,
) -> Result<(), SelectorError> {
    let (important, normal): (Vec<Declaration>, Vec<Declaration>) = rule
        .declarations
        .iter()
        .map(|decl| decl.clone().with_origin(origin))
        .partition(|decl| decl.important);
    // Origins whose important declarations share the normal tier keep one entry.
    let (normal, important) = if CascadeTier::of(origin, false) == CascadeTier::of(origin, true) {
        (normal.into_iter().chain(important).collect::<Vec<_>>(), Vec::new())
    } else {
        (normal, important)
    };
    let register_normal = !normal.is_empty() || important.is_empty();
    let normal: Arc<[Declaration]> = normal.into();
    let important: Arc<[Declaration]> = important.into();
    for selector in &rule.selectors {
        selector.validate()?;
        let specificity = selector.specificity();
        if register_normal {
            let key = OrderKey::new(CascadeTier::of(origin, false), specificity, *sequence);
            table.register(selector, key, origin, false, &normal);
        }
        if !important.is_empty() {
            let key = OrderKey::new(CascadeTier::of(origin, true), specificity, *sequence);
            table.register(selector, key, origin, true, &important);
        }
        *sequence = sequence.saturating_add(1);
    }
    Ok(())
}

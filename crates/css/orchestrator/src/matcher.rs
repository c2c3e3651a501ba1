//! Matcher façade: owns the selector table, the Mapper arena and the
//! element cache, and answers cascaded style queries.

use crate::mapper::{DynamicStates, MapperArena, MapperId, MatchContext, Mapper, map_child};
use crate::table::{Selector, SelectorTable, build_table};
use crate::types::Stylesheet;
use anyhow::{Context as _, Result};
use css_cascade::{CascadedStyle, Declaration, Origin, StylesheetFactory};
use css_media_queries::MediaEnvironment;
use css_selectors::{AttributeResolver, TreeResolver};
use css_style_attr::StyleAttributeFactory;
use dashmap::DashMap;
use log::{debug, trace};
use rayon::prelude::*;
use rustc_hash::FxBuildHasher;
use std::hash::Hash;
use std::sync::Arc;

/// Resolves cascaded styles for elements of one document.
///
/// `H` is the host's view of the document; it may be a reference such as `&Dom`.
/// Queries take `&self` and may run concurrently.
pub struct Matcher<E, H> {
    table: SelectorTable,
    arena: MapperArena,
    host: H,
    factory: Box<dyn StylesheetFactory + Send + Sync>,
    /// Element -> Mapper of its tree position.
    elements: DashMap<E, MapperId, FxBuildHasher>,
    states: DynamicStates<E>,
}

impl<E, H> Matcher<E, H>
where
    E: Copy + Eq + Hash,
    H: AttributeResolver<E> + TreeResolver<E>,
{
    /// Matcher over a prebuilt table, parsing inline styles with `StyleAttributeFactory`.
    pub fn new(table: SelectorTable, host: H) -> Self {
        let arena = MapperArena::new(&table);
        Self {
            table,
            arena,
            host,
            factory: Box::new(StyleAttributeFactory),
            elements: DashMap::with_hasher(FxBuildHasher),
            states: DynamicStates::default(),
        }
    }

    /// Build the table from `sheets`, keeping `@media` blocks that apply to `media`.
    ///
    /// # Errors
    /// Returns an error if a selector cannot be registered.
    pub fn from_stylesheets(sheets: &[Stylesheet], media: &MediaEnvironment, host: H) -> Result<Self> {
        let table = build_table(sheets, |rule| media.matches_media_list(&rule.media))
            .with_context(|| format!("building selector table for medium {:?}", media.medium()))?;
        Ok(Self::new(table, host))
    }

    /// Replace the parser used for `style` attributes and presentational hints.
    #[must_use]
    pub fn with_factory(mut self, factory: impl StylesheetFactory + Send + Sync + 'static) -> Self {
        self.factory = Box::new(factory);
        self
    }

    #[inline]
    pub const fn table(&self) -> &SelectorTable {
        &self.table
    }

    #[inline]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access. Cached results are not invalidated; restyle
    /// affected elements afterwards.
    #[inline]
    pub const fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Cached Mapper handle of `element`, if it has been styled.
    #[inline]
    pub fn mapper_of(&self, element: E) -> Option<MapperId> {
        self.elements.get(&element).map(|entry| *entry)
    }

    #[inline]
    pub fn mapper(&self, id: MapperId) -> Option<Arc<Mapper>> {
        self.arena.get(id)
    }

    /// Number of Mappers allocated so far, the document Mapper included.
    #[inline]
    pub fn mapper_count(&self) -> usize {
        self.arena.len()
    }

    fn context(&self) -> MatchContext<'_, E> {
        MatchContext {
            table: &self.table,
            arena: &self.arena,
            states: &self.states,
            attributes: Some(&self.host),
            tree: Some(&self.host),
        }
    }

    /// Resolve the Mapper of `element`, mapping uncached ancestors from the
    /// nearest cached one downwards.
    fn resolve(&self, element: E, force_restyle: bool) -> Result<MapperId> {
        if !force_restyle && let Some(id) = self.mapper_of(element) {
            return Ok(id);
        }
        let mut pending = vec![element];
        let mut base = MapperId::DOCUMENT;
        let mut cursor = element;
        while let Some(parent) = self.host.parent_element(cursor) {
            if let Some(id) = self.mapper_of(parent) {
                base = id;
                break;
            }
            pending.push(parent);
            cursor = parent;
        }
        let context = self.context();
        let mut current = base;
        while let Some(node) = pending.pop() {
            let child = map_child(&context, current, node)?;
            current = if force_restyle && pending.is_empty() {
                trace!("restyled element mapped to {child:?}");
                self.elements.insert(node, child);
                child
            } else {
                *self.elements.entry(node).or_insert(child)
            };
        }
        Ok(current)
    }

    /// Parse a host-supplied declaration block at author origin.
    fn parse_block(&self, text: Option<&str>, base_uri: Option<&str>) -> Vec<Declaration> {
        text.map(|body| self.factory.parse_style_declaration(Origin::Author, body, base_uri))
            .unwrap_or_default()
    }

    /// Cascaded declarations of `element`: presentational hints, matched
    /// rules in cascade order, then the `style` attribute, stable-sorted by tier.
    ///
    /// `force_restyle` recomputes the element's Mapper from its parent's and
    /// replaces the cached one; descendants keep theirs.
    ///
    /// # Errors
    /// Returns an error if a sibling selector reaches matching.
    pub fn cascaded_style(
        &self,
        base_uri: Option<&str>,
        element: E,
        force_restyle: bool,
    ) -> Result<Arc<CascadedStyle>> {
        let id = self.resolve(element, force_restyle)?;
        let mapper = self
            .arena
            .get(id)
            .with_context(|| format!("mapper {id:?} is not allocated"))?;
        let presentational = self.parse_block(self.host.non_css_styling(element), base_uri);
        let inline = self.parse_block(self.host.element_styling(element), base_uri);
        let matched = mapper
            .mapped()
            .iter()
            .filter_map(|selector| self.table.get(*selector))
            .map(Selector::declarations);
        Ok(CascadedStyle::assemble(&presentational, matched, &inline))
    }

    /// Cascaded declarations of pseudo-element `name` of `element`, or `None`
    /// when no selector targets it.
    ///
    /// # Errors
    /// Returns an error if a sibling selector reaches matching.
    pub fn pseudo_element_style(&self, element: E, name: &str) -> Result<Option<Arc<CascadedStyle>>> {
        let id = self.resolve(element, false)?;
        let mapper = self
            .arena
            .get(id)
            .with_context(|| format!("mapper {id:?} is not allocated"))?;
        let Some(selectors) = mapper.pseudo(name) else {
            return Ok(None);
        };
        let declarations = selectors
            .iter()
            .filter_map(|selector| self.table.get(*selector))
            .flat_map(|selector| selector.declarations().iter().cloned())
            .collect();
        Ok(Some(CascadedStyle::from_declarations(declarations)))
    }

    /// Drop the cached Mapper of `element`. Returns whether one was cached.
    pub fn remove_style(&self, element: E) -> bool {
        let removed = self.elements.remove(&element).is_some();
        if removed {
            trace!("evicted cached mapper");
        }
        removed
    }

    /// Restyle `elements`, which must list ancestors before their descendants.
    ///
    /// # Errors
    /// Returns the first matching error.
    pub fn restyle_subtree(&self, base_uri: Option<&str>, elements: &[E]) -> Result<Vec<Arc<CascadedStyle>>> {
        debug!("restyling {} elements", elements.len());
        elements
            .iter()
            .map(|&element| self.cascaded_style(base_uri, element, true))
            .collect()
    }

    /// Whether a `:visited` selector has been tested against `element`.
    #[inline]
    pub fn is_visited_styled(&self, element: E) -> bool {
        self.states.is_visited_styled(element)
    }

    /// Whether a `:hover` selector has been tested against `element`.
    #[inline]
    pub fn is_hover_styled(&self, element: E) -> bool {
        self.states.is_hover_styled(element)
    }

    /// Whether an `:active` selector has been tested against `element`.
    #[inline]
    pub fn is_active_styled(&self, element: E) -> bool {
        self.states.is_active_styled(element)
    }

    /// Whether a `:focus` selector has been tested against `element`.
    #[inline]
    pub fn is_focus_styled(&self, element: E) -> bool {
        self.states.is_focus_styled(element)
    }
}

impl<E, H> Matcher<E, H>
where
    E: Copy + Eq + Hash + Send + Sync,
    H: AttributeResolver<E> + TreeResolver<E> + Sync,
{
    /// Style `elements` on the rayon pool. Results are in input order and equal
    /// to sequential `cascaded_style` calls.
    ///
    /// # Errors
    /// Returns an error if any element fails to resolve.
    pub fn cascaded_styles_par(&self, base_uri: Option<&str>, elements: &[E]) -> Result<Vec<Arc<CascadedStyle>>> {
        elements
            .par_iter()
            .map(|&element| self.cascaded_style(base_uri, element, false))
            .collect()
    }
}

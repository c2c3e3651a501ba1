//! Incremental selector matching down the element tree.
//!
//! A `Mapper` describes one tree position: which selectors can still match
//! below it (`axes`), which chains completed at it (`mapped`) and which
//! completed for a pseudo-element (`pseudo`). Children with the same matching
//! outcome share one Mapper through the parent's `children` memo.

use crate::table::{SelectorId, SelectorTable};
use anyhow::{Result, anyhow};
use core::fmt;
use css_selectors::{AttributeResolver, Axis, DynamicPseudoClasses, SelectorError, TreeResolver};
use dashmap::{DashMap, DashSet};
use log::trace;
use parking_lot::RwLock;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use std::hash::Hash;
use std::sync::Arc;

/// Handle of a Mapper in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MapperId(u32);

impl MapperId {
    /// The document Mapper; its axes are every chain head.
    pub const DOCUMENT: Self = Self(0);
}

/// Matching state of one tree position.
#[derive(Debug)]
pub struct Mapper {
    axes: Box<[SelectorId]>,
    mapped: Box<[SelectorId]>,
    pseudo: FxHashMap<Box<str>, Box<[SelectorId]>>,
    children: DashMap<Box<[SelectorId]>, MapperId, FxBuildHasher>,
}

impl Mapper {
    fn new(
        axes: Vec<SelectorId>,
        mapped: Vec<SelectorId>,
        pseudo: FxHashMap<Box<str>, Box<[SelectorId]>>,
    ) -> Self {
        Self {
            axes: axes.into_boxed_slice(),
            mapped: mapped.into_boxed_slice(),
            pseudo,
            children: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Selectors that children of this position are tested against.
    #[inline]
    pub fn axes(&self) -> &[SelectorId] {
        &self.axes
    }

    /// Selectors whose whole chain matched here, ascending by order key.
    #[inline]
    pub fn mapped(&self) -> &[SelectorId] {
        &self.mapped
    }

    /// Selectors matched here for pseudo-element `name`, ascending by order key.
    #[inline]
    pub fn pseudo(&self, name: &str) -> Option<&[SelectorId]> {
        self.pseudo.get(name).map(AsRef::as_ref)
    }

    /// Pseudo-elements with at least one matched selector.
    pub fn pseudo_elements(&self) -> impl Iterator<Item = &str> {
        self.pseudo.keys().map(AsRef::as_ref)
    }

    /// Number of memoized child Mappers.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// Append-only storage for Mappers. Handles stay valid for the arena's lifetime.
#[derive(Debug)]
pub struct MapperArena {
    nodes: RwLock<Vec<Arc<Mapper>>>,
}

impl MapperArena {
    /// An arena holding the document Mapper for `table`.
    pub fn new(table: &SelectorTable) -> Self {
        let document = Mapper::new(table.heads().to_vec(), Vec::new(), FxHashMap::default());
        Self {
            nodes: RwLock::new(vec![Arc::new(document)]),
        }
    }

    #[inline]
    pub fn get(&self, id: MapperId) -> Option<Arc<Mapper>> {
        let index = usize::try_from(id.0).ok()?;
        self.nodes.read().get(index).map(Arc::clone)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    fn alloc(&self, mapper: Mapper) -> MapperId {
        let mut nodes = self.nodes.write();
        let id = MapperId(u32::try_from(nodes.len()).unwrap_or(u32::MAX));
        nodes.push(Arc::new(mapper));
        id
    }
}

/// Elements seen by selectors carrying a dynamic pseudo-class.
pub struct DynamicStates<E> {
    visited: DashSet<E, FxBuildHasher>,
    hover: DashSet<E, FxBuildHasher>,
    active: DashSet<E, FxBuildHasher>,
    focus: DashSet<E, FxBuildHasher>,
}

impl<E: Eq + Hash + fmt::Debug> fmt::Debug for DynamicStates<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DynamicStates")
            .field("visited", &self.visited)
            .field("hover", &self.hover)
            .field("active", &self.active)
            .field("focus", &self.focus)
            .finish()
    }
}

impl<E: Eq + Hash> Default for DynamicStates<E> {
    fn default() -> Self {
        Self {
            visited: DashSet::with_hasher(FxBuildHasher),
            hover: DashSet::with_hasher(FxBuildHasher),
            active: DashSet::with_hasher(FxBuildHasher),
            focus: DashSet::with_hasher(FxBuildHasher),
        }
    }
}

impl<E: Copy + Eq + Hash> DynamicStates<E> {
    fn record(&self, element: E, classes: DynamicPseudoClasses) {
        if classes.contains(DynamicPseudoClasses::VISITED) {
            self.visited.insert(element);
        }
        if classes.contains(DynamicPseudoClasses::HOVER) {
            self.hover.insert(element);
        }
        if classes.contains(DynamicPseudoClasses::ACTIVE) {
            self.active.insert(element);
        }
        if classes.contains(DynamicPseudoClasses::FOCUS) {
            self.focus.insert(element);
        }
    }

    #[inline]
    pub fn is_visited_styled(&self, element: E) -> bool {
        self.visited.contains(&element)
    }

    #[inline]
    pub fn is_hover_styled(&self, element: E) -> bool {
        self.hover.contains(&element)
    }

    #[inline]
    pub fn is_active_styled(&self, element: E) -> bool {
        self.active.contains(&element)
    }

    #[inline]
    pub fn is_focus_styled(&self, element: E) -> bool {
        self.focus.contains(&element)
    }
}

/// Shared inputs of one matching step.
pub struct MatchContext<'ctx, E> {
    pub table: &'ctx SelectorTable,
    pub arena: &'ctx MapperArena,
    pub states: &'ctx DynamicStates<E>,
    pub attributes: Option<&'ctx dyn AttributeResolver<E>>,
    pub tree: Option<&'ctx dyn TreeResolver<E>>,
}

/// Compute (or reuse) the Mapper of `element`, a child of the position `parent`.
///
/// # Errors
/// Fails with `SelectorError::UnsupportedAxis` when a sibling selector reaches
/// matching, or when `parent` is not a handle of this arena.
pub fn map_child<E: Copy + Eq + Hash>(
    context: &MatchContext<'_, E>,
    parent: MapperId,
    element: E,
) -> Result<MapperId> {
    let parent_mapper = context
        .arena
        .get(parent)
        .ok_or_else(|| anyhow!("unknown mapper {parent:?}"))?;
    let mut axes: Vec<SelectorId> = Vec::new();
    let mut carried: FxHashSet<SelectorId> = FxHashSet::default();
    let mut mapped: Vec<SelectorId> = Vec::new();
    let mut pseudo: FxHashMap<Box<str>, Vec<SelectorId>> = FxHashMap::default();
    let mut signature: Vec<SelectorId> = Vec::new();

    for &id in parent_mapper.axes() {
        let selector = context
            .table
            .get(id)
            .ok_or_else(|| anyhow!("unknown selector {id:?}"))?;
        match selector.axis() {
            Axis::Descendant => {
                if carried.insert(id) {
                    axes.push(id);
                }
            }
            Axis::Sibling => return Err(SelectorError::UnsupportedAxis.into()),
            Axis::Child => {}
        }
        if !selector.matches(element, context.attributes, context.tree) {
            continue;
        }
        if let Some(name) = selector.pseudo_element() {
            pseudo.entry(name.into()).or_default().push(id);
            signature.push(id);
            continue;
        }
        let classes = selector.pseudo_classes();
        if !classes.is_empty() {
            context.states.record(element, classes);
            if !selector.compound().matches_dynamic(element, context.attributes) {
                continue;
            }
        }
        signature.push(id);
        match selector.chained() {
            None => mapped.push(id),
            Some(next) => {
                let chained = context
                    .table
                    .get(next)
                    .ok_or_else(|| anyhow!("unknown selector {next:?}"))?;
                if chained.axis() == Axis::Sibling {
                    return Err(SelectorError::UnsupportedAxis.into());
                }
                if carried.insert(next) {
                    axes.push(next);
                }
            }
        }
    }

    let order_key = |id: &SelectorId| context.table.get(*id).map(|selector| selector.order_key());
    mapped.sort_by_key(order_key);
    let pseudo: FxHashMap<Box<str>, Box<[SelectorId]>> = pseudo
        .into_iter()
        .map(|(name, mut ids)| {
            ids.sort_by_key(order_key);
            (name, ids.into_boxed_slice())
        })
        .collect();

    let signature = signature.into_boxed_slice();
    if let Some(hit) = parent_mapper.children.get(&signature) {
        trace!("mapper memo hit under {parent:?}: {:?}", *hit);
        return Ok(*hit);
    }
    let child = *parent_mapper
        .children
        .entry(signature)
        .or_insert_with(|| context.arena.alloc(Mapper::new(axes, mapped, pseudo)));
    trace!("mapper memo miss under {parent:?}: {child:?}");
    Ok(child)
}

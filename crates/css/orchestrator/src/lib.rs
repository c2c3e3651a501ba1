//! Core module of the CSS engine: selector matching and cascade resolution.
//!
//! The orchestrator flattens stylesheets into a `SelectorTable`, walks the
//! host's element tree with memoized `Mapper`s and assembles one
//! `CascadedStyle` per element and pseudo-element through the `Matcher`.
//! Element access goes through the `AttributeResolver` and `TreeResolver`
//! traits of `css_selectors`; declarations are opaque values of `css_cascade`.

#![forbid(unsafe_code)]

pub mod mapper;
mod matcher;
pub mod table;
pub mod types;
mod ua_stylesheet;

pub use css_cascade::{CascadeTier, CascadedStyle, Declaration, OrderKey, Origin, StylesheetFactory};
pub use css_media_queries::MediaEnvironment;
pub use css_selectors::{AttributeResolver, SelectorError, TreeResolver};
pub use css_style_attr::StyleAttributeFactory;
pub use mapper::{Mapper, MapperId};
pub use matcher::Matcher;
pub use table::{Selector, SelectorId, SelectorTable, build_table};
pub use ua_stylesheet::create_ua_stylesheet;

//! # Site Listing
//!
//! Page listings and navigation trees for multi-version documentation sites.
//! Pages opt into a listing by naming it in their metadata; a listing is a
//! named, ordered set of sections, each selecting a group of pages from the
//! site's content catalog.
//!
//! # Architecture: Select, Resolve, Assemble
//!
//! The engine is a chain of pure functions over a read-only corpus:
//!
//! ```text
//! 1. Select    selector × context page × candidate  →  bool
//! 2. Resolve   section  × context page              →  sorted, padded PageGroup
//! 3. Assemble  listing  × context page              →  [SectionListing]
//! 4. Navigate  listings × corpus                    →  NavNode forests per component/version
//! ```
//!
//! Selection is context-relative: a selector field set to `<current>` takes
//! its value from the page the listing is rendered on. The same configuration
//! therefore produces different pages in different components and versions.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Page record view, page identity, attributes, navigation nodes |
//! | [`catalog`] | `catalog.json` snapshot and the [`catalog::Corpus`] query trait |
//! | [`selector`] | Selector config shapes, compile step, and matching |
//! | [`resolve`] | Title ordering, padding policies, `PageGroup` |
//! | [`listing`] | Listing config model, listing assembly, card data |
//! | [`navigation`] | Navigation tree builder with per-path cycle guard |
//! | [`config`] | `config.toml` loading, stock defaults, merging, validation |
//! | [`render`] | Maud partials for listing grids and navigation menus |
//! | [`search`] | Search index over the published HTML |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Compile Selectors at Load Time
//!
//! Raw selector configuration is compiled once, when `config.toml` is loaded.
//! An unsupported predicate operator is a configuration error naming the
//! attribute and the allowed operators, raised before any page is looked at.
//! Matching compiled selectors cannot fail.
//!
//! ## Declaration Order Is Meaning
//!
//! Sections render in the order they are written. The TOML layer keeps table
//! order (`preserve_order`) and listing configs deserialize into an ordered
//! map, so the order survives merging with stock defaults.
//!
//! ## Placeholders Are Values
//!
//! Grid padding inserts explicit [`resolve::Entry::Placeholder`] values rather
//! than sentinel pages. They serialize as `{"empty": true}` and render as
//! empty cells; navigation never sees them.
//!
//! ## Cycle Guard Per Path
//!
//! Navigation nests the listing of every page that declares one. A
//! (listing, page) pair already on the current expansion path becomes a leaf,
//! so self-references and mutual references terminate while the same page can
//! still expand fully under two different parents.

pub mod catalog;
pub mod config;
pub mod listing;
pub mod navigation;
pub mod output;
pub mod render;
pub mod resolve;
pub mod search;
pub mod selector;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

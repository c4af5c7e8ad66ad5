//! Shared test utilities for the site-listing test suite.
//!
//! Provides page builders, bulk extractors, and navigation tree assertions
//! that work with corpus and navigation data structures (`Page`, `PageGroup`,
//! `NavNode`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let corpus = vec![
//!     with_attrs(page("docs", "1.0", "ROOT", "index.adoc", "Home"), &[("page-listing", "home")]),
//!     with_attrs(page("docs", "1.0", "ROOT", "a.adoc", "A"), &[("page-tags", "guide")]),
//! ];
//!
//! assert_nav_shape(&roots, &[
//!     ("Guides", &["A"]),
//!     ("Tools", &[]),
//! ]);
//! ```

use crate::resolve::PageGroup;
use crate::types::{Attributes, NavNode, Page, Provenance};

// =========================================================================
// Page builders
// =========================================================================

/// A published page with empty metadata.
///
/// The URL is `/{component}/{version}/{stem}.html`, where `stem` is the
/// relative path without its extension.
pub fn page(component: &str, version: &str, module: &str, relative: &str, title: &str) -> Page {
    let stem = relative
        .rsplit_once('.')
        .map_or(relative, |(stem, _)| stem);
    Page {
        provenance: Provenance {
            component: component.to_string(),
            version: version.to_string(),
            module: module.to_string(),
        },
        relative: relative.to_string(),
        title: title.to_string(),
        url: Some(format!("/{component}/{version}/{stem}.html")),
        has_output: true,
        attributes: Some(Attributes::default()),
    }
}

/// Add attributes to a page, replacing values of existing keys.
pub fn with_attrs(mut page: Page, attrs: &[(&str, &str)]) -> Page {
    let existing = page.attributes.take().unwrap_or_default();
    let merged: Attributes = existing
        .iter()
        .filter(|(k, _)| !attrs.iter().any(|(name, _)| name == k))
        .chain(attrs.iter().copied())
        .collect();
    page.attributes = Some(merged);
    page
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// Entry titles of a group in order; `None` marks a placeholder.
pub fn group_titles<'a>(group: &PageGroup<'a>) -> Vec<Option<&'a str>> {
    group
        .entries()
        .iter()
        .map(|entry| entry.page().map(|p| p.title.as_str()))
        .collect()
}

/// Labels of a navigation level in order.
pub fn nav_labels(nodes: &[NavNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.label.as_str()).collect()
}

// =========================================================================
// Navigation helpers
// =========================================================================

/// Assert that a navigation level matches an expected shape.
///
/// Each entry is `(label, children)`. Use `&[]` for leaf nodes. Nodes are
/// matched by position, so repeated labels are fine.
///
/// ```rust
/// assert_nav_shape(&roots, &[
///     ("Tools", &["Tool"]),
///     ("Tools", &["Util"]),
/// ]);
/// ```
pub fn assert_nav_shape(nodes: &[NavNode], expected: &[(&str, &[&str])]) {
    let expected_labels: Vec<&str> = expected.iter().map(|(l, _)| *l).collect();
    assert_eq!(nav_labels(nodes), expected_labels, "nav labels mismatch");

    for (node, (label, children)) in nodes.iter().zip(expected) {
        assert_eq!(
            nav_labels(&node.children),
            children.to_vec(),
            "nav children of '{label}' mismatch"
        );
    }
}

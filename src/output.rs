//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Pages lead with their
//! title and positional index; page identities and URLs are secondary context
//! on indented lines. This makes listings and navigation readable as a
//! content inventory while still letting users trace entries back to source
//! files.
//!
//! # Output Format
//!
//! ## Listing
//!
//! ```text
//! handbook for Home (docs:1.0:ROOT:index.adoc)
//! Guides
//!     001 Install → /docs/1.0/install.html
//!     002 Upgrade → /docs/1.0/upgrade.html
//!     003 (empty)
//! (untitled)
//!     001 Tools → /docs/1.0/tools.html
//! ```
//!
//! ## Navigation
//!
//! ```text
//! docs 1.0
//!     001 Guides
//!         001 Install → /docs/1.0/install.html
//!     002 Tools → /docs/1.0/tools.html
//! ```
//!
//! ## Check
//!
//! ```text
//! Catalog
//!     12 pages, 10 listable
//! Listings
//! 001 handbook (3 sections, 1 navigation root)
//!     Used by: docs:1.0:ROOT:index.adoc
//! 002 retired (disabled)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::catalog::Catalog;
use crate::listing::{ListingSet, SectionListing};
use crate::navigation::NavRegistry;
use crate::resolve::Entry;
use crate::search::SearchSummary;
use crate::types::{NavNode, Page};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a page line: title, with the URL when the page has one.
///
/// ```text
/// 001 Install → /docs/1.0/install.html
/// 002 Draft
/// ```
fn page_line(index: usize, title: &str, url: Option<&str>) -> String {
    match url {
        Some(url) => format!("{} {} → {}", format_index(index), title, url),
        None => format!("{} {}", format_index(index), title),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Tree walker
// ============================================================================

/// A flattened node from walking a navigation tree.
struct TreeNode<'a> {
    depth: usize,
    position: usize,
    node: &'a NavNode,
}

/// Walk a navigation forest, assigning positional indices per sibling level.
fn walk_nav_tree(nodes: &[NavNode], depth: usize) -> Vec<TreeNode<'_>> {
    let mut flat = Vec::new();
    walk_nav_tree_recursive(nodes, depth, &mut flat);
    flat
}

fn walk_nav_tree_recursive<'a>(
    nodes: &'a [NavNode],
    depth: usize,
    flat: &mut Vec<TreeNode<'a>>,
) {
    for (i, node) in nodes.iter().enumerate() {
        flat.push(TreeNode {
            depth,
            position: i + 1,
            node,
        });
        walk_nav_tree_recursive(&node.children, depth + 1, flat);
    }
}

// ============================================================================
// Listing
// ============================================================================

/// Format an assembled listing for a context page.
pub fn format_listing_output(
    name: &str,
    context: &Page,
    sections: &[SectionListing<'_>],
) -> Vec<String> {
    let mut lines = vec![format!("{} for {} ({})", name, context.title, context.id())];
    if sections.is_empty() {
        lines.push(format!("{}(no sections)", indent(1)));
        return lines;
    }
    for section in sections {
        lines.push(section.title.unwrap_or("(untitled)").to_string());
        if section.pages.is_empty() {
            lines.push(format!("{}(no pages)", indent(1)));
        }
        for (i, entry) in section.pages.entries().iter().enumerate() {
            let line = match entry {
                Entry::Page(page) => page_line(i + 1, &page.title, page.url.as_deref()),
                Entry::Placeholder => format!("{} (empty)", format_index(i + 1)),
            };
            lines.push(format!("{}{}", indent(1), line));
        }
    }
    lines
}

pub fn print_listing_output(name: &str, context: &Page, sections: &[SectionListing<'_>]) {
    for line in format_listing_output(name, context, sections) {
        println!("{}", line);
    }
}

// ============================================================================
// Navigation
// ============================================================================

/// Format every navigation tree, grouped by component and version.
pub fn format_nav_output(registry: &NavRegistry) -> Vec<String> {
    let mut lines = Vec::new();
    if registry.is_empty() {
        lines.push("No navigation roots".to_string());
        return lines;
    }
    for (component, version, nodes) in registry.iter() {
        lines.push(format!("{} {}", component, version));
        for entry in walk_nav_tree(nodes, 1) {
            lines.push(format!(
                "{}{}",
                indent(entry.depth),
                page_line(entry.position, &entry.node.label, entry.node.url.as_deref())
            ));
        }
    }
    lines
}

pub fn print_nav_output(registry: &NavRegistry) {
    for line in format_nav_output(registry) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format a validation report: corpus size and the compiled listings with the
/// pages that declare them.
///
/// Pages naming a listing that is not configured are reported as warnings.
pub fn format_check_output(
    catalog: &Catalog,
    listings: &ListingSet,
    config_attribute: &str,
) -> Vec<String> {
    let listable = catalog.pages().iter().filter(|p| p.is_listable()).count();
    let mut lines = vec![
        "Catalog".to_string(),
        format!(
            "{}{}, {} listable",
            indent(1),
            plural(catalog.len(), "page", "pages"),
            listable
        ),
        "Listings".to_string(),
    ];

    let mut position = 0;
    for listing in listings.iter() {
        position += 1;
        let roots = listing.root_sections().count();
        let mut header = format!(
            "{} {} ({}",
            format_index(position),
            listing.name,
            plural(listing.sections.len(), "section", "sections")
        );
        if roots > 0 {
            header.push_str(&format!(", {}", plural(roots, "navigation root", "navigation roots")));
        }
        header.push(')');
        lines.push(header);
        for page in catalog.pages().iter().filter(|p| {
            p.has_output && p.attribute(config_attribute) == Some(listing.name.as_str())
        }) {
            lines.push(format!("{}Used by: {}", indent(1), page.id()));
        }
    }
    for name in listings.disabled() {
        position += 1;
        lines.push(format!("{} {} (disabled)", format_index(position), name));
    }
    if position == 0 {
        lines.push(format!("{}(none configured)", indent(1)));
    }

    let unknown: Vec<(&Page, &str)> = catalog
        .pages()
        .iter()
        .filter_map(|p| p.attribute(config_attribute).map(|name| (p, name)))
        .filter(|(_, name)| {
            listings.get(name).is_none() && !listings.disabled().iter().any(|d| d == name)
        })
        .collect();
    if !unknown.is_empty() {
        lines.push("Warnings".to_string());
        for (page, name) in unknown {
            lines.push(format!("{}{}: unknown listing '{}'", indent(1), page.id(), name));
        }
    }
    lines
}

pub fn print_check_output(catalog: &Catalog, listings: &ListingSet, config_attribute: &str) {
    for line in format_check_output(catalog, listings, config_attribute) {
        println!("{}", line);
    }
}

// ============================================================================
// Search index
// ============================================================================

pub fn format_search_output(summary: &SearchSummary) -> Vec<String> {
    vec![format!(
        "Indexed {} of {} → {}",
        summary.indexed,
        plural(summary.scanned, "page", "pages"),
        summary.path.display()
    )]
}

pub fn print_search_output(summary: &SearchSummary) {
    for line in format_search_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

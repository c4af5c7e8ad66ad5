//! HTML rendering of listings and navigation trees.
//!
//! These are the partials a host theme embeds: a listing block (sections of
//! card rows) and a navigation menu. Uses [maud](https://maud.lambda.xyz/),
//! so all interpolated titles and attribute values are escaped.
//!
//! ## Listing markup
//!
//! ```text
//! div.listing
//! └── section.listing-section
//!     ├── h2.listing-title            (titled sections only)
//!     └── div.listing-row × n         (3 entries per row)
//!         ├── a.listing-card          (page)
//!         └── div.listing-card.empty  (placeholder)
//! ```

use crate::listing::{SectionListing, listing_data};
use crate::resolve::{Entry, GRID_COLUMNS};
use crate::types::{NavNode, Page};
use maud::{Markup, html};

/// Renders an assembled listing block.
///
/// `data_prefix` selects the page attributes shown on each card.
pub fn render_listing(sections: &[SectionListing<'_>], data_prefix: &str) -> Markup {
    html! {
        div.listing {
            @for block in sections {
                section.listing-section {
                    @if let Some(title) = block.title {
                        h2.listing-title { (title) }
                    }
                    @for row in block.pages.entries().chunks(GRID_COLUMNS) {
                        div.listing-row {
                            @for entry in row {
                                (render_entry(entry, data_prefix))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_entry(entry: &Entry<'_>, data_prefix: &str) -> Markup {
    match entry {
        Entry::Page(page) => render_card(page, data_prefix),
        Entry::Placeholder => html! { div.listing-card.empty {} },
    }
}

/// Renders one page card with its listing data as a definition list.
fn render_card(page: &Page, data_prefix: &str) -> Markup {
    let data = listing_data(page, data_prefix);
    html! {
        a.listing-card href=[page.url.as_deref()] {
            span.listing-card-title { (page.title) }
            @if !data.is_empty() {
                dl.listing-card-data {
                    @for (key, value) in &data {
                        dt { (key) }
                        dd { (value) }
                    }
                }
            }
        }
    }
}

/// Renders a navigation forest as nested lists.
pub fn render_navigation(nodes: &[NavNode], current_url: Option<&str>) -> Markup {
    html! {
        nav.nav-menu {
            ul.nav-list {
                @for node in nodes {
                    (render_nav_node(node, current_url))
                }
            }
        }
    }
}

fn render_nav_node(node: &NavNode, current_url: Option<&str>) -> Markup {
    let is_current = node.url.is_some() && node.url.as_deref() == current_url;
    html! {
        li.nav-item.current[is_current] {
            @if let Some(url) = &node.url {
                a.nav-link href=(url) { (node.label) }
            } @else {
                span.nav-text { (node.label) }
            }
            @if !node.is_leaf() {
                ul.nav-list {
                    @for child in &node.children {
                        (render_nav_node(child, current_url))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{Padding, PageGroup};
    use crate::test_helpers::{page, with_attrs};

    fn leaf(label: &str, url: Option<&str>) -> NavNode {
        NavNode {
            label: label.to_string(),
            url: url.map(str::to_string),
            children: vec![],
        }
    }

    #[test]
    fn listing_renders_rows_of_three() {
        let pages: Vec<Page> = ["A", "B", "C", "D"]
            .iter()
            .map(|t| page("docs", "1.0", "ROOT", &format!("{t}.adoc"), t))
            .collect();
        let sections = vec![SectionListing {
            title: Some("Guides"),
            pages: PageGroup::padded(pages.iter().collect(), Padding::Grid),
        }];
        let html = render_listing(&sections, "page-listing-data-").into_string();
        assert_eq!(html.matches("listing-row").count(), 2);
        assert_eq!(html.matches(r#"class="listing-card empty""#).count(), 2);
        assert!(html.contains(r#"<h2 class="listing-title">Guides</h2>"#));
    }

    #[test]
    fn untitled_section_has_no_heading() {
        let sections = vec![SectionListing {
            title: None,
            pages: PageGroup::default(),
        }];
        let html = render_listing(&sections, "page-listing-data-").into_string();
        assert!(!html.contains("<h2"));
        assert!(html.contains("listing-section"));
    }

    #[test]
    fn card_shows_listing_data() {
        let pages = vec![with_attrs(
            page("docs", "1.0", "ROOT", "a.adoc", "A"),
            &[("page-listing-data-level", "beginner"), ("other", "hidden")],
        )];
        let sections = vec![SectionListing {
            title: None,
            pages: PageGroup::padded(pages.iter().collect(), Padding::None),
        }];
        let html = render_listing(&sections, "page-listing-data-").into_string();
        assert!(html.contains("<dt>level</dt><dd>beginner</dd>"));
        assert!(!html.contains("hidden"));
        assert!(html.contains(r#"href="/docs/1.0/a.html""#));
    }

    #[test]
    fn navigation_renders_nested_groups() {
        let nodes = vec![NavNode {
            label: "Guides".into(),
            url: None,
            children: vec![leaf("Install", Some("/install.html"))],
        }];
        let html = render_navigation(&nodes, None).into_string();
        assert!(html.contains(r#"<span class="nav-text">Guides</span>"#));
        assert!(html.contains(r#"<a class="nav-link" href="/install.html">Install</a>"#));
        assert_eq!(html.matches("<ul").count(), 2);
    }

    #[test]
    fn navigation_marks_current_page() {
        let nodes = vec![leaf("A", Some("/a.html")), leaf("B", Some("/b.html"))];
        let html = render_navigation(&nodes, Some("/b.html")).into_string();
        assert_eq!(html.matches(r#"class="nav-item current""#).count(), 1);
    }

    #[test]
    fn titles_are_escaped() {
        let nodes = vec![leaf("<script>alert('xss')</script>", None)];
        let html = render_navigation(&nodes, None).into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}

//! Navigation tree assembly.
//!
//! Listing configurations double as navigation definitions. A section flagged
//! `navigation.root` seeds navigation for every page that uses its listing
//! (through the listing-reference attribute, `page-listing` by default):
//!
//! ```text
//! handbook.adoc  (page-listing = handbook)
//! └── [Guides]                 ← root section "guides", titled
//!     ├── Install              ← leaf page
//!     └── Tutorials            ← page with page-listing = tutorials
//!         ├── First steps      ← expansion of every "tutorials" section
//!         └── Deploying
//! ```
//!
//! Expansion of one section for one context page:
//!
//! 1. `navigation.skip` sections produce nothing.
//! 2. The selector is resolved without padding.
//! 3. A selected page that references a known listing gets, as children, the
//!    expansion of every section of that listing with the page as context.
//! 4. A titled section wraps its page nodes in one grouping node; an untitled
//!    one splices them into the parent.
//!
//! Listing configurations can reference each other (or themselves) through
//! page attributes, so expansion tracks the (listing, page) pairs on the
//! current path in a [`VisitedPath`]. Meeting a pair again turns that page
//! into a leaf instead of recursing.
//!
//! Results accumulate per (component, version) in a [`NavigationStore`].

use crate::catalog::Corpus;
use crate::listing::{Listing, ListingSet, Section};
use crate::resolve::{self, sort_by_title};
use crate::types::{NavNode, Page, PageId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Destination of navigation forests, keyed by (component, version).
pub trait NavigationStore {
    /// Append root-level nodes for a component version, creating its list
    /// on first use.
    fn append(&mut self, component: &str, version: &str, nodes: Vec<NavNode>);
}

/// In-memory [`NavigationStore`]. Serializes as `{component: {version: [..]}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NavRegistry {
    roots: BTreeMap<String, BTreeMap<String, Vec<NavNode>>>,
}

impl NavRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The root list for a component version, created empty if missing.
    pub fn entry(&mut self, component: &str, version: &str) -> &mut Vec<NavNode> {
        self.roots
            .entry(component.to_string())
            .or_default()
            .entry(version.to_string())
            .or_default()
    }

    pub fn get(&self, component: &str, version: &str) -> Option<&[NavNode]> {
        self.roots
            .get(component)
            .and_then(|versions| versions.get(version))
            .map(Vec::as_slice)
    }

    /// All forests as `(component, version, nodes)`, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &[NavNode])> {
        self.roots.iter().flat_map(|(component, versions)| {
            versions
                .iter()
                .map(move |(version, nodes)| (component.as_str(), version.as_str(), nodes.as_slice()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl NavigationStore for NavRegistry {
    fn append(&mut self, component: &str, version: &str, nodes: Vec<NavNode>) {
        self.entry(component, version).extend(nodes);
    }
}

/// (listing, page) pairs being expanded on the current recursion path.
#[derive(Debug, Default)]
pub struct VisitedPath<'a> {
    stack: Vec<(&'a str, PageId<'a>)>,
}

impl<'a> VisitedPath<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a pair. Returns `false`, leaving the path unchanged, if the pair
    /// is already on the path.
    pub fn enter(&mut self, listing: &'a str, page: PageId<'a>) -> bool {
        if self.contains(listing, page) {
            return false;
        }
        self.stack.push((listing, page));
        true
    }

    pub fn leave(&mut self) {
        self.stack.pop();
    }

    pub fn contains(&self, listing: &str, page: PageId<'_>) -> bool {
        self.stack.iter().any(|(l, p)| *l == listing && *p == page)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Builds navigation trees from a listing set over a corpus.
pub struct NavigationBuilder<'a, C: Corpus + ?Sized> {
    corpus: &'a C,
    listings: &'a ListingSet,
    /// Name of the listing-reference attribute.
    config_attribute: &'a str,
}

impl<'a, C: Corpus + ?Sized> NavigationBuilder<'a, C> {
    pub fn new(corpus: &'a C, listings: &'a ListingSet, config_attribute: &'a str) -> Self {
        Self {
            corpus,
            listings,
            config_attribute,
        }
    }

    /// Build navigation for every root section and append it to `store`.
    ///
    /// Listings are visited in declaration order, their pages by title, and
    /// root sections in declaration order.
    pub fn build(&self, store: &mut impl NavigationStore) {
        for listing in self.listings.iter() {
            let roots: Vec<&Section> = listing.root_sections().collect();
            if roots.is_empty() {
                continue;
            }
            for page in self.pages_using(listing) {
                for section in &roots {
                    let nodes = self.expand_root(listing, section, page);
                    store.append(
                        &page.provenance.component,
                        &page.provenance.version,
                        nodes,
                    );
                }
            }
        }
    }

    /// Nodes contributed by one root section on one page.
    pub fn expand_root(
        &self,
        listing: &'a Listing,
        section: &Section,
        page: &'a Page,
    ) -> Vec<NavNode> {
        let mut path = VisitedPath::new();
        path.enter(&listing.name, page.id());
        self.expand_section(section, page, &mut path)
    }

    /// Output-bearing pages whose listing reference names `listing`.
    fn pages_using(&self, listing: &Listing) -> Vec<&'a Page> {
        let mut pages = self.corpus.find_pages(&mut |page| {
            page.has_output && page.attribute(self.config_attribute) == Some(listing.name.as_str())
        });
        sort_by_title(&mut pages);
        pages
    }

    /// The enabled listing a page references, if any.
    fn nested_listing(&self, page: &Page) -> Option<&'a Listing> {
        page.attribute(self.config_attribute)
            .and_then(|name| self.listings.get(name))
    }

    /// Expand one section with `context` as the context page.
    pub fn expand_section(
        &self,
        section: &Section,
        context: &Page,
        path: &mut VisitedPath<'a>,
    ) -> Vec<NavNode> {
        if section.navigation.skip {
            return Vec::new();
        }
        let nodes: Vec<NavNode> = resolve::select(self.corpus, context, &section.selector)
            .into_iter()
            .map(|page| self.page_node(page, path))
            .collect();
        match section.nav_title() {
            None => nodes,
            Some(title) => vec![NavNode {
                label: title.to_string(),
                url: None,
                children: nodes,
            }],
        }
    }

    fn page_node(&self, page: &'a Page, path: &mut VisitedPath<'a>) -> NavNode {
        let children = match self.nested_listing(page) {
            Some(listing) => self.expand_nested(listing, page, path),
            None => Vec::new(),
        };
        NavNode {
            label: page.title.clone(),
            url: page.url.clone(),
            children,
        }
    }

    /// Children of a page that references `listing`: every section of it,
    /// expanded with the page as context.
    fn expand_nested(
        &self,
        listing: &'a Listing,
        page: &'a Page,
        path: &mut VisitedPath<'a>,
    ) -> Vec<NavNode> {
        if !path.enter(&listing.name, page.id()) {
            tracing::debug!(
                listing = %listing.name,
                page = %page.id(),
                depth = path.depth(),
                "listing cycle, page kept as leaf"
            );
            return Vec::new();
        }
        let children = listing
            .sections
            .iter()
            .flat_map(|section| self.expand_section(section, page, path))
            .collect();
        path.leave();
        children
    }
}

/// Build navigation for every root section of `listings` into `store`.
pub fn build_navigation<C: Corpus + ?Sized>(
    corpus: &C,
    listings: &ListingSet,
    config_attribute: &str,
    store: &mut impl NavigationStore,
) {
    NavigationBuilder::new(corpus, listings, config_attribute).build(store);
}

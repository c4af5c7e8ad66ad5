//! Title and text extraction from published pages.
//!
//! Pages are parsed with [scraper](https://docs.rs/scraper) (html5ever), so
//! entities, unclosed elements and stray `<` characters are handled the way a
//! browser handles them. The CSS selectors below decide what counts as a
//! title, what is navigation chrome, and where the content starts.

use super::SearchError;
use scraper::{ElementRef, Html, Selector};

/// First match in document order is the page title.
const TITLE_SELECTOR: &str = "title, h1, .page-title";
/// Subtrees left out of the indexed text.
const EXCLUDED_SELECTOR: &str = "script, style, nav, .navbar, .footer";
/// First match (outside excluded subtrees) is the content root.
const CONTENT_SELECTOR: &str = "main, .main, .content, article";

/// Compiled selectors shared by every page of an index run.
#[derive(Debug)]
pub struct PageExtractor {
    title: Selector,
    excluded: Selector,
    content: Selector,
    body: Selector,
}

fn parse_selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|err| SearchError::Selector(format!("`{css}`: {err}")))
}

impl PageExtractor {
    pub fn new() -> Result<Self, SearchError> {
        Ok(Self {
            title: parse_selector(TITLE_SELECTOR)?,
            excluded: parse_selector(EXCLUDED_SELECTOR)?,
            content: parse_selector(CONTENT_SELECTOR)?,
            body: parse_selector("body")?,
        })
    }

    /// Parse a page and return its `(title, text)`.
    pub fn extract(&self, html: &str) -> (String, String) {
        let document = Html::parse_document(html);
        (self.title(&document), self.text(&document))
    }

    /// Text of the first title candidate, trimmed; `Untitled` when none.
    pub fn title(&self, document: &Html) -> String {
        document
            .select(&self.title)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    /// Readable text of the content root (or `body`), with excluded subtrees
    /// dropped and whitespace runs collapsed to single spaces.
    pub fn text(&self, document: &Html) -> String {
        let root = document
            .select(&self.content)
            .find(|el| !self.is_excluded(*el))
            .or_else(|| document.select(&self.body).next())
            .unwrap_or_else(|| document.root_element());
        let mut text = String::new();
        self.collect_text(root, &mut text);
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Whether `element` sits in (or is) an excluded subtree.
    fn is_excluded(&self, element: ElementRef<'_>) -> bool {
        self.excluded.matches(&element)
            || element
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|ancestor| self.excluded.matches(&ancestor))
    }

    fn collect_text(&self, element: ElementRef<'_>, out: &mut String) {
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                out.push_str(text);
            } else if let Some(child) = ElementRef::wrap(child)
                && !self.excluded.matches(&child)
            {
                self.collect_text(child, out);
            }
        }
    }
}

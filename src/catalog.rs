//! The page corpus.
//!
//! The host build owns the real content catalog; the engine only needs to
//! query it with a predicate. [`Corpus`] is that seam, and [`Catalog`] is the
//! in-memory snapshot the CLI loads from `catalog.json`.

use crate::types::Page;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the catalog file inside the source directory.
pub const CATALOG_FILE: &str = "catalog.json";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate page in catalog: {0}")]
    DuplicatePage(String),
}

/// Predicate query over page records. Results are unordered.
pub trait Corpus {
    fn find_pages(&self, predicate: &mut dyn FnMut(&Page) -> bool) -> Vec<&Page>;
}

impl Corpus for [Page] {
    fn find_pages(&self, predicate: &mut dyn FnMut(&Page) -> bool) -> Vec<&Page> {
        self.iter().filter(|page| predicate(page)).collect()
    }
}

impl Corpus for Vec<Page> {
    fn find_pages(&self, predicate: &mut dyn FnMut(&Page) -> bool) -> Vec<&Page> {
        self.as_slice().find_pages(predicate)
    }
}

/// In-memory corpus snapshot.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pages: Vec<Page>,
}

impl Catalog {
    /// Build a catalog, rejecting two records with the same page identity.
    pub fn new(pages: Vec<Page>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for page in &pages {
            if !seen.insert(page.id()) {
                return Err(CatalogError::DuplicatePage(page.id().to_string()));
            }
        }
        Ok(Self { pages })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let pages: Vec<Page> = serde_json::from_str(json)?;
        Self::new(pages)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Look a page up by its `component:version:module:relative` identity.
    pub fn find(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|page| page.id().to_string() == id)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl Corpus for Catalog {
    fn find_pages(&self, predicate: &mut dyn FnMut(&Page) -> bool) -> Vec<&Page> {
        self.pages.find_pages(predicate)
    }
}

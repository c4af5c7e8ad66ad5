//! Full-text search index over published HTML.
//!
//! Runs after the site is written: every `.html` file under the output
//! directory becomes one document with a title, a plain-text excerpt, and a
//! site-relative URL. The index is a single JSON file a client-side search
//! library can load directly.
//!
//! ## Output Format
//!
//! ```text
//! {
//!   "documents": [
//!     { "id": 1, "title": "Install", "content": "…", "url": "/docs/1.0/install.html" },
//!     { "id": 2, "title": "Home", "content": "…", "url": "/docs/1.0/" }
//!   ]
//! }
//! ```
//!
//! ## Parallel Processing
//!
//! Files are read and extracted in parallel with [rayon](https://docs.rs/rayon).
//! Ids are assigned afterwards in path order, so the index is identical from
//! run to run.
//!
//! Unreadable files are logged and skipped. They never fail the build.

pub mod html;

use crate::config::SearchConfig;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

pub use html::PageExtractor;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid CSS selector {0}")]
    Selector(String),
}

/// One searchable page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub id: usize,
    pub title: String,
    pub content: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub documents: Vec<SearchDocument>,
}

impl SearchIndex {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// What happened when indexing ran.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSummary {
    /// Where the index was written.
    pub path: PathBuf,
    pub scanned: usize,
    pub indexed: usize,
}

/// Extracted page text before ids are assigned.
struct Extracted {
    title: String,
    content: String,
    url: String,
}

/// Build the index for every HTML file under `output_dir`.
///
/// A missing output directory yields an empty index.
pub fn build_index(output_dir: &Path, config: &SearchConfig) -> Result<SearchIndex, SearchError> {
    let files = collect_html_files(output_dir)?;
    let extractor = PageExtractor::new()?;
    let extracted: Vec<Option<Extracted>> = files
        .par_iter()
        .map(|path| extract_document(&extractor, output_dir, path, config))
        .collect();

    let documents = extracted
        .into_iter()
        .flatten()
        .enumerate()
        .map(|(i, doc)| SearchDocument {
            id: i + 1,
            title: doc.title,
            content: doc.content,
            url: doc.url,
        })
        .collect();
    Ok(SearchIndex { documents })
}

/// Build the index and write it to `<output_dir>/<index_file>`.
pub fn generate_search_index(
    output_dir: &Path,
    config: &SearchConfig,
) -> Result<(SearchIndex, SearchSummary), SearchError> {
    let scanned = collect_html_files(output_dir)?.len();
    let index = build_index(output_dir, config)?;

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(&config.index_file);
    let json = serde_json::to_string_pretty(&index)?;
    fs::write(&path, json)?;

    tracing::info!(
        path = %path.display(),
        scanned,
        indexed = index.len(),
        "search index written"
    );
    let summary = SearchSummary {
        path,
        scanned,
        indexed: index.len(),
    };
    Ok((index, summary))
}

/// All `.html` files under `dir`, sorted by path.
fn collect_html_files(dir: &Path) -> Result<Vec<PathBuf>, SearchError> {
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "output directory missing, nothing to index");
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn extract_document(
    extractor: &PageExtractor,
    root: &Path,
    path: &Path,
    config: &SearchConfig,
) -> Option<Extracted> {
    let html = match fs::read_to_string(path) {
        Ok(html) => html,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "skipping unreadable page");
            return None;
        }
    };
    let (title, content) = extractor.extract(&html);
    let length = content.chars().count();
    if length < config.min_content_length {
        if config.debug {
            tracing::debug!(path = %path.display(), length, "skipping page with too little text");
        }
        return None;
    }
    let content = truncate_chars(&content, config.max_content_length);
    let url = page_url(root, path);
    if config.debug {
        tracing::debug!(%url, %title, length, "indexed page");
    }
    Some(Extracted {
        title,
        content,
        url,
    })
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte, _)) => text[..byte].to_string(),
        None => text.to_string(),
    }
}

/// Site URL of an output file: `/` + relative path, with `index.html`
/// collapsed to its directory.
fn page_url(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    let url = format!("/{joined}");
    match url.strip_suffix("index.html") {
        Some(dir) if dir.ends_with('/') => dir.to_string(),
        _ => url,
    }
}

//! Shared types for the page corpus and the navigation output.
//!
//! Page records are owned by the host build's content catalog and are only
//! ever read here. Navigation nodes are produced by [`crate::navigation`] and
//! serialized for the rendering layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Where a page lives in the corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Provenance {
    pub component: String,
    pub version: String,
    pub module: String,
}

/// Free-form document metadata attached to a page.
///
/// Lookups never coerce: an absent key is `None`, and every predicate built
/// on top of this type treats `None` as "does not match".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// The comma-separated tokens of an attribute, each trimmed.
    pub fn tokens<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a str> + 'a> {
        self.get(name).map(|value| value.split(',').map(str::trim))
    }

    /// Whether `value` is one of the comma-separated tokens of `name`.
    pub fn has_token(&self, name: &str, value: &str) -> bool {
        self.tokens(name)
            .is_some_and(|mut tokens| tokens.any(|token| token == value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A read-only view of one corpus entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(flatten)]
    pub provenance: Provenance,
    /// Path of the source file relative to its module.
    #[serde(default)]
    pub relative: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Whether the page renders to a publishable artifact.
    #[serde(default)]
    pub has_output: bool,
    /// Parsed document metadata. `None` when the page was never parsed as a
    /// document (such pages are never selected).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

impl Page {
    pub fn id(&self) -> PageId<'_> {
        PageId {
            component: &self.provenance.component,
            version: &self.provenance.version,
            module: &self.provenance.module,
            relative: &self.relative,
        }
    }

    /// Attribute lookup that folds "no metadata" into "no such attribute".
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.as_ref().and_then(|attrs| attrs.get(name))
    }

    /// Whether the page may appear in a listing at all.
    pub fn is_listable(&self) -> bool {
        self.has_output && self.attributes.is_some()
    }
}

/// Identity of a page within one build.
///
/// Displays as `component:version:module:relative`, the same form the CLI
/// accepts for `--page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId<'a> {
    pub component: &'a str,
    pub version: &'a str,
    pub module: &'a str,
    pub relative: &'a str,
}

impl fmt::Display for PageId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.component, self.version, self.module, self.relative
        )
    }
}

/// Navigation tree node.
///
/// Page nodes carry the page URL; grouping nodes (one per titled section)
/// have no URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavNode {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavNode>,
}

impl NavNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_trimmed() {
        let attrs: Attributes = [("page-tags", " a, b ,c ")].into_iter().collect();
        let tokens: Vec<&str> = attrs.tokens("page-tags").unwrap().collect();
        assert_eq!(tokens, vec!["a", "b", "c"]);
    }

    #[test]
    fn has_token_is_false_for_missing_attribute() {
        let attrs = Attributes::default();
        assert!(!attrs.has_token("page-tags", "a"));
    }

    #[test]
    fn page_without_metadata_is_not_listable() {
        let page = Page {
            has_output: true,
            ..Default::default()
        };
        assert!(!page.is_listable());
        assert_eq!(page.attribute("anything"), None);
    }

    #[test]
    fn page_id_display() {
        let page = Page {
            provenance: Provenance {
                component: "docs".into(),
                version: "1.0".into(),
                module: "ROOT".into(),
            },
            relative: "index.adoc".into(),
            ..Default::default()
        };
        assert_eq!(page.id().to_string(), "docs:1.0:ROOT:index.adoc");
    }

    #[test]
    fn page_deserializes_flat_record() {
        let json = r#"{
            "component": "docs", "version": "1.0", "module": "ROOT",
            "relative": "a.adoc", "title": "A", "has_output": true,
            "attributes": { "page-tags": "x" }
        }"#;
        let page: Page = serde_json::from_str(json).unwrap();
        assert_eq!(page.provenance.component, "docs");
        assert_eq!(page.attribute("page-tags"), Some("x"));
        assert!(page.url.is_none());
    }

    #[test]
    fn nav_node_omits_empty_children() {
        let node = NavNode {
            label: "Leaf".into(),
            url: Some("/leaf.html".into()),
            children: vec![],
        };
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"label":"Leaf","url":"/leaf.html"}"#);
    }
}

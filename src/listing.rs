//! Listing configurations and the listing assembler.
//!
//! A listing configuration is a named, ordered set of sections. Each section
//! has an optional title, a selector, and optional navigation directives:
//!
//! ```toml
//! [listing.handbook.guides]
//! title = "Guides"
//! selector = { component = "<current>", attributes = [{ name = "page-category", contains = "guide" }] }
//! navigation = { root = true }
//!
//! [listing.handbook.tools]
//! title = "Tools"
//! tag = "tool"
//! within_parent_module = true
//!
//! [listing]
//! retired = false   # a disabled configuration renders nothing
//! ```
//!
//! Section order is the order sections are written in and is preserved from
//! the file all the way to the assembled output. Configurations are compiled
//! once into a [`ListingSet`]; assembling a listing for a page is then a pure
//! lookup-and-resolve that never fails.

use crate::catalog::Corpus;
use crate::resolve::{self, Padding, PageGroup};
use crate::selector::{Selector, SelectorConfig, SelectorError};
use crate::types::Page;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("listing `{listing}`, section `{section}`: {source}")]
    Selector {
        listing: String,
        section: String,
        source: SelectorError,
    },
    #[error("listing `{listing}`, section `{section}`: no selector (expected `selector` or `tag`)")]
    MissingSelector { listing: String, section: String },
    #[error("listing `{listing}`, section `{section}`: `selector` and `tag` are mutually exclusive")]
    AmbiguousSelector { listing: String, section: String },
}

// =============================================================================
// Configuration shapes
// =============================================================================

/// String-keyed map that keeps the order its entries were written in.
#[derive(Debug, Clone, PartialEq)]
pub struct Ordered<V>(pub Vec<(String, V)>);

impl<V> Default for Ordered<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> Ordered<V> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V: Serialize> Serialize for Ordered<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Ordered<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedVisitor<V> {
            type Value = Ordered<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a table")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, V)> = Vec::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    if entries.iter().any(|(k, _)| *k == key) {
                        return Err(de::Error::custom(format!("duplicate key `{key}`")));
                    }
                    entries.push((key, value));
                }
                Ok(Ordered(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

/// Navigation directives of a section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavDirectives {
    /// Produce nothing for this section in navigation trees.
    pub skip: bool,
    /// Label to use in navigation instead of the section title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Seed a top-level navigation entry for every page using this listing.
    pub root: bool,
}

/// A section as written in the site configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionConfig {
    /// Omitted title: no heading in listings, children spliced in navigation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<SelectorConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(
        default,
        alias = "withinParentModule",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub within_parent_module: bool,
    #[serde(default)]
    pub navigation: NavDirectives,
}

/// A listing configuration as written: ordered sections, or `false`.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingConfig {
    Disabled,
    Sections(Ordered<SectionConfig>),
}

impl Serialize for ListingConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Disabled => serializer.serialize_bool(false),
            Self::Sections(sections) => sections.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ListingConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ListingVisitor;

        impl<'de> Visitor<'de> for ListingVisitor {
            type Value = ListingConfig;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a table of sections, or `false`")
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
                if value {
                    Err(E::invalid_value(de::Unexpected::Bool(true), &self))
                } else {
                    Ok(ListingConfig::Disabled)
                }
            }

            fn visit_map<A: MapAccess<'de>>(self, access: A) -> Result<Self::Value, A::Error> {
                Ordered::deserialize(de::value::MapAccessDeserializer::new(access))
                    .map(ListingConfig::Sections)
            }
        }

        deserializer.deserialize_any(ListingVisitor)
    }
}

// =============================================================================
// Compiled listings
// =============================================================================

/// A compiled section.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub key: String,
    pub title: Option<String>,
    pub selector: Selector,
    pub navigation: NavDirectives,
}

impl Section {
    /// Label in navigation trees: the override, else the section title.
    pub fn nav_title(&self) -> Option<&str> {
        self.navigation.title.as_deref().or(self.title.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub name: String,
    pub sections: Vec<Section>,
}

impl Listing {
    pub fn root_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.navigation.root)
    }
}

/// The compiled set of enabled listing configurations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingSet {
    listings: Vec<Listing>,
    disabled: Vec<String>,
}

impl ListingSet {
    /// Compile every configuration. `tags_attribute` names the attribute the
    /// tag shorthand reads.
    pub fn compile(
        config: &Ordered<ListingConfig>,
        tags_attribute: &str,
    ) -> Result<Self, ListingError> {
        let mut set = Self::default();
        for (name, listing) in config.iter() {
            match listing {
                ListingConfig::Disabled => set.disabled.push(name.to_string()),
                ListingConfig::Sections(sections) => {
                    let sections = sections
                        .iter()
                        .map(|(key, section)| compile_section(name, key, section, tags_attribute))
                        .collect::<Result<Vec<_>, _>>()?;
                    set.listings.push(Listing {
                        name: name.to_string(),
                        sections,
                    });
                }
            }
        }
        Ok(set)
    }

    /// An enabled configuration by name.
    pub fn get(&self, name: &str) -> Option<&Listing> {
        self.listings.iter().find(|l| l.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Listing> {
        self.listings.iter()
    }

    pub fn disabled(&self) -> &[String] {
        &self.disabled
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Resolve every section of `name` for `context`, in declared order.
    ///
    /// A missing or disabled configuration yields an empty list.
    pub fn assemble<'a, C: Corpus + ?Sized>(
        &'a self,
        name: &str,
        context: &Page,
        corpus: &'a C,
        padding: Padding,
    ) -> Vec<SectionListing<'a>> {
        let Some(listing) = self.get(name) else {
            tracing::debug!(listing = name, "no enabled listing configuration");
            return Vec::new();
        };
        listing
            .sections
            .iter()
            .map(|section| SectionListing {
                title: section.title.as_deref(),
                pages: resolve::resolve(corpus, context, &section.selector, padding),
            })
            .collect()
    }
}

fn compile_section(
    listing: &str,
    key: &str,
    config: &SectionConfig,
    tags_attribute: &str,
) -> Result<Section, ListingError> {
    let selector = match (&config.selector, &config.tag) {
        (Some(selector), None) => {
            Selector::compile(selector).map_err(|source| ListingError::Selector {
                listing: listing.to_string(),
                section: key.to_string(),
                source,
            })?
        }
        (None, Some(tag)) => Selector::tag(tag, config.within_parent_module, tags_attribute),
        (None, None) => {
            return Err(ListingError::MissingSelector {
                listing: listing.to_string(),
                section: key.to_string(),
            });
        }
        (Some(_), Some(_)) => {
            return Err(ListingError::AmbiguousSelector {
                listing: listing.to_string(),
                section: key.to_string(),
            });
        }
    };
    Ok(Section {
        key: key.to_string(),
        title: config.title.clone(),
        selector,
        navigation: config.navigation.clone(),
    })
}

/// One assembled section, as handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionListing<'a> {
    pub title: Option<&'a str>,
    pub pages: PageGroup<'a>,
}

/// Card data for a page: attributes under `prefix`, with the prefix removed.
pub fn listing_data<'a>(page: &'a Page, prefix: &str) -> BTreeMap<&'a str, &'a str> {
    page.attributes
        .iter()
        .flat_map(|attrs| attrs.iter())
        .filter_map(|(key, value)| key.strip_prefix(prefix).map(|k| (k, value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{group_titles, page, with_attrs};
    use pretty_assertions::assert_eq;

    const CONFIG: &str = r#"
        [handbook.zeta]
        title = "Zeta first"
        selector = { attributes = [{ name = "kind", equals = "zeta" }] }

        [handbook.alpha]
        title = "Alpha second"
        tag = "alpha"

        [handbook.untitled]
        selector = { attributes = [{ name = "kind", equals = "zeta" }] }
        navigation = { skip = true }

        [empty]
    "#;

    fn listings(toml_src: &str) -> Ordered<ListingConfig> {
        toml::from_str(toml_src).unwrap()
    }

    fn corpus() -> Vec<Page> {
        vec![
            with_attrs(page("docs", "1.0", "ROOT", "z1.adoc", "Z one"), &[("kind", "zeta")]),
            with_attrs(page("docs", "1.0", "ROOT", "a1.adoc", "A one"), &[("page-tags", "alpha")]),
            with_attrs(page("docs", "1.0", "ROOT", "z2.adoc", "Z two"), &[("kind", "zeta")]),
        ]
    }

    #[test]
    fn section_order_is_preserved() {
        let config = listings(CONFIG);
        let set = ListingSet::compile(&config, "page-tags").unwrap();
        let keys: Vec<&str> = set
            .get("handbook")
            .unwrap()
            .sections
            .iter()
            .map(|s| s.key.as_str())
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha", "untitled"]);
    }

    #[test]
    fn assemble_preserves_declaration_order() {
        let set = ListingSet::compile(&listings(CONFIG), "page-tags").unwrap();
        let pages = corpus();
        let result = set.assemble("handbook", &pages[0], &pages, Padding::None);
        let titles: Vec<Option<&str>> = result.iter().map(|s| s.title).collect();
        assert_eq!(titles, vec![Some("Zeta first"), Some("Alpha second"), None]);
        assert_eq!(group_titles(&result[0].pages), vec![Some("Z one"), Some("Z two")]);
        assert_eq!(group_titles(&result[1].pages), vec![Some("A one")]);
    }

    #[test]
    fn assemble_applies_padding_policy() {
        let set = ListingSet::compile(&listings(CONFIG), "page-tags").unwrap();
        let pages = corpus();
        let result = set.assemble("handbook", &pages[0], &pages, Padding::GridWithTerminator);
        assert_eq!(
            group_titles(&result[0].pages),
            vec![Some("Z one"), Some("Z two"), None, None]
        );
    }

    #[test]
    fn missing_configuration_assembles_to_nothing() {
        let set = ListingSet::compile(&listings(CONFIG), "page-tags").unwrap();
        let pages = corpus();
        assert!(set.assemble("nope", &pages[0], &pages, Padding::Grid).is_empty());
    }

    #[test]
    fn disabled_configuration_assembles_to_nothing() {
        let mut config = listings("[handbook.a]\ntag = \"x\"\n");
        config.0.push(("off".into(), ListingConfig::Disabled));
        let set = ListingSet::compile(&config, "page-tags").unwrap();
        assert_eq!(set.disabled(), &["off".to_string()]);
        assert!(set.get("off").is_none());
        let pages = corpus();
        assert!(set.assemble("off", &pages[0], &pages, Padding::Grid).is_empty());
    }

    #[test]
    fn false_disables_a_configuration() {
        let config: Ordered<ListingConfig> = toml::from_str("retired = false").unwrap();
        assert_eq!(config.0, vec![("retired".to_string(), ListingConfig::Disabled)]);
        assert!(toml::from_str::<Ordered<ListingConfig>>("retired = true").is_err());
    }

    #[test]
    fn within_parent_module_accepts_camel_case() {
        for key in ["within_parent_module", "withinParentModule"] {
            let config = listings(&format!("[handbook.a]\ntag = \"guide\"\n{key} = true\n"));
            let set = ListingSet::compile(&config, "page-tags").unwrap();
            assert_eq!(
                set.get("handbook").unwrap().sections[0].selector,
                Selector::tag("guide", true, "page-tags"),
                "{key}"
            );
        }
    }

    #[test]
    fn empty_configuration_has_no_sections() {
        let set = ListingSet::compile(&listings(CONFIG), "page-tags").unwrap();
        assert!(set.get("empty").unwrap().sections.is_empty());
    }

    #[test]
    fn unsupported_operator_is_reported_with_location() {
        let config = listings(
            r#"
            [handbook.broken]
            selector = { attributes = [{ name = "kind", matches = "z.*" }] }
            "#,
        );
        let err = ListingSet::compile(&config, "page-tags").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("listing `handbook`, section `broken`"));
        assert!(message.contains("`matches`"));
    }

    #[test]
    fn section_needs_exactly_one_selector() {
        let none = listings("[handbook.a]\ntitle = \"A\"\n");
        assert!(matches!(
            ListingSet::compile(&none, "page-tags"),
            Err(ListingError::MissingSelector { .. })
        ));
        let both = listings("[handbook.a]\ntag = \"x\"\nselector = {}\n");
        assert!(matches!(
            ListingSet::compile(&both, "page-tags"),
            Err(ListingError::AmbiguousSelector { .. })
        ));
    }

    #[test]
    fn nav_title_prefers_override() {
        let config = listings(
            r#"
            [handbook.a]
            title = "Section"
            tag = "x"
            navigation = { title = "Override" }

            [handbook.b]
            title = "Section"
            tag = "x"
            "#,
        );
        let set = ListingSet::compile(&config, "page-tags").unwrap();
        let sections = &set.get("handbook").unwrap().sections;
        assert_eq!(sections[0].nav_title(), Some("Override"));
        assert_eq!(sections[1].nav_title(), Some("Section"));
    }

    #[test]
    fn listing_data_strips_prefix() {
        let p = with_attrs(
            page("docs", "1.0", "ROOT", "a.adoc", "A"),
            &[
                ("page-listing-data-image", "cover.png"),
                ("page-listing-data-summary", "Short"),
                ("page-tags", "x"),
            ],
        );
        let data = listing_data(&p, "page-listing-data-");
        assert_eq!(
            data.into_iter().collect::<Vec<_>>(),
            vec![("image", "cover.png"), ("summary", "Short")]
        );
    }

    #[test]
    fn ordered_rejects_duplicate_keys_from_json() {
        let result: Result<Ordered<u32>, _> = serde_json::from_str(r#"{"a": 1, "a": 2}"#);
        assert!(result.is_err());
    }
}

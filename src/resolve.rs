//! Section resolution: from a selector to an ordered, padded page group.
//!
//! Resolution filters the corpus down to listable pages (rendered output and
//! parsed metadata) that the selector accepts for the given context page,
//! then sorts them by title.
//!
//! ## Ordering
//!
//! Titles compare with the Unicode Collation Algorithm ([feruca]) under the
//! CLDR root locale: accents and case only break ties between otherwise equal
//! letters, and punctuation sorts before letters. Pages with identical titles
//! keep their corpus order (the sort is stable). Untitled pages sort first.
//!
//! ## Padding
//!
//! Listings render as a grid of [`GRID_COLUMNS`] cards per row, so a group may
//! be padded with [`Entry::Placeholder`]s. Which padding applies is a layout
//! decision made by the caller through [`Padding`]:
//!
//! | Policy | Effect |
//! |--------|--------|
//! | `None` | no placeholders (navigation trees) |
//! | `Grid` | non-empty groups padded to a multiple of 3 |
//! | `Terminator` | exactly one trailing placeholder, always |
//! | `GridWithTerminator` | grid padding, then one trailing placeholder |

use crate::catalog::Corpus;
use crate::selector::Selector;
use crate::types::Page;
use feruca::{Collator, Tailoring};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;

/// Cards per listing row.
pub const GRID_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Padding {
    #[default]
    None,
    Grid,
    Terminator,
    GridWithTerminator,
}

impl Padding {
    fn pads_grid(self) -> bool {
        matches!(self, Self::Grid | Self::GridWithTerminator)
    }

    fn terminates(self) -> bool {
        matches!(self, Self::Terminator | Self::GridWithTerminator)
    }
}

/// One slot of a page group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entry<'a> {
    Page(&'a Page),
    /// Layout filler. Carries nothing and is never matched against.
    Placeholder,
}

impl<'a> Entry<'a> {
    pub fn page(&self) -> Option<&'a Page> {
        match self {
            Self::Page(page) => Some(page),
            Self::Placeholder => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

/// Placeholders serialize as `{"empty": true}` for the rendering layer.
impl Serialize for Entry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Page(page) => page.serialize(serializer),
            Self::Placeholder => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("empty", &true)?;
                map.end()
            }
        }
    }
}

/// Ordered, possibly padded pages of one section.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PageGroup<'a> {
    entries: Vec<Entry<'a>>,
}

impl<'a> PageGroup<'a> {
    /// Build a group from already sorted pages, applying `padding`.
    pub fn padded(pages: Vec<&'a Page>, padding: Padding) -> Self {
        let mut entries: Vec<Entry<'a>> = pages.into_iter().map(Entry::Page).collect();
        if padding.pads_grid() && !entries.is_empty() {
            while entries.len() % GRID_COLUMNS != 0 {
                entries.push(Entry::Placeholder);
            }
        }
        if padding.terminates() {
            entries.push(Entry::Placeholder);
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry<'a>] {
        &self.entries
    }

    /// Real pages only, in order.
    pub fn pages(&self) -> impl Iterator<Item = &'a Page> + '_ {
        self.entries.iter().filter_map(Entry::page)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Title collation: CLDR root order, punctuation and symbols sorting before
/// letters (non-ignorable), lowercase before uppercase on ties.
fn title_collator() -> Collator {
    Collator::new(Tailoring::default(), false, true)
}

/// Compare two titles for listing order.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    title_collator().collate(a, b)
}

/// Stable sort by title. Equal titles keep their incoming order.
pub fn sort_by_title(pages: &mut [&Page]) {
    let mut collator = title_collator();
    pages.sort_by(|a, b| collator.collate(a.title.as_str(), b.title.as_str()));
}

/// Listable pages accepted by `selector`, sorted by title. Never padded.
pub fn select<'a, C: Corpus + ?Sized>(
    corpus: &'a C,
    context: &Page,
    selector: &Selector,
) -> Vec<&'a Page> {
    let mut pages = corpus.find_pages(&mut |candidate| {
        candidate.is_listable() && selector.matches(context, candidate)
    });
    sort_by_title(&mut pages);
    tracing::debug!(context = %context.id(), selected = pages.len(), "resolved section");
    pages
}

/// Resolve one section into a page group under the given padding policy.
pub fn resolve<'a, C: Corpus + ?Sized>(
    corpus: &'a C,
    context: &Page,
    selector: &Selector,
    padding: Padding,
) -> PageGroup<'a> {
    PageGroup::padded(select(corpus, context, selector), padding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::{FieldMatch, SelectorConfig};
    use crate::test_helpers::{group_titles, page, with_attrs};
    use pretty_assertions::assert_eq;

    fn corpus(titles: &[&str]) -> Vec<Page> {
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| page("docs", "1.0", "ROOT", &format!("p{i}.adoc"), title))
            .collect()
    }

    fn everything() -> Selector {
        Selector::compile(&SelectorConfig::default()).unwrap()
    }

    #[test]
    fn titles_compare_case_insensitively() {
        assert_eq!(compare_titles("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_titles("Zebra", "apple"), Ordering::Greater);
        assert_eq!(compare_titles("", "a"), Ordering::Less);
        assert_eq!(compare_titles("a", "A"), Ordering::Less);
        assert_eq!(compare_titles("Same", "Same"), Ordering::Equal);
    }

    #[test]
    fn accented_titles_sort_with_their_base_letter() {
        assert_eq!(compare_titles("Éclair", "Zebra"), Ordering::Less);
        assert_eq!(compare_titles("Éclair", "Eggs"), Ordering::Less);
        assert_eq!(compare_titles("eclair", "éclair"), Ordering::Less);
        assert_eq!(compare_titles("Ångström", "Beta"), Ordering::Less);
    }

    #[test]
    fn punctuation_sorts_before_letters() {
        assert_eq!(compare_titles("~tilde", "apple"), Ordering::Less);
        assert_eq!(compare_titles("_draft", "Alpha"), Ordering::Less);
    }

    #[test]
    fn resolve_sorts_accented_titles_in_place() {
        let pages = corpus(&["Zebra", "Éclair", "apple", "Delta"]);
        let group = resolve(&pages, &pages[0], &everything(), Padding::None);
        assert_eq!(
            group_titles(&group),
            vec![Some("apple"), Some("Delta"), Some("Éclair"), Some("Zebra")]
        );
    }

    #[test]
    fn resolve_sorts_by_title() {
        let pages = corpus(&["Gamma", "alpha", "Beta"]);
        let ctx = &pages[0];
        let group = resolve(&pages, ctx, &everything(), Padding::None);
        assert_eq!(
            group_titles(&group),
            vec![Some("alpha"), Some("Beta"), Some("Gamma")]
        );
    }

    #[test]
    fn equal_titles_keep_corpus_order() {
        let pages = corpus(&["Same", "Other", "Same"]);
        let group = resolve(&pages, &pages[0], &everything(), Padding::None);
        let relatives: Vec<&str> = group.pages().map(|p| p.relative.as_str()).collect();
        assert_eq!(relatives, vec!["p1.adoc", "p0.adoc", "p2.adoc"]);
    }

    #[test]
    fn pages_without_output_or_metadata_are_excluded() {
        let mut pages = corpus(&["A", "B", "C"]);
        pages[1].has_output = false;
        pages[2].attributes = None;
        let group = resolve(&pages, &pages[0], &everything(), Padding::None);
        assert_eq!(group_titles(&group), vec![Some("A")]);
    }

    #[test]
    fn grid_padding_rounds_up_to_columns() {
        for n in 1..=7 {
            let titles: Vec<String> = (0..n).map(|i| format!("T{i}")).collect();
            let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
            let pages = corpus(&refs);
            let group = resolve(&pages, &pages[0], &everything(), Padding::Grid);
            assert_eq!(group.len() % GRID_COLUMNS, 0, "n = {n}");
            assert_eq!(group.pages().count(), n);
            assert!(group.entries()[..n].iter().all(|e| !e.is_placeholder()));
        }
    }

    #[test]
    fn grid_padding_leaves_empty_group_empty() {
        let pages = corpus(&["A"]);
        let nothing = Selector::compile(&SelectorConfig {
            component: Some(FieldMatch::Literal("missing".into())),
            ..Default::default()
        })
        .unwrap();
        assert!(resolve(&pages, &pages[0], &nothing, Padding::Grid).is_empty());
        let terminated = resolve(&pages, &pages[0], &nothing, Padding::GridWithTerminator);
        assert_eq!(terminated.entries(), &[Entry::Placeholder]);
    }

    #[test]
    fn terminator_appends_exactly_one_placeholder() {
        let pages = corpus(&["A", "B"]);
        let group = resolve(&pages, &pages[0], &everything(), Padding::Terminator);
        assert_eq!(group.len(), 3);
        assert!(group.entries()[2].is_placeholder());
        assert_eq!(group.entries().iter().filter(|e| e.is_placeholder()).count(), 1);
    }

    #[test]
    fn grid_with_terminator() {
        let pages = corpus(&["A", "B", "C", "D"]);
        let group = resolve(&pages, &pages[0], &everything(), Padding::GridWithTerminator);
        assert_eq!(group.len(), 7);
        assert!(group.entries().last().unwrap().is_placeholder());
        assert_eq!(group.pages().count(), 4);
    }

    #[test]
    fn placeholder_serializes_as_empty_marker() {
        let pages = vec![with_attrs(
            page("docs", "1.0", "ROOT", "a.adoc", "A"),
            &[("k", "v")],
        )];
        let group = resolve(&pages, &pages[0], &everything(), Padding::Terminator);
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json[0]["title"], "A");
        assert_eq!(json[1], serde_json::json!({ "empty": true }));
    }

    #[test]
    fn padding_parses_from_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            padding: Padding,
        }
        let w: Wrapper = toml::from_str(r#"padding = "grid-with-terminator""#).unwrap();
        assert_eq!(w.padding, Padding::GridWithTerminator);
    }
}

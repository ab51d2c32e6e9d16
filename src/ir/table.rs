//! Flat translation table: full key path → per-language record.

use std::collections::{
    BTreeMap,
    HashMap,
    hash_map,
};

use crate::input::dictionary::{
    Dictionary,
    DictionaryNode,
    LeafValue,
};
use crate::remote::RemoteOverrideRow;
use crate::types::TranslationEntry;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatTranslationTable {
    /// Key path to entry
    entries: HashMap<String, TranslationEntry>,
}

impl FlatTranslationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TranslationEntry> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: String, entry: TranslationEntry) -> Option<TranslationEntry> {
        self.entries.insert(key, entry)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, TranslationEntry> {
        self.entries.iter()
    }
}

impl FromIterator<(String, TranslationEntry)> for FlatTranslationTable {
    fn from_iter<I: IntoIterator<Item = (String, TranslationEntry)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a FlatTranslationTable {
    type Item = (&'a String, &'a TranslationEntry);
    type IntoIter = hash_map::Iter<'a, String, TranslationEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Flatten a dictionary into a key-path table.
///
/// # Examples
/// ```
/// use wedding_i18n::input::dictionary::Dictionary;
/// use wedding_i18n::ir::table::flatten;
/// use wedding_i18n::types::TranslationEntry;
///
/// let dictionary = Dictionary::new()
///     .with("services.venue", TranslationEntry::new("Venue", "Veranstaltungsort", "Mekan"))
///     .with("brand", "WeddingHub");
///
/// let table = flatten(&dictionary, ".");
/// assert_eq!(table.get("services.venue").and_then(|e| e.tr.as_deref()), Some("Mekan"));
/// assert_eq!(table.get("brand").and_then(|e| e.de.as_deref()), Some("WeddingHub"));
/// ```
#[must_use]
pub fn flatten(dictionary: &Dictionary, separator: &str) -> FlatTranslationTable {
    let mut result = FlatTranslationTable::new();
    flatten_branch(dictionary.root(), separator, None, &mut result);
    result
}

/// Depth-first walk joining segments with `separator`.
fn flatten_branch(
    branch: &BTreeMap<String, DictionaryNode>,
    separator: &str,
    prefix: Option<&str>,
    result: &mut FlatTranslationTable,
) {
    for (key, node) in branch {
        let full_key = prefix.map_or_else(|| key.clone(), |p| format!("{p}{separator}{key}"));
        match node {
            DictionaryNode::Branch(children) => {
                flatten_branch(children, separator, Some(&full_key), result);
            }
            DictionaryNode::Leaf(LeafValue::Record(entry)) => {
                result.insert(full_key, entry.clone());
            }
            DictionaryNode::Leaf(LeafValue::Invariant(value)) => {
                result.insert(full_key, TranslationEntry::invariant(value));
            }
        }
    }
}

/// Lays remote rows over `base`. A row replaces the whole record for its key.
#[must_use]
pub fn merge(base: &FlatTranslationTable, rows: &[RemoteOverrideRow]) -> FlatTranslationTable {
    let mut merged = base.clone();
    for row in rows {
        merged.insert(row.key.clone(), row.entry());
    }
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn row(key: &str, en: Option<&str>, de: Option<&str>, tr: Option<&str>) -> RemoteOverrideRow {
        RemoteOverrideRow {
            key: key.to_string(),
            en: en.map(str::to_string),
            de: de.map(str::to_string),
            tr: tr.map(str::to_string),
            updated_at: None,
        }
    }

    #[googletest::test]
    fn test_flatten_nested() {
        let dictionary = Dictionary::from_json(&json!({
            "nav": {
                "home": { "en": "Home", "de": "Startseite", "tr": "Ana Sayfa" },
                "forum": { "en": "Forum", "de": "Forum", "tr": "Forum" }
            },
            "status": {
                "pending": { "en": "Pending", "de": "Ausstehend", "tr": "Beklemede" }
            }
        }));

        let table = flatten(&dictionary, ".");

        expect_that!(table.len(), eq(3));
        expect_that!(table.contains_key("nav.home"), eq(true));
        expect_that!(table.contains_key("nav.forum"), eq(true));
        expect_that!(table.contains_key("status.pending"), eq(true));
    }

    #[googletest::test]
    fn test_flatten_invariant_string_fills_every_language() {
        let dictionary = Dictionary::from_json(&json!({ "footer": { "copyright": "© WeddingHub" } }));

        let table = flatten(&dictionary, ".");

        assert_eq!(table.get("footer.copyright"), Some(&TranslationEntry::invariant("© WeddingHub")));
    }

    #[googletest::test]
    fn test_flatten_skips_null_branches() {
        let dictionary = Dictionary::from_json(&json!({
            "gone": null,
            "kept": { "nested": null, "leaf": "L" }
        }));

        let table = flatten(&dictionary, ".");

        expect_that!(table.iter().all(|(key, _)| !key.starts_with("gone")), eq(true));
        expect_that!(table.contains_key("kept.nested"), eq(false));
        expect_that!(table.len(), eq(1));
    }

    #[googletest::test]
    fn test_flatten_is_deterministic() {
        let dictionary = Dictionary::embedded();

        assert_eq!(flatten(dictionary, "."), flatten(dictionary, "."));
    }

    #[rstest]
    #[case::dot(".", "a.b.c")]
    #[case::colon(":", "a:b:c")]
    #[case::slash("/", "a/b/c")]
    fn test_flatten_with_separator(#[case] separator: &str, #[case] expected_key: &str) {
        let dictionary = Dictionary::from_json(&json!({ "a": { "b": { "c": "Deep value" } } }));

        let table = flatten(&dictionary, separator);

        assert_that!(table.contains_key(expected_key), eq(true));
    }

    #[rstest]
    fn test_flatten_empty_dictionary() {
        assert_that!(flatten(&Dictionary::new(), ".").is_empty(), eq(true));
    }

    #[rstest]
    fn test_merge_remote_wins_and_others_unchanged() {
        let base: FlatTranslationTable = [
            ("services.venue".to_string(), TranslationEntry::new("Venue", "Veranstaltungsort", "Mekan")),
            ("nav.home".to_string(), TranslationEntry::new("Home", "Startseite", "Ana Sayfa")),
        ]
        .into_iter()
        .collect();
        let rows = vec![
            row("services.venue", None, None, Some("Düğün Mekanı")),
            row("promo.banner", Some("Sale"), Some("Angebot"), None),
        ];

        let merged = merge(&base, &rows);

        assert_eq!(merged.get("services.venue"), Some(&rows[0].entry()));
        assert_eq!(merged.get("promo.banner"), Some(&rows[1].entry()));
        assert_eq!(merged.get("nav.home"), base.get("nav.home"));
        assert_eq!(merged.len(), 3);
    }

    #[rstest]
    fn test_merge_without_rows_is_identity() {
        let base = flatten(Dictionary::embedded(), ".");

        assert_eq!(merge(&base, &[]), base);
    }
}

//! Core types used throughout the project.

use std::fmt;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// Language used when nothing else selects one.
pub const DEFAULT_LANGUAGE: &str = "de";

/// A language the dictionary carries strings for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    De,
    Tr,
}

impl Language {
    pub const ALL: [Self; 3] = [Self::En, Self::De, Self::Tr];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
            Self::Tr => "tr",
        }
    }

    /// Exact match against a bare language code (`"en"`, not `"en-US"`).
    #[must_use]
    pub fn from_exact_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|language| language.code() == code)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported language code '{0}'")]
pub struct UnsupportedLanguage(pub String);

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    /// Case-insensitive; region subtags are ignored (`de-AT`, `tr_TR`).
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let primary = code.split(['-', '_']).next().unwrap_or_default().to_lowercase();
        Self::from_exact_code(&primary).ok_or_else(|| UnsupportedLanguage(code.to_string()))
    }
}

/// Per-language strings for one key path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    #[serde(default)]
    pub en: Option<String>,
    #[serde(default)]
    pub de: Option<String>,
    #[serde(default)]
    pub tr: Option<String>,
}

impl TranslationEntry {
    #[must_use]
    pub fn new(en: &str, de: &str, tr: &str) -> Self {
        Self { en: Some(en.to_string()), de: Some(de.to_string()), tr: Some(tr.to_string()) }
    }

    /// Same string for every language.
    #[must_use]
    pub fn invariant(value: &str) -> Self {
        Self::new(value, value, value)
    }

    #[must_use]
    pub fn get(&self, language: Language) -> Option<&str> {
        match language {
            Language::En => self.en.as_deref(),
            Language::De => self.de.as_deref(),
            Language::Tr => self.tr.as_deref(),
        }
    }

    /// Looks up a value by language code. Unsupported codes yield `None`.
    #[must_use]
    pub fn get_code(&self, code: &str) -> Option<&str> {
        code.parse::<Language>().ok().and_then(|language| self.get(language))
    }

    pub fn set(&mut self, language: Language, value: Option<String>) {
        match language {
            Language::En => self.en = value,
            Language::De => self.de = value,
            Language::Tr => self.tr = value,
        }
    }

    /// Overwrites only the fields the patch provides.
    pub fn merge(&mut self, patch: &TranslationPatch) {
        for language in Language::ALL {
            if let Some(value) = patch.get(language) {
                self.set(language, Some(value.to_string()));
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        Language::ALL.into_iter().all(|language| self.get(language).is_none_or(str::is_empty))
    }
}

/// A partial write: absent fields leave the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub de: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tr: Option<String>,
}

impl TranslationPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, language: Language, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match language {
            Language::En => self.en = value,
            Language::De => self.de = value,
            Language::Tr => self.tr = value,
        }
        self
    }

    #[must_use]
    pub fn get(&self, language: Language) -> Option<&str> {
        match language {
            Language::En => self.en.as_deref(),
            Language::De => self.de.as_deref(),
            Language::Tr => self.tr.as_deref(),
        }
    }
}

impl From<TranslationEntry> for TranslationPatch {
    fn from(entry: TranslationEntry) -> Self {
        Self { en: entry.en, de: entry.de, tr: entry.tr }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::bare("de", Language::De)]
    #[case::uppercase("TR", Language::Tr)]
    #[case::region_dash("de-AT", Language::De)]
    #[case::region_underscore("en_US", Language::En)]
    fn parse_supported_language(#[case] code: &str, #[case] expected: Language) {
        assert_eq!(code.parse::<Language>().unwrap(), expected);
    }

    #[rstest]
    #[case::french("fr")]
    #[case::empty("")]
    #[case::garbage("xx-de")]
    fn parse_unsupported_language(#[case] code: &str) {
        assert_eq!(code.parse::<Language>(), Err(UnsupportedLanguage(code.to_string())));
    }

    #[rstest]
    fn from_exact_code_rejects_regions() {
        assert_eq!(Language::from_exact_code("en"), Some(Language::En));
        assert_eq!(Language::from_exact_code("en-US"), None);
    }

    #[rstest]
    fn entry_get_code_ignores_unsupported() {
        let entry = TranslationEntry::new("Venue", "Veranstaltungsort", "Mekan");

        assert_eq!(entry.get_code("tr"), Some("Mekan"));
        assert_eq!(entry.get_code("de-CH"), Some("Veranstaltungsort"));
        assert_eq!(entry.get_code("fr"), None);
    }

    #[rstest]
    fn merge_only_touches_provided_fields() {
        let mut entry = TranslationEntry::new("Venue", "Veranstaltungsort", "Mekan");
        let patch = TranslationPatch::new().with(Language::Tr, "Düğün Mekanı");

        entry.merge(&patch);

        assert_eq!(entry.en.as_deref(), Some("Venue"));
        assert_eq!(entry.de.as_deref(), Some("Veranstaltungsort"));
        assert_eq!(entry.tr.as_deref(), Some("Düğün Mekanı"));
    }

    #[rstest]
    fn empty_entry_detection() {
        assert_that!(TranslationEntry::default().is_empty(), eq(true));
        assert_that!(
            TranslationEntry { de: Some(String::new()), ..TranslationEntry::default() }.is_empty(),
            eq(true)
        );
        assert_that!(TranslationEntry::invariant("x").is_empty(), eq(false));
    }

    #[rstest]
    fn patch_serializes_only_provided_fields() {
        let patch = TranslationPatch::new().with(Language::De, "Hallo");

        let json = serde_json::to_string(&patch).unwrap();

        assert_that!(json, eq(r#"{"de":"Hallo"}"#));
    }
}

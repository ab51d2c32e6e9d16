//! Per-language resource bundles with fallback languages.

use std::collections::HashMap;

use super::interpolate::interpolate;
use super::options::TranslateOptions;
use crate::ir::table::FlatTranslationTable;
use crate::types::Language;

/// The i18n resolution layer `t` consults first.
///
/// Lookup order for a key: the active language's bundle, then each fallback
/// language's bundle, then the caller's default value, then the key itself.
#[derive(Debug, Clone)]
pub struct ResourceLayer {
    /// Active language code, possibly unsupported
    language: String,
    /// Tried in order after the active language
    fallback_languages: Vec<Language>,
    /// Non-empty values per language
    bundles: HashMap<Language, HashMap<String, String>>,
}

impl ResourceLayer {
    /// Unsupported fallback codes are dropped.
    #[must_use]
    pub fn new(language: &str, fallback_languages: &[String]) -> Self {
        let fallback_languages = fallback_languages
            .iter()
            .filter_map(|code| match code.parse::<Language>() {
                Ok(language) => Some(language),
                Err(error) => {
                    tracing::warn!(%error, "Ignoring fallback language");
                    None
                }
            })
            .collect();

        Self { language: language.to_string(), fallback_languages, bundles: HashMap::new() }
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn change_language(&mut self, language: &str) {
        tracing::debug!(from = %self.language, to = language, "Changing resource layer language");
        self.language = language.to_string();
    }

    /// Rebuilds every bundle from `table`. Absent and empty values are left out.
    pub fn load_table(&mut self, table: &FlatTranslationTable) {
        let mut bundles: HashMap<Language, HashMap<String, String>> = HashMap::new();

        for (key, entry) in table {
            for language in Language::ALL {
                if let Some(value) = entry.get(language).filter(|value| !value.is_empty()) {
                    bundles.entry(language).or_default().insert(key.clone(), value.to_string());
                }
            }
        }

        self.bundles = bundles;
    }

    /// Raw value for `key` in `language`, walking the fallback languages.
    #[must_use]
    pub fn get(&self, language: &str, key: &str) -> Option<&str> {
        let active = language.parse::<Language>().ok();

        active
            .into_iter()
            .chain(self.fallback_languages.iter().copied())
            .find_map(|language| self.bundles.get(&language)?.get(key))
            .map(String::as_str)
    }

    /// Resolves `key` in the active language and interpolates the result.
    ///
    /// Returns the key itself when nothing matches and no default value is given.
    #[must_use]
    pub fn lookup(&self, key: &str, options: &TranslateOptions) -> String {
        let template = self.get(&self.language, key).or_else(|| options.fallback()).unwrap_or(key);
        interpolate(template, &options.variables).into_owned()
    }
}

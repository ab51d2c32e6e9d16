//! Resolution tiers behind the resource layer.
//!
//! Each tier returns `Option<&str>`; the accessor composes them with
//! `Option::or_else`, so the first tier producing a value wins.

use thiserror::Error;

use super::interpolate::replace_placeholders;
use super::options::TranslateOptions;
use crate::input::dictionary::{
    Dictionary,
    DictionaryNode,
    LeafValue,
};
use crate::types::Language;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("segment '{segment}' of '{key}' is not in the dictionary")]
    MissingSegment { key: String, segment: String },

    #[error("'{0}' addresses a branch, not a leaf")]
    NotALeaf(String),
}

/// Whether a layer result means "not really translated".
///
/// True when the layer echoed the key, produced nothing, or handed back the
/// caller's own fallback hint.
#[must_use]
pub fn is_unresolved(result: &str, key: &str, fallback: Option<&str>) -> bool {
    result == key || result.is_empty() || fallback.is_some_and(|hint| hint == result)
}

/// Walks the static dictionary along `key`.
///
/// # Errors
/// Returns error when a segment is missing or the path ends on a branch.
pub fn walk_to_leaf<'d>(
    dictionary: &'d Dictionary,
    key: &str,
    separator: &str,
) -> Result<&'d LeafValue, ResolutionError> {
    match dictionary.walk(key, separator) {
        Ok(DictionaryNode::Leaf(leaf)) => Ok(leaf),
        Ok(DictionaryNode::Branch(_)) => Err(ResolutionError::NotALeaf(key.to_string())),
        Err(segment) => Err(ResolutionError::MissingSegment {
            key: key.to_string(),
            segment: segment.to_string(),
        }),
    }
}

/// Value of a leaf for `language`: the language itself, then `de`, then `en`.
#[must_use]
pub fn select_from_leaf<'l>(leaf: &'l LeafValue, language: &str) -> Option<&'l str> {
    match leaf {
        LeafValue::Invariant(value) => Some(value.as_str()),
        LeafValue::Record(entry) => {
            let non_empty = |value: Option<&'l str>| value.filter(|v| !v.is_empty());

            non_empty(entry.get_code(language))
                .or_else(|| non_empty(entry.get(Language::De)))
                .or_else(|| non_empty(entry.get(Language::En)))
        }
    }
}

/// Dictionary safety net used after the resource layer failed.
///
/// Leaf value for the language, then the caller's fallback, then the key;
/// the chosen text gets literal `{{name}}` substitution.
#[must_use]
pub fn resolve_from_dictionary(
    dictionary: &Dictionary,
    separator: &str,
    key: &str,
    language: &str,
    options: &TranslateOptions,
) -> String {
    let from_dictionary = match walk_to_leaf(dictionary, key, separator) {
        Ok(leaf) => select_from_leaf(leaf, language),
        Err(error) => {
            tracing::warn!(key, %error, "Translation not found in dictionary");
            None
        }
    };

    let chosen = from_dictionary
        .or_else(|| options.fallback().filter(|fallback| !fallback.is_empty()))
        .unwrap_or(key);

    replace_placeholders(chosen, &options.variables)
}

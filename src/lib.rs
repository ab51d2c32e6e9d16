//! wedding-i18n
//!
//! Localization engine for the wedding-vendor marketplace: a nested static
//! dictionary, remote overrides from a `translations` table, and a `t`
//! accessor with a deterministic fallback chain.

pub mod config;
pub mod i18n;
pub mod input;
pub mod ir;
pub mod remote;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use i18n::{
    LanguageHandle,
    Localization,
    LocalizationError,
    TranslateOptions,
};
pub use types::{
    Language,
    TranslationEntry,
    TranslationPatch,
};

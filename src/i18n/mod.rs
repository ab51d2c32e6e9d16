//! Translation resolution: resource layer, fallback tiers and the localization scope.

/// Fallback tiers behind the resource layer
pub mod fallback;
/// Scoped and detached language access
pub mod handle;
/// i18next-style placeholder substitution
pub mod interpolate;
/// Current language with change notification
pub mod language;
/// Per-language bundles
pub mod layer;
/// Options accepted by `t`
pub mod options;
/// Localization scope
pub mod provider;

pub use handle::{
    DetachedLanguage,
    LanguageHandle,
};
pub use language::LanguageState;
pub use layer::ResourceLayer;
pub use options::TranslateOptions;
pub use provider::{
    Localization,
    LocalizationError,
};

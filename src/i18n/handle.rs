//! Language access for callers that may sit outside a localization scope.

use std::panic::Location;
use std::sync::{
    Arc,
    LazyLock,
    PoisonError,
    RwLock,
};

use super::layer::ResourceLayer;
use super::options::TranslateOptions;
use super::provider::Localization;
use crate::config::LocalizationSettings;
use crate::input::dictionary::Dictionary;
use crate::ir::table::flatten;

/// Process-wide layer used when no scope is active.
static SHARED_LAYER: LazyLock<Arc<RwLock<ResourceLayer>>> = LazyLock::new(|| {
    let settings = LocalizationSettings::default();
    let table = flatten(Dictionary::embedded(), &settings.key_separator);

    let mut layer = ResourceLayer::new(&settings.default_language, &settings.fallback_languages);
    layer.load_table(&table);
    Arc::new(RwLock::new(layer))
});

/// Degraded access that talks to a resource layer directly.
///
/// `t` is the layer's raw lookup; the dictionary safety net is not applied.
#[derive(Debug, Clone)]
pub struct DetachedLanguage {
    /// Layer read and written directly
    layer: Arc<RwLock<ResourceLayer>>,
}

impl DetachedLanguage {
    /// Handle on the process-wide layer built from the embedded dictionary.
    #[must_use]
    pub fn shared() -> Self {
        Self { layer: Arc::clone(&SHARED_LAYER) }
    }

    #[must_use]
    pub fn new(layer: ResourceLayer) -> Self {
        Self { layer: Arc::new(RwLock::new(layer)) }
    }

    #[must_use]
    pub fn language(&self) -> String {
        self.layer.read().unwrap_or_else(PoisonError::into_inner).language().to_string()
    }

    pub fn change_language(&self, language: &str) {
        self.layer.write().unwrap_or_else(PoisonError::into_inner).change_language(language);
    }

    #[must_use]
    pub fn t(&self, key: &str) -> String {
        self.t_with(key, TranslateOptions::new())
    }

    #[must_use]
    pub fn t_with(&self, key: &str, options: impl Into<TranslateOptions>) -> String {
        self.layer.read().unwrap_or_else(PoisonError::into_inner).lookup(key, &options.into())
    }
}

/// What a consumer gets when it asks for the current language.
#[derive(Debug, Clone)]
pub enum LanguageHandle {
    Scoped(Localization),
    Detached(DetachedLanguage),
}

impl LanguageHandle {
    /// Handle for `scope`, or a detached one when there is none.
    ///
    /// Never fails. Detached access is logged with the calling location.
    #[must_use]
    #[track_caller]
    pub fn resolve(scope: Option<&Localization>) -> Self {
        match scope {
            Some(localization) => Self::Scoped(localization.clone()),
            None => {
                let caller = Location::caller();
                tracing::warn!(
                    caller = %caller,
                    "Language accessed outside a localization scope; using detached resource layer"
                );
                Self::Detached(DetachedLanguage::shared())
            }
        }
    }

    #[must_use]
    pub const fn is_detached(&self) -> bool {
        matches!(self, Self::Detached(_))
    }

    #[must_use]
    pub fn language(&self) -> String {
        match self {
            Self::Scoped(localization) => localization.language(),
            Self::Detached(detached) => detached.language(),
        }
    }

    pub fn change_language(&self, language: &str) {
        match self {
            Self::Scoped(localization) => localization.change_language(language),
            Self::Detached(detached) => detached.change_language(language),
        }
    }

    #[must_use]
    pub fn t(&self, key: &str) -> String {
        self.t_with(key, TranslateOptions::new())
    }

    #[must_use]
    pub fn t_with(&self, key: &str, options: impl Into<TranslateOptions>) -> String {
        match self {
            Self::Scoped(localization) => localization.t_with(key, options),
            Self::Detached(detached) => detached.t_with(key, options),
        }
    }
}

//! Localization context shared by everything that renders text.

use std::collections::{
    HashMap,
    HashSet,
};
use std::sync::{
    Arc,
    PoisonError,
    RwLock,
    RwLockReadGuard,
    RwLockWriteGuard,
};

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::fallback::{
    is_unresolved,
    resolve_from_dictionary,
};
use super::language::LanguageState;
use super::layer::ResourceLayer;
use super::options::TranslateOptions;
use crate::config::LocalizationSettings;
use crate::input::dictionary::{
    Dictionary,
    DictionaryError,
};
use crate::ir::table::{
    FlatTranslationTable,
    flatten,
    merge,
};
use crate::remote::{
    RestTranslationStore,
    StoreError,
    TranslationStore,
};
use crate::types::{
    TranslationEntry,
    TranslationPatch,
};

#[derive(Error, Debug)]
pub enum LocalizationError {
    #[error("Translation store is not configured")]
    StoreUnavailable,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
}

/// Merged table plus local writes not yet seen in a fetch.
#[derive(Debug, Default)]
struct TableState {
    /// Static table with fetched rows and pending writes applied
    merged: FlatTranslationTable,
    /// Local writes awaiting confirmation by a fetch
    pending: HashMap<String, TranslationEntry>,
}

/// Localization scope: dictionary, merged overrides, resource layer and language.
///
/// Clones share state. Independent scopes come from separate constructor calls.
///
/// # ロック順序
///
/// 両方のロックを取得する場合は `table` → `layer` の順を厳守すること。
#[derive(Clone)]
pub struct Localization {
    /// Static dictionary; also the safety net for `t`
    dictionary: Arc<Dictionary>,
    /// Key segment separator
    separator: Arc<str>,
    /// Merged table state
    table: Arc<RwLock<TableState>>,
    /// Bundles `t` consults first
    layer: Arc<RwLock<ResourceLayer>>,
    /// Current language
    language: LanguageState,
    /// Remote override store, if configured
    store: Option<Arc<dyn TranslationStore>>,
}

impl std::fmt::Debug for Localization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Localization")
            .field("separator", &self.separator)
            .field("language", &self.language.current())
            .field("dictionary", &"<Dictionary>")
            .field("table", &"<FlatTranslationTable>")
            .field("store", &self.store.as_ref().map(|_| "<TranslationStore>"))
            .finish_non_exhaustive()
    }
}

/// Read guard, recovering from poisoning.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write guard, recovering from poisoning.
fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl Localization {
    /// Local-only scope over `dictionary`. Attach a store with [`Localization::with_store`].
    #[must_use]
    pub fn new(dictionary: Arc<Dictionary>, settings: &LocalizationSettings) -> Self {
        let merged = flatten(&dictionary, &settings.key_separator);

        let mut layer = ResourceLayer::new(&settings.default_language, &settings.fallback_languages);
        layer.load_table(&merged);
        let language = LanguageState::new(layer.language());

        Self {
            dictionary,
            separator: Arc::from(settings.key_separator.as_str()),
            table: Arc::new(RwLock::new(TableState { merged, pending: HashMap::new() })),
            layer: Arc::new(RwLock::new(layer)),
            language,
            store: None,
        }
    }

    /// Builds a scope from settings: dictionary file or the embedded one, and a
    /// REST store when `remote` is configured.
    ///
    /// # Errors
    /// Returns error if the dictionary file cannot be loaded or the store URL is invalid.
    pub fn from_settings(settings: &LocalizationSettings) -> Result<Self, LocalizationError> {
        let dictionary = match &settings.dictionary_path {
            Some(path) => Dictionary::load_file(path)?,
            None => Dictionary::embedded().clone(),
        };

        let localization = Self::new(Arc::new(dictionary), settings);
        match &settings.remote {
            Some(remote) => Ok(localization.with_store(RestTranslationStore::new(remote)?)),
            None => Ok(localization),
        }
    }

    #[must_use]
    pub fn with_store(mut self, store: impl TranslationStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    #[must_use]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Runs one [`Localization::refresh`] in the background.
    ///
    /// Dropping the handle does not cancel the fetch; it still applies its result.
    #[must_use = "await the handle to wait for the initial fetch"]
    pub fn mount(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move { this.refresh().await })
    }

    /// Re-fetches remote overrides and rebuilds the merged table.
    ///
    /// Never fails: without a store, on error, or with zero rows the current
    /// table stays as it is.
    pub async fn refresh(&self) {
        let Some(store) = &self.store else {
            tracing::warn!("Translation store is not configured; using the local dictionary only");
            return;
        };

        let rows = match store.fetch_all().await {
            Ok(rows) => rows,
            Err(error) => {
                tracing::error!(%error, "Failed to fetch translation overrides; keeping current table");
                return;
            }
        };

        if rows.is_empty() {
            tracing::debug!("No translation overrides returned");
            return;
        }

        let fetched = merge(&flatten(&self.dictionary, &self.separator), &rows);
        let fetched_keys: HashSet<&str> = rows.iter().map(|row| row.key.as_str()).collect();

        let mut state = write(&self.table);
        // 取得結果に含まれるキーはローカル変更が確定または上書きされた
        state.pending.retain(|key, _| !fetched_keys.contains(key.as_str()));

        let mut merged = fetched;
        for (key, entry) in &state.pending {
            merged.insert(key.clone(), entry.clone());
        }
        state.merged = merged;

        write(&self.layer).load_table(&state.merged);
        tracing::debug!(rows = rows.len(), pending = state.pending.len(), "Applied translation overrides");
    }

    /// Saves `patch` for `key` remotely, then applies it locally.
    ///
    /// Only the provided fields change; the local record stays pending until a
    /// fetch returns the key.
    ///
    /// # Errors
    /// Returns error if no store is configured or the store rejects the write.
    pub async fn update_translation(
        &self,
        key: &str,
        patch: &TranslationPatch,
    ) -> Result<(), LocalizationError> {
        let Some(store) = &self.store else {
            tracing::error!(key, "Cannot save translation: store is not configured");
            return Err(LocalizationError::StoreUnavailable);
        };

        if let Err(error) = store.upsert(key, patch).await {
            tracing::error!(key, %error, "Failed to save translation");
            return Err(error.into());
        }

        let mut state = write(&self.table);
        let mut entry = state.merged.get(key).cloned().unwrap_or_default();
        entry.merge(patch);
        state.pending.insert(key.to_string(), entry.clone());
        state.merged.insert(key.to_string(), entry);

        write(&self.layer).load_table(&state.merged);
        Ok(())
    }

    /// Snapshot of the merged table.
    #[must_use]
    pub fn table(&self) -> FlatTranslationTable {
        read(&self.table).merged.clone()
    }

    #[must_use]
    pub fn entry(&self, key: &str) -> Option<TranslationEntry> {
        read(&self.table).merged.get(key).cloned()
    }

    /// Number of local writes not yet confirmed by a fetch.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        read(&self.table).pending.len()
    }

    #[must_use]
    pub fn language(&self) -> String {
        self.language.current()
    }

    /// Switches the resource layer and the language state, then rebuilds bundles.
    pub fn change_language(&self, language: &str) {
        {
            let state = read(&self.table);
            let mut layer = write(&self.layer);
            layer.change_language(language);
            layer.load_table(&state.merged);
        }

        if self.language.set(language) {
            tracing::debug!(language, "Language changed");
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.language.subscribe()
    }

    #[must_use]
    pub fn t(&self, key: &str) -> String {
        self.t_with(key, TranslateOptions::new())
    }

    /// Resolves `key` for the current language.
    ///
    /// The resource layer answers first. If it echoes the key, returns nothing,
    /// or returns the caller's own fallback, the static dictionary is walked
    /// instead, then the fallback, then the key.
    #[must_use]
    pub fn t_with(&self, key: &str, options: impl Into<TranslateOptions>) -> String {
        let options = options.into();
        // 両ティアで同じ言語を使うため、言語はレイヤーの同じガードから読む
        let (resolved, language) = {
            let layer = read(&self.layer);
            (layer.lookup(key, &options), layer.language().to_string())
        };

        if !is_unresolved(&resolved, key, options.fallback()) {
            return resolved;
        }

        resolve_from_dictionary(&self.dictionary, &self.separator, key, &language, &options)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::remote::{
        MemoryTranslationStore,
        RemoteOverrideRow,
    };
    use crate::test_utils::{
        FailingStore,
        remote_row,
        venue_dictionary,
    };
    use crate::types::Language;

    fn localization(language: &str) -> Localization {
        let settings =
            LocalizationSettings { default_language: language.to_string(), ..LocalizationSettings::default() };
        Localization::new(Arc::new(venue_dictionary()), &settings)
    }

    #[rstest]
    #[case::tr("tr", "Mekan")]
    #[case::de("de", "Veranstaltungsort")]
    #[case::en("en", "Venue")]
    #[case::unsupported("fr", "Veranstaltungsort")]
    fn t_resolves_static_dictionary(#[case] language: &str, #[case] expected: &str) {
        assert_that!(localization(language).t("services.venue"), eq(expected));
    }

    #[rstest]
    fn t_unknown_key_returns_key_or_fallback() {
        let localization = localization("de");

        assert_that!(localization.t("missing.key"), eq("missing.key"));
        assert_that!(localization.t_with("missing.key", "Fallback"), eq("Fallback"));
    }

    #[rstest]
    fn t_interpolates_default_value() {
        let options = TranslateOptions::new().default_value("Hello {{name}}").var("name", "Ayşe");

        assert_that!(localization("de").t_with("greet", options), eq("Hello Ayşe"));
    }

    #[rstest]
    fn t_interpolates_found_value() {
        let localization = localization("tr");

        assert_that!(
            localization.t_with("vendor.reviews", TranslateOptions::new().var("count", 4)),
            eq("4 yorum")
        );
    }

    #[rstest]
    fn t_prefers_translation_over_hint() {
        assert_that!(localization("en").t_with("services.venue", "Ort"), eq("Venue"));
    }

    #[rstest]
    fn new_scope_is_local_only() {
        let localization = localization("de");

        assert_that!(localization.language(), eq("de"));
        assert_that!(localization.pending_count(), eq(0));
        assert_eq!(
            localization.entry("services.venue"),
            Some(TranslationEntry::new("Venue", "Veranstaltungsort", "Mekan"))
        );
    }

    #[rstest]
    fn change_language_updates_state_and_layer() {
        let localization = localization("de");
        let receiver = localization.subscribe();

        localization.change_language("tr");

        assert_that!(localization.language(), eq("tr"));
        assert_that!(receiver.has_changed().unwrap(), eq(true));
        assert_that!(localization.t("services.venue"), eq("Mekan"));
    }

    #[rstest]
    fn clones_share_language() {
        let localization = localization("de");
        let clone = localization.clone();

        clone.change_language("en");

        assert_that!(localization.t("services.venue"), eq("Venue"));
    }

    #[rstest]
    fn safety_net_uses_layer_language() {
        let localization = localization("de");
        {
            // レイヤーだけが切り替わった状態
            let mut layer = write(&localization.layer);
            layer.change_language("en");
            layer.load_table(&FlatTranslationTable::new());
        }

        assert_that!(localization.language(), eq("de"));
        assert_that!(localization.t("services.venue"), eq("Venue"));
    }

    #[rstest]
    fn record_with_extra_members_resolves() {
        let json = serde_json::json!({
            "x": { "en": "Hello", "de": "Hallo", "tr": "Merhaba", "fr": "Bonjour" },
            "menu": { "en": "Menu", "note": "shown in the header" }
        });
        let settings =
            LocalizationSettings { default_language: "tr".to_string(), ..LocalizationSettings::default() };
        let localization = Localization::new(Arc::new(Dictionary::from_json(&json)), &settings);

        assert_that!(localization.t("x"), eq("Merhaba"));
        assert_that!(localization.t("menu"), eq("Menu"));
        assert_that!(localization.table().contains_key("x.fr"), eq(false));
    }

    #[tokio::test]
    async fn refresh_without_store_keeps_local_table() {
        let localization = localization("tr");
        let before = localization.table();

        localization.refresh().await;

        assert_eq!(localization.table(), before);
        assert_that!(localization.t("services.venue"), eq("Mekan"));
    }

    #[tokio::test]
    async fn refresh_failure_keeps_last_known_good() {
        let localization = localization("tr").with_store(FailingStore);
        let before = localization.table();

        localization.refresh().await;

        assert_eq!(localization.table(), before);
        assert_that!(localization.t("services.venue"), eq("Mekan"));
        assert_that!(localization.t("missing.key"), eq("missing.key"));
    }

    #[tokio::test]
    async fn refresh_with_empty_store_keeps_table() {
        let localization = localization("de").with_store(MemoryTranslationStore::new());
        let before = localization.table();

        localization.refresh().await;

        assert_eq!(localization.table(), before);
    }

    #[tokio::test]
    async fn refresh_merges_remote_rows() {
        let store = MemoryTranslationStore::with_rows([
            remote_row("services.venue", None, None, Some("Düğün Mekanı")),
            remote_row("promo.banner", Some("Sale"), Some("Angebot"), Some("İndirim")),
        ]);
        let localization = localization("tr").with_store(store);

        localization.refresh().await;

        assert_that!(localization.t("services.venue"), eq("Düğün Mekanı"));
        assert_that!(localization.t("promo.banner"), eq("İndirim"));
        assert_that!(localization.t("nav.home"), eq("Ana Sayfa"));
    }

    #[tokio::test]
    async fn partial_override_falls_back_to_static_value() {
        let store = MemoryTranslationStore::with_rows([remote_row(
            "services.venue",
            None,
            None,
            Some("Düğün Mekanı"),
        )]);
        let localization = localization("de").with_store(store);
        localization.refresh().await;

        assert_that!(localization.t("services.venue"), eq("Veranstaltungsort"));

        localization.change_language("en");
        assert_that!(localization.t("services.venue"), eq("Venue"));

        localization.change_language("tr");
        assert_that!(localization.t("services.venue"), eq("Düğün Mekanı"));
    }

    #[tokio::test]
    async fn partial_override_prefers_own_fields_over_static() {
        let store = MemoryTranslationStore::with_rows([remote_row(
            "services.venue",
            Some("Wedding venue"),
            None,
            Some("Düğün Mekanı"),
        )]);
        let localization = localization("de").with_store(store);
        localization.refresh().await;

        assert_that!(localization.t("services.venue"), eq("Wedding venue"));
    }

    #[tokio::test]
    async fn remote_deletion_falls_back_to_static_value() {
        let store = MemoryTranslationStore::with_rows([
            remote_row("services.venue", Some("Wedding venue"), Some("Hochzeitslocation"), None),
            remote_row("nav.home", Some("Start"), None, None),
        ]);
        let localization = localization("de").with_store(store.clone());
        localization.refresh().await;
        assert_that!(localization.t("services.venue"), eq("Hochzeitslocation"));

        store.remove("services.venue").await;
        localization.refresh().await;

        assert_that!(localization.t("services.venue"), eq("Veranstaltungsort"));
    }

    #[tokio::test]
    async fn update_without_store_is_an_error() {
        let localization = localization("de");

        let result = localization
            .update_translation("services.venue", &TranslationPatch::new().with(Language::De, "Ort"))
            .await;

        assert_that!(matches!(result, Err(LocalizationError::StoreUnavailable)), eq(true));
        assert_that!(localization.t("services.venue"), eq("Veranstaltungsort"));
    }

    #[tokio::test]
    async fn update_failure_is_surfaced_and_state_untouched() {
        let localization = localization("de").with_store(FailingStore);

        let result = localization
            .update_translation("services.venue", &TranslationPatch::new().with(Language::De, "Ort"))
            .await;

        assert_that!(matches!(result, Err(LocalizationError::Store(_))), eq(true));
        assert_that!(localization.pending_count(), eq(0));
        assert_that!(localization.t("services.venue"), eq("Veranstaltungsort"));
    }

    #[tokio::test]
    async fn update_merges_patch_onto_existing_record() {
        let store = MemoryTranslationStore::new();
        let localization = localization("tr").with_store(store.clone());

        localization
            .update_translation("services.venue", &TranslationPatch::new().with(Language::Tr, "Salon"))
            .await
            .unwrap();

        assert_eq!(
            localization.entry("services.venue"),
            Some(TranslationEntry::new("Venue", "Veranstaltungsort", "Salon"))
        );
        assert_that!(localization.t("services.venue"), eq("Salon"));
        assert_that!(localization.pending_count(), eq(1));
        assert_eq!(
            store.rows().await,
            vec![RemoteOverrideRow {
                key: "services.venue".to_string(),
                en: None,
                de: None,
                tr: Some("Salon".to_string()),
                updated_at: None,
            }]
        );
    }

    #[tokio::test]
    async fn pending_override_survives_fetch_without_key() {
        let store = MemoryTranslationStore::with_rows([remote_row("nav.home", None, Some("Start"), None)]);
        let localization = localization("de").with_store(store.clone());

        localization
            .update_translation("promo.banner", &TranslationPatch::new().with(Language::De, "Angebot"))
            .await
            .unwrap();
        // fetch that has not caught up with the write yet
        store.remove("promo.banner").await;
        localization.refresh().await;

        assert_that!(localization.pending_count(), eq(1));
        assert_that!(localization.t("promo.banner"), eq("Angebot"));
        assert_that!(localization.t("nav.home"), eq("Start"));
    }

    #[tokio::test]
    async fn fetch_confirming_key_clears_pending_override() {
        let store = MemoryTranslationStore::new();
        let localization = localization("de").with_store(store.clone());

        localization
            .update_translation("promo.banner", &TranslationPatch::new().with(Language::De, "Angebot"))
            .await
            .unwrap();
        store
            .upsert("promo.banner", &TranslationPatch::new().with(Language::De, "Sonderangebot"))
            .await
            .unwrap();
        localization.refresh().await;

        assert_that!(localization.pending_count(), eq(0));
        assert_that!(localization.t("promo.banner"), eq("Sonderangebot"));
    }

    #[tokio::test]
    async fn mount_fetches_in_background() {
        let store =
            MemoryTranslationStore::with_rows([remote_row("services.venue", None, None, Some("Salon"))]);
        let localization = localization("tr").with_store(store);

        localization.mount().await.unwrap();

        assert_that!(localization.t("services.venue"), eq("Salon"));
    }

    #[rstest]
    fn separate_scopes_are_isolated() {
        let first = localization("de");
        let second = localization("de");

        first.change_language("tr");

        assert_that!(second.language(), eq("de"));
        assert_that!(second.t("services.venue"), eq("Veranstaltungsort"));
    }

    #[rstest]
    fn custom_separator_applies_to_every_tier() {
        let settings = LocalizationSettings {
            key_separator: ":".to_string(),
            default_language: "tr".to_string(),
            ..LocalizationSettings::default()
        };
        let localization = Localization::new(Arc::new(venue_dictionary()), &settings);

        assert_that!(localization.t("services:venue"), eq("Mekan"));
        assert_that!(localization.t("services.venue"), eq("services.venue"));
    }
}

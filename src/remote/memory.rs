use std::collections::BTreeMap;
use std::sync::Arc;

use futures::FutureExt as _;
use futures::future::BoxFuture;
use tokio::sync::Mutex;

use super::types::{
    RemoteOverrideRow,
    StoreError,
    TranslationStore,
};
use crate::types::{
    Language,
    TranslationPatch,
};

/// Store kept in process memory. Clones share the same rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryTranslationStore {
    /// Rows by key
    rows: Arc<Mutex<BTreeMap<String, RemoteOverrideRow>>>,
}

impl MemoryTranslationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rows(rows: impl IntoIterator<Item = RemoteOverrideRow>) -> Self {
        let rows = rows.into_iter().map(|row| (row.key.clone(), row)).collect();
        Self { rows: Arc::new(Mutex::new(rows)) }
    }

    /// Snapshot of the stored rows, ordered by key.
    pub async fn rows(&self) -> Vec<RemoteOverrideRow> {
        self.rows.lock().await.values().cloned().collect()
    }

    pub async fn remove(&self, key: &str) -> Option<RemoteOverrideRow> {
        self.rows.lock().await.remove(key)
    }
}

impl TranslationStore for MemoryTranslationStore {
    fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<RemoteOverrideRow>, StoreError>> {
        async move { Ok(self.rows().await) }.boxed()
    }

    fn upsert<'a>(
        &'a self,
        key: &'a str,
        patch: &'a TranslationPatch,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        async move {
            let mut rows = self.rows.lock().await;
            let row = rows.entry(key.to_string()).or_insert_with(|| RemoteOverrideRow {
                key: key.to_string(),
                en: None,
                de: None,
                tr: None,
                updated_at: None,
            });
            for language in Language::ALL {
                if let Some(value) = patch.get(language) {
                    let field = match language {
                        Language::En => &mut row.en,
                        Language::De => &mut row.de,
                        Language::Tr => &mut row.tr,
                    };
                    *field = Some(value.to_string());
                }
            }
            Ok(())
        }
        .boxed()
    }
}

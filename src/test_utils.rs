//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use futures::FutureExt as _;
use futures::future::BoxFuture;

use crate::input::dictionary::Dictionary;
use crate::remote::{
    RemoteOverrideRow,
    StoreError,
    TranslationStore,
};
use crate::types::{
    TranslationEntry,
    TranslationPatch,
};

/// テスト用の小さな辞書を作成する
///
/// `services.venue` / `nav.home` / `vendor.reviews` / `brand` を含む。
pub(crate) fn venue_dictionary() -> Dictionary {
    Dictionary::new()
        .with("services.venue", TranslationEntry::new("Venue", "Veranstaltungsort", "Mekan"))
        .with("nav.home", TranslationEntry::new("Home", "Startseite", "Ana Sayfa"))
        .with(
            "vendor.reviews",
            TranslationEntry::new("{{count}} reviews", "{{count}} Bewertungen", "{{count}} yorum"),
        )
        .with("brand", "WeddingHub")
}

/// テスト用のリモート行を作成する
pub(crate) fn remote_row(
    key: &str,
    en: Option<&str>,
    de: Option<&str>,
    tr: Option<&str>,
) -> RemoteOverrideRow {
    RemoteOverrideRow {
        key: key.to_string(),
        en: en.map(str::to_string),
        de: de.map(str::to_string),
        tr: tr.map(str::to_string),
        updated_at: None,
    }
}

/// すべての操作が失敗するストア
#[derive(Debug, Clone, Copy)]
pub(crate) struct FailingStore;

impl TranslationStore for FailingStore {
    fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<RemoteOverrideRow>, StoreError>> {
        async { Err(StoreError::Backend("connection refused".to_string())) }.boxed()
    }

    fn upsert<'a>(
        &'a self,
        _key: &'a str,
        _patch: &'a TranslationPatch,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        async { Err(StoreError::Backend("permission denied".to_string())) }.boxed()
    }
}

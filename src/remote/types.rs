use futures::future::BoxFuture;
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::{
    TranslationEntry,
    TranslationPatch,
};

/// One row of the remote `translations` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteOverrideRow {
    pub key: String,
    #[serde(default)]
    pub en: Option<String>,
    #[serde(default)]
    pub de: Option<String>,
    #[serde(default)]
    pub tr: Option<String>,
    /// Kept verbatim; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl RemoteOverrideRow {
    #[must_use]
    pub fn entry(&self) -> TranslationEntry {
        TranslationEntry { en: self.en.clone(), de: self.de.clone(), tr: self.tr.clone() }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid store URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request to translation store failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Translation store responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode translation rows: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Translation store error: {0}")]
    Backend(String),
}

/// Read-all and upsert-one over the remote `translations` table.
pub trait TranslationStore: Send + Sync {
    /// Fetches every row, unfiltered.
    fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<RemoteOverrideRow>, StoreError>>;

    /// Inserts or updates the row for `key` with the fields `patch` provides.
    fn upsert<'a>(
        &'a self,
        key: &'a str,
        patch: &'a TranslationPatch,
    ) -> BoxFuture<'a, Result<(), StoreError>>;
}

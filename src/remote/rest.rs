use futures::FutureExt as _;
use futures::future::BoxFuture;
use reqwest::header::{
    AUTHORIZATION,
    CONTENT_TYPE,
    HeaderMap,
    HeaderValue,
};
use serde::Serialize;
use url::Url;

use super::types::{
    RemoteOverrideRow,
    StoreError,
    TranslationStore,
};
use crate::config::RemoteConfig;
use crate::types::TranslationPatch;

/// Body of an upsert request: the key plus only the provided fields.
#[derive(Serialize)]
struct UpsertRow<'a> {
    key: &'a str,
    #[serde(flatten)]
    patch: &'a TranslationPatch,
}

/// Store backed by a PostgREST-compatible endpoint (`{url}/rest/v1/{table}`).
#[derive(Debug, Clone)]
pub struct RestTranslationStore {
    /// Shared HTTP client
    client: reqwest::Client,
    /// `{url}/rest/v1/{table}`
    endpoint: Url,
    /// Sent as `apikey` and bearer token
    api_key: String,
}

impl RestTranslationStore {
    /// # Errors
    /// Returns error if the URL is malformed or the HTTP client cannot be built.
    pub fn new(config: &RemoteConfig) -> Result<Self, StoreError> {
        let base = config.url.trim_end_matches('/');
        let endpoint = Url::parse(&format!("{base}/rest/v1/{}", config.table))?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("wedding-i18n/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, endpoint, api_key: config.api_key.clone() })
    }

    /// URL used to read every row.
    #[must_use]
    pub fn fetch_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("select", "*");
        url
    }

    /// URL used to upsert one row, conflicting on `key`.
    #[must_use]
    pub fn upsert_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("on_conflict", "key");
        url
    }

    /// `apikey` and `Authorization` headers.
    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", value);
        }
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    /// Turns non-2xx responses into [`StoreError::Status`].
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status { status: status.as_u16(), body })
    }

    /// `GET {endpoint}?select=*`
    async fn fetch_rows(&self) -> Result<Vec<RemoteOverrideRow>, StoreError> {
        tracing::debug!(url = %self.fetch_url(), "Fetching translation overrides");

        let response =
            self.client.get(self.fetch_url()).headers(self.auth_headers()).send().await?;
        let body = Self::check_status(response).await?.bytes().await?;

        Ok(serde_json::from_slice(&body)?)
    }

    /// `POST {endpoint}?on_conflict=key` merging duplicates.
    async fn upsert_row(&self, key: &str, patch: &TranslationPatch) -> Result<(), StoreError> {
        tracing::debug!(key, "Upserting translation");

        let body = serde_json::to_vec(&UpsertRow { key, patch })?;
        let response = self
            .client
            .post(self.upsert_url())
            .headers(self.auth_headers())
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .body(body)
            .send()
            .await?;
        Self::check_status(response).await?;

        Ok(())
    }
}

impl TranslationStore for RestTranslationStore {
    fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<RemoteOverrideRow>, StoreError>> {
        self.fetch_rows().boxed()
    }

    fn upsert<'a>(
        &'a self,
        key: &'a str,
        patch: &'a TranslationPatch,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        self.upsert_row(key, patch).boxed()
    }
}

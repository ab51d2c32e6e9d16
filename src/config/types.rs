use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::{
    DEFAULT_LANGUAGE,
    Language,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "fallbackLanguages[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// バリデーションエラーを箇条書きに整形する
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalizationSettings {
    /// Language active before anyone calls `change_language`.
    pub default_language: String,

    /// Languages the resource layer tries, in order, when the active one has no value.
    pub fallback_languages: Vec<String>,

    pub key_separator: String,

    /// JSON dictionary replacing the embedded one.
    pub dictionary_path: Option<PathBuf>,

    /// Remote override store. Local-only operation when unset.
    pub remote: Option<RemoteConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteConfig {
    /// Project base URL, e.g. `https://project.example.co`.
    pub url: String,
    pub api_key: String,
    pub table: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self { url: String::new(), api_key: String::new(), table: "translations".to_string() }
    }
}

impl LocalizationSettings {
    /// # Errors
    /// - Required field is empty
    /// - Unsupported fallback language
    /// - Malformed remote URL
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if self.default_language.trim().is_empty() {
            errors.push(ValidationError::new(
                "defaultLanguage",
                "The default language cannot be empty. Example: \"de\"",
            ));
        }

        if self.fallback_languages.is_empty() {
            errors.push(ValidationError::new(
                "fallbackLanguages",
                "At least one fallback language is required. Example: [\"de\", \"en\"]",
            ));
        }

        for (index, code) in self.fallback_languages.iter().enumerate() {
            if code.parse::<Language>().is_err() {
                errors.push(ValidationError::new(
                    format!("fallbackLanguages[{index}]"),
                    format!("Unsupported language '{code}'. Supported: en, de, tr"),
                ));
            }
        }

        if let Some(remote) = &self.remote {
            validate_remote(remote, &mut errors);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// リモート設定を検証する
fn validate_remote(remote: &RemoteConfig, errors: &mut Vec<ValidationError>) {
    if remote.url.is_empty() {
        errors.push(ValidationError::new(
            "remote.url",
            "The URL cannot be empty. Please specify the project URL, or remove the 'remote' section",
        ));
    } else {
        match url::Url::parse(&remote.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::new(
                "remote.url",
                format!("Unsupported URL scheme '{}'. Use http or https", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new(
                "remote.url",
                format!("Invalid URL '{}': {e}", remote.url),
            )),
        }
    }

    if remote.table.is_empty() {
        errors.push(ValidationError::new(
            "remote.table",
            "The table name cannot be empty. Example: \"translations\"",
        ));
    }
}

impl Default for LocalizationSettings {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            fallback_languages: vec![Language::De.code().to_string(), Language::En.code().to_string()],
            key_separator: ".".to_string(),
            dictionary_path: None,
            remote: None,
        }
    }
}

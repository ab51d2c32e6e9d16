//! 設定ファイルの読み込み関数

use std::path::Path;

use super::{
    ConfigError,
    LocalizationSettings,
    RemoteConfig,
};

/// 設定ファイル名
pub(super) const CONFIG_FILE_NAME: &str = ".wedding-i18n.json";

/// リモートストア URL を上書きする環境変数
pub(super) const REMOTE_URL_ENV: &str = "WEDDING_I18N_REMOTE_URL";

/// リモートストア API キーを上書きする環境変数
pub(super) const REMOTE_KEY_ENV: &str = "WEDDING_I18N_REMOTE_KEY";

/// ワークスペースから設定を読み込む
///
/// `.wedding-i18n.json` ファイルを探して読み込む
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
/// - `Err(ConfigError)`: ファイル読み込みまたはパースエラー
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<LocalizationSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let mut settings: LocalizationSettings = serde_json::from_str(&content)?;

    // 相対パスはワークスペース基準で解決
    if let Some(path) = &settings.dictionary_path
        && path.is_relative()
    {
        settings.dictionary_path = Some(workspace_root.join(path));
    }

    Ok(Some(settings))
}

/// 環境変数でリモート設定を上書きする
///
/// URL が設定されていてリモート設定がない場合は、新しく作成する。
pub(super) fn apply_env_overrides(
    settings: &mut LocalizationSettings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    let url = lookup(REMOTE_URL_ENV).filter(|value| !value.is_empty());
    let api_key = lookup(REMOTE_KEY_ENV).filter(|value| !value.is_empty());

    if settings.remote.is_none() && url.is_some() {
        settings.remote = Some(RemoteConfig::default());
    }

    if let Some(remote) = settings.remote.as_mut() {
        if let Some(url) = url {
            tracing::debug!("Remote URL overridden by {}", REMOTE_URL_ENV);
            remote.url = url;
        }
        if let Some(api_key) = api_key {
            remote.api_key = api_key;
        }
    }
}

//! 設定管理を行うモジュール

use std::path::Path;

use super::{
    ConfigError,
    LocalizationSettings,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: LocalizationSettings,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: LocalizationSettings::default() }
    }

    /// 設定を読み込む
    ///
    /// 設定ファイル → 環境変数の順に適用し、最後にバリデーションする。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, workspace_root: Option<&Path>) -> Result<(), ConfigError> {
        self.load_settings_with_env(workspace_root, |name| std::env::var(name).ok())
    }

    /// 環境変数の参照方法を指定して設定を読み込む
    ///
    /// # Errors
    /// [`ConfigManager::load_settings`] と同じ
    pub fn load_settings_with_env(
        &mut self,
        workspace_root: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

        let mut settings = if let Some(root) = workspace_root {
            loader::load_from_workspace(root)?.map_or_else(LocalizationSettings::default, |ws| {
                tracing::debug!("Loaded workspace settings: {:?}", ws);
                ws
            })
        } else {
            LocalizationSettings::default()
        };

        loader::apply_env_overrides(&mut settings, lookup);

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        tracing::debug!("Settings loaded successfully");

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &LocalizationSettings {
        &self.current_settings
    }
}

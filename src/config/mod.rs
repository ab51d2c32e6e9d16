//! Settings: `.wedding-i18n.json` plus environment overrides.
/// 設定ファイルの読み込み
mod loader;
/// 設定管理
mod manager;
/// 設定の型定義
mod types;

pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    LocalizationSettings,
    RemoteConfig,
    ValidationError,
};

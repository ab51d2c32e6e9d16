//! Current-language state with change notification.

use std::sync::Arc;

use tokio::sync::watch;

use crate::types::DEFAULT_LANGUAGE;

/// Active language code shared by every clone.
///
/// Codes are kept as given, so unsupported languages (`fr`) are representable
/// and resolve through the fallback chain.
#[derive(Debug, Clone)]
pub struct LanguageState {
    /// Holds the value; receivers are handed out by `subscribe`
    sender: Arc<watch::Sender<String>>,
}

impl LanguageState {
    /// An empty `initial` falls back to [`DEFAULT_LANGUAGE`].
    #[must_use]
    pub fn new(initial: &str) -> Self {
        let initial = if initial.trim().is_empty() { DEFAULT_LANGUAGE } else { initial };
        let (sender, _) = watch::channel(initial.to_string());
        Self { sender: Arc::new(sender) }
    }

    #[must_use]
    pub fn current(&self) -> String {
        self.sender.borrow().clone()
    }

    /// Sets the language. Returns `true` and notifies subscribers if it changed.
    pub fn set(&self, language: &str) -> bool {
        self.sender.send_if_modified(|current| {
            if current == language {
                return false;
            }
            language.clone_into(current);
            true
        })
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.sender.subscribe()
    }
}

impl Default for LanguageState {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

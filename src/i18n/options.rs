//! Options accepted by `t`.

use std::collections::BTreeMap;

/// Fallback text and interpolation variables for one lookup.
///
/// A plain string converts into options carrying only a default value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    pub default_value: Option<String>,
    pub variables: BTreeMap<String, String>,
}

impl TranslateOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn var(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.variables.insert(name.into(), value.to_string());
        self
    }

    /// The caller's hint, if any.
    #[must_use]
    pub fn fallback(&self) -> Option<&str> {
        self.default_value.as_deref()
    }
}

impl From<&str> for TranslateOptions {
    fn from(fallback: &str) -> Self {
        Self::new().default_value(fallback)
    }
}

impl From<String> for TranslateOptions {
    fn from(fallback: String) -> Self {
        Self::new().default_value(fallback)
    }
}

impl From<&TranslateOptions> for TranslateOptions {
    fn from(options: &TranslateOptions) -> Self {
        options.clone()
    }
}

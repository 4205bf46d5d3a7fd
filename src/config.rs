//! Reference engine configuration.
//!
//! ```yaml
//! default_locale: en
//! messages:
//!   de:
//!     constraints.NotEmpty.message: "darf nicht leer sein"
//! ```

use crate::error::{ConfigError, ConfigErrorKind};
use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const KNOWN_KEYS: &[&str] = &["default_locale", "messages"];

/// Settings for the reference engine's message rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Locale used when a call supplies none.
    pub default_locale: Locale,
    /// Extra catalogs layered over the built-in ones: locale → key → template.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub messages: BTreeMap<Locale, BTreeMap<String, String>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_locale: Locale::english(),
            messages: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Loads a configuration from YAML. Missing keys take their defaults.
    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        if input.trim().is_empty() {
            return Err(ConfigError::new(ConfigErrorKind::Syntax, "empty input"));
        }

        let value: serde_json::Value = serde_saphyr::from_str(input)
            .map_err(|e| ConfigError::new(ConfigErrorKind::Syntax, e.to_string()))?;

        let Some(obj) = value.as_object() else {
            return Err(ConfigError::new(
                ConfigErrorKind::TypeMismatch,
                "configuration root must be a YAML mapping",
            ));
        };

        if let Some(unknown) = obj.keys().find(|k| !KNOWN_KEYS.contains(&k.as_str())) {
            return Err(ConfigError::new(
                ConfigErrorKind::TypeMismatch,
                format!("unknown configuration field: {}", unknown),
            )
            .at(unknown.clone()));
        }

        serde_json::from_value(value).map_err(|e| {
            let msg = e.to_string();
            ConfigError::new(classify_error(&msg), msg)
        })
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        let value = serde_json::to_value(self)
            .map_err(|e| ConfigError::new(ConfigErrorKind::TypeMismatch, e.to_string()))?;
        serde_saphyr::to_string(&value)
            .map_err(|e| ConfigError::new(ConfigErrorKind::Syntax, e.to_string()))
    }
}

fn classify_error(msg: &str) -> ConfigErrorKind {
    if msg.contains("invalid locale tag") {
        ConfigErrorKind::InvalidLocale
    } else {
        ConfigErrorKind::TypeMismatch
    }
}

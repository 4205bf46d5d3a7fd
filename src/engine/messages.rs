//! Message catalogs and the bundle-backed default interpolator.
//!
//! Templates are rendered in two passes over `{...}` placeholders: first
//! catalog keys (`{constraints.NotEmpty.message}`) are looked up for the
//! locale, then constraint attributes (`{min}`) are substituted. A placeholder
//! that resolves to nothing is left verbatim.

use super::{MessageContext, MessageInterpolator};
use crate::config::EngineConfig;
use crate::locale::Locale;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").unwrap());

const MESSAGES_EN: &[(&str, &str)] = &[
    ("constraints.NotNull.message", "may not be null"),
    ("constraints.NotEmpty.message", "may not be empty"),
    ("constraints.NotBlank.message", "may not be empty"),
    ("constraints.AssertTrue.message", "must be true"),
    ("constraints.AssertFalse.message", "must be false"),
    ("constraints.Size.message", "size must be between {min} and {max}"),
    ("constraints.Min.message", "must be greater than or equal to {value}"),
    ("constraints.Max.message", "must be less than or equal to {value}"),
    ("constraints.Pattern.message", "must match \"{regexp}\""),
];

const MESSAGES_DE: &[(&str, &str)] = &[
    ("constraints.NotNull.message", "kann nicht null sein"),
    ("constraints.NotEmpty.message", "darf nicht leer sein"),
    ("constraints.NotBlank.message", "darf nicht leer sein"),
    ("constraints.AssertTrue.message", "muss wahr sein"),
    ("constraints.AssertFalse.message", "muss falsch sein"),
    ("constraints.Size.message", "muss zwischen {min} und {max} liegen"),
    ("constraints.Min.message", "muss größer oder gleich {value} sein"),
    ("constraints.Max.message", "muss kleiner oder gleich {value} sein"),
    ("constraints.Pattern.message", "muss auf Ausdruck \"{regexp}\" passen"),
];

/// Default interpolator: per-locale catalogs with fallback to the
/// configured default locale.
#[derive(Clone, Debug)]
pub struct BundleInterpolator {
    catalogs: BTreeMap<Locale, HashMap<String, String>>,
    default_locale: Locale,
}

impl BundleInterpolator {
    /// Built-in English and German catalogs, English default.
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    /// Built-in catalogs overlaid with the configured ones.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut catalogs: BTreeMap<Locale, HashMap<String, String>> = BTreeMap::new();
        let builtin = [(Locale::english(), MESSAGES_EN), (Locale::german(), MESSAGES_DE)];
        for (locale, entries) in builtin {
            catalogs.insert(
                locale,
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            );
        }
        for (locale, entries) in &config.messages {
            catalogs
                .entry(locale.clone())
                .or_default()
                .extend(entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Self {
            catalogs,
            default_locale: config.default_locale.clone(),
        }
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Finds `key` for `locale`, walking its fallbacks and then the default
    /// locale's.
    pub fn lookup(&self, key: &str, locale: Option<&Locale>) -> Option<&str> {
        let requested = locale.map(Locale::fallbacks).unwrap_or_default();
        let defaults = self.default_locale.fallbacks();
        let found = requested
            .iter()
            .chain(defaults.iter())
            .find_map(|l| self.catalogs.get(l).and_then(|c| c.get(key)));
        found.map(String::as_str)
    }

    fn render(
        &self,
        template: &str,
        context: &MessageContext<'_>,
        locale: Option<&Locale>,
    ) -> String {
        let resolved = substitute(template, |name| self.lookup(name, locale).map(str::to_string));
        substitute(&resolved, |name| {
            context.constraint.attributes.get(name).map(attribute_text)
        })
    }
}

impl Default for BundleInterpolator {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageInterpolator for BundleInterpolator {
    fn interpolate(&self, template: &str, context: &MessageContext<'_>) -> String {
        self.render(template, context, None)
    }

    fn interpolate_for_locale(
        &self,
        template: &str,
        context: &MessageContext<'_>,
        locale: Option<&Locale>,
    ) -> String {
        log::trace!("interpolating '{}' for locale {:?}", template, locale);
        self.render(template, context, locale)
    }
}

fn substitute(template: &str, resolve: impl Fn(&str) -> Option<String>) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            resolve(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn attribute_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

//! Message locales.
//!
//! A [`Locale`] is a language tag with an optional region (`de`, `de-DE`).
//! Tags are normalized on parse: language lowercase, region uppercase, and
//! `_` accepted as a separator.

use crate::error::{ConfigError, ConfigErrorKind};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static LOCALE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]{2,3})(?:[-_]([A-Za-z]{2}|[0-9]{3}))?$").unwrap());

/// A message locale.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    /// Parses a locale tag.
    pub fn parse(tag: &str) -> Result<Self, ConfigError> {
        let caps = LOCALE_RE.captures(tag.trim()).ok_or_else(|| {
            ConfigError::new(
                ConfigErrorKind::InvalidLocale,
                format!("invalid locale tag '{}'", tag),
            )
        })?;
        Ok(Self {
            language: caps[1].to_ascii_lowercase(),
            region: caps.get(2).map(|m| m.as_str().to_ascii_uppercase()),
        })
    }

    pub fn english() -> Self {
        Self::language_only("en")
    }

    pub fn german() -> Self {
        Self::language_only("de")
    }

    fn language_only(language: &str) -> Self {
        Self {
            language: language.to_string(),
            region: None,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Lookup chain for catalogs, most specific first: `de-DE`, then `de`.
    pub fn fallbacks(&self) -> Vec<Locale> {
        let mut chain = vec![self.clone()];
        if self.region.is_some() {
            chain.push(Self::language_only(&self.language));
        }
        chain
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.language, region),
            None => write!(f, "{}", self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::parse(s)
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Locale::parse(&tag).map_err(serde::de::Error::custom)
    }
}

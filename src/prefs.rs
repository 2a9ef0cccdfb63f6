//! User preferences (theme, language), persisted through the key-value
//! store under the same keys the mobile app uses.

use std::str::FromStr;

use anyhow::Result;
use tracing::debug;

use crate::storage::KeyValueStore;

const THEME_KEY: &str = "APP_THEME";
const LANGUAGE_KEY: &str = "APP_LANGUAGE";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown theme: {0}")]
pub struct ParseThemeError(String);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown language: {0}")]
pub struct ParseLanguageError(String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    English,
    Persian,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Persian => "fa",
        }
    }
}

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::English),
            "fa" => Ok(Language::Persian),
            other => Err(ParseLanguageError(other.to_string())),
        }
    }
}

/// Explicit preference context: read once at startup, mutated through
/// methods that update memory first and then persist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub language: Language,
}

impl Preferences {
    /// Load stored preferences. Absent or unrecognized values fall back
    /// to the defaults rather than failing startup.
    pub async fn load(store: &dyn KeyValueStore) -> Self {
        let theme = match store.get(THEME_KEY).await {
            Ok(Some(raw)) => raw.parse().unwrap_or_default(),
            Ok(None) => Theme::default(),
            Err(err) => {
                debug!(error = %err, "could not read stored theme");
                Theme::default()
            }
        };

        let language = match store.get(LANGUAGE_KEY).await {
            Ok(Some(raw)) => raw.parse().unwrap_or_default(),
            Ok(None) => Language::default(),
            Err(err) => {
                debug!(error = %err, "could not read stored language");
                Language::default()
            }
        };

        Self { theme, language }
    }

    pub async fn set_theme(&mut self, store: &dyn KeyValueStore, theme: Theme) -> Result<()> {
        self.theme = theme;
        store.set(THEME_KEY, theme.as_str()).await
    }

    pub async fn set_language(
        &mut self,
        store: &dyn KeyValueStore,
        language: Language,
    ) -> Result<()> {
        self.language = language;
        store.set(LANGUAGE_KEY, language.as_str()).await
    }
}

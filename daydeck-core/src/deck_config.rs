//! Global daydeck configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{DeckError, DeckResult};

static DEFAULT_PIN: &str = "0925";
static DEFAULT_THEME: &str = "dark";
static DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

// Seoul City Hall. The ambient widgets are keyed to one fixed coordinate.
const DEFAULT_LATITUDE: f64 = 37.5665;
const DEFAULT_LONGITUDE: f64 = 126.978;

fn default_pin() -> String {
    DEFAULT_PIN.to_string()
}

fn is_default_pin(pin: &String) -> bool {
    pin == DEFAULT_PIN
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

fn is_default_theme(theme: &String) -> bool {
    theme == DEFAULT_THEME
}

/// Global configuration at ~/.config/daydeck/config.toml
#[derive(Serialize, Deserialize, Clone)]
pub struct DeckConfig {
    /// Where dashboard state lives; defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Access code for the dashboard. Compared in plaintext; the gate keeps
    /// honest eyes out and is not a security boundary.
    #[serde(default = "default_pin", skip_serializing_if = "is_default_pin")]
    pub pin: String,

    #[serde(default = "default_theme", skip_serializing_if = "is_default_theme")]
    pub theme: String,

    /// Stamped into published envelopes as `userEmail`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub mail: MailConfig,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub news: Vec<NewsSource>,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,

    #[serde(default)]
    pub briefing: BriefingConfig,
}

impl Default for DeckConfig {
    fn default() -> Self {
        DeckConfig {
            data_dir: None,
            pin: default_pin(),
            theme: default_theme(),
            user_email: None,
            sync: SyncConfig::default(),
            mail: MailConfig::default(),
            news: Vec::new(),
            weather: WeatherConfig::default(),
            calendar: CalendarConfig::default(),
            briefing: BriefingConfig::default(),
        }
    }
}

/// Remote store settings.
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SyncConfig {
    /// The remote blob store URL. Absence means local-only mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Seconds between full refreshes in watch mode.
    pub poll_secs: u64,
    /// Per-request timeout for all HTTP calls.
    pub timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            endpoint: None,
            poll_secs: 60,
            timeout_secs: 10,
        }
    }
}

/// Mail-summary endpoints (JSON arrays of `{from, subject, link}`).
#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MailConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_url: Option<String>,
}

/// One news search: `name` labels the headlines, `query` is the search term.
#[derive(Serialize, Deserialize, Clone, PartialEq)]
pub struct NewsSource {
    pub name: String,
    pub query: String,
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct WeatherConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub enabled: bool,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        WeatherConfig {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            enabled: true,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CalendarConfig {
    /// Google account connected via `daydeck auth google`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Public calendar link shown when no account is connected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct BriefingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for BriefingConfig {
    fn default() -> Self {
        BriefingConfig {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }
}

impl DeckConfig {
    pub fn config_path() -> DeckResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DeckError::Config("Could not determine config directory".into()))?
            .join("daydeck");

        Ok(config_dir.join("config.toml"))
    }

    /// Save the current config to ~/.config/daydeck/config.toml
    pub fn save(&self) -> DeckResult<()> {
        let config_path = Self::config_path()?;

        let content =
            toml::to_string_pretty(self).map_err(|e| DeckError::Config(e.to_string()))?;

        std::fs::write(&config_path, content)
            .map_err(|e| DeckError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &std::path::Path) -> DeckResult<()> {
        let contents = format!(
            "\
# daydeck configuration

# Access code for the dashboard:
# pin = \"{DEFAULT_PIN}\"

# Presentation theme:
# theme = \"{DEFAULT_THEME}\"

# Stamped into published state as userEmail:
# user_email = \"you@example.com\"

# Where dashboard state lives:
# data_dir = \"~/.local/share/daydeck\"

[sync]
# Remote blob store for task/layout state. Leave unset for local-only mode:
# endpoint = \"https://store.example.com/daydeck/state\"
# poll_secs = 60
# timeout_secs = 10

[mail]
# JSON mail-summary endpoints:
# personal_url = \"https://script.google.com/macros/s/.../exec\"
# company_url = \"https://script.google.com/macros/s/.../exec\"

# News searches, a few headlines each:
# [[news]]
# name = \"FUP Global Partners\"
# query = \"에프유피글로벌파트너스\"

[weather]
# Fixed coordinate for the weather and air quality widgets:
# latitude = {DEFAULT_LATITUDE}
# longitude = {DEFAULT_LONGITUDE}
# enabled = true

[calendar]
# Google account connected via `daydeck auth google`:
# account = \"you@gmail.com\"
# Public calendar link shown when no account is connected:
# embed_url = \"https://calendar.google.com/calendar/embed?src=...\"

[briefing]
# Gemini API key for the morning news briefing:
# api_key = \"...\"
# model = \"{DEFAULT_GEMINI_MODEL}\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DeckError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| DeckError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Apply a `key value` pair from `daydeck config set`. An empty value
    /// clears optional keys.
    pub fn set(&mut self, key: &str, value: &str) -> DeckResult<()> {
        match key {
            "pin" => self.pin = value.to_string(),
            "theme" => self.theme = value.to_string(),
            "user_email" => self.user_email = opt(value),
            "data_dir" => self.data_dir = opt(value).map(PathBuf::from),
            "sync.endpoint" => self.sync.endpoint = opt(value),
            "sync.poll_secs" => self.sync.poll_secs = parse(key, value)?,
            "sync.timeout_secs" => self.sync.timeout_secs = parse(key, value)?,
            "mail.personal_url" => self.mail.personal_url = opt(value),
            "mail.company_url" => self.mail.company_url = opt(value),
            "weather.latitude" => self.weather.latitude = parse(key, value)?,
            "weather.longitude" => self.weather.longitude = parse(key, value)?,
            "weather.enabled" => self.weather.enabled = parse(key, value)?,
            "calendar.account" => self.calendar.account = opt(value),
            "calendar.embed_url" => self.calendar.embed_url = opt(value),
            "briefing.api_key" => self.briefing.api_key = opt(value),
            "briefing.model" => self.briefing.model = value.to_string(),
            _ => {
                return Err(DeckError::Config(format!(
                    "Unknown config key '{key}'. News sources are edited in the config file directly."
                )));
            }
        }

        Ok(())
    }
}

fn opt(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> DeckResult<T> {
    value
        .parse()
        .map_err(|_| DeckError::Config(format!("Invalid value '{value}' for '{key}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- defaults ---

    #[test]
    fn empty_config_parses_to_defaults() {
        let config: DeckConfig = toml::from_str("").unwrap();
        assert_eq!(config.pin, "0925");
        assert_eq!(config.theme, "dark");
        assert_eq!(config.sync.poll_secs, 60);
        assert_eq!(config.sync.timeout_secs, 10);
        assert!(config.sync.endpoint.is_none());
        assert!(config.news.is_empty());
        assert!(config.weather.enabled);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config: DeckConfig = toml::from_str(
            r#"
            [sync]
            endpoint = "https://store.example.com/daydeck"

            [[news]]
            name = "FUP Global Partners"
            query = "에프유피글로벌파트너스"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.sync.endpoint.as_deref(),
            Some("https://store.example.com/daydeck")
        );
        assert_eq!(config.sync.poll_secs, 60);
        assert_eq!(config.news.len(), 1);
        assert_eq!(config.news[0].name, "FUP Global Partners");
    }

    // --- set ---

    #[test]
    fn set_updates_nested_keys() {
        let mut config = DeckConfig::default();

        config.set("sync.endpoint", "https://x.example.com").unwrap();
        config.set("sync.poll_secs", "90").unwrap();
        config.set("weather.latitude", "35.1796").unwrap();

        assert_eq!(config.sync.endpoint.as_deref(), Some("https://x.example.com"));
        assert_eq!(config.sync.poll_secs, 90);
        assert!((config.weather.latitude - 35.1796).abs() < f64::EPSILON);
    }

    #[test]
    fn set_empty_value_clears_optional_keys() {
        let mut config = DeckConfig::default();
        config.set("sync.endpoint", "https://x.example.com").unwrap();
        config.set("sync.endpoint", "").unwrap();
        assert!(config.sync.endpoint.is_none());
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_values() {
        let mut config = DeckConfig::default();
        assert!(config.set("sidebar.width", "12").is_err());
        assert!(config.set("sync.poll_secs", "fast").is_err());
    }
}

//! Configuration and settings management
//!
//! Loads settings from optional config files and environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default port for the liveness endpoint
pub const DEFAULT_PORT: u16 = 8080;
/// Default oEmbed endpoint queried for video metadata
pub const DEFAULT_OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";
/// Default timeout (seconds) for a single metadata lookup
pub const DEFAULT_OEMBED_TIMEOUT_SECS: u64 = 5;

/// Errors raised while building [`Settings`]
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Sources could not be read or deserialized (e.g. `BOT_TOKEN` is missing)
    #[error("Configuration error: {0}")]
    Load(#[from] ConfigError),
    /// A value was present but unusable
    #[error("Invalid setting `{key}`: {reason}")]
    Invalid {
        /// Setting name
        key: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token
    pub bot_token: String,

    /// Listen port for the liveness endpoint
    #[serde(default = "default_port")]
    pub port: u16,

    /// oEmbed endpoint URL (without query string)
    #[serde(default = "default_oembed_endpoint")]
    pub oembed_endpoint: String,

    /// Timeout for a single oEmbed request, in seconds
    #[serde(default = "default_oembed_timeout_secs")]
    pub oembed_timeout_secs: u64,
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_oembed_endpoint() -> String {
    DEFAULT_OEMBED_ENDPOINT.to_string()
}

const fn default_oembed_timeout_secs() -> u64 {
    DEFAULT_OEMBED_TIMEOUT_SECS
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use link_info_bot::config::Settings;
    ///
    /// let settings = Settings::new().expect("BOT_TOKEN must be set");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `SettingsError` if loading fails or a value is invalid.
    pub fn new() -> Result<Self, SettingsError> {
        let settings: Self = build_config()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Invalid` naming the first offending key.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.bot_token.trim().is_empty() {
            return Err(SettingsError::Invalid {
                key: "bot_token",
                reason: "BOT_TOKEN missing in environment variables".to_string(),
            });
        }
        if self.oembed_timeout_secs == 0 {
            return Err(SettingsError::Invalid {
                key: "oembed_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if reqwest::Url::parse(&self.oembed_endpoint).is_err() {
            return Err(SettingsError::Invalid {
                key: "oembed_endpoint",
                reason: format!("not an absolute URL: {}", self.oembed_endpoint),
            });
        }
        Ok(())
    }

    /// Timeout applied to every oEmbed request
    #[must_use]
    pub const fn oembed_timeout(&self) -> Duration {
        Duration::from_secs(self.oembed_timeout_secs)
    }
}

/// Builds the layered configuration source.
///
/// # Errors
///
/// Returns a `ConfigError` if a present source cannot be parsed.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Not checked into git
        .add_source(File::with_name("config/local").required(false))
        // Eg.. `APP__PORT=9000 ./target/app` sets `port`
        .add_source(Environment::with_prefix("APP").separator("__"))
        // Plain UPPER_SNAKE_CASE variables map to snake_case keys; empty ones count as unset
        .add_source(Environment::default().ignore_empty(true))
        .build()
}

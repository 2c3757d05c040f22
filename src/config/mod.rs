use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::ui::IdVariant;
use crate::websocket::UrlMode;

// Environment variables are process-wide.
#[cfg(test)]
pub(crate) static TEST_ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[derive(Debug, Deserialize, Clone)]
pub struct PageConfig {
    /// Address of the page hosting the console, e.g. `https://host:7681/index.html`.
    pub url: String,
    /// Path appended to the derived WebSocket URL.
    pub suffix: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConnectionConfig {
    pub subprotocol: String,
    pub url_mode: UrlMode,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    pub element_ids: IdVariant,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub environment: String,
    pub page: PageConfig,
    pub connection: ConnectionConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Self::with_defaults(Config::builder(), "development")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // E.g., `APP_PAGE__URL=https://host/` would set `Settings.page.url`
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }

    #[cfg(test)]
    pub fn new_for_test() -> Result<Self, ConfigError> {
        Self::with_defaults(Config::builder(), "test")?
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("environment", environment)?
            .set_default("page.url", "http://localhost:7681/")?
            .set_default("page.suffix", "")?
            .set_default("connection.subprotocol", crate::websocket::DEFAULT_SUBPROTOCOL)?
            .set_default("connection.url_mode", "parity")?
            .set_default("ui.element_ids", "long")?
            .set_default("log.level", "info")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn cleanup_env() {
        env::remove_var("APP_PAGE__URL");
        env::remove_var("APP_PAGE__SUFFIX");
        env::remove_var("APP_CONNECTION__SUBPROTOCOL");
        env::remove_var("APP_CONNECTION__URL_MODE");
        env::remove_var("APP_UI__ELEMENT_IDS");
        env::remove_var("APP_LOG__LEVEL");
    }

    #[test]
    fn test_settings_defaults() {
        let _guard = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        cleanup_env();
        let settings = Settings::new_for_test().expect("Failed to load settings");
        assert_eq!(settings.environment, "test");
        assert_eq!(settings.page.url, "http://localhost:7681/");
        assert_eq!(settings.page.suffix, "");
        assert_eq!(settings.connection.subprotocol, "otdb");
        assert_eq!(settings.connection.url_mode, UrlMode::Parity);
        assert_eq!(settings.ui.element_ids, IdVariant::Long);
        assert_eq!(settings.log.level, "info");
    }

    #[test]
    fn test_environment_override() {
        let _guard = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        cleanup_env();

        env::set_var("APP_PAGE__URL", "https://example.com/console");
        env::set_var("APP_PAGE__SUFFIX", "otdb");
        env::set_var("APP_CONNECTION__URL_MODE", "parsed");
        env::set_var("APP_UI__ELEMENT_IDS", "short");

        let settings = Settings::new_for_test().expect("Failed to load settings");
        assert_eq!(settings.page.url, "https://example.com/console");
        assert_eq!(settings.page.suffix, "otdb");
        assert_eq!(settings.connection.url_mode, UrlMode::Parsed);
        assert_eq!(settings.ui.element_ids, IdVariant::Short);
        assert_eq!(settings.connection.subprotocol, "otdb");

        cleanup_env();
    }

    #[test]
    fn test_invalid_url_mode() {
        let _guard = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        cleanup_env();

        env::set_var("APP_CONNECTION__URL_MODE", "guess");
        let result = Settings::new_for_test();
        assert!(result.is_err(), "Expected error for unknown url mode");

        cleanup_env();
    }
}

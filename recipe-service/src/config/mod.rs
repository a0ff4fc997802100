//! Configuration module for recipe-service.

use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::num::NonZeroU32;

pub const DEFAULT_DATABASE_PATH: &str = "recipes.db";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct RecipeConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub gemini: GeminiSettings,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path of the SQLite file; created on first use.
    pub path: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Option<Secret<String>>,
    pub model: String,
    pub api_base: String,
}

impl GeminiSettings {
    /// The API key, if one was supplied and is not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .filter(|key| !key.trim().is_empty())
    }
}

impl RecipeConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "recipe-service".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            database: DatabaseConfig {
                path: env::var("DATABASE_PATH")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string()),
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 5)?,
            },
            gemini: GeminiSettings {
                api_key: env::var("GEMINI_API_KEY").ok().map(Secret::new),
                model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
                api_base: env::var("GEMINI_API_BASE")
                    .unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE.to_string()),
            },
        })
    }
}

fn parse_env(key: &str, default: u32) -> Result<u32, AppError> {
    match env::var(key) {
        Ok(raw) => parse_positive(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<u32, AppError> {
    raw.trim()
        .parse::<NonZeroU32>()
        .map(NonZeroU32::get)
        .map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} must be a positive integer: {}", key, e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(key: Option<&str>) -> GeminiSettings {
        GeminiSettings {
            api_key: key.map(|k| Secret::new(k.to_string())),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
        }
    }

    #[test]
    fn missing_key_is_none() {
        assert!(settings(None).api_key().is_none());
    }

    #[test]
    fn blank_key_is_none() {
        assert!(settings(Some("   ")).api_key().is_none());
    }

    #[test]
    fn present_key_is_exposed() {
        assert_eq!(settings(Some("abc123")).api_key(), Some("abc123"));
    }

    #[test]
    fn secret_is_redacted_in_debug_output() {
        let rendered = format!("{:?}", settings(Some("abc123")));
        assert!(!rendered.contains("abc123"));
    }

    #[test]
    fn pool_size_must_be_positive() {
        assert_eq!(parse_positive("DATABASE_MAX_CONNECTIONS", "8").unwrap(), 8);

        for raw in ["0", "-1", "five", ""] {
            let err = parse_positive("DATABASE_MAX_CONNECTIONS", raw).unwrap_err();
            assert!(matches!(err, AppError::ConfigError(_)), "accepted {:?}", raw);
            assert!(err.to_string().contains("DATABASE_MAX_CONNECTIONS"));
        }
    }
}

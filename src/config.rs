use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Public Generative Language API endpoint; overridable for tests/proxies.
pub const DEFAULT_AI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub fn default_log_filter() -> &'static str {
    "info,mediscribe=debug"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}

/// Connection settings for the generative AI provider.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub ai: AiConfig,
}

impl AppConfig {
    /// Build configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source (testable).
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_raw = var("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8000".into());
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidVar {
                name: "BIND_ADDR",
                value: bind_raw.clone(),
            })?;

        let database_path = var("DATABASE_PATH")
            .unwrap_or_else(|| "mediscribe.db".into())
            .into();

        let api_key = var("GOOGLE_API_KEY").ok_or(ConfigError::MissingVar("GOOGLE_API_KEY"))?;
        let model = var("GOOGLE_MODEL").unwrap_or_else(|| "gemini-1.5-flash".into());
        let base_url = var("AI_BASE_URL").unwrap_or_else(|| DEFAULT_AI_BASE_URL.into());

        Ok(AppConfig {
            bind_addr,
            database_path,
            ai: AiConfig {
                base_url,
                api_key,
                model,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn api_key_is_required() {
        let err = AppConfig::from_vars(vars(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("GOOGLE_API_KEY")));
    }

    #[test]
    fn defaults_fill_everything_else() {
        let config = AppConfig::from_vars(vars(&[("GOOGLE_API_KEY", "k")])).unwrap();
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.database_path, PathBuf::from("mediscribe.db"));
        assert_eq!(config.ai.model, "gemini-1.5-flash");
        assert_eq!(config.ai.base_url, DEFAULT_AI_BASE_URL);
    }

    #[test]
    fn malformed_bind_addr_is_rejected() {
        let err = AppConfig::from_vars(vars(&[
            ("GOOGLE_API_KEY", "k"),
            ("BIND_ADDR", "not-an-addr"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name: "BIND_ADDR", .. }));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = AppConfig::from_vars(vars(&[
            ("GOOGLE_API_KEY", "k"),
            ("GOOGLE_MODEL", "gemini-2.0-flash"),
            ("BIND_ADDR", "0.0.0.0:9090"),
            ("DATABASE_PATH", "/var/lib/mediscribe/db.sqlite"),
        ]))
        .unwrap();
        assert_eq!(config.ai.model, "gemini-2.0-flash");
        assert_eq!(config.bind_addr.port(), 9090);
        assert_eq!(
            config.database_path,
            PathBuf::from("/var/lib/mediscribe/db.sqlite")
        );
    }
}

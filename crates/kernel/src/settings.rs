use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "SHELFWISE_ENV";
const CONFIG_DIR_ENV: &str = "SHELFWISE_CONFIG_DIR";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub recently_visited: RecentlyVisitedSettings,
    #[serde(default)]
    pub trending: TrendingSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and environment overlay.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .map(|cwd| cwd.join("config"))
                .context("unable to resolve current directory")?,
        };

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix("SHELFWISE")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // Override environment field with parsed enum variant.
        settings.environment = match environment.as_str() {
            "local" => Environment::Local,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                return Err(anyhow!(
                    "unsupported environment '{}'; expected local/staging/production",
                    other
                ));
            }
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would only fail later, at mount or request time.
    pub fn validate(&self) -> anyhow::Result<()> {
        let base = &self.server.base_path;
        if !base.is_empty() && (!base.starts_with('/') || base.ends_with('/')) {
            bail!(
                "server.base_path '{}' must be empty or start with '/' and not end with '/'",
                base
            );
        }
        if self.recently_visited.list_limit == 0 {
            bail!("recently_visited.list_limit must be greater than zero");
        }
        if !(1..=TrendingSettings::MAX_WINDOW_HOURS).contains(&self.trending.window_hours) {
            bail!(
                "trending.window_hours must be between 1 and {}",
                TrendingSettings::MAX_WINDOW_HOURS
            );
        }
        if !(1..=TrendingSettings::MAX_LIMIT).contains(&self.trending.default_limit) {
            bail!(
                "trending.default_limit must be between 1 and {}",
                TrendingSettings::MAX_LIMIT
            );
        }
        if self.auth.mode == AuthMode::Token && self.auth.tokens.is_empty() {
            bail!("auth.mode = \"token\" requires at least one entry in auth.tokens");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Prefix every module is mounted under; empty mounts at the root.
    #[serde(default)]
    pub base_path: String,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
            base_path: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseSettings {
    /// JSON file the catalog is seeded from at startup.
    #[serde(default = "DatabaseSettings::default_seed_path")]
    pub seed_path: Option<String>,
}

impl DatabaseSettings {
    fn default_seed_path() -> Option<String> {
        Some("config/seed/catalog.json".to_string())
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            seed_path: Self::default_seed_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "TelemetrySettings::default_log_level")]
    pub log_level: String,
}

impl TelemetrySettings {
    fn default_log_level() -> String {
        "info,tower_http=debug".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            log_level: Self::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// How the requester of an inbound request is identified.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Trust an identity header set by an upstream gateway.
    #[default]
    Header,
    /// Look up `Authorization: Bearer` tokens in a static table.
    Token,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub mode: AuthMode,
    #[serde(default = "AuthSettings::default_header")]
    pub header: String,
    /// Token to requester id. Never serialized.
    #[serde(default, skip_serializing)]
    pub tokens: HashMap<String, String>,
}

impl AuthSettings {
    fn default_header() -> String {
        "x-requester-id".to_string()
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            mode: AuthMode::default(),
            header: Self::default_header(),
            tokens: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecentlyVisitedSettings {
    #[serde(default = "RecentlyVisitedSettings::default_list_limit")]
    pub list_limit: usize,
}

impl RecentlyVisitedSettings {
    fn default_list_limit() -> usize {
        20
    }
}

impl Default for RecentlyVisitedSettings {
    fn default() -> Self {
        Self {
            list_limit: Self::default_list_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrendingSettings {
    #[serde(default = "TrendingSettings::default_window_hours")]
    pub window_hours: u64,
    #[serde(default = "TrendingSettings::default_limit")]
    pub default_limit: usize,
}

impl TrendingSettings {
    /// Upper bound accepted for the `limit` query parameter.
    pub const MAX_LIMIT: usize = 100;
    /// Ten years; larger windows cannot be subtracted from the current time.
    pub const MAX_WINDOW_HOURS: u64 = 24 * 365 * 10;

    fn default_window_hours() -> u64 {
        24 * 7
    }

    fn default_limit() -> usize {
        10
    }
}

impl Default for TrendingSettings {
    fn default() -> Self {
        Self {
            window_hours: Self::default_window_hours(),
            default_limit: Self::default_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn defaults_pass_validation() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.server.base_path, "");
        assert_eq!(settings.auth.header, "x-requester-id");
        assert_eq!(settings.recently_visited.list_limit, 20);
        assert_eq!(settings.trending.window_hours, 168);
    }

    #[test]
    fn base_path_must_be_rooted() {
        let mut settings = Settings::default();
        settings.server.base_path = "api".to_string();
        assert!(settings.validate().is_err());

        settings.server.base_path = "/api/".to_string();
        assert!(settings.validate().is_err());

        settings.server.base_path = "/api".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn token_mode_requires_tokens() {
        let mut settings = Settings::default();
        settings.auth.mode = AuthMode::Token;
        assert!(settings.validate().is_err());

        settings
            .auth
            .tokens
            .insert("secret".to_string(), "U1".to_string());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn trending_limit_bounds() {
        let mut settings = Settings::default();
        settings.trending.default_limit = 0;
        assert!(settings.validate().is_err());

        settings.trending.default_limit = TrendingSettings::MAX_LIMIT + 1;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn trending_window_bounds() {
        let mut settings = Settings::default();
        settings.trending.window_hours = 0;
        assert!(settings.validate().is_err());

        settings.trending.window_hours = 1_000_000_000;
        assert!(settings.validate().is_err());

        settings.trending.window_hours = TrendingSettings::MAX_WINDOW_HOURS;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn tokens_are_not_serialized() {
        let mut settings = Settings::default();
        settings.auth.mode = AuthMode::Token;
        settings
            .auth
            .tokens
            .insert("s3cr3t-token".to_string(), "U1".to_string());

        let rendered = serde_json::to_string(&settings).unwrap();
        assert!(!rendered.contains("s3cr3t-token"));
        assert!(rendered.contains("\"mode\":\"token\""));
    }
}

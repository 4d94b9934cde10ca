//! Layered application configuration.
//!
//! Sources, later ones winning: `config/base.toml`, the environment overlay
//! `config/{env}.toml`, then `ESTANTE_*` environment variables. A `.env`
//! file is honored when present.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "ESTANTE_ENV";
const CONFIG_DIR_ENV: &str = "ESTANTE_CONFIG_DIR";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "local" => Ok(Self::Local),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            other => bail!("unsupported environment '{other}'; expected local/staging/production"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration from the layered sources.
    pub fn load() -> anyhow::Result<Self> {
        // A missing `.env` file is not an error.
        let _ = dotenvy::dotenv();

        let environment =
            std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = Self::config_dir()?;

        let cfg = config::Config::builder()
            .add_source(config::File::from(config_dir.join("base.toml")).required(false))
            .add_source(
                config::File::from(config_dir.join(format!("{environment}.toml")))
                    .required(false),
            )
            // Double underscore separates nesting levels so multi-word keys
            // survive: ESTANTE_SERVER__REQUEST_TIMEOUT_MS.
            .add_source(config::Environment::with_prefix("ESTANTE").separator("__"))
            .build()
            .context("failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .context("failed to deserialize configuration")?;
        settings.environment = environment.parse()?;
        Ok(settings)
    }

    fn config_dir() -> anyhow::Result<PathBuf> {
        match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => Ok(PathBuf::from(dir)),
            // Default to the repo-root `config` directory.
            Err(_) => Ok(std::env::current_dir()
                .context("unable to resolve current directory")?
                .join("config")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub request_timeout_ms: u64,
    /// The single origin allowed to make cross-origin requests.
    pub cors_origin: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_ms: 15000,
            cors_origin: "http://127.0.0.1:5500".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Path to the SQLite database file; created on first startup if missing.
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "estante.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TelemetrySettings {
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
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
    fn default_database_path_is_local_file() {
        let settings = Settings::default();
        assert_eq!(settings.database.path, "estante.db");
    }

    #[test]
    fn default_cors_origin_is_local_frontend() {
        let settings = Settings::default();
        assert_eq!(settings.server.cors_origin, "http://127.0.0.1:5500");
    }

    #[test]
    fn environment_variables_override_nested_keys() {
        std::env::set_var("ESTANTE_SERVER__REQUEST_TIMEOUT_MS", "2500");
        let settings = Settings::load().unwrap();
        std::env::remove_var("ESTANTE_SERVER__REQUEST_TIMEOUT_MS");
        assert_eq!(settings.server.request_timeout_ms, 2500);
    }

    #[test]
    fn unknown_environment_is_rejected() {
        assert!("qa".parse::<Environment>().is_err());
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
    }
}

//! Environment-driven server configuration.

use provost_auth::config::AuthConfig;
use provost_db::DbConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Full server configuration, assembled from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub auth: AuthConfig,
    pub bind_addr: String,
    pub env: String,
}

impl Config {
    /// Read configuration from environment variables.
    ///
    /// `TOKEN_SECRET` is the only mandatory variable; everything else
    /// has a development default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token_secret =
            std::env::var("TOKEN_SECRET").map_err(|_| ConfigError::Missing("TOKEN_SECRET"))?;

        let token_lifetime_secs = match std::env::var("TOKEN_EXP_SECONDS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "TOKEN_EXP_SECONDS",
                value: raw,
            })?,
            Err(_) => 3600,
        };

        let defaults = DbConfig::default();
        let db = DbConfig {
            url: env_or("SURREAL_URL", defaults.url),
            namespace: env_or("SURREAL_NAMESPACE", defaults.namespace),
            master_db: env_or("MASTER_DB", defaults.master_db),
            username: env_or("SURREAL_USER", defaults.username),
            password: env_or("SURREAL_PASS", defaults.password),
        };

        Ok(Self {
            db,
            auth: AuthConfig {
                token_secret,
                token_lifetime_secs,
            },
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8000".into()),
            env: env_or("ENV", "development".into()),
        })
    }
}

fn env_or(name: &str, default: String) -> String {
    std::env::var(name).unwrap_or(default)
}

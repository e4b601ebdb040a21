use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::types::Role;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_BIND: &str = "127.0.0.1";
/// Bearer tokens stay valid for one working shift.
pub const DEFAULT_TOKEN_TTL_HOURS: u32 = 8;
/// Placeholder secret shipped in the default config; the gateway warns when it is still in use.
pub const PLACEHOLDER_SECRET: &str = "change-me";

/// Top-level config (crewdeck.toml + CREWDECK_* env overrides).
///
/// Loaded once at startup and handed to each subsystem explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewdeckConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub access: AccessConfig,
}

impl Default for CrewdeckConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            access: AccessConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Login identities and token settings for the access gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// HMAC key used to sign bearer tokens.
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u32,
    /// Operators seeded into the `operators` table on every start.
    /// Passwords are hashed before they reach the database.
    #[serde(default)]
    pub operators: Vec<OperatorConfig>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            token_ttl_hours: default_token_ttl_hours(),
            operators: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorConfig {
    pub username: String,
    pub password: String,
    pub role: Role,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_token_secret() -> String {
    PLACEHOLDER_SECRET.to_string()
}
fn default_token_ttl_hours() -> u32 {
    DEFAULT_TOKEN_TTL_HOURS
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.crewdeck/crewdeck.db", home)
}

impl CrewdeckConfig {
    /// Load config from a TOML file with CREWDECK_* env var overrides.
    ///
    /// Nested keys use a double underscore, e.g.
    /// `CREWDECK_ACCESS__TOKEN_SECRET` or `CREWDECK_SERVER__PORT`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: CrewdeckConfig = Self::figment(&path)
            .extract()
            .map_err(|e| crate::error::CrewdeckError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn figment(path: &str) -> Figment {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("CREWDECK_").split("__"))
    }

    /// Reject settings the gateway cannot run with.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.access.token_secret.trim().is_empty() {
            return Err(crate::error::CrewdeckError::Config(
                "access.token_secret must not be empty".to_string(),
            ));
        }
        if self.uses_placeholder_secret() {
            return Err(crate::error::CrewdeckError::Config(format!(
                "access.token_secret is still the placeholder {PLACEHOLDER_SECRET:?}; set a real secret"
            )));
        }
        if self.access.token_ttl_hours == 0 {
            return Err(crate::error::CrewdeckError::Config(
                "access.token_ttl_hours must be at least 1".to_string(),
            ));
        }
        for op in &self.access.operators {
            if op.username.trim().is_empty() || op.password.is_empty() {
                return Err(crate::error::CrewdeckError::Config(
                    "every access.operators entry needs a username and password".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        self.access.token_secret == PLACEHOLDER_SECRET
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.crewdeck/crewdeck.toml", home)
}

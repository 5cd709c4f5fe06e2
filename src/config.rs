// Runtime configuration, read from the environment (and `.env` via dotenv in main).

use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
const DEFAULT_PREFIX: &str = "!";
const DEFAULT_DENYLIST_PATH: &str = "banned_emojis.json";
const DEFAULT_BACKUP_DIR: &str = "backups";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.")]
    MissingToken,
    #[error("PORT must be a number between 0 and 65535, got `{0}`")]
    InvalidPort(String),
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub port: u16,
    pub command_prefix: String,
    pub denylist_path: PathBuf,
    pub backup_dir: PathBuf,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let discord_token = get("DISCORD_TOKEN").ok_or(ConfigError::MissingToken)?;

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            discord_token: discord_token.trim().to_string(),
            port,
            command_prefix: get("COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            denylist_path: get("DENYLIST_PATH")
                .unwrap_or_else(|| DEFAULT_DENYLIST_PATH.to_string())
                .into(),
            backup_dir: get("BACKUP_DIR")
                .unwrap_or_else(|| DEFAULT_BACKUP_DIR.to_string())
                .into(),
        })
    }
}

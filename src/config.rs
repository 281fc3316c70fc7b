use std::path::{Path, PathBuf};

use compact_str::ToCompactString;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::result::{BotError, Result};

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BotConfig {
    /// OAuth token for the Practicum homework API
    pub practicum_token: String,
    /// Telegram bot token
    pub telegram_token: String,
    /// Chat receiving the notifications
    pub telegram_chat_id: String,
    /// Homework statuses endpoint
    pub endpoint: String,
    pub telegram_api_url: String,
    /// Seconds between two polls
    pub retry_secs: u64,
    /// Log level, "Off" disables the log file
    pub log_level: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            practicum_token: String::new(),
            telegram_token: String::new(),
            telegram_chat_id: String::new(),
            endpoint: "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string(),
            telegram_api_url: "https://api.telegram.org".to_string(),
            retry_secs: 600,
            log_level: None,
        }
    }
}

impl BotConfig {
    /// Read the config file at `path`, or fall back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        confy::load_path(path).map_err(|e| BotError::ConfigError(e.to_compact_string()))
    }

    /// Override the secrets with non-empty values from `lookup`
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(token) = non_empty(PRACTICUM_TOKEN) {
            self.practicum_token = token;
        }
        if let Some(token) = non_empty(TELEGRAM_TOKEN) {
            self.telegram_token = token;
        }
        if let Some(chat_id) = non_empty(TELEGRAM_CHAT_ID) {
            self.telegram_chat_id = chat_id;
        }

        self
    }

    /// Override the secrets from the process environment
    pub fn with_process_env(self) -> Self {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// All three secrets must be present before polling starts
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&'static str> = [
            (PRACTICUM_TOKEN, &self.practicum_token),
            (TELEGRAM_TOKEN, &self.telegram_token),
            (TELEGRAM_CHAT_ID, &self.telegram_chat_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BotError::MissingEnvironment(missing))
        }
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = BaseDirs::new() {
        dirs.config_dir().join("homework-bot.toml")
    } else {
        PathBuf::from("homework-bot.toml")
    }
}

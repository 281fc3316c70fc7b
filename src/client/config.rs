//! Configuration for the homework API and Telegram clients

use std::time::Duration;

use compact_str::CompactString;

use super::error::{ClientError, Result};
use crate::config::BotConfig;

/// Main configuration for the polling clients
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Homework statuses endpoint
    pub endpoint: CompactString,
    /// OAuth token for the homework API
    pub practicum_token: CompactString,
    /// Notification target
    pub telegram: TelegramConfig,
    /// Polling configuration
    pub polling: PollingConfig,
    /// Request configuration
    pub request: RequestConfig,
}

/// Telegram bot API settings
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API base URL, without the `/bot<token>` suffix
    pub api_url: CompactString,
    pub token: CompactString,
    pub chat_id: CompactString,
}

/// Polling interval configuration
#[derive(Debug, Clone)]
pub struct PollingConfig {
    /// Pause between two poll cycles, whether or not the previous one failed
    pub interval: Duration,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Request timeout
    pub timeout: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval: Duration::from_secs(600) }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30) }
    }
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(
        endpoint: impl Into<CompactString>,
        practicum_token: impl Into<CompactString>,
        telegram: TelegramConfig,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            practicum_token: practicum_token.into(),
            telegram,
            polling: PollingConfig::default(),
            request: RequestConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        require_http_url("endpoint", &self.endpoint)?;
        require_http_url("telegram_api_url", &self.telegram.api_url)?;

        if self.practicum_token.is_empty() {
            return Err(ClientError::config_validation("practicum_token", "cannot be empty"));
        }

        if self.telegram.token.is_empty() {
            return Err(ClientError::config_validation("telegram_token", "cannot be empty"));
        }

        if self.telegram.chat_id.is_empty() {
            return Err(ClientError::config_validation("telegram_chat_id", "cannot be empty"));
        }

        if self.polling.interval.is_zero() {
            return Err(ClientError::config("Polling interval must be greater than zero"));
        }

        if self.request.timeout.is_zero() {
            return Err(ClientError::config("Timeout must be greater than zero"));
        }

        Ok(())
    }

    /// Set polling configuration
    pub fn with_polling(mut self, polling: PollingConfig) -> Self {
        self.polling = polling;
        self
    }
}

impl TelegramConfig {
    pub fn new(
        api_url: impl Into<CompactString>,
        token: impl Into<CompactString>,
        chat_id: impl Into<CompactString>,
    ) -> Self {
        Self { api_url: api_url.into(), token: token.into(), chat_id: chat_id.into() }
    }
}

impl From<BotConfig> for ClientConfig {
    fn from(config: BotConfig) -> Self {
        let telegram = TelegramConfig::new(
            config.telegram_api_url.trim_end_matches('/'),
            config.telegram_token,
            config.telegram_chat_id,
        );

        Self::new(config.endpoint, config.practicum_token, telegram)
            .with_polling(PollingConfig { interval: Duration::from_secs(config.retry_secs) })
    }
}

fn require_http_url(field: &str, url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(ClientError::config_validation(field, "cannot be empty"));
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ClientError::config_validation(field, "must start with http:// or https://"));
    }

    Ok(())
}

//! Telegram Bot API delivery of notifications

use compact_str::{format_compact, CompactString};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

use super::{
    config::TelegramConfig,
    error::{error_chain, ClientError, Result},
};

/// Sends plaintext messages to the configured chat
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
}

/// Envelope of every Bot API reply
#[derive(Debug, Deserialize)]
struct TelegramReply {
    ok: bool,
    description: Option<CompactString>,
}

impl TelegramNotifier {
    pub fn new(client: Client, config: TelegramConfig) -> Self {
        Self { client, config }
    }

    /// Send `text` to the configured chat
    #[instrument(skip(self, text), fields(chat_id = %self.config.chat_id))]
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let response = self
            .client
            .post(self.send_message_url().as_str())
            .form(&[("chat_id", self.config.chat_id.as_str()), ("text", text)])
            .send()
            .await
            .map_err(redacted)?;

        let status = response.status();
        let body = response.text().await.map_err(redacted)?;

        match serde_json::from_str::<TelegramReply>(&body) {
            Ok(reply) if reply.ok && status.is_success() => {
                info!(chat_id = %self.config.chat_id, text, "Chat message sent");
                Ok(())
            },
            Ok(reply) => Err(ClientError::delivery(
                reply
                    .description
                    .unwrap_or_else(|| format_compact!("HTTP {}", status.as_u16())),
            )),
            Err(_) => Err(ClientError::delivery(format_compact!("HTTP {}", status.as_u16()))),
        }
    }

    fn send_message_url(&self) -> CompactString {
        format_compact!("{}/bot{}/sendMessage", self.config.api_url, self.config.token)
    }
}

/// The request URL carries the bot token, keep it out of the error text
fn redacted(e: reqwest::Error) -> ClientError {
    ClientError::delivery(error_chain(&e.without_url()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_url() {
        let notifier = TelegramNotifier::new(
            Client::new(),
            TelegramConfig::new("https://api.telegram.org", "123:abc", "42"),
        );

        assert_eq!(notifier.send_message_url(), "https://api.telegram.org/bot123:abc/sendMessage");
    }

    #[test]
    fn test_reply_parsing() {
        let reply: TelegramReply =
            serde_json::from_str(r#"{"ok":false,"error_code":400,"description":"chat not found"}"#)
                .unwrap();

        assert!(!reply.ok);
        assert_eq!(reply.description.as_deref(), Some("chat not found"));
    }
}

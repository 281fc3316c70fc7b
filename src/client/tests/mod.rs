//! Test utilities and common test fixtures for client modules

use std::time::Duration;

use serde_json::json;

use crate::client::config::{ClientConfig, PollingConfig, TelegramConfig};


pub const STATUSES_PATH: &str = "/api/user_api/homework_statuses/";
pub const SEND_MESSAGE_PATH: &str = "/botbot-token/sendMessage";

/// Create a homework record as the API returns it
pub fn homework_json(name: &str, status: &str) -> serde_json::Value {
    json!({
        "id": 123,
        "status": status,
        "homework_name": name,
        "reviewer_comment": "Looks fine",
        "date_updated": "2023-11-14T22:13:20Z",
        "lesson_name": "Final project"
    })
}

/// Create a homework statuses response holding one record
pub fn statuses_response(name: &str, status: &str, current_date: i64) -> serde_json::Value {
    json!({
        "homeworks": [homework_json(name, status)],
        "current_date": current_date
    })
}

/// Create a successful Bot API reply
pub fn telegram_ok() -> serde_json::Value {
    json!({
        "ok": true,
        "result": { "message_id": 1, "chat": { "id": 42 }, "date": 1700000000 }
    })
}

/// Create a failed Bot API reply
pub fn telegram_error(code: u16, description: &str) -> serde_json::Value {
    json!({
        "ok": false,
        "error_code": code,
        "description": description
    })
}

pub fn test_polling_config() -> PollingConfig {
    PollingConfig { interval: Duration::from_millis(20) }
}

/// Mock HTTP server standing in for both the homework API and the Bot API
pub struct MockServer {
    pub server: wiremock::MockServer,
}

impl MockServer {
    /// Start a new mock server
    pub async fn start() -> Self {
        let server = wiremock::MockServer::start().await;
        Self { server }
    }

    /// Get the base URL of the mock server
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Create a test config pointing both clients to this mock server
    pub fn test_config(&self) -> ClientConfig {
        ClientConfig::new(
            format!("{}{}", self.base_url(), STATUSES_PATH),
            "test-token",
            TelegramConfig::new(self.base_url(), "bot-token", "42"),
        )
        .with_polling(test_polling_config())
    }

    /// Number of requests received on `path`
    pub async fn request_count(&self, path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == path)
            .count()
    }
}

#[cfg(test)]
#[allow(clippy::module_inception)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures() {
        let response = statuses_response("hw.zip", "approved", 1700000000);
        assert_eq!(response["homeworks"][0]["homework_name"], "hw.zip");
        assert_eq!(response["homeworks"][0]["status"], "approved");
        assert_eq!(response["current_date"], 1700000000);

        let error = telegram_error(400, "Bad Request: chat not found");
        assert_eq!(error["ok"], false);
        assert_eq!(error["description"], "Bad Request: chat not found");
    }
}

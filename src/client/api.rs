//! HTTP client for the Practicum homework statuses API

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{
    config::ClientConfig,
    error::{ClientError, Result},
};

/// Pure HTTP client for the homework API
#[derive(Debug, Clone)]
pub struct PracticumApi {
    client: Client,
    config: ClientConfig,
}

impl PracticumApi {
    /// Create a new homework API client
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request.timeout)
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self { client, config })
    }

    /// Get homework statuses updated since `from_date` (epoch seconds)
    #[instrument(skip(self))]
    pub async fn get_homework_statuses(&self, from_date: i64) -> Result<Value> {
        let response = self
            .authenticated_request()
            .query(&[("from_date", from_date)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Underlying connection pool, shared with the notifier
    pub fn http_client(&self) -> Client {
        self.client.clone()
    }

    /// Create authenticated request builder
    fn authenticated_request(&self) -> RequestBuilder {
        self.client
            .get(self.config.endpoint.as_str())
            .header("Authorization", format!("OAuth {}", self.config.practicum_token))
    }

    /// Handle HTTP response and decode the JSON body
    async fn handle_response(&self, response: Response) -> Result<Value> {
        let status = response.status();
        if status != StatusCode::OK {
            debug!(status = status.as_u16(), "Homework API answered with an error status");
            return Err(ClientError::UnexpectedStatus { status: status.as_u16() });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ClientError::json_parse(self.config.endpoint.as_str(), e))
    }
}

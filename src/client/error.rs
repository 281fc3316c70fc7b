//! Error types for homework polling and notification delivery

use std::error::Error as StdError;

use compact_str::{CompactString, ToCompactString};
use thiserror::Error;

/// Structured error types for a single poll cycle
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request to the homework API failed
    #[error("Error requesting the homework API: {0}")]
    Http(#[from] reqwest::Error),

    /// Homework API answered with a non-200 status
    #[error("Homework API returned HTTP {status}")]
    UnexpectedStatus { status: u16 },

    /// Response body was not valid JSON
    #[error("Failed to parse JSON response from {endpoint}: {source}")]
    JsonParse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response body is valid JSON but not an object
    #[error("API response is not a JSON object")]
    ResponseNotObject,

    /// A value in the response had the wrong JSON type
    #[error("API response field {field} is not a {expected}")]
    UnexpectedType { field: CompactString, expected: &'static str },

    /// A required key is absent from the response
    #[error("Missing \"{key}\" key in API response")]
    MissingKey { key: CompactString },

    /// The `homeworks` list is empty
    #[error("Homework list is empty")]
    EmptyHomeworks,

    /// Homework status outside the known verdicts
    #[error("Unknown homework status: {status}")]
    UnknownStatus { status: CompactString },

    /// Message could not be delivered to the chat
    #[error("Error sending message to telegram: {reason}")]
    Delivery { reason: CompactString },

    /// Configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration field validation failed
    #[error("Invalid {field}: {message}")]
    ConfigValidation { field: String, message: String },
}

/// Coarse classification used by the poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Validation,
    Domain,
    Delivery,
    Configuration,
}

impl ClientError {
    /// Create a JSON parsing error with endpoint context
    pub fn json_parse(endpoint: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonParse { endpoint: endpoint.into(), source }
    }

    /// Create a type mismatch error for a response field
    pub fn unexpected_type(field: impl Into<CompactString>, expected: &'static str) -> Self {
        Self::UnexpectedType { field: field.into(), expected }
    }

    /// Create a missing key error
    pub fn missing_key(key: impl Into<CompactString>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    /// Create an unknown status error
    pub fn unknown_status(status: impl Into<CompactString>) -> Self {
        Self::UnknownStatus { status: status.into() }
    }

    /// Create a delivery error
    pub fn delivery(reason: impl Into<CompactString>) -> Self {
        Self::Delivery { reason: reason.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a configuration field validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation { field: field.into(), message: message.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Http(_) | ClientError::UnexpectedStatus { .. } => ErrorKind::Transport,
            ClientError::JsonParse { .. }
            | ClientError::ResponseNotObject
            | ClientError::UnexpectedType { .. }
            | ClientError::MissingKey { .. }
            | ClientError::EmptyHomeworks => ErrorKind::Validation,
            ClientError::UnknownStatus { .. } => ErrorKind::Domain,
            ClientError::Delivery { .. } => ErrorKind::Delivery,
            ClientError::Config(_) | ClientError::ConfigValidation { .. } => {
                ErrorKind::Configuration
            },
        }
    }

    /// Whether the error text may be sent to the chat.
    ///
    /// Delivery failures stay local: reporting them would need another
    /// delivery through the same broken channel.
    pub fn is_forwardable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Delivery | ErrorKind::Configuration)
    }

    /// Check if this error must stop the process
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    /// Message followed by every underlying cause, joined with ": "
    pub fn report_text(&self) -> CompactString {
        error_chain(self)
    }
}

/// Renders `err` and its `source()` chain. Causes already contained in the
/// text so far are skipped.
pub fn error_chain(err: &(dyn StdError + 'static)) -> CompactString {
    let mut text = err.to_compact_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(cause_text.as_str()) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }

    text
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

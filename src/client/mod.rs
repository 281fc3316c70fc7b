//! Homework API and Telegram clients
//!
//! The API client fetches and decodes the homework statuses, the notifier
//! delivers messages, and the poller drives both on a fixed interval.

pub mod api;
pub mod config;
pub mod error;
pub mod poller;
pub mod telegram;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use config::ClientConfig;
pub use error::ClientError;
pub use poller::HomeworkPoller;

pub type Result<T> = std::result::Result<T, ClientError>;

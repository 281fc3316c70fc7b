//! The poll loop: fetch, validate, format and notify on change

use chrono::Utc;
use compact_str::CompactString;
use tokio::{sync::broadcast, time::sleep};
use tracing::{debug, error, info, instrument, warn};

use super::{
    api::PracticumApi,
    config::{ClientConfig, PollingConfig},
    error::{ClientError, Result},
    telegram::TelegramNotifier,
};
use crate::domain::{check_response, next_cursor, parse_status};

/// Everything the loop remembers between two cycles. Lives in memory only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    /// Lower bound (epoch seconds) of the next fetch window
    pub cursor: i64,
    /// Last status message delivered to the chat
    pub last_status: Option<CompactString>,
    /// Last error text delivered to the chat
    pub last_error: Option<CompactString>,
}

/// Result of a successful poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new status message was delivered
    Notified,
    /// Formatted message equals the last one sent; nothing delivered
    Unchanged,
}

/// Periodically polls the homework API and relays status changes
#[derive(Debug)]
pub struct HomeworkPoller {
    api: PracticumApi,
    notifier: TelegramNotifier,
    config: PollingConfig,
    state: PollState,
    shutdown_tx: broadcast::Sender<()>,
    shutdown_rx: broadcast::Receiver<()>,
}

impl HomeworkPoller {
    /// Create a new poller starting its fetch window at the current time
    pub fn new(api: PracticumApi, notifier: TelegramNotifier, config: PollingConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let state = PollState { cursor: Utc::now().timestamp(), ..PollState::default() };

        Self { api, notifier, config, state, shutdown_tx, shutdown_rx }
    }

    /// Build the API client and notifier from a validated configuration
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let api = PracticumApi::new(config.clone())?;
        let notifier = TelegramNotifier::new(api.http_client(), config.telegram);

        Ok(Self::new(api, notifier, config.polling))
    }

    /// Start the fetch window at `cursor` instead of now
    pub fn with_cursor(mut self, cursor: i64) -> Self {
        self.state.cursor = cursor;
        self
    }

    /// Run poll cycles until a shutdown signal arrives
    ///
    /// Failed cycles are reported and never end the loop; the same
    /// interval is slept after every cycle.
    #[instrument(skip(self), fields(interval = ?self.config.interval))]
    pub async fn start(mut self) {
        info!(cursor = self.state.cursor, "Starting homework poller");

        loop {
            match self.run_cycle().await {
                Ok(outcome) => debug!(?outcome, "Poll cycle finished"),
                Err(e) => self.report_failure(e).await,
            }

            tokio::select! {
                _ = sleep(self.config.interval) => {}
                _ = self.shutdown_rx.recv() => {
                    debug!("Poller received shutdown signal");
                    break;
                }
            }
        }

        info!("Homework poller stopped");
    }

    /// One fetch/validate/format/notify pass
    #[instrument(skip(self), fields(cursor = self.state.cursor))]
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let response = self.api.get_homework_statuses(self.state.cursor).await?;
        self.state.cursor = next_cursor(&response, self.state.cursor);

        let message = parse_status(check_response(&response)?)?;
        if self.state.last_status.as_ref() == Some(&message) {
            debug!("Homework status unchanged");
            return Ok(CycleOutcome::Unchanged);
        }

        self.notifier.send_message(&message).await?;
        self.state.last_status = Some(message);

        Ok(CycleOutcome::Notified)
    }

    /// Log a failed cycle and forward its text to the chat unless it was
    /// the last error sent or must stay local.
    pub async fn report_failure(&mut self, error: ClientError) {
        let text = error.report_text();
        error!(error = %text, kind = ?error.kind(), "Poll cycle failed");

        if !error.is_forwardable() {
            return;
        }

        if self.state.last_error.as_ref() == Some(&text) {
            debug!("Error already reported to chat");
            return;
        }

        match self.notifier.send_message(&text).await {
            Ok(()) => self.state.last_error = Some(text),
            Err(e) => warn!(error = %e, "Failed to forward error to chat"),
        }
    }

    /// Get a shutdown sender for external shutdown control
    pub fn shutdown_sender(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Get current polling configuration
    pub fn config(&self) -> &PollingConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::client::config::TelegramConfig;

    fn test_config() -> ClientConfig {
        ClientConfig::new(
            "https://practicum.example.com/api/user_api/homework_statuses/",
            "test-token",
            TelegramConfig::new("https://api.telegram.org", "bot-token", "42"),
        )
    }

    #[test]
    fn test_poller_creation() {
        let before = Utc::now().timestamp();
        let poller = HomeworkPoller::from_config(test_config()).unwrap();

        assert_eq!(poller.config().interval, Duration::from_secs(600));
        assert!(poller.state().cursor >= before);
        assert_eq!(poller.state().last_status, None);
        assert_eq!(poller.state().last_error, None);
    }

    #[test]
    fn test_with_cursor() {
        let poller = HomeworkPoller::from_config(test_config()).unwrap().with_cursor(1700000000);
        assert_eq!(poller.state().cursor, 1700000000);
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let mut config = test_config();
        config.telegram.token = "".into();

        let err = HomeworkPoller::from_config(config).unwrap_err();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_delivery_failures_are_not_forwarded() {
        let mut poller = HomeworkPoller::from_config(test_config()).unwrap();

        // would need the network if it tried to forward
        poller.report_failure(ClientError::delivery("chat not found")).await;

        assert_eq!(poller.state().last_error, None);
    }
}

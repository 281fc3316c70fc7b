use compact_str::CompactString;
use thiserror::Error;

use crate::client::ClientError;

pub type Result<T> = std::result::Result<T, BotError>;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("One or more environments are missing: {}", .0.join(", "))]
    MissingEnvironment(Vec<&'static str>),
    #[error("Failure reading configuration file: {0}")]
    ConfigError(CompactString),
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("{0}")]
    GeneralError(CompactString),
}

impl BotError {
    /// Startup can't continue past any of these
    pub fn is_configuration(&self) -> bool {
        match self {
            BotError::MissingEnvironment(_) | BotError::ConfigError(_) => true,
            BotError::Client(e) => e.is_fatal(),
            BotError::GeneralError(_) => false,
        }
    }
}

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::Level;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log level for console output
    pub console_level: Level,
    /// Log level for file output
    pub file_level: Level,
    /// Directory where log files should be written
    pub log_dir: Option<PathBuf>,
    /// Whether to enable JSON formatted logs for structured output
    pub json_format: bool,
    /// Whether to log to stderr
    pub console: bool,
    /// Maximum number of log files to keep for rotation
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_level: Level::INFO,
            file_level: Level::DEBUG,
            log_dir: Some(Self::default_log_dir()),
            json_format: false,
            console: true,
            max_files: 5,
        }
    }
}

impl LoggingConfig {
    /// Get the OS-appropriate default log directory
    pub fn default_log_dir() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "homework-bot") {
            // On Linux: ~/.cache/homework-bot
            proj_dirs.cache_dir().to_path_buf()
        } else {
            PathBuf::from("homework-bot-logs")
        }
    }

    /// Create logging configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = lookup("HOMEWORK_BOT_LOG_LEVEL") {
            config = config.with_level(&level);
        }

        if let Some(log_dir) = lookup("HOMEWORK_BOT_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(log_dir));
        }

        if lookup("HOMEWORK_BOT_NO_FILE_LOGS").is_some() {
            config.log_dir = None;
        }

        if lookup("HOMEWORK_BOT_NO_CONSOLE_LOGS").is_some() {
            config.console = false;
        }

        if lookup("HOMEWORK_BOT_JSON_LOGS").is_some() {
            config.json_format = true;
        }

        config
    }

    /// Apply a level name; "Off" disables both file and console output
    pub fn with_level(mut self, level: &str) -> Self {
        if level.eq_ignore_ascii_case("off") {
            self.log_dir = None;
            self.console = false;
        } else if let Ok(parsed) = level.parse::<Level>() {
            self.console_level = parsed;
            self.file_level = parsed;
        }
        self
    }
}

/// Initialize the logging system with the given configuration
pub fn init_logging(
    config: LoggingConfig,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let mut layers = vec![];
    let mut guard = None;

    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("homework-bot")
            .filename_suffix("log")
            .max_log_files(config.max_files)
            .build(log_dir)?;
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_file(true)
                .with_line_number(true)
                .with_filter(
                    EnvFilter::builder()
                        .with_default_directive(config.file_level.into())
                        .from_env_lossy(),
                )
                .boxed()
        } else {
            fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(
                    EnvFilter::builder()
                        .with_default_directive(config.file_level.into())
                        .from_env_lossy(),
                )
                .boxed()
        };

        layers.push(file_layer);
    }

    if config.console {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .with_filter(
                EnvFilter::builder()
                    .with_default_directive(config.console_level.into())
                    .from_env_lossy(),
            )
            .boxed();

        layers.push(console_layer);
    }

    tracing_subscriber::registry().with(layers).init();

    Ok(guard)
}

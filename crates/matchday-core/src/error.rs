//! Matchday error type — one enum for the whole pipeline.

use thiserror::Error;

/// Errors produced anywhere in the bot.
#[derive(Debug, Error)]
pub enum MatchdayError {
    /// Configuration loading/parsing failed.
    #[error("Config error: {0}")]
    Config(String),

    /// Fixture API fetch failed or returned malformed data.
    #[error("Source error: {0}")]
    Source(String),

    /// Notification delivery failed.
    #[error("Sink error: {0}")]
    Sink(String),

    /// State persistence failed.
    #[error("Store error: {0}")]
    Store(String),

    /// Underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, MatchdayError>;

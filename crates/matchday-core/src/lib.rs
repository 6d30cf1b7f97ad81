//! # Matchday Core
//!
//! Shared foundation for the matchday bot: configuration, error type,
//! the fixture domain model, and the trait seams (`FixtureSource`,
//! `NotificationSink`) that the source and channel crates implement.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::MatchdayConfig;
pub use error::{MatchdayError, Result};
pub use traits::{FixtureSource, NotificationSink};
pub use types::{
    EditOutcome, Embed, EventKind, Fixture, FixtureStatus, MatchEvent, Notification, Outcome,
    Score, Team, TeamLineup,
};

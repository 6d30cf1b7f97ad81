//! # Matchday Tracker
//!
//! The fixture lifecycle tracker and event-deduplication notifier.
//!
//! ## Architecture
//! ```text
//! Scheduler (tokio interval, single-flight)
//!   └── TrackerEngine::run_tick
//!         ├── FixtureSource::fetch_upcoming_fixture
//!         ├── fixture-id change → reset phase latches + sent keys
//!         ├── info / lineup / kickoff / live events / full time
//!         │     (each latch fires once, each send followed by a save)
//!         └── StateStore (atomic JSON file)
//!
//! Calendar loop (low frequency)
//!   └── TrackerEngine::sync_calendar — edit-or-repost upsert
//! ```

pub mod calendar;
pub mod dedup;
pub mod engine;
pub mod format;
pub mod lifecycle;
pub mod scheduler;
pub mod state;
pub mod store;

pub use engine::{TickReport, TrackerEngine, TrackerSettings};
pub use scheduler::{spawn_calendar, spawn_tracker};
pub use state::{ChannelCategory, TrackedFixture, event_key};
pub use store::StateStore;

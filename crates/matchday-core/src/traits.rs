//! Trait seams between the tracker and its external collaborators.
//! The tracker only ever sees these traits — concrete clients live in
//! `matchday-source` and `matchday-channels`, mocks live in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{EditOutcome, Fixture, MatchEvent, Notification, TeamLineup};

/// Supplies fixture data on demand.
#[async_trait]
pub trait FixtureSource: Send + Sync {
    /// The tracked team's next (or currently running) fixture, if any.
    async fn fetch_upcoming_fixture(&self, team_id: u64) -> Result<Option<Fixture>>;

    /// Published lineups for a fixture. Empty until the teams announce.
    async fn fetch_lineups(&self, fixture_id: u64) -> Result<Vec<TeamLineup>>;

    /// The fixture's event timeline, in feed order.
    async fn fetch_events(&self, fixture_id: u64) -> Result<Vec<MatchEvent>>;

    /// Full season schedule for a team.
    async fn fetch_season_fixtures(
        &self,
        team_id: u64,
        season: Option<u32>,
        league: Option<u64>,
    ) -> Result<Vec<Fixture>>;
}

/// Delivers notifications to a destination channel.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Send a message, returning a reference usable for later edits.
    async fn send_message(&self, channel: &str, message: &Notification) -> Result<String>;

    /// Edit a previously sent message in place.
    /// A vanished message is reported as `EditOutcome::NotFound`, not an error.
    async fn edit_message(
        &self,
        channel: &str,
        message_ref: &str,
        message: &Notification,
    ) -> Result<EditOutcome>;
}

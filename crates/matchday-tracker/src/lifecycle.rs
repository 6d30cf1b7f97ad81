//! Lifecycle transition guards.
//!
//! The phases SCHEDULED → LINEUP_READY → IN_PROGRESS → FINISHED are not one
//! enum: feeds report statuses out of order and a poll can miss a whole
//! phase, so each transition is an independently guarded one-way latch
//! evaluated against the raw status. A latched flag is never reset by a
//! status regression.

use matchday_core::types::{Fixture, FixtureStatus, TeamLineup};

use crate::state::{ChannelCategory, TrackedFixture};

/// The fixture announcement fires once while the match is still scheduled.
pub fn should_announce_info(state: &TrackedFixture, fixture: &Fixture) -> bool {
    fixture.status == FixtureStatus::NotStarted
        && !state.info_announced
        && state.channel(ChannelCategory::Info).is_some()
}

/// Whether this tick should ask the feed for lineups at all.
/// Not status-gated: lineups can appear well before kickoff and the flag
/// alone decides whether the announcement is still owed.
pub fn should_check_lineup(state: &TrackedFixture) -> bool {
    !state.lineup_announced && state.channel(ChannelCategory::Lineup).is_some()
}

/// Kickoff fires once on the first live first-half observation.
pub fn should_announce_kickoff(state: &TrackedFixture, fixture: &Fixture) -> bool {
    fixture.status == FixtureStatus::FirstHalf
        && !state.match_started
        && state.channel(ChannelCategory::Live).is_some()
}

/// Live events are only scanned while the clock runs.
pub fn should_scan_events(state: &TrackedFixture, fixture: &Fixture) -> bool {
    fixture.status.is_live() && state.channel(ChannelCategory::Live).is_some()
}

/// Full time fires once when the feed reports the match finished.
pub fn should_announce_full_time(state: &TrackedFixture, fixture: &Fixture) -> bool {
    fixture.status == FixtureStatus::Finished
        && !state.match_finished
        && state.channel(ChannelCategory::Live).is_some()
}

/// The tracked team's lineup, if already published. Absence defers the
/// announcement to a later tick; it is not an error.
pub fn find_team_lineup(lineups: &[TeamLineup], team_id: u64) -> Option<&TeamLineup> {
    lineups.iter().find(|l| l.team.id == team_id)
}

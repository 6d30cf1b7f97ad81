//! Tracker engine — runs the fetch → diff → notify → persist pipeline.
//!
//! Every observable side effect is followed by a store save, so a crash
//! mid-tick loses at most the notification whose marker was not yet
//! persisted (at-least-once delivery; duplicate risk is accepted and
//! bounded to that single message).

use std::sync::Arc;

use matchday_core::error::Result;
use matchday_core::traits::{FixtureSource, NotificationSink};
use matchday_core::types::{Fixture, Outcome};

use crate::dedup::select_new_events;
use crate::format;
use crate::lifecycle;
use crate::state::{ChannelCategory, TrackedFixture};
use crate::store::StateStore;

/// Static settings the engine needs per tick.
#[derive(Debug, Clone)]
pub struct TrackerSettings {
    /// The single tracked team.
    pub team_id: u64,
    /// UTC offset used when rendering times.
    pub utc_offset_hours: i32,
    /// Broadcast line for the fixture announcement.
    pub broadcast: String,
    /// Season filter for the calendar.
    pub season: Option<u32>,
    /// League filter for the calendar.
    pub league: Option<u64>,
}

/// What one tick did. Used for logging; failures are already contained.
#[derive(Debug, Default, Clone, Copy)]
pub struct TickReport {
    pub notifications_sent: u32,
    pub errors: u32,
}

/// The fixture lifecycle tracker.
pub struct TrackerEngine {
    source: Arc<dyn FixtureSource>,
    sink: Arc<dyn NotificationSink>,
    store: StateStore,
    state: TrackedFixture,
    settings: TrackerSettings,
}

impl TrackerEngine {
    /// Create an engine, loading persisted state from the store.
    pub fn new(
        source: Arc<dyn FixtureSource>,
        sink: Arc<dyn NotificationSink>,
        store: StateStore,
        settings: TrackerSettings,
    ) -> Self {
        let state = store.load();
        Self {
            source,
            sink,
            store,
            state,
            settings,
        }
    }

    /// Current state, for the admin surface.
    pub fn state(&self) -> &TrackedFixture {
        &self.state
    }

    /// Bind a notification category to a channel and persist the mapping.
    /// The only externally triggered mutation outside the tick pipeline.
    pub fn bind_channel(&mut self, category: ChannelCategory, channel: &str) -> Result<()> {
        self.state
            .channel_bindings
            .insert(category, channel.to_string());
        self.store.save(&self.state)?;
        tracing::info!("🔗 Channel bound: {} → {}", category.as_str(), channel);
        Ok(())
    }

    /// Run one tick of the pipeline. Sub-steps are evaluated in a fixed
    /// order (info → lineup → kickoff → live events → full time) and each
    /// failure is contained to its own step.
    pub async fn run_tick(&mut self) -> TickReport {
        let mut report = TickReport::default();

        let fixture = match self
            .source
            .fetch_upcoming_fixture(self.settings.team_id)
            .await
        {
            Ok(Some(fixture)) => fixture,
            Ok(None) => {
                tracing::debug!("No upcoming fixture for team {}", self.settings.team_id);
                return report;
            }
            Err(e) => {
                tracing::warn!("⚠️ Fixture fetch failed: {e}");
                report.errors += 1;
                return report;
            }
        };

        if self.state.adopt_fixture(fixture.id) {
            tracing::info!(
                "🆕 Tracking fixture {} ({} x {})",
                fixture.id,
                fixture.home.name,
                fixture.away.name
            );
            self.persist();
        }

        self.announce_info(&fixture, &mut report).await;
        self.announce_lineup(&fixture, &mut report).await;
        self.announce_kickoff(&fixture, &mut report).await;
        self.relay_live_events(&fixture, &mut report).await;
        self.announce_full_time(&fixture, &mut report).await;

        report
    }

    async fn announce_info(&mut self, fixture: &Fixture, report: &mut TickReport) {
        if !lifecycle::should_announce_info(&self.state, fixture) {
            return;
        }
        let channel = self.bound(ChannelCategory::Info);
        let message = format::match_info(
            fixture,
            &self.settings.broadcast,
            self.settings.utc_offset_hours,
        );
        let result = self.sink.send_message(&channel, &message).await;
        match result {
            Ok(_) => {
                self.state.info_announced = true;
                self.persist();
                report.notifications_sent += 1;
                tracing::info!("ℹ️ Fixture announcement sent");
            }
            Err(e) => {
                tracing::warn!("⚠️ Fixture announcement failed: {e}");
                report.errors += 1;
            }
        }
    }

    async fn announce_lineup(&mut self, fixture: &Fixture, report: &mut TickReport) {
        if !lifecycle::should_check_lineup(&self.state) {
            return;
        }
        let lineups = match self.source.fetch_lineups(fixture.id).await {
            Ok(lineups) => lineups,
            Err(e) => {
                tracing::warn!("⚠️ Lineup fetch failed: {e}");
                report.errors += 1;
                return;
            }
        };
        // Not published yet, or our team missing from the response: defer,
        // the flag stays unset and the next tick retries.
        let Some(lineup) = lifecycle::find_team_lineup(&lineups, self.settings.team_id) else {
            return;
        };
        let channel = self.bound(ChannelCategory::Lineup);
        let message = format::lineup_announcement(&lineup.team, &lineup.starting);
        let result = self.sink.send_message(&channel, &message).await;
        match result {
            Ok(_) => {
                self.state.lineup_announced = true;
                self.persist();
                report.notifications_sent += 1;
                tracing::info!("📋 Lineup announcement sent");
            }
            Err(e) => {
                tracing::warn!("⚠️ Lineup announcement failed: {e}");
                report.errors += 1;
            }
        }
    }

    async fn announce_kickoff(&mut self, fixture: &Fixture, report: &mut TickReport) {
        if !lifecycle::should_announce_kickoff(&self.state, fixture) {
            return;
        }
        let channel = self.bound(ChannelCategory::Live);
        let message = format::kickoff(fixture, self.settings.team_id);
        let result = self.sink.send_message(&channel, &message).await;
        match result {
            Ok(_) => {
                self.state.match_started = true;
                self.persist();
                report.notifications_sent += 1;
                tracing::info!("▶️ Kickoff announcement sent");
            }
            Err(e) => {
                tracing::warn!("⚠️ Kickoff announcement failed: {e}");
                report.errors += 1;
            }
        }
    }

    async fn relay_live_events(&mut self, fixture: &Fixture, report: &mut TickReport) {
        if !lifecycle::should_scan_events(&self.state, fixture) {
            return;
        }
        let events = match self.source.fetch_events(fixture.id).await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!("⚠️ Event fetch failed: {e}");
                report.errors += 1;
                return;
            }
        };

        let channel = self.bound(ChannelCategory::Live);
        let fresh = select_new_events(&events, &self.state);
        for (key, event) in fresh {
            let Some(message) = format::event_line(event, self.settings.team_id) else {
                continue;
            };
            let result = self.sink.send_message(&channel, &message).await;
            match result {
                Ok(_) => {
                    // Persist each key as it is delivered so a mid-batch
                    // crash re-delivers only the remainder.
                    self.state.mark_sent(key);
                    self.persist();
                    report.notifications_sent += 1;
                }
                Err(e) => {
                    tracing::warn!("⚠️ Event delivery failed, rest of batch deferred: {e}");
                    report.errors += 1;
                    return;
                }
            }
        }
    }

    async fn announce_full_time(&mut self, fixture: &Fixture, report: &mut TickReport) {
        if !lifecycle::should_announce_full_time(&self.state, fixture) {
            return;
        }
        let channel = self.bound(ChannelCategory::Live);
        let outcome = Outcome::for_team(fixture, self.settings.team_id);
        let message = format::full_time(fixture, self.settings.team_id, outcome);
        let result = self.sink.send_message(&channel, &message).await;
        match result {
            Ok(_) => {
                self.state.match_finished = true;
                // Retention: the sent-key set only matters while the match is live.
                self.state.sent_event_keys.clear();
                self.persist();
                report.notifications_sent += 1;
                tracing::info!("⏹️ Full-time announcement sent ({outcome:?})");
            }
            Err(e) => {
                tracing::warn!("⚠️ Full-time announcement failed: {e}");
                report.errors += 1;
            }
        }
    }

    /// The bound channel for a category. Callers only reach this after a
    /// lifecycle guard confirmed the binding exists.
    fn bound(&self, category: ChannelCategory) -> String {
        self.state.channel(category).unwrap_or_default().to_string()
    }

    pub(crate) fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.state) {
            tracing::warn!("⚠️ Failed to save state: {e}");
        }
    }

    pub(crate) fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub(crate) fn source(&self) -> &Arc<dyn FixtureSource> {
        &self.source
    }

    pub(crate) fn sink(&self) -> &Arc<dyn NotificationSink> {
        &self.sink
    }

    pub(crate) fn state_mut(&mut self) -> &mut TrackedFixture {
        &mut self.state
    }
}

//! Season calendar synchronizer — keeps one schedule message up to date.
//!
//! Separate from the live-tracking path and driven on a lower cadence.
//! The stored message reference is never assumed valid: an edit that comes
//! back not-found falls through to a fresh post and the reference heals.

use std::sync::Arc;

use matchday_core::error::Result;
use matchday_core::types::EditOutcome;

use crate::engine::TrackerEngine;
use crate::format;
use crate::state::ChannelCategory;

impl TrackerEngine {
    /// Fetch the season schedule and upsert the calendar message.
    /// No calendar binding or an empty schedule is a quiet no-op.
    pub async fn sync_calendar(&mut self) -> Result<()> {
        let Some(channel) = self.state().channel(ChannelCategory::Calendar) else {
            return Ok(());
        };
        let channel = channel.to_string();

        let settings = self.settings().clone();
        let source = Arc::clone(self.source());
        let fixtures = source
            .fetch_season_fixtures(settings.team_id, settings.season, settings.league)
            .await?;
        if fixtures.is_empty() {
            tracing::debug!("Season schedule empty, calendar unchanged");
            return Ok(());
        }

        let message = format::season_calendar(&fixtures, settings.utc_offset_hours);
        let sink = Arc::clone(self.sink());

        if let Some(message_ref) = self.state().calendar_message_ref.clone() {
            match sink.edit_message(&channel, &message_ref, &message).await? {
                EditOutcome::Edited => {
                    tracing::info!("📅 Calendar updated in place ({} fixtures)", fixtures.len());
                    return Ok(());
                }
                EditOutcome::NotFound => {
                    tracing::info!("📅 Calendar message vanished, reposting");
                }
            }
        }

        let new_ref = sink.send_message(&channel, &message).await?;
        self.state_mut().calendar_message_ref = Some(new_ref);
        self.persist();
        tracing::info!("📅 Calendar posted ({} fixtures)", fixtures.len());
        Ok(())
    }
}

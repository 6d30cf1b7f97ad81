//! Tracked-fixture state — the single persisted record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use matchday_core::types::MatchEvent;

/// Notification category a channel can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelCategory {
    Info,
    Lineup,
    Live,
    Mvp,
    Calendar,
}

impl ChannelCategory {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "info" => Some(Self::Info),
            "lineup" => Some(Self::Lineup),
            "live" => Some(Self::Live),
            "mvp" => Some(Self::Mvp),
            "calendar" => Some(Self::Calendar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Lineup => "lineup",
            Self::Live => "live",
            Self::Mvp => "mvp",
            Self::Calendar => "calendar",
        }
    }
}

/// Lifecycle state of the single fixture being tracked.
///
/// Phase flags are one-way latches: each flips false→true at most once per
/// fixture and only a fixture-id change resets them. Channel bindings and
/// the calendar message reference survive fixture changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackedFixture {
    #[serde(default)]
    pub fixture_id: Option<u64>,
    #[serde(default)]
    pub info_announced: bool,
    #[serde(default)]
    pub lineup_announced: bool,
    #[serde(default)]
    pub match_started: bool,
    #[serde(default)]
    pub match_finished: bool,
    /// Keys of in-game events already notified, insertion order.
    #[serde(default)]
    pub sent_event_keys: Vec<String>,
    #[serde(default)]
    pub channel_bindings: BTreeMap<ChannelCategory, String>,
    #[serde(default)]
    pub calendar_message_ref: Option<String>,
}

impl TrackedFixture {
    /// Point the state at `fixture_id`. A different id wholesale discards
    /// phase latches and sent keys; bindings and the calendar ref remain.
    /// Returns true if the fixture was replaced.
    pub fn adopt_fixture(&mut self, fixture_id: u64) -> bool {
        if self.fixture_id == Some(fixture_id) {
            return false;
        }
        self.fixture_id = Some(fixture_id);
        self.info_announced = false;
        self.lineup_announced = false;
        self.match_started = false;
        self.match_finished = false;
        self.sent_event_keys.clear();
        true
    }

    /// Bound channel for a category, if configured.
    pub fn channel(&self, category: ChannelCategory) -> Option<&str> {
        self.channel_bindings.get(&category).map(String::as_str)
    }

    pub fn has_sent(&self, key: &str) -> bool {
        self.sent_event_keys.iter().any(|k| k == key)
    }

    /// Record an event key as sent. Idempotent.
    pub fn mark_sent(&mut self, key: String) {
        if !self.has_sent(&key) {
            self.sent_event_keys.push(key);
        }
    }
}

/// Deterministic dedup key for an in-game event.
/// Derived only from (minute, kind, player, team) so repeated fetches of the
/// same underlying event always agree, regardless of list order.
pub fn event_key(event: &MatchEvent) -> String {
    format!(
        "{}-{}-{}-{}",
        event.elapsed,
        event.kind.key_label(),
        event.player.as_deref().unwrap_or(""),
        event.team.id
    )
}

//! Fixture domain model — what the bot tracks and what it sends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single scheduled match as reported by the fixture API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub id: u64,
    /// Kickoff time in UTC.
    pub kickoff: DateTime<Utc>,
    pub status: FixtureStatus,
    pub venue: Option<String>,
    pub league: Option<String>,
    pub home: Team,
    pub away: Team,
    pub goals: Score,
}

/// A participating team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
}

/// Current scoreline. `None` before the match starts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Score {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

/// Fixture status, mapped from the feed's short codes.
/// Unknown codes are carried verbatim so new upstream statuses never break a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixtureStatus {
    NotStarted,
    FirstHalf,
    HalfTime,
    SecondHalf,
    ExtraTime,
    Penalties,
    Finished,
    Other(String),
}

impl FixtureStatus {
    /// Map an api-football short status code.
    pub fn from_short(code: &str) -> Self {
        match code {
            "NS" => Self::NotStarted,
            "1H" => Self::FirstHalf,
            "HT" => Self::HalfTime,
            "2H" => Self::SecondHalf,
            "ET" => Self::ExtraTime,
            "P" => Self::Penalties,
            // AET/PEN are post-match codes for games decided after 90'
            "FT" | "AET" | "PEN" => Self::Finished,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether the clock is running and live events should be scanned.
    /// Half time is deliberately excluded — the event scan pauses with the match.
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            Self::FirstHalf | Self::SecondHalf | Self::ExtraTime | Self::Penalties
        )
    }
}

/// An in-game event from the fixture timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Match minute.
    pub elapsed: i64,
    pub team: Team,
    pub player: Option<String>,
    /// Secondary participant — the player leaving on a substitution.
    pub assist: Option<String>,
    pub kind: EventKind,
}

/// Event category. Feeds add categories over time, so unknown kinds are
/// carried as `Other` and silently skipped by the notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Goal,
    YellowCard,
    RedCard,
    Substitution,
    Other(String),
}

impl EventKind {
    /// Stable label used in dedup keys. Matches the feed's type string so
    /// keys stay identical across restarts and refetches.
    pub fn key_label(&self) -> &str {
        match self {
            Self::Goal => "Goal",
            Self::YellowCard | Self::RedCard => "Card",
            Self::Substitution => "Substitution",
            Self::Other(s) => s,
        }
    }
}

/// A team's published lineup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamLineup {
    pub team: Team,
    /// Starting XI player names, feed order.
    pub starting: Vec<String>,
}

/// Final result relative to the tracked team, independent of home/away side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    /// Classify a finished fixture from the perspective of `team_id`.
    pub fn for_team(fixture: &Fixture, team_id: u64) -> Self {
        let home = fixture.goals.home.unwrap_or(0);
        let away = fixture.goals.away.unwrap_or(0);
        if home == away {
            return Self::Draw;
        }
        let home_won = home > away;
        let tracked_is_home = fixture.home.id == team_id;
        if home_won == tracked_is_home {
            Self::Win
        } else {
            Self::Loss
        }
    }
}

/// A channel-ready message. Pure data — rendering to wire JSON is the sink's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub content: Option<String>,
    pub embed: Option<Embed>,
    /// Ping the configured supporters role on delivery. Set for the embed
    /// announcements; plain in-game event lines never ping.
    #[serde(default)]
    pub mention: bool,
}

impl Notification {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embed: None,
            mention: false,
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            content: None,
            embed: Some(embed),
            mention: true,
        }
    }
}

/// A rich embed — title, body, optional fields, accent color.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    /// (name, value) pairs rendered as embed fields.
    pub fields: Vec<(String, String)>,
    /// 0xRRGGBB accent color.
    pub color: u32,
}

/// Result of editing a previously sent message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Edited,
    /// The referenced message no longer exists — caller should repost.
    NotFound,
}

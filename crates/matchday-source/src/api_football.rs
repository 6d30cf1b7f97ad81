//! api-football v3 client — fixtures, lineups, and event timelines.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use matchday_core::config::SourceConfig;
use matchday_core::error::{MatchdayError, Result};
use matchday_core::traits::FixtureSource;
use matchday_core::types::{
    EventKind, Fixture, FixtureStatus, MatchEvent, Score, Team, TeamLineup,
};

/// HTTP client for v3.football.api-sports.io.
pub struct ApiFootballClient {
    config: SourceConfig,
    client: reqwest::Client,
}

impl ApiFootballClient {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse<T>> {
        let response = self
            .client
            .get(self.api_url(path))
            .header("x-apisports-key", &self.config.api_key)
            .query(query)
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| MatchdayError::Source(format!("Request to {path} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(MatchdayError::Source(format!(
                "Feed returned {} for {path}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| MatchdayError::Source(format!("Invalid response from {path}: {e}")))
    }
}

#[async_trait]
impl FixtureSource for ApiFootballClient {
    async fn fetch_upcoming_fixture(&self, team_id: u64) -> Result<Option<Fixture>> {
        let body: ApiResponse<FixtureEnvelope> = self
            .get(
                "/fixtures",
                &[
                    ("team", team_id.to_string()),
                    ("next", "1".into()),
                    ("timezone", self.config.timezone.clone()),
                ],
            )
            .await?;
        Ok(body.response.into_iter().next().map(Fixture::from))
    }

    async fn fetch_lineups(&self, fixture_id: u64) -> Result<Vec<TeamLineup>> {
        let body: ApiResponse<LineupEnvelope> = self
            .get("/fixtures/lineups", &[("fixture", fixture_id.to_string())])
            .await?;
        Ok(body.response.into_iter().map(TeamLineup::from).collect())
    }

    async fn fetch_events(&self, fixture_id: u64) -> Result<Vec<MatchEvent>> {
        let body: ApiResponse<EventEnvelope> = self
            .get("/fixtures/events", &[("fixture", fixture_id.to_string())])
            .await?;
        Ok(body.response.into_iter().map(MatchEvent::from).collect())
    }

    async fn fetch_season_fixtures(
        &self,
        team_id: u64,
        season: Option<u32>,
        league: Option<u64>,
    ) -> Result<Vec<Fixture>> {
        let mut query = vec![
            ("team", team_id.to_string()),
            ("timezone", self.config.timezone.clone()),
        ];
        if let Some(season) = season {
            query.push(("season", season.to_string()));
        }
        if let Some(league) = league {
            query.push(("league", league.to_string()));
        }
        let body: ApiResponse<FixtureEnvelope> = self.get("/fixtures", &query).await?;
        Ok(body.response.into_iter().map(Fixture::from).collect())
    }
}

// --- api-football wire types ---

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(default = "Vec::new")]
    response: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct FixtureEnvelope {
    fixture: FixtureBlock,
    #[serde(default)]
    league: Option<LeagueBlock>,
    teams: TeamsBlock,
    #[serde(default)]
    goals: GoalsBlock,
}

#[derive(Debug, Deserialize)]
struct FixtureBlock {
    id: u64,
    date: String,
    status: StatusBlock,
    #[serde(default)]
    venue: Option<VenueBlock>,
}

#[derive(Debug, Deserialize)]
struct StatusBlock {
    short: String,
}

#[derive(Debug, Deserialize)]
struct VenueBlock {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LeagueBlock {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TeamsBlock {
    home: TeamBlock,
    away: TeamBlock,
}

#[derive(Debug, Clone, Deserialize)]
struct TeamBlock {
    id: u64,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GoalsBlock {
    #[serde(default)]
    home: Option<u32>,
    #[serde(default)]
    away: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct LineupEnvelope {
    team: TeamBlock,
    #[serde(default, rename = "startXI")]
    start_xi: Vec<LineupSlot>,
}

#[derive(Debug, Deserialize)]
struct LineupSlot {
    player: PlayerBlock,
}

#[derive(Debug, Default, Deserialize)]
struct PlayerBlock {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventEnvelope {
    time: TimeBlock,
    team: TeamBlock,
    #[serde(default)]
    player: Option<PlayerBlock>,
    #[serde(default)]
    assist: Option<PlayerBlock>,
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TimeBlock {
    #[serde(default)]
    elapsed: i64,
}

impl From<TeamBlock> for Team {
    fn from(block: TeamBlock) -> Self {
        Self {
            id: block.id,
            name: block.name.unwrap_or_default(),
        }
    }
}

impl From<FixtureEnvelope> for Fixture {
    fn from(env: FixtureEnvelope) -> Self {
        let kickoff = DateTime::parse_from_rfc3339(&env.fixture.date)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());
        Self {
            id: env.fixture.id,
            kickoff,
            status: FixtureStatus::from_short(&env.fixture.status.short),
            venue: env.fixture.venue.and_then(|v| v.name),
            league: env.league.and_then(|l| l.name),
            home: env.teams.home.into(),
            away: env.teams.away.into(),
            goals: Score {
                home: env.goals.home,
                away: env.goals.away,
            },
        }
    }
}

impl From<LineupEnvelope> for TeamLineup {
    fn from(env: LineupEnvelope) -> Self {
        Self {
            team: env.team.into(),
            starting: env
                .start_xi
                .into_iter()
                .filter_map(|slot| slot.player.name)
                .collect(),
        }
    }
}

impl From<EventEnvelope> for MatchEvent {
    fn from(env: EventEnvelope) -> Self {
        let kind = match env.event_type.as_str() {
            "Goal" => EventKind::Goal,
            "Card" => match env.detail.as_deref() {
                Some("Yellow Card") => EventKind::YellowCard,
                Some("Red Card") => EventKind::RedCard,
                // Second yellows and VAR-overturned cards arrive with other
                // detail strings; they are carried but not notified.
                _ => EventKind::Other(env.event_type.clone()),
            },
            "subst" | "Substitution" => EventKind::Substitution,
            other => EventKind::Other(other.to_string()),
        };
        Self {
            elapsed: env.time.elapsed,
            team: env.team.into(),
            player: env.player.and_then(|p| p.name),
            assist: env.assist.and_then(|a| a.name),
            kind,
        }
    }
}

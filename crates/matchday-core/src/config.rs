//! Matchday configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MatchdayError, Result};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchdayConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl Default for MatchdayConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            discord: DiscordConfig::default(),
            tracker: TrackerConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl MatchdayConfig {
    /// Load config from the default path (~/.matchday/config.toml).
    /// Missing file means defaults; secrets can still arrive via env.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MatchdayError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| MatchdayError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| MatchdayError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Secrets from the environment win over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("MATCHDAY_DISCORD_TOKEN")
            && !token.is_empty()
        {
            self.discord.bot_token = token;
        }
        if let Ok(key) = std::env::var("MATCHDAY_API_KEY")
            && !key.is_empty()
        {
            self.source.api_key = key;
        }
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the matchday home directory (~/.matchday).
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".matchday")
    }
}

/// Fixture API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// api-sports key, usually injected via MATCHDAY_API_KEY.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// The single tracked team.
    #[serde(default = "default_team_id")]
    pub team_id: u64,
    /// IANA timezone name passed through to the feed's query params.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// UTC offset in hours used when rendering kickoff times.
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i32,
    /// Season filter for the calendar (feed default when unset).
    #[serde(default)]
    pub season: Option<u32>,
    /// League filter for the calendar (all leagues when unset).
    #[serde(default)]
    pub league: Option<u64>,
}

fn default_base_url() -> String {
    "https://v3.football.api-sports.io".into()
}
fn default_team_id() -> u64 {
    128
}
fn default_timezone() -> String {
    "America/Sao_Paulo".into()
}
fn default_utc_offset() -> i32 {
    -3
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            team_id: default_team_id(),
            timezone: default_timezone(),
            utc_offset_hours: default_utc_offset(),
            season: None,
            league: None,
        }
    }
}

/// Discord delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Bot token, usually injected via MATCHDAY_DISCORD_TOKEN.
    #[serde(default)]
    pub bot_token: String,
    #[serde(default = "default_discord_api")]
    pub api_base: String,
    /// Supporters role pinged on announcements, if configured.
    #[serde(default)]
    pub mention_role_id: Option<u64>,
}

fn default_discord_api() -> String {
    "https://discord.com/api/v10".into()
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_base: default_discord_api(),
            mention_role_id: None,
        }
    }
}

/// Tracker cadence and persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Seconds between ticks.
    #[serde(default = "default_poll_secs")]
    pub poll_interval_secs: u64,
    /// Seconds between season-calendar refreshes.
    #[serde(default = "default_calendar_secs")]
    pub calendar_refresh_secs: u64,
    /// State file location.
    #[serde(default = "default_state_path")]
    pub state_path: String,
    /// Broadcast line shown in the fixture announcement.
    #[serde(default = "default_broadcast")]
    pub broadcast: String,
}

fn default_poll_secs() -> u64 {
    60
}
fn default_calendar_secs() -> u64 {
    6 * 3600
}
fn default_state_path() -> String {
    "~/.matchday/state.json".into()
}
fn default_broadcast() -> String {
    "Premiere / SporTV".into()
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_secs(),
            calendar_refresh_secs: default_calendar_secs(),
            state_path: default_state_path(),
            broadcast: default_broadcast(),
        }
    }
}

/// HTTP health/admin server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    10000
}
fn default_host() -> String {
    "0.0.0.0".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MatchdayConfig::default();
        assert_eq!(config.source.team_id, 128);
        assert_eq!(config.tracker.poll_interval_secs, 60);
        assert_eq!(config.gateway.port, 10000);
        assert!(config.discord.mention_role_id.is_none());
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            [source]
            team_id = 131
            season = 2026

            [discord]
            mention_role_id = 424242

            [tracker]
            poll_interval_secs = 30
        "#;

        let config: MatchdayConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.source.team_id, 131);
        assert_eq!(config.source.season, Some(2026));
        assert_eq!(config.discord.mention_role_id, Some(424242));
        assert_eq!(config.tracker.poll_interval_secs, 30);
        // Untouched sections keep defaults
        assert_eq!(config.gateway.port, 10000);
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let toml_str = "";
        let config: MatchdayConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.source.base_url, "https://v3.football.api-sports.io");
        assert_eq!(config.tracker.calendar_refresh_secs, 6 * 3600);
    }

    #[test]
    fn test_home_dir() {
        let home = MatchdayConfig::home_dir();
        assert!(home.to_string_lossy().contains("matchday"));
    }
}

//! # Matchday Bot
//!
//! Tracks a team's next fixture via the api-football feed and posts
//! lifecycle and live-event notifications to bound Discord channels.
//!
//! Usage:
//!   matchday                          # run with ~/.matchday/config.toml
//!   matchday --config ./dev.toml      # explicit config file
//!   matchday --poll-secs 30           # faster tick cadence

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use matchday_channels::DiscordSink;
use matchday_core::MatchdayConfig;
use matchday_source::ApiFootballClient;
use matchday_tracker::{StateStore, TrackerEngine, TrackerSettings};

#[derive(Parser)]
#[command(
    name = "matchday",
    version,
    about = "⚽ Matchday — fixture tracker and Discord notifier"
)]
struct Cli {
    /// Config file path (default: ~/.matchday/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Gateway port override
    #[arg(short, long)]
    port: Option<u16>,

    /// Tick interval override in seconds
    #[arg(long)]
    poll_secs: Option<u64>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug,hyper=info,reqwest=info"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            let path = PathBuf::from(shellexpand::tilde(path).to_string());
            let mut config = MatchdayConfig::load_from(&path)?;
            config.apply_env_overrides();
            config
        }
        None => MatchdayConfig::load()?,
    };
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }
    if let Some(poll_secs) = cli.poll_secs {
        config.tracker.poll_interval_secs = poll_secs;
    }

    if config.source.api_key.is_empty() {
        tracing::warn!("⚠️ No fixture API key configured (MATCHDAY_API_KEY)");
    }
    if config.discord.bot_token.is_empty() {
        tracing::warn!("⚠️ No Discord bot token configured (MATCHDAY_DISCORD_TOKEN)");
    }

    tracing::info!(
        "⚽ Matchday starting — team {} every {}s",
        config.source.team_id,
        config.tracker.poll_interval_secs
    );

    let source = Arc::new(ApiFootballClient::new(config.source.clone()));
    let sink = Arc::new(DiscordSink::new(config.discord.clone()));
    let state_path = PathBuf::from(shellexpand::tilde(&config.tracker.state_path).to_string());
    let store = StateStore::new(&state_path);

    let settings = TrackerSettings {
        team_id: config.source.team_id,
        utc_offset_hours: config.source.utc_offset_hours,
        broadcast: config.tracker.broadcast.clone(),
        season: config.source.season,
        league: config.source.league,
    };
    let engine = Arc::new(Mutex::new(TrackerEngine::new(source, sink, store, settings)));

    {
        let bound = engine.lock().await.state().channel_bindings.len();
        tracing::info!("🔗 {bound} channel binding(s) loaded");
    }

    let tick_engine = engine.clone();
    let poll_secs = config.tracker.poll_interval_secs;
    tokio::spawn(async move {
        matchday_tracker::spawn_tracker(tick_engine, poll_secs).await;
    });

    let calendar_engine = engine.clone();
    let calendar_secs = config.tracker.calendar_refresh_secs;
    tokio::spawn(async move {
        matchday_tracker::spawn_calendar(calendar_engine, calendar_secs).await;
    });

    matchday_gateway::start(&config.gateway, engine).await
}

//! Notification formatting — pure functions from tracker inputs to
//! channel-ready messages. No I/O here; delivery belongs to the sink.
//!
//! The perspective team id only picks the affiliation emoji pair, it never
//! changes which events get reported.

use chrono::{DateTime, FixedOffset, Utc};

use matchday_core::types::{
    Embed, EventKind, Fixture, MatchEvent, Notification, Outcome, Team,
};

/// Placeholder for a venue the feed did not provide.
pub const UNKNOWN_VENUE: &str = "Não informado";

const TRACKED_EMOJI: &str = "🔵⚪";
const OPPONENT_EMOJI: &str = "🔴⚪";

const COLOR_INFO: u32 = 0x000000;
const COLOR_LINEUP: u32 = 0xFFFFFF;
const COLOR_WIN: u32 = 0x00FF00;
const COLOR_LOSS: u32 = 0xFF0000;
const COLOR_DRAW: u32 = 0xFFFF00;
const COLOR_CALENDAR: u32 = 0x0000FF;

/// Render a UTC instant in the configured local offset.
fn local_time(instant: DateTime<Utc>, utc_offset_hours: i32) -> String {
    let offset = FixedOffset::east_opt(utc_offset_hours * 3600)
        .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
    instant
        .with_timezone(&offset)
        .format("%d/%m/%Y %H:%M")
        .to_string()
}

/// The tracked team's side of the fixture (falls back to home if the feed
/// ever hands us a fixture we are not part of).
fn perspective_team(fixture: &Fixture, team_id: u64) -> &Team {
    if fixture.away.id == team_id {
        &fixture.away
    } else {
        &fixture.home
    }
}

fn team_emoji(event_team_id: u64, tracked_team_id: u64) -> &'static str {
    if event_team_id == tracked_team_id {
        TRACKED_EMOJI
    } else {
        OPPONENT_EMOJI
    }
}

/// Pre-match fixture announcement: teams, kickoff, venue, broadcast.
pub fn match_info(fixture: &Fixture, broadcast: &str, utc_offset_hours: i32) -> Notification {
    Notification::embed(Embed {
        title: "ℹ️ INFORMAÇÕES DO JOGO".into(),
        description: String::new(),
        fields: vec![
            (
                "🆚 Confronto".into(),
                format!("{} x {}", fixture.home.name, fixture.away.name),
            ),
            (
                "📅 Data e Hora".into(),
                local_time(fixture.kickoff, utc_offset_hours),
            ),
            (
                "📍 Estádio".into(),
                fixture.venue.clone().unwrap_or_else(|| UNKNOWN_VENUE.into()),
            ),
            ("📺 Transmissão".into(), broadcast.into()),
        ],
        color: COLOR_INFO,
    })
}

/// Starting XI announcement.
pub fn lineup_announcement(team: &Team, starting: &[String]) -> Notification {
    Notification::embed(Embed {
        title: format!("📋 ESCALAÇÃO — {}", team.name.to_uppercase()),
        description: starting.join("\n"),
        fields: vec![],
        color: COLOR_LINEUP,
    })
}

/// Kickoff message.
pub fn kickoff(fixture: &Fixture, team_id: u64) -> Notification {
    let team = perspective_team(fixture, team_id);
    Notification::embed(Embed {
        title: "▶️ BOLA ROLANDO!".into(),
        description: format!("O {} já está em campo!", team.name),
        fields: vec![],
        color: COLOR_WIN,
    })
}

/// One live-event line. Unknown kinds yield nothing.
pub fn event_line(event: &MatchEvent, tracked_team_id: u64) -> Option<Notification> {
    let emoji = team_emoji(event.team.id, tracked_team_id);
    let player = event.player.as_deref().unwrap_or("—");
    let text = match &event.kind {
        EventKind::Goal => format!(
            "⚽ **GOL!** {emoji}\n{}\n👤 {player}\n⏱️ {}'",
            event.team.name, event.elapsed
        ),
        EventKind::YellowCard => {
            format!("🟨 Cartão amarelo\n{emoji} {player}\n⏱️ {}'", event.elapsed)
        }
        EventKind::RedCard => {
            format!("🟥 Cartão vermelho\n{emoji} {player}\n⏱️ {}'", event.elapsed)
        }
        EventKind::Substitution => format!(
            "🔁 **Substituição** {emoji}\nSai ⛔ {}\nEntra ✅ {player}\n⏱️ {}'",
            event.assist.as_deref().unwrap_or("—"),
            event.elapsed
        ),
        EventKind::Other(_) => return None,
    };
    Some(Notification::text(text))
}

/// Full-time summary with the result classified for the tracked team.
pub fn full_time(fixture: &Fixture, team_id: u64, outcome: Outcome) -> Notification {
    let team = perspective_team(fixture, team_id);
    let (headline, color) = match outcome {
        Outcome::Win => (
            format!("🏆 **VITÓRIA DO {}!** {TRACKED_EMOJI}", team.name.to_uppercase()),
            COLOR_WIN,
        ),
        Outcome::Loss => (
            format!("❌ **DERROTA DO {}**", team.name.to_uppercase()),
            COLOR_LOSS,
        ),
        Outcome::Draw => ("🤝 **EMPATE!**".to_string(), COLOR_DRAW),
    };
    Notification::embed(Embed {
        title: "⏹️ FIM DE JOGO".into(),
        description: format!(
            "{headline}\n\n{} {} x {} {}",
            fixture.home.name,
            fixture.goals.home.unwrap_or(0),
            fixture.goals.away.unwrap_or(0),
            fixture.away.name
        ),
        fields: vec![],
        color,
    })
}

/// The whole season schedule as one embed.
pub fn season_calendar(fixtures: &[Fixture], utc_offset_hours: i32) -> Notification {
    let mut description = String::new();
    for fixture in fixtures {
        description.push_str(&format!(
            "🆚 **{} x {}**\n🏆 {}\n📅 {}\n📍 {}\n\n",
            fixture.home.name,
            fixture.away.name,
            fixture.league.as_deref().unwrap_or("—"),
            local_time(fixture.kickoff, utc_offset_hours),
            fixture.venue.as_deref().unwrap_or(UNKNOWN_VENUE),
        ));
    }
    Notification::embed(Embed {
        title: "📅 Calendário da Temporada".into(),
        description,
        fields: vec![],
        color: COLOR_CALENDAR,
    })
}

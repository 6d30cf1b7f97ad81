//! End-to-end pipeline tests with an in-memory source and sink.

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use matchday_core::error::{MatchdayError, Result};
use matchday_core::traits::{FixtureSource, NotificationSink};
use matchday_core::types::{
    EditOutcome, EventKind, Fixture, FixtureStatus, MatchEvent, Notification, Score, Team,
    TeamLineup,
};
use matchday_tracker::{ChannelCategory, StateStore, TrackerEngine, TrackerSettings};

const TRACKED: u64 = 128;
const OPPONENT: u64 = 131;

#[derive(Default)]
struct MockSource {
    fixture: StdMutex<Option<Fixture>>,
    lineups: StdMutex<Vec<TeamLineup>>,
    events: StdMutex<Vec<MatchEvent>>,
    season: StdMutex<Vec<Fixture>>,
}

#[async_trait]
impl FixtureSource for MockSource {
    async fn fetch_upcoming_fixture(&self, _team_id: u64) -> Result<Option<Fixture>> {
        Ok(self.fixture.lock().unwrap().clone())
    }
    async fn fetch_lineups(&self, _fixture_id: u64) -> Result<Vec<TeamLineup>> {
        Ok(self.lineups.lock().unwrap().clone())
    }
    async fn fetch_events(&self, _fixture_id: u64) -> Result<Vec<MatchEvent>> {
        Ok(self.events.lock().unwrap().clone())
    }
    async fn fetch_season_fixtures(
        &self,
        _team_id: u64,
        _season: Option<u32>,
        _league: Option<u64>,
    ) -> Result<Vec<Fixture>> {
        Ok(self.season.lock().unwrap().clone())
    }
}

#[derive(Default)]
struct MockSink {
    sent: StdMutex<Vec<(String, Notification)>>,
    edits: StdMutex<Vec<(String, String)>>,
    /// 0-based index of a send attempt that should fail.
    fail_on: StdMutex<Option<usize>>,
    attempts: AtomicU64,
    edit_not_found: StdMutex<bool>,
}

impl MockSink {
    /// Flatten each sent message to one searchable string: content, embed
    /// title/description, and every embed field value.
    fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, n)| {
                let mut text = n.content.clone().unwrap_or_default();
                if let Some(embed) = &n.embed {
                    text.push_str(&format!("\n{}\n{}", embed.title, embed.description));
                    for (name, value) in &embed.fields {
                        text.push_str(&format!("\n{name}: {value}"));
                    }
                }
                text
            })
            .collect()
    }

    fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationSink for MockSink {
    async fn send_message(&self, channel: &str, message: &Notification) -> Result<String> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) as usize;
        if *self.fail_on.lock().unwrap() == Some(attempt) {
            return Err(MatchdayError::Sink("injected failure".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel.to_string(), message.clone()));
        Ok(format!("msg-{attempt}"))
    }

    async fn edit_message(
        &self,
        channel: &str,
        message_ref: &str,
        _message: &Notification,
    ) -> Result<EditOutcome> {
        if *self.edit_not_found.lock().unwrap() {
            return Ok(EditOutcome::NotFound);
        }
        self.edits
            .lock()
            .unwrap()
            .push((channel.to_string(), message_ref.to_string()));
        Ok(EditOutcome::Edited)
    }
}

fn fixture(id: u64, status: FixtureStatus) -> Fixture {
    Fixture {
        id,
        kickoff: Utc.with_ymd_and_hms(2026, 8, 24, 19, 0, 0).unwrap(),
        status,
        venue: Some("Stadium X".into()),
        league: Some("Serie A".into()),
        home: Team {
            id: OPPONENT,
            name: "Team A".into(),
        },
        away: Team {
            id: TRACKED,
            name: "Team B".into(),
        },
        goals: Score::default(),
    }
}

fn goal(elapsed: i64, player: &str, team_id: u64) -> MatchEvent {
    MatchEvent {
        elapsed,
        team: Team {
            id: team_id,
            name: if team_id == TRACKED { "Team B" } else { "Team A" }.into(),
        },
        player: Some(player.into()),
        assist: None,
        kind: EventKind::Goal,
    }
}

struct Harness {
    source: Arc<MockSource>,
    sink: Arc<MockSink>,
    engine: TrackerEngine,
    dir: std::path::PathBuf,
}

impl Harness {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("matchday-pipeline-{name}"));
        std::fs::remove_dir_all(&dir).ok();
        let store = StateStore::new(&dir.join("state.json"));
        let source = Arc::new(MockSource::default());
        let sink = Arc::new(MockSink::default());
        let engine = TrackerEngine::new(
            source.clone(),
            sink.clone(),
            store,
            TrackerSettings {
                team_id: TRACKED,
                utc_offset_hours: -3,
                broadcast: "Premiere / SporTV".into(),
                season: Some(2026),
                league: None,
            },
        );
        Self {
            source,
            sink,
            engine,
            dir,
        }
    }

    fn bind(&mut self, categories: &[ChannelCategory]) {
        for (i, cat) in categories.iter().enumerate() {
            self.engine.bind_channel(*cat, &format!("chan-{i}")).unwrap();
        }
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.dir).ok();
    }
}

#[tokio::test]
async fn info_announcement_fires_once() {
    let mut h = Harness::new("info-once");
    h.bind(&[ChannelCategory::Info]);
    *h.source.fixture.lock().unwrap() = Some(fixture(1, FixtureStatus::NotStarted));

    let report = h.engine.run_tick().await;
    assert_eq!(report.notifications_sent, 1);
    assert!(h.engine.state().info_announced);

    let texts = h.sink.sent_texts();
    assert!(texts[0].contains("Team A") && texts[0].contains("Team B"));
    let embed = h.sink.sent.lock().unwrap()[0].1.embed.clone().unwrap();
    assert_eq!(embed.fields[1].1, "24/08/2026 16:00");
    assert_eq!(embed.fields[2].1, "Stadium X");

    // Identical snapshot on the next tick: nothing new.
    let report = h.engine.run_tick().await;
    assert_eq!(report.notifications_sent, 0);
    assert_eq!(h.sink.sent_count(), 1);
}

#[tokio::test]
async fn latches_survive_status_regression() {
    let mut h = Harness::new("regression");
    h.bind(&[ChannelCategory::Info, ChannelCategory::Live]);

    *h.source.fixture.lock().unwrap() = Some(fixture(1, FixtureStatus::NotStarted));
    h.engine.run_tick().await; // info
    *h.source.fixture.lock().unwrap() = Some(fixture(1, FixtureStatus::FirstHalf));
    h.engine.run_tick().await; // kickoff
    assert!(h.engine.state().match_started);
    let before = h.sink.sent_count();

    // Feed glitch: status regresses to "not started".
    *h.source.fixture.lock().unwrap() = Some(fixture(1, FixtureStatus::NotStarted));
    h.engine.run_tick().await;
    assert_eq!(h.sink.sent_count(), before);
    assert!(h.engine.state().info_announced);
    assert!(h.engine.state().match_started);
}

#[tokio::test]
async fn new_fixture_id_resets_flags_keeps_bindings() {
    let mut h = Harness::new("replacement");
    h.bind(&[ChannelCategory::Info]);

    *h.source.fixture.lock().unwrap() = Some(fixture(1, FixtureStatus::NotStarted));
    h.engine.run_tick().await;
    assert!(h.engine.state().info_announced);

    *h.source.fixture.lock().unwrap() = Some(fixture(2, FixtureStatus::NotStarted));
    let report = h.engine.run_tick().await;
    assert_eq!(report.notifications_sent, 1);
    assert_eq!(h.engine.state().fixture_id, Some(2));
    assert!(h.engine.state().channel(ChannelCategory::Info).is_some());
    assert_eq!(h.sink.sent_count(), 2);
}

#[tokio::test]
async fn duplicate_goal_in_one_fetch_notified_once() {
    let mut h = Harness::new("dup-goal");
    h.bind(&[ChannelCategory::Live]);
    *h.source.fixture.lock().unwrap() = Some(fixture(1, FixtureStatus::SecondHalf));
    *h.source.events.lock().unwrap() = vec![goal(10, "P1", TRACKED), goal(10, "P1", TRACKED)];

    let report = h.engine.run_tick().await;
    assert_eq!(report.notifications_sent, 1);
    assert_eq!(h.engine.state().sent_event_keys, vec!["10-Goal-P1-128"]);
}

#[tokio::test]
async fn partial_batch_resumes_at_failed_event() {
    let mut h = Harness::new("partial-batch");
    h.bind(&[ChannelCategory::Live]);
    *h.source.fixture.lock().unwrap() = Some(fixture(1, FixtureStatus::SecondHalf));
    *h.source.events.lock().unwrap() = vec![
        goal(10, "P1", TRACKED),
        goal(25, "P2", OPPONENT),
        goal(40, "P3", TRACKED),
    ];

    // Second send attempt fails mid-batch.
    *h.sink.fail_on.lock().unwrap() = Some(1);
    let report = h.engine.run_tick().await;
    assert_eq!(report.notifications_sent, 1);
    assert_eq!(report.errors, 1);
    assert_eq!(h.engine.state().sent_event_keys, vec!["10-Goal-P1-128"]);

    // Retry tick: only events 2 and 3 go out, no duplicate of event 1.
    *h.sink.fail_on.lock().unwrap() = None;
    let report = h.engine.run_tick().await;
    assert_eq!(report.notifications_sent, 2);
    let texts = h.sink.sent_texts();
    assert_eq!(texts.len(), 3);
    assert!(texts[0].contains("P1"));
    assert!(texts[1].contains("P2"));
    assert!(texts[2].contains("P3"));
}

#[tokio::test]
async fn kickoff_retried_after_delivery_failure() {
    let mut h = Harness::new("kickoff-retry");
    h.bind(&[ChannelCategory::Live]);
    *h.source.fixture.lock().unwrap() = Some(fixture(1, FixtureStatus::FirstHalf));

    // The bound channel is gone: the send fails and the flag stays unset.
    *h.sink.fail_on.lock().unwrap() = Some(0);
    let report = h.engine.run_tick().await;
    assert_eq!(report.errors, 1);
    assert!(!h.engine.state().match_started);

    // Channel recovers: the kickoff still goes out.
    *h.sink.fail_on.lock().unwrap() = None;
    let report = h.engine.run_tick().await;
    assert_eq!(report.notifications_sent, 1);
    assert!(h.engine.state().match_started);
    assert!(h.sink.sent_texts()[0].contains("BOLA ROLANDO"));
}

#[tokio::test]
async fn full_time_retried_after_delivery_failure() {
    let mut h = Harness::new("full-time-retry");
    h.bind(&[ChannelCategory::Live]);

    *h.source.fixture.lock().unwrap() = Some(fixture(1, FixtureStatus::SecondHalf));
    *h.source.events.lock().unwrap() = vec![goal(55, "P9", TRACKED)];
    h.engine.run_tick().await;

    let mut fx = fixture(1, FixtureStatus::Finished);
    fx.goals = Score {
        home: Some(0),
        away: Some(1),
    };
    *h.source.fixture.lock().unwrap() = Some(fx);

    // Full-time send fails: flag unset, sent keys retained.
    *h.sink.fail_on.lock().unwrap() = Some(1);
    let report = h.engine.run_tick().await;
    assert_eq!(report.errors, 1);
    assert!(!h.engine.state().match_finished);
    assert_eq!(h.engine.state().sent_event_keys.len(), 1);

    // Next tick delivers it, latches, and clears the keys.
    *h.sink.fail_on.lock().unwrap() = None;
    let report = h.engine.run_tick().await;
    assert_eq!(report.notifications_sent, 1);
    assert!(h.engine.state().match_finished);
    assert!(h.engine.state().sent_event_keys.is_empty());
    assert!(h.sink.sent_texts().last().unwrap().contains("FIM DE JOGO"));
}

#[tokio::test]
async fn full_time_classifies_away_loss_and_clears_keys() {
    let mut h = Harness::new("away-loss");
    h.bind(&[ChannelCategory::Live]);

    // A goal arrives while live so a sent key exists.
    *h.source.fixture.lock().unwrap() = Some(fixture(1, FixtureStatus::SecondHalf));
    *h.source.events.lock().unwrap() = vec![goal(55, "P9", TRACKED)];
    h.engine.run_tick().await;
    assert_eq!(h.engine.state().sent_event_keys.len(), 1);

    // Tracked team is away and loses 2-1.
    let mut fx = fixture(1, FixtureStatus::Finished);
    fx.goals = Score {
        home: Some(2),
        away: Some(1),
    };
    *h.source.fixture.lock().unwrap() = Some(fx);
    h.engine.run_tick().await;

    assert!(h.engine.state().match_finished);
    assert!(h.engine.state().sent_event_keys.is_empty());
    let texts = h.sink.sent_texts();
    let full_time = texts.last().unwrap();
    assert!(full_time.contains("DERROTA"));
    assert!(full_time.contains("Team A 2 x 1 Team B"));

    // Same finished snapshot again: nothing new.
    let before = h.sink.sent_count();
    h.engine.run_tick().await;
    assert_eq!(h.sink.sent_count(), before);
}

#[tokio::test]
async fn lineup_defers_until_tracked_team_published() {
    let mut h = Harness::new("lineup-defer");
    h.bind(&[ChannelCategory::Lineup]);
    *h.source.fixture.lock().unwrap() = Some(fixture(1, FixtureStatus::NotStarted));

    // Only the opponent's lineup is out.
    *h.source.lineups.lock().unwrap() = vec![TeamLineup {
        team: Team {
            id: OPPONENT,
            name: "Team A".into(),
        },
        starting: vec!["X1".into()],
    }];
    h.engine.run_tick().await;
    assert!(!h.engine.state().lineup_announced);
    assert_eq!(h.sink.sent_count(), 0);

    // Next tick the tracked team's XI appears.
    h.source.lineups.lock().unwrap().push(TeamLineup {
        team: Team {
            id: TRACKED,
            name: "Team B".into(),
        },
        starting: vec!["GK".into(), "DF".into()],
    });
    h.engine.run_tick().await;
    assert!(h.engine.state().lineup_announced);
    let texts = h.sink.sent_texts();
    assert!(texts[0].contains("GK"));
    assert!(texts[0].contains("ESCALAÇÃO"));
}

#[tokio::test]
async fn missing_live_binding_skips_event_scan() {
    let mut h = Harness::new("no-live-binding");
    h.bind(&[ChannelCategory::Info]);
    *h.source.fixture.lock().unwrap() = Some(fixture(1, FixtureStatus::SecondHalf));
    *h.source.events.lock().unwrap() = vec![goal(10, "P1", TRACKED)];

    let report = h.engine.run_tick().await;
    assert_eq!(report.notifications_sent, 0);
    // Key not consumed: when a live channel is bound later, the goal can still go out.
    assert!(h.engine.state().sent_event_keys.is_empty());
}

#[tokio::test]
async fn calendar_upsert_heals_stale_reference() {
    let mut h = Harness::new("calendar");
    h.bind(&[ChannelCategory::Calendar]);
    *h.source.season.lock().unwrap() =
        vec![fixture(1, FixtureStatus::NotStarted), fixture(2, FixtureStatus::NotStarted)];

    // First sync posts and stores the reference.
    h.engine.sync_calendar().await.unwrap();
    let first_ref = h.engine.state().calendar_message_ref.clone().unwrap();
    assert_eq!(h.sink.sent_count(), 1);

    // Second sync edits in place.
    h.engine.sync_calendar().await.unwrap();
    assert_eq!(h.sink.sent_count(), 1);
    assert_eq!(h.sink.edits.lock().unwrap().len(), 1);
    assert_eq!(h.engine.state().calendar_message_ref.as_deref(), Some(first_ref.as_str()));

    // Message deleted out from under us: repost and heal the reference.
    *h.sink.edit_not_found.lock().unwrap() = true;
    h.engine.sync_calendar().await.unwrap();
    assert_eq!(h.sink.sent_count(), 2);
    let healed = h.engine.state().calendar_message_ref.clone().unwrap();
    assert_ne!(healed, first_ref);
}

#[tokio::test]
async fn source_failure_aborts_tick_without_mutation() {
    struct FailingSource;
    #[async_trait]
    impl FixtureSource for FailingSource {
        async fn fetch_upcoming_fixture(&self, _: u64) -> Result<Option<Fixture>> {
            Err(MatchdayError::Source("feed down".into()))
        }
        async fn fetch_lineups(&self, _: u64) -> Result<Vec<TeamLineup>> {
            Ok(vec![])
        }
        async fn fetch_events(&self, _: u64) -> Result<Vec<MatchEvent>> {
            Ok(vec![])
        }
        async fn fetch_season_fixtures(
            &self,
            _: u64,
            _: Option<u32>,
            _: Option<u64>,
        ) -> Result<Vec<Fixture>> {
            Ok(vec![])
        }
    }

    let dir = std::env::temp_dir().join("matchday-pipeline-feed-down");
    std::fs::remove_dir_all(&dir).ok();
    let store = StateStore::new(&dir.join("state.json"));
    let mut engine = TrackerEngine::new(
        Arc::new(FailingSource),
        Arc::new(MockSink::default()),
        store,
        TrackerSettings {
            team_id: TRACKED,
            utc_offset_hours: 0,
            broadcast: String::new(),
            season: None,
            league: None,
        },
    );

    let report = engine.run_tick().await;
    assert_eq!(report.errors, 1);
    assert_eq!(report.notifications_sent, 0);
    assert!(engine.state().fixture_id.is_none());
    std::fs::remove_dir_all(&dir).ok();
}

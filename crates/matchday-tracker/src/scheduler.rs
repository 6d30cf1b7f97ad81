//! Scheduler loops — fixed-cadence ticking with a single-flight guard.
//!
//! Both loops share one engine mutex, so all state mutation is serialized.
//! The tracker loop uses `try_lock` and skips a firing when the previous
//! tick is still running instead of queueing behind it.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::engine::TrackerEngine;

/// Run the tick loop. Never returns; every failure is contained per tick.
pub async fn spawn_tracker(engine: Arc<Mutex<TrackerEngine>>, poll_secs: u64) {
    tracing::info!("⏰ Tracker started (tick every {poll_secs}s)");
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(poll_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        // Single-flight: a slow fetch or delivery must not stack ticks.
        let Ok(mut engine) = engine.try_lock() else {
            tracing::warn!("⏭️ Previous tick still running, skipping this one");
            continue;
        };
        let report = engine.run_tick().await;
        if report.notifications_sent > 0 || report.errors > 0 {
            tracing::info!(
                "⏱️ Tick done: {} sent, {} errors",
                report.notifications_sent,
                report.errors
            );
        }
    }
}

/// Run the calendar refresh loop. Waits behind a running tick rather than
/// skipping — calendar freshness is not time-critical.
pub async fn spawn_calendar(engine: Arc<Mutex<TrackerEngine>>, refresh_secs: u64) {
    tracing::info!("📅 Calendar sync started (every {refresh_secs}s)");
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(refresh_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let mut engine = engine.lock().await;
        if let Err(e) = engine.sync_calendar().await {
            tracing::warn!("⚠️ Calendar sync failed: {e}");
        }
    }
}

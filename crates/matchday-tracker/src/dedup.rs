//! Event deduplication — selects the not-yet-notified subsequence of a
//! fixture's event timeline, in feed order.

use std::collections::HashSet;

use matchday_core::types::{EventKind, MatchEvent};

use crate::state::{TrackedFixture, event_key};

/// Events whose key is neither in the persisted sent set nor earlier in
/// this same batch, paired with their derived key. Unrecognized event
/// kinds are skipped outright: feeds add types over time and an unknown
/// type is not an error.
pub fn select_new_events<'a>(
    events: &'a [MatchEvent],
    state: &TrackedFixture,
) -> Vec<(String, &'a MatchEvent)> {
    let mut seen_in_batch: HashSet<String> = HashSet::new();
    let mut fresh = Vec::new();

    for event in events {
        if matches!(event.kind, EventKind::Other(_)) {
            continue;
        }
        let key = event_key(event);
        if state.has_sent(&key) || !seen_in_batch.insert(key.clone()) {
            continue;
        }
        fresh.push((key, event));
    }

    fresh
}

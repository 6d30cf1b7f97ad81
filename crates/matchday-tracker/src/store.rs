//! File-based state store — one JSON record, crash-safe writes.
//! Saves go through a temp file and an atomic rename so a crash mid-write
//! never leaves a corrupt store behind.

use std::path::{Path, PathBuf};

use matchday_core::error::{MatchdayError, Result};

use crate::state::TrackedFixture;

/// Durable store for the tracked-fixture record.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Create a store backed by the given file path.
    pub fn new(path: &Path) -> Self {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Default store path (~/.matchday/state.json).
    pub fn default_path() -> PathBuf {
        matchday_core::MatchdayConfig::home_dir().join("state.json")
    }

    /// Load the state. A missing file is an empty state, never an error;
    /// an unreadable or unparsable file is logged and treated the same.
    pub fn load(&self) -> TrackedFixture {
        if !self.path.exists() {
            return TrackedFixture::default();
        }
        match std::fs::read_to_string(&self.path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("⚠️ Failed to parse {}: {e}", self.path.display());
                TrackedFixture::default()
            }),
            Err(e) => {
                tracing::warn!("⚠️ Failed to read {}: {e}", self.path.display());
                TrackedFixture::default()
            }
        }
    }

    /// Durably persist the full state.
    pub fn save(&self, state: &TrackedFixture) -> Result<()> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| MatchdayError::Store(format!("Serialize error: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)
            .map_err(|e| MatchdayError::Store(format!("Write error: {e}")))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| MatchdayError::Store(format!("Rename error: {e}")))?;
        tracing::debug!("💾 State saved to {}", self.path.display());
        Ok(())
    }
}

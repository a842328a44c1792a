//! Session snapshots for pause and resume
//!
//! A snapshot holds everything needed to continue a session exactly where it
//! stopped: the config, the session state and the respawn RNG state. Resuming
//! from a snapshot replays the same respawn draws the original session would
//! have made.

use crate::game::config::GameConfig;
use crate::game::state::SessionState;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub config: GameConfig,
    pub state: SessionState,
    pub rng: ChaCha12Rng,
}

impl SessionSnapshot {
    pub fn new(config: GameConfig, state: SessionState, rng: ChaCha12Rng) -> Self {
        SessionSnapshot { config, state, rng }
    }

    /// Turn the snapshot was taken at
    pub fn turn(&self) -> u32 {
        self.state.turn()
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationError(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| SnapshotError::IoError(e.to_string()))?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let json = std::fs::read_to_string(path).map_err(|e| SnapshotError::IoError(e.to_string()))?;
        let snapshot = serde_json::from_str(&json)
            .map_err(|e| SnapshotError::DeserializationError(e.to_string()))?;
        Ok(snapshot)
    }
}

/// Errors that can occur during snapshot operations
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Position;
    use crate::game::GameEngine;

    #[test]
    fn test_snapshot_json_preserves_session() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 11).unwrap();
        engine.logger.enable_capture();
        engine.start().unwrap();
        engine.submit_move(Position::new(6, 5)).unwrap();

        let snapshot = engine.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: SessionSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.turn(), 1);
        similar_asserts::assert_eq!(restored.state, snapshot.state);
        assert_eq!(restored.config, snapshot.config);
    }

    #[test]
    fn test_load_missing_file() {
        let result = SessionSnapshot::load_from_file("/nonexistent/knight-trap-snapshot.json");
        assert!(matches!(result, Err(SnapshotError::IoError(_))));
    }
}

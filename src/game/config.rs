//! Session configuration
//!
//! Defaults are the shipped 8x8 game. A config can also be loaded from a
//! JSON file; missing fields fall back to the defaults.

use crate::core::{is_in_bounds, KnightId, Position};
use crate::{KnightTrapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Starting square of one adversary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversaryStart {
    pub id: KnightId,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: i32,
    pub player_start: Position,
    pub adversaries: Vec<AdversaryStart>,

    /// Turns a bomb stays live at session start
    pub initial_bomb_lifetime: u32,

    /// Turns a knocked-out adversary waits before re-entering
    pub respawn_delay: u32,

    pub points_per_move: u64,
    pub points_per_capture: u64,

    /// Safe-move hints are offered while captures stay below this
    pub hint_capture_threshold: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_size: 8,
            player_start: Position::new(4, 4),
            adversaries: vec![
                AdversaryStart {
                    id: KnightId::new(1),
                    position: Position::new(0, 0),
                },
                AdversaryStart {
                    id: KnightId::new(2),
                    position: Position::new(0, 7),
                },
            ],
            initial_bomb_lifetime: 3,
            respawn_delay: 3,
            points_per_move: 10,
            points_per_capture: 25,
            hint_capture_threshold: 5,
        }
    }
}

impl GameConfig {
    /// Load and validate a config from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the starting layout is playable
    pub fn validate(&self) -> Result<()> {
        if self.board_size < 3 {
            return Err(KnightTrapError::InvalidConfig(format!(
                "board size {} is too small for knight moves",
                self.board_size
            )));
        }
        if self.initial_bomb_lifetime == 0 {
            return Err(KnightTrapError::InvalidConfig(
                "bomb lifetime must be at least 1".to_string(),
            ));
        }

        let mut occupied = vec![self.player_start];
        for start in &self.adversaries {
            if !is_in_bounds(start.position, self.board_size) {
                return Err(KnightTrapError::InvalidConfig(format!(
                    "adversary {} starts off the board at {}",
                    start.id, start.position
                )));
            }
            if occupied.contains(&start.position) {
                return Err(KnightTrapError::InvalidConfig(format!(
                    "adversary {} starts on an occupied square {}",
                    start.id, start.position
                )));
            }
            occupied.push(start.position);
        }
        if !is_in_bounds(self.player_start, self.board_size) {
            return Err(KnightTrapError::InvalidConfig(format!(
                "player starts off the board at {}",
                self.player_start
            )));
        }

        let mut ids: Vec<KnightId> = self.adversaries.iter().map(|a| a.id).collect();
        ids.sort();
        ids.dedup();
        if ids.len() != self.adversaries.len() {
            return Err(KnightTrapError::InvalidConfig(
                "adversary ids must be unique".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.adversaries.len(), 2);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"board_size": 10, "respawn_delay": 5}"#).unwrap();
        assert_eq!(config.board_size, 10);
        assert_eq!(config.respawn_delay, 5);
        assert_eq!(config.points_per_capture, 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_overlapping_starts() {
        let mut config = GameConfig::default();
        config.adversaries[1].position = Position::new(4, 4);
        assert!(matches!(config.validate(), Err(KnightTrapError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut config = GameConfig::default();
        config.adversaries[1].id = KnightId::new(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_off_board_start() {
        let config = GameConfig {
            board_size: 4,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

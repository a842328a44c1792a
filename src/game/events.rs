//! Events emitted by turn resolution for the presentation layer

use crate::core::{KnightId, Position};
use crate::game::state::GameOverReason;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What set off a bomb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggeredBy {
    Player,
    Adversary(KnightId),
}

/// Notable things that happened during one submitted move, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerMoved { from: Position, to: Position },
    AdversaryMoved { id: KnightId, from: Position, to: Position },
    /// The player landed on an adversary
    Captured { id: KnightId, square: Position },
    BombDetonated { square: Position, triggered_by: TriggeredBy },
    IllegalMove { from: Position, to: Position },
    AdversaryRespawned { id: KnightId, square: Position },
    GameOver(GameOverReason),
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::PlayerMoved { from, to } => write!(f, "Player moves {from} -> {to}"),
            GameEvent::AdversaryMoved { id, from, to } => {
                write!(f, "Shadow knight {id} moves {from} -> {to}")
            }
            GameEvent::Captured { id, square } => write!(f, "Shadow knight {id} captured at {square}"),
            GameEvent::BombDetonated { square, triggered_by } => match triggered_by {
                TriggeredBy::Player => write!(f, "Bomb at {square} detonated under the player"),
                TriggeredBy::Adversary(id) => {
                    write!(f, "Bomb at {square} destroyed shadow knight {id}")
                }
            },
            GameEvent::IllegalMove { from, to } => write!(f, "Illegal move {from} -> {to}"),
            GameEvent::AdversaryRespawned { id, square } => {
                write!(f, "Shadow knight {id} respawns at {square}")
            }
            GameEvent::GameOver(reason) => write!(f, "Game over: {reason}"),
        }
    }
}

//! Knights and bombs

use crate::core::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of an adversary knight
///
/// Survives captures, respawns and reordering of the roster; never an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KnightId(u32);

impl KnightId {
    pub const fn new(id: u32) -> Self {
        KnightId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for KnightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Adversary lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdversaryStatus {
    Active,
    /// Off the board; invisible to occupancy, movement and capture checks
    Respawning,
}

/// An adversary knight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adversary {
    pub id: KnightId,

    /// Current square. Stale while respawning.
    pub position: Position,

    pub status: AdversaryStatus,

    /// Turn at or after which a respawning knight may re-enter
    pub respawn_turn: Option<u32>,
}

impl Adversary {
    pub fn new(id: KnightId, position: Position) -> Self {
        Adversary {
            id,
            position,
            status: AdversaryStatus::Active,
            respawn_turn: None,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == AdversaryStatus::Active
    }

    /// Take the knight off the board until `respawn_turn`
    pub fn knock_out(&mut self, respawn_turn: u32) {
        self.status = AdversaryStatus::Respawning;
        self.respawn_turn = Some(respawn_turn);
    }

    /// Put the knight back on the board at `pos`
    pub fn respawn_at(&mut self, pos: Position) {
        self.position = pos;
        self.status = AdversaryStatus::Active;
        self.respawn_turn = None;
    }

    /// Whether a respawning knight may re-enter on `turn`
    pub fn ready_to_respawn(&self, turn: u32) -> bool {
        self.status == AdversaryStatus::Respawning && self.respawn_turn.is_some_and(|t| t <= turn)
    }
}

/// Who left a bomb behind
///
/// Rules do not currently depend on the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BombOwner {
    Player,
    Adversary,
}

/// A live bomb on a vacated square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bomb {
    pub position: Position,
    pub placed_by: BombOwner,
    pub turn_placed: u32,
}

impl Bomb {
    pub fn new(position: Position, placed_by: BombOwner, turn_placed: u32) -> Self {
        Bomb {
            position,
            placed_by,
            turn_placed,
        }
    }

    /// Whether the bomb is still live after resolving `current_turn`
    #[inline]
    pub fn is_live_at(&self, current_turn: u32, lifetime: u32) -> bool {
        self.turn_placed.saturating_add(lifetime) >= current_turn
    }
}

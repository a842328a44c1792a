//! Session state
//!
//! A `SessionState` is a plain value. Turn resolution clones the prior state
//! and returns a new one, so a state handed to the presentation layer never
//! changes underneath it.

use crate::core::{
    enumerate_knight_destinations, is_in_bounds, Adversary, Bomb, KnightId, KnightMoves, Position,
};
use crate::game::config::GameConfig;
use crate::{KnightTrapError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    PreGame,
    InProgress,
    /// Terminal; only a reset leaves this state
    Lost,
}

/// Why a session was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    IllegalMove,
    Bomb,
    Captured,
    Trapped,
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameOverReason::IllegalMove => "illegal move",
            GameOverReason::Bomb => "bomb",
            GameOverReason::Captured => "captured",
            GameOverReason::Trapped => "trapped",
        };
        f.write_str(text)
    }
}

/// Complete state of one session between turns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub(crate) status: GameStatus,

    /// Completed full turns
    pub(crate) turn: u32,

    pub(crate) board_size: i32,

    pub(crate) player: Position,

    /// Fixed roster in configuration order; this order drives the policy
    pub(crate) adversaries: Vec<Adversary>,

    pub(crate) bombs: Vec<Bomb>,

    pub(crate) score: u64,
    pub(crate) captures: u32,
    pub(crate) multiplier: u64,
    pub(crate) bomb_lifetime: u32,
    pub(crate) game_over_reason: Option<GameOverReason>,

    /// Each adversary's square before the last policy invocation
    pub(crate) previous_positions: FxHashMap<KnightId, Position>,
}

impl SessionState {
    /// Fresh pre-game state laid out from the config
    pub fn new(config: &GameConfig) -> Self {
        SessionState {
            status: GameStatus::PreGame,
            turn: 0,
            board_size: config.board_size,
            player: config.player_start,
            adversaries: config
                .adversaries
                .iter()
                .map(|start| Adversary::new(start.id, start.position))
                .collect(),
            bombs: Vec::new(),
            score: 0,
            captures: 0,
            multiplier: 1,
            bomb_lifetime: config.initial_bomb_lifetime,
            game_over_reason: None,
            previous_positions: FxHashMap::default(),
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn board_size(&self) -> i32 {
        self.board_size
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn adversaries(&self) -> &[Adversary] {
        &self.adversaries
    }

    pub fn active_adversaries(&self) -> impl Iterator<Item = &Adversary> {
        self.adversaries.iter().filter(|a| a.is_active())
    }

    /// Look up an adversary by id
    pub fn adversary(&self, id: KnightId) -> Result<&Adversary> {
        self.adversaries
            .iter()
            .find(|a| a.id == id)
            .ok_or(KnightTrapError::UnknownAdversary(id.as_u32()))
    }

    pub(crate) fn adversary_mut(&mut self, id: KnightId) -> Result<&mut Adversary> {
        self.adversaries
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(KnightTrapError::UnknownAdversary(id.as_u32()))
    }

    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    pub fn has_bomb_at(&self, pos: Position) -> bool {
        self.bombs.iter().any(|b| b.position == pos)
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn captures(&self) -> u32 {
        self.captures
    }

    pub fn multiplier(&self) -> u64 {
        self.multiplier
    }

    pub fn bomb_lifetime(&self) -> u32 {
        self.bomb_lifetime
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Lost
    }

    /// Squares held by active adversaries, in roster order
    pub fn active_adversary_squares(&self) -> Vec<Position> {
        self.active_adversaries().map(|a| a.position).collect()
    }

    /// Player square plus every active adversary square
    pub fn occupied_squares(&self) -> Vec<Position> {
        let mut occupied = Vec::with_capacity(self.adversaries.len() + 1);
        occupied.push(self.player);
        occupied.extend(self.active_adversaries().map(|a| a.position));
        occupied
    }

    /// Player destinations not held by an active adversary; bombs included
    pub fn player_destinations(&self) -> KnightMoves {
        enumerate_knight_destinations(self.player, self.board_size, &self.active_adversary_squares())
    }

    /// Player destinations that are neither occupied nor mined
    pub fn safe_moves(&self) -> KnightMoves {
        self.player_destinations()
            .into_iter()
            .filter(|pos| !self.has_bomb_at(*pos))
            .collect()
    }

    /// Safe-move hints, offered only while the player is still learning
    ///
    /// Returns `None` once `captures` reaches `threshold`.
    pub fn move_hints(&self, threshold: u32) -> Option<KnightMoves> {
        (self.captures < threshold).then(|| self.safe_moves())
    }

    /// Capture scoring shared by player captures and bomb kills
    ///
    /// Points use the multiplier in effect before this capture; the bump
    /// only affects later awards.
    pub(crate) fn record_capture(&mut self, points_per_capture: u64) {
        self.score += points_per_capture * self.multiplier;
        self.captures += 1;
        self.multiplier = multiplier_for(self.captures);
        self.bomb_lifetime += 1;
    }

    pub(crate) fn mark_lost(&mut self, reason: GameOverReason) {
        self.status = GameStatus::Lost;
        self.game_over_reason = Some(reason);
    }
}

/// Score multiplier after `captures` total captures
#[inline]
pub fn multiplier_for(captures: u32) -> u64 {
    1 + u64::from(captures / 2)
}

/// Lays out an in-progress session at an arbitrary mid-game position
///
/// Useful for puzzles and for reproducing a reported position. The result is
/// checked against the board invariants in `build`.
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    state: SessionState,
    placements: Vec<(KnightId, Position)>,
    knockouts: Vec<(KnightId, u32)>,
}

impl SessionBuilder {
    pub fn new(config: &GameConfig) -> Self {
        let mut state = SessionState::new(config);
        state.status = GameStatus::InProgress;
        SessionBuilder {
            state,
            placements: Vec::new(),
            knockouts: Vec::new(),
        }
    }

    pub fn turn(mut self, turn: u32) -> Self {
        self.state.turn = turn;
        self
    }

    pub fn player(mut self, pos: Position) -> Self {
        self.state.player = pos;
        self
    }

    pub fn adversary_at(mut self, id: KnightId, pos: Position) -> Self {
        self.placements.push((id, pos));
        self
    }

    pub fn respawning(mut self, id: KnightId, respawn_turn: u32) -> Self {
        self.knockouts.push((id, respawn_turn));
        self
    }

    pub fn bomb(mut self, bomb: Bomb) -> Self {
        self.state.bombs.push(bomb);
        self
    }

    /// Sets the capture count and the multiplier that goes with it
    pub fn captures(mut self, captures: u32) -> Self {
        self.state.captures = captures;
        self.state.multiplier = multiplier_for(captures);
        self
    }

    pub fn bomb_lifetime(mut self, lifetime: u32) -> Self {
        self.state.bomb_lifetime = lifetime;
        self
    }

    pub fn score(mut self, score: u64) -> Self {
        self.state.score = score;
        self
    }

    pub fn build(self) -> Result<SessionState> {
        let mut state = self.state;
        for (id, pos) in self.placements {
            state.adversary_mut(id)?.position = pos;
        }
        for (id, respawn_turn) in self.knockouts {
            state.adversary_mut(id)?.knock_out(respawn_turn);
        }
        state.check_layout()?;
        Ok(state)
    }
}

impl SessionState {
    /// Every square on the board and no two knights sharing one
    pub(crate) fn check_layout(&self) -> Result<()> {
        let size = self.board_size;
        let squares = self
            .occupied_squares()
            .into_iter()
            .chain(self.bombs.iter().map(|b| b.position));
        for pos in squares {
            if !is_in_bounds(pos, size) {
                return Err(KnightTrapError::OutOfBounds { pos, size });
            }
        }

        let mut occupied = self.occupied_squares();
        let count = occupied.len();
        occupied.sort();
        occupied.dedup();
        if occupied.len() != count {
            return Err(KnightTrapError::InvalidConfig(
                "two knights share a square".to_string(),
            ));
        }
        Ok(())
    }

    /// Check a restored state against the config it claims to belong to
    pub fn check_against(&self, config: &GameConfig) -> Result<()> {
        if self.board_size != config.board_size {
            return Err(KnightTrapError::InvalidConfig(format!(
                "state board size {} does not match config board size {}",
                self.board_size, config.board_size
            )));
        }
        let mut roster: Vec<KnightId> = self.adversaries.iter().map(|a| a.id).collect();
        let mut expected: Vec<KnightId> = config.adversaries.iter().map(|a| a.id).collect();
        roster.sort();
        expected.sort();
        if roster != expected {
            return Err(KnightTrapError::InvalidConfig(
                "adversary roster does not match config".to_string(),
            ));
        }
        self.check_layout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BombOwner, Position};

    #[test]
    fn test_new_state_from_default_config() {
        let state = SessionState::new(&GameConfig::default());
        assert_eq!(state.status(), GameStatus::PreGame);
        assert_eq!(state.turn(), 0);
        assert_eq!(state.player(), Position::new(4, 4));
        assert_eq!(state.multiplier(), 1);
        assert_eq!(state.bomb_lifetime(), 3);
        assert_eq!(state.occupied_squares().len(), 3);
        assert!(state.adversary(KnightId::new(2)).is_ok());
        assert!(state.adversary(KnightId::new(9)).is_err());
    }

    #[test]
    fn test_multiplier_curve() {
        let expected = [1, 1, 2, 2, 3, 3, 4];
        for (captures, want) in expected.iter().enumerate() {
            assert_eq!(multiplier_for(captures as u32), *want);
        }
    }

    #[test]
    fn test_record_capture_scores_before_bump() {
        let mut state = SessionState::new(&GameConfig::default());
        state.record_capture(25);
        assert_eq!(state.score(), 25);
        assert_eq!(state.multiplier(), 1);
        state.record_capture(25);
        assert_eq!(state.score(), 50);
        assert_eq!(state.multiplier(), 2);
        assert_eq!(state.bomb_lifetime(), 5);
        state.record_capture(25);
        assert_eq!(state.score(), 100);
    }

    #[test]
    fn test_safe_moves_exclude_bombs_and_knights() {
        let mut state = SessionState::new(&GameConfig::default());
        state.bombs.push(Bomb::new(Position::new(5, 6), BombOwner::Player, 0));
        state.adversaries[0].position = Position::new(6, 5);

        let destinations = state.player_destinations();
        assert_eq!(destinations.len(), 7);
        assert!(destinations.contains(&Position::new(5, 6)));

        let safe = state.safe_moves();
        assert_eq!(safe.len(), 6);
        assert!(!safe.contains(&Position::new(5, 6)));
        assert!(!safe.contains(&Position::new(6, 5)));
    }

    #[test]
    fn test_builder_lays_out_position() {
        let state = SessionBuilder::new(&GameConfig::default())
            .turn(6)
            .player(Position::new(2, 2))
            .adversary_at(KnightId::new(1), Position::new(5, 5))
            .respawning(KnightId::new(2), 8)
            .bomb(Bomb::new(Position::new(3, 4), BombOwner::Adversary, 5))
            .captures(3)
            .build()
            .unwrap();
        assert_eq!(state.status(), GameStatus::InProgress);
        assert_eq!(state.multiplier(), 2);
        assert_eq!(state.active_adversary_squares(), vec![Position::new(5, 5)]);
        assert_eq!(state.adversary(KnightId::new(2)).unwrap().respawn_turn, Some(8));
    }

    #[test]
    fn test_builder_rejects_shared_square() {
        let result = SessionBuilder::new(&GameConfig::default())
            .adversary_at(KnightId::new(1), Position::new(4, 4))
            .build();
        assert!(result.is_err());

        let result = SessionBuilder::new(&GameConfig::default())
            .adversary_at(KnightId::new(3), Position::new(1, 1))
            .build();
        assert!(matches!(result, Err(KnightTrapError::UnknownAdversary(3))));
    }

    #[test]
    fn test_check_against_rejects_mismatched_state() {
        let config = GameConfig::default();
        let state = SessionBuilder::new(&config).build().unwrap();
        assert!(state.check_against(&config).is_ok());

        let mut resized = state.clone();
        resized.board_size = 10;
        assert!(matches!(
            resized.check_against(&config),
            Err(KnightTrapError::InvalidConfig(_))
        ));

        let mut stacked = state.clone();
        stacked.adversaries[1].position = stacked.adversaries[0].position;
        assert!(stacked.check_against(&config).is_err());

        let mut off_board = state;
        off_board.player = Position::new(8, 0);
        assert!(matches!(
            off_board.check_against(&config),
            Err(KnightTrapError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_move_hints_disappear_at_threshold() {
        let mut state = SessionState::new(&GameConfig::default());
        assert!(state.move_hints(5).is_some());
        state.captures = 5;
        assert!(state.move_hints(5).is_none());
    }
}

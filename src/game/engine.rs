//! Turn resolution
//!
//! `resolve_turn` is a pure function from a prior session state and a player
//! target to a new state plus the events that happened along the way. The
//! prior state is never touched, so a turn either resolves completely or
//! not at all.
//!
//! `GameEngine` wraps it with the pieces a caller keeps between turns: the
//! config, the adversary policy, the respawn RNG and the logger.

/// Log a game event only when the verbose-logging feature is enabled
macro_rules! log_event_if_verbose {
    ($logger:expr, $turn:expr, $event:expr) => {
        #[cfg(feature = "verbose-logging")]
        {
            $logger.game_event($turn, $event);
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = (&$logger, $turn, $event);
        }
    };
}

use crate::core::{
    is_in_bounds, is_knight_pattern, pick_uniform_random_vacant_square, Bomb, BombOwner,
    KnightId, Position,
};
use crate::game::config::GameConfig;
use crate::game::events::{GameEvent, TriggeredBy};
use crate::game::logger::GameLogger;
use crate::game::policy::{AdversaryPolicy, GreedyPolicy};
use crate::game::random::RandomSource;
use crate::game::snapshot::SessionSnapshot;
use crate::game::state::{GameOverReason, GameStatus, SessionState};
use crate::{KnightTrapError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use smallvec::SmallVec;

/// Outcome of one submitted move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResolution {
    pub state: SessionState,
    pub events: Vec<GameEvent>,
}

/// Fresh in-progress session laid out from `config`
pub fn start_session(config: &GameConfig) -> Result<SessionState> {
    config.validate()?;
    let mut state = SessionState::new(config);
    state.status = GameStatus::InProgress;
    Ok(state)
}

/// Resolve one full turn: the player's move and the adversaries' reply
///
/// Errors only on contract violations (session not in progress, target off
/// the board). Illegal knight shapes and bomb steps are outcomes and come
/// back as a lost session.
pub fn resolve_turn(
    prior: &SessionState,
    to: Position,
    config: &GameConfig,
    policy: &dyn AdversaryPolicy,
    rng: &mut dyn RandomSource,
) -> Result<TurnResolution> {
    if prior.status != GameStatus::InProgress {
        return Err(KnightTrapError::SessionNotInProgress(prior.status));
    }
    if !is_in_bounds(to, prior.board_size) {
        return Err(KnightTrapError::OutOfBounds {
            pos: to,
            size: prior.board_size,
        });
    }

    let mut state = prior.clone();
    let mut events = Vec::new();
    let from = state.player;

    if !is_knight_pattern(from, to) {
        events.push(GameEvent::IllegalMove { from, to });
        finish(&mut state, &mut events, GameOverReason::IllegalMove);
        return Ok(TurnResolution { state, events });
    }

    if state.has_bomb_at(to) {
        state.bombs.retain(|b| b.position != to);
        state.player = to;
        events.push(GameEvent::PlayerMoved { from, to });
        events.push(GameEvent::BombDetonated {
            square: to,
            triggered_by: TriggeredBy::Player,
        });
        finish(&mut state, &mut events, GameOverReason::Bomb);
        return Ok(TurnResolution { state, events });
    }

    let turn = state.turn;
    let next_turn = turn + 1;
    apply_player_move(&mut state, &mut events, to);
    resolve_player_capture(&mut state, &mut events, config)?;
    state.score += config.points_per_move * state.multiplier;

    let movers = resolve_adversary_turn(&mut state, &mut events, config, policy)?;
    for origin in movers {
        state.bombs.push(Bomb::new(origin, BombOwner::Adversary, turn));
    }

    expire_bombs(&mut state);
    resolve_respawns(&mut state, &mut events, rng)?;

    if let Some(reason) = terminal_reason(&state) {
        finish(&mut state, &mut events, reason);
    }
    debug_assert_eq!(state.turn, next_turn);

    Ok(TurnResolution { state, events })
}

fn finish(state: &mut SessionState, events: &mut Vec<GameEvent>, reason: GameOverReason) {
    state.mark_lost(reason);
    events.push(GameEvent::GameOver(reason));
}

/// Drop a bomb on the vacated square, move the player and advance the turn
pub(crate) fn apply_player_move(state: &mut SessionState, events: &mut Vec<GameEvent>, to: Position) {
    let from = state.player;
    state.bombs.push(Bomb::new(from, BombOwner::Player, state.turn));
    state.player = to;
    state.turn += 1;
    events.push(GameEvent::PlayerMoved { from, to });
}

/// Turn a knight knocked out on `turn` may re-enter
#[inline]
fn respawn_turn_after(turn: u32, config: &GameConfig) -> u32 {
    turn.saturating_add(config.respawn_delay)
}

/// Knock out an active adversary sitting on the player's new square
pub(crate) fn resolve_player_capture(
    state: &mut SessionState,
    events: &mut Vec<GameEvent>,
    config: &GameConfig,
) -> Result<Option<KnightId>> {
    let square = state.player;
    let Some(id) = state
        .active_adversaries()
        .find(|a| a.position == square)
        .map(|a| a.id)
    else {
        return Ok(None);
    };

    state.record_capture(config.points_per_capture);
    let respawn_turn = respawn_turn_after(state.turn, config);
    state.adversary_mut(id)?.knock_out(respawn_turn);
    events.push(GameEvent::Captured { id, square });
    Ok(Some(id))
}

/// Ask the policy for decisions and apply them, including bomb strikes
///
/// Every decided square is checked for a bomb, including a stay-put
/// decision. Returns the pre-move squares of adversaries that moved and
/// survived.
pub(crate) fn resolve_adversary_turn(
    state: &mut SessionState,
    events: &mut Vec<GameEvent>,
    config: &GameConfig,
    policy: &dyn AdversaryPolicy,
) -> Result<SmallVec<[Position; 4]>> {
    let active: SmallVec<[(KnightId, Position); 4]> = state
        .active_adversaries()
        .map(|a| (a.id, a.position))
        .collect();

    let decisions = policy.compute_adversary_moves(
        state.player,
        &active,
        state.board_size,
        &state.bombs,
        &state.previous_positions,
    );
    state.previous_positions = active.iter().copied().collect();

    let mut movers = SmallVec::new();
    for (id, origin) in active {
        let destination = decisions.get(id).unwrap_or(origin);

        // A knight that stays put on a bomb (e.g. respawned onto one) still sets it off
        if state.has_bomb_at(destination) {
            state.bombs.retain(|b| b.position != destination);
            let respawn_turn = respawn_turn_after(state.turn, config);
            state.adversary_mut(id)?.knock_out(respawn_turn);
            events.push(GameEvent::BombDetonated {
                square: destination,
                triggered_by: TriggeredBy::Adversary(id),
            });
            state.record_capture(config.points_per_capture);
        } else if destination != origin {
            state.adversary_mut(id)?.position = destination;
            events.push(GameEvent::AdversaryMoved {
                id,
                from: origin,
                to: destination,
            });
            movers.push(origin);
        }
    }
    Ok(movers)
}

/// Keep only bombs inside the current lifetime window
pub(crate) fn expire_bombs(state: &mut SessionState) {
    let (turn, lifetime) = (state.turn, state.bomb_lifetime);
    state.bombs.retain(|b| b.is_live_at(turn, lifetime));
}

/// Bring back adversaries whose respawn turn has come
///
/// A knight with nowhere to go stays respawning and is retried next turn.
pub(crate) fn resolve_respawns(
    state: &mut SessionState,
    events: &mut Vec<GameEvent>,
    rng: &mut dyn RandomSource,
) -> Result<()> {
    let ready: SmallVec<[KnightId; 4]> = state
        .adversaries
        .iter()
        .filter(|a| a.ready_to_respawn(state.turn))
        .map(|a| a.id)
        .collect();

    for id in ready {
        let blocked = state.occupied_squares();
        if let Some(square) = pick_uniform_random_vacant_square(state.board_size, &blocked, rng) {
            state.adversary_mut(id)?.respawn_at(square);
            events.push(GameEvent::AdversaryRespawned { id, square });
        }
    }
    Ok(())
}

/// Loss conditions checked at the end of a full turn
pub(crate) fn terminal_reason(state: &SessionState) -> Option<GameOverReason> {
    if state.active_adversaries().any(|a| a.position == state.player) {
        return Some(GameOverReason::Captured);
    }
    let destinations = state.player_destinations();
    if destinations.is_empty() || destinations.iter().all(|pos| state.has_bomb_at(*pos)) {
        return Some(GameOverReason::Trapped);
    }
    None
}

/// Stateful front end for one player's sessions
pub struct GameEngine {
    config: GameConfig,
    policy: Box<dyn AdversaryPolicy>,
    rng: ChaCha12Rng,
    state: SessionState,
    pub logger: GameLogger,
}

impl GameEngine {
    /// Engine with the greedy policy and an entropy-seeded RNG
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_rng(config, ChaCha12Rng::from_entropy())
    }

    /// Engine whose respawn draws are reproducible from `seed`
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, ChaCha12Rng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: ChaCha12Rng) -> Result<Self> {
        config.validate()?;
        let state = SessionState::new(&config);
        Ok(GameEngine {
            config,
            policy: Box::new(GreedyPolicy::default()),
            rng,
            state,
            logger: GameLogger::new(),
        })
    }

    /// Swap in a different adversary policy
    pub fn with_policy(mut self, policy: Box<dyn AdversaryPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Rebuild an engine from a saved snapshot
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Result<Self> {
        snapshot.config.validate()?;
        snapshot.state.check_against(&snapshot.config)?;
        Ok(GameEngine {
            config: snapshot.config,
            policy: Box::new(GreedyPolicy::default()),
            rng: snapshot.rng,
            state: snapshot.state,
            logger: GameLogger::new(),
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(self.config.clone(), self.state.clone(), self.rng.clone())
    }

    /// Reset every counter and begin a new session
    pub fn start(&mut self) -> Result<&SessionState> {
        self.state = start_session(&self.config)?;
        self.logger.normal(&format!(
            "New game on a {0}x{0} board against {1} shadow knights ({2} policy)",
            self.config.board_size,
            self.config.adversaries.len(),
            self.policy.name()
        ));
        Ok(&self.state)
    }

    /// Back to pre-game
    pub fn reset(&mut self) {
        self.state = SessionState::new(&self.config);
    }

    /// Resolve one player move; the new state is available via `state()`
    pub fn submit_move(&mut self, to: Position) -> Result<Vec<GameEvent>> {
        let resolution = resolve_turn(&self.state, to, &self.config, self.policy.as_ref(), &mut self.rng)?;
        for event in &resolution.events {
            log_event_if_verbose!(self.logger, resolution.state.turn, event);
        }
        self.state = resolution.state;
        Ok(resolution.events)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Safe-move hints for the current session, if still offered
    pub fn move_hints(&self) -> Option<crate::core::KnightMoves> {
        self.state.move_hints(self.config.hint_capture_threshold)
    }
}

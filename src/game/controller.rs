//! Player controllers for autoplay and simulation
//!
//! A controller looks at the current session and picks the player's next
//! target square. Controllers never mutate the session; the engine does.

use crate::core::{enumerate_knight_destinations, Position};
use crate::game::state::SessionState;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

pub trait PlayerController {
    fn name(&self) -> &str;

    /// Pick the next target, or `None` to give up
    fn choose_move(&mut self, state: &SessionState) -> Option<Position>;
}

/// Every knight-pattern target on the board, adversary squares included
fn reachable_squares(state: &SessionState) -> Vec<Position> {
    enumerate_knight_destinations(state.player(), state.board_size(), &[]).into_vec()
}

/// Picks uniformly among moves that do not step on a bomb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomController {
    rng: Xoshiro256PlusPlus,
}

impl RandomController {
    pub fn with_seed(seed: u64) -> Self {
        RandomController {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }
}

impl PlayerController for RandomController {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_move(&mut self, state: &SessionState) -> Option<Position> {
        let options: Vec<Position> = reachable_squares(state)
            .into_iter()
            .filter(|pos| !state.has_bomb_at(*pos))
            .collect();
        if options.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..options.len());
        Some(options[index])
    }
}

/// Takes captures when offered, otherwise keeps away from the shadow knights
///
/// Among safe squares it prefers the one attacked by the fewest adversaries,
/// then the one with the most safe follow-up moves. Ties go to the first
/// square in knight-offset order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CautiousController;

impl CautiousController {
    fn threats(state: &SessionState, square: Position) -> usize {
        state
            .active_adversaries()
            .filter(|a| {
                enumerate_knight_destinations(a.position, state.board_size(), &[]).contains(&square)
            })
            .count()
    }

    fn mobility(state: &SessionState, square: Position) -> usize {
        let occupied = state.active_adversary_squares();
        enumerate_knight_destinations(square, state.board_size(), &occupied)
            .iter()
            .filter(|next| !state.has_bomb_at(**next) && **next != state.player())
            .count()
    }
}

impl PlayerController for CautiousController {
    fn name(&self) -> &str {
        "cautious"
    }

    fn choose_move(&mut self, state: &SessionState) -> Option<Position> {
        let squares = reachable_squares(state);

        let capture = squares
            .iter()
            .copied()
            .find(|sq| !state.has_bomb_at(*sq) && state.active_adversaries().any(|a| a.position == *sq));
        if capture.is_some() {
            return capture;
        }

        // Threats dominate; mobility breaks ties
        state
            .safe_moves()
            .iter()
            .copied()
            .min_by_key(|sq| (Self::threats(state, *sq), usize::MAX - Self::mobility(state, *sq)))
    }
}

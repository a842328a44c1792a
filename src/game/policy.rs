//! Adversary movement policy
//!
//! Adversaries decide one after another in roster order. Each decision sees
//! the squares already claimed earlier in the same call, so two adversaries
//! never plan to land on the same square.
//!
//! The shipped policy is blind to bombs: bomb squares are neither blocked
//! nor penalised, so a shadow knight can be lured onto one.

use crate::core::{enumerate_knight_destinations, knight_distance, Bomb, KnightId, Position};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Decisions for one adversary half-turn, in decision order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdversaryMoves {
    decisions: SmallVec<[(KnightId, Position); 4]>,
}

impl AdversaryMoves {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: KnightId, destination: Position) {
        self.decisions.push((id, destination));
    }

    /// Destination chosen for `id`
    pub fn get(&self, id: KnightId) -> Option<Position> {
        self.decisions
            .iter()
            .find(|(knight, _)| *knight == id)
            .map(|(_, pos)| *pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(KnightId, Position)> {
        self.decisions.iter()
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

/// Decides where each active adversary goes
pub trait AdversaryPolicy: Send + Sync {
    /// One decision per entry of `active`, keyed by id
    ///
    /// `previous` maps ids to their square before the last invocation.
    fn compute_adversary_moves(
        &self,
        player: Position,
        active: &[(KnightId, Position)],
        board_size: i32,
        bombs: &[Bomb],
        previous: &FxHashMap<KnightId, Position>,
    ) -> AdversaryMoves;

    fn name(&self) -> &str;
}

/// Capture first, avoid backtracking, then close in greedily
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedyPolicy {
    /// Weight on distance to the player (lower is better)
    pub pursuit_weight: i32,
    /// Weight on distance to the nearest other adversary (higher is better)
    pub spread_weight: i32,
}

impl Default for GreedyPolicy {
    fn default() -> Self {
        GreedyPolicy {
            pursuit_weight: 3,
            spread_weight: 1,
        }
    }
}

impl GreedyPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower is better
    fn score(&self, candidate: Position, player: Position, others: &[Position]) -> i32 {
        let to_player = knight_distance(candidate, player);
        let to_ally = others
            .iter()
            .map(|other| knight_distance(candidate, *other))
            .min()
            .unwrap_or(0);
        self.pursuit_weight * to_player - self.spread_weight * to_ally
    }

    fn decide(
        &self,
        player: Position,
        current: Position,
        others: &[Position],
        board_size: i32,
        previous: Option<Position>,
    ) -> Position {
        let mut candidates = enumerate_knight_destinations(current, board_size, others);

        if candidates.contains(&player) {
            return player;
        }

        if let Some(prev) = previous {
            if candidates.iter().any(|c| *c != prev) {
                candidates.retain(|c| *c != prev);
            }
        }

        // Ties go to the first candidate in enumeration order
        candidates
            .iter()
            .copied()
            .min_by_key(|candidate| self.score(*candidate, player, others))
            .unwrap_or(current)
    }
}

impl AdversaryPolicy for GreedyPolicy {
    fn compute_adversary_moves(
        &self,
        player: Position,
        active: &[(KnightId, Position)],
        board_size: i32,
        _bombs: &[Bomb],
        previous: &FxHashMap<KnightId, Position>,
    ) -> AdversaryMoves {
        // Original squares, overwritten in place as decisions are made
        let mut claimed: SmallVec<[Position; 4]> = active.iter().map(|(_, pos)| *pos).collect();

        for (index, (id, current)) in active.iter().enumerate() {
            let others: SmallVec<[Position; 4]> = claimed
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, pos)| *pos)
                .collect();
            claimed[index] = self.decide(player, *current, &others, board_size, previous.get(id).copied());
        }

        // Collision guard: a later knight yields to an earlier one
        let mut moves = AdversaryMoves::new();
        let mut finals: SmallVec<[Position; 4]> = SmallVec::new();
        for (index, (id, current)) in active.iter().enumerate() {
            let destination = if finals.contains(&claimed[index]) {
                *current
            } else {
                claimed[index]
            };
            finals.push(destination);
            moves.push(*id, destination);
        }
        moves
    }

    fn name(&self) -> &str {
        "greedy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BombOwner;

    fn id(n: u32) -> KnightId {
        KnightId::new(n)
    }

    fn no_history() -> FxHashMap<KnightId, Position> {
        FxHashMap::default()
    }

    #[test]
    fn test_capture_takes_priority() {
        let policy = GreedyPolicy::new();
        let player = Position::new(2, 1);
        let active = [(id(1), Position::new(0, 0))];
        let mut previous = no_history();
        previous.insert(id(1), Position::new(2, 1));

        let moves = policy.compute_adversary_moves(player, &active, 8, &[], &previous);
        assert_eq!(moves.get(id(1)), Some(player));
    }

    #[test]
    fn test_avoids_previous_square() {
        let policy = GreedyPolicy::new();
        // From (0,0) the only squares are (1,2) and (2,1)
        let player = Position::new(7, 7);
        let active = [(id(1), Position::new(0, 0))];

        let free = policy.compute_adversary_moves(player, &active, 8, &[], &no_history());
        let first_choice = free.get(id(1)).unwrap();

        let mut previous = no_history();
        previous.insert(id(1), first_choice);
        let moves = policy.compute_adversary_moves(player, &active, 8, &[], &previous);
        assert_ne!(moves.get(id(1)), Some(first_choice));
    }

    #[test]
    fn test_keeps_previous_square_if_only_option() {
        let policy = GreedyPolicy::new();
        let player = Position::new(7, 7);
        // (1,2) is held by the other knight, leaving only (2,1)
        let active = [(id(1), Position::new(0, 0)), (id(2), Position::new(1, 2))];
        let mut previous = no_history();
        previous.insert(id(1), Position::new(2, 1));

        let moves = policy.compute_adversary_moves(player, &active, 8, &[], &previous);
        assert_eq!(moves.get(id(1)), Some(Position::new(2, 1)));
    }

    #[test]
    fn test_stays_put_without_candidates() {
        let policy = GreedyPolicy::new();
        // 3x3 board: the centre square has no knight moves
        let active = [(id(1), Position::new(1, 1))];
        let moves = policy.compute_adversary_moves(Position::new(0, 0), &active, 3, &[], &no_history());
        assert_eq!(moves.get(id(1)), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_closes_distance() {
        let policy = GreedyPolicy::new();
        let player = Position::new(4, 4);
        let start = Position::new(0, 0);
        let active = [(id(1), start)];
        let moves = policy.compute_adversary_moves(player, &active, 8, &[], &no_history());
        let dest = moves.get(id(1)).unwrap();
        assert!(knight_distance(dest, player) < knight_distance(start, player));
    }

    #[test]
    fn test_bomb_blind() {
        let policy = GreedyPolicy::new();
        let player = Position::new(4, 4);
        let active = [(id(1), Position::new(0, 0))];
        let without = policy.compute_adversary_moves(player, &active, 8, &[], &no_history());
        let target = without.get(id(1)).unwrap();

        let bombs = [Bomb::new(target, BombOwner::Player, 0)];
        let with = policy.compute_adversary_moves(player, &active, 8, &bombs, &no_history());
        assert_eq!(with.get(id(1)), Some(target));
    }

    #[test]
    fn test_no_shared_destinations() {
        let policy = GreedyPolicy::new();
        for prow in 0..8 {
            for pcol in 0..8 {
                let player = Position::new(prow, pcol);
                let active = [(id(1), Position::new(0, 0)), (id(2), Position::new(0, 7))];
                if active.iter().any(|(_, p)| *p == player) {
                    continue;
                }
                let moves = policy.compute_adversary_moves(player, &active, 8, &[], &no_history());
                assert_eq!(moves.len(), 2);
                assert_ne!(moves.get(id(1)), moves.get(id(2)));
            }
        }
    }

    #[test]
    fn test_second_knight_cannot_take_claimed_capture() {
        let policy = GreedyPolicy::new();
        // Both knights attack (2,2); the first one claims it
        let player = Position::new(2, 2);
        let active = [(id(1), Position::new(0, 1)), (id(2), Position::new(4, 3))];
        let moves = policy.compute_adversary_moves(player, &active, 8, &[], &no_history());
        assert_eq!(moves.get(id(1)), Some(player));
        assert_ne!(moves.get(id(2)), Some(player));
    }

    #[test]
    fn test_decisions_keep_input_order() {
        let policy = GreedyPolicy::new();
        let active = [(id(7), Position::new(0, 7)), (id(3), Position::new(0, 0))];
        let moves = policy.compute_adversary_moves(Position::new(4, 4), &active, 8, &[], &no_history());
        let order: Vec<KnightId> = moves.iter().map(|(k, _)| *k).collect();
        assert_eq!(order, vec![id(7), id(3)]);
    }
}

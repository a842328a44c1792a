//! Knight move geometry
//!
//! Pure predicates over squares. Nothing here looks at bombs or knights
//! other than through the `blocked` slices the caller passes in.

use crate::core::position::{is_in_bounds, Position};
use crate::game::random::RandomSource;
use smallvec::SmallVec;

/// Knight offsets in enumeration order
///
/// The order is load-bearing: adversary tie-breaking picks the first
/// best-scoring candidate, so tests rely on it staying fixed.
pub const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
];

/// Destinations reachable from one square (never more than 8)
pub type KnightMoves = SmallVec<[Position; 8]>;

/// True iff the displacement is (±1,±2) or (±2,±1)
#[inline]
pub fn is_knight_pattern(from: Position, to: Position) -> bool {
    let (dr, dc) = from.delta(to);
    (dr == 1 && dc == 2) || (dr == 2 && dc == 1)
}

/// In-bounds knight destinations from `pos` that are not in `blocked`
pub fn enumerate_knight_destinations(pos: Position, size: i32, blocked: &[Position]) -> KnightMoves {
    KNIGHT_OFFSETS
        .iter()
        .map(|&offset| pos + offset)
        .filter(|dest| is_in_bounds(*dest, size) && !blocked.contains(dest))
        .collect()
}

/// Uniformly random square not in `blocked`, or `None` if the board is full
///
/// Candidates are collected in row-major order before the draw, so a
/// scripted random source picks a predictable square.
pub fn pick_uniform_random_vacant_square(
    size: i32,
    blocked: &[Position],
    rng: &mut dyn RandomSource,
) -> Option<Position> {
    let vacant: Vec<Position> = (0..size)
        .flat_map(|row| (0..size).map(move |col| Position::new(row, col)))
        .filter(|pos| !blocked.contains(pos))
        .collect();

    if vacant.is_empty() {
        return None;
    }
    let index = rng.pick_index(vacant.len());
    vacant.get(index).copied()
}

/// Rough number of knight moves between two squares
pub fn knight_distance(a: Position, b: Position) -> i32 {
    let (dr, dc) = a.delta(b);
    let half_ceil = |n: i32| (n + 1) / 2;
    half_ceil(dr).max(half_ceil(dc)).max((dr + dc + 2) / 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::random::ScriptedRandom;

    #[test]
    fn test_knight_pattern() {
        let from = Position::new(4, 4);
        assert!(is_knight_pattern(from, Position::new(6, 5)));
        assert!(is_knight_pattern(from, Position::new(3, 2)));
        assert!(!is_knight_pattern(from, Position::new(5, 5)));
        assert!(!is_knight_pattern(from, Position::new(4, 4)));
        assert!(!is_knight_pattern(from, Position::new(6, 6)));
    }

    #[test]
    fn test_center_has_eight_destinations() {
        let moves = enumerate_knight_destinations(Position::new(4, 4), 8, &[]);
        assert_eq!(moves.len(), 8);
        assert_eq!(moves[0], Position::new(5, 6));
        assert_eq!(moves[7], Position::new(2, 3));
    }

    #[test]
    fn test_corner_has_two_destinations() {
        let moves = enumerate_knight_destinations(Position::new(0, 0), 8, &[]);
        assert_eq!(moves.as_slice(), &[Position::new(1, 2), Position::new(2, 1)]);
    }

    #[test]
    fn test_blocked_squares_are_filtered() {
        let blocked = [Position::new(1, 2)];
        let moves = enumerate_knight_destinations(Position::new(0, 0), 8, &blocked);
        assert_eq!(moves.as_slice(), &[Position::new(2, 1)]);
    }

    #[test]
    fn test_enumeration_laws_across_sizes() {
        for size in 1..=10 {
            for row in 0..size {
                for col in 0..size {
                    let from = Position::new(row, col);
                    let moves = enumerate_knight_destinations(from, size, &[]);
                    for (i, dest) in moves.iter().enumerate() {
                        assert!(is_in_bounds(*dest, size));
                        assert!(is_knight_pattern(from, *dest));
                        assert!(!moves[i + 1..].contains(dest), "duplicate {dest}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_random_vacant_square() {
        let blocked = [Position::new(0, 0), Position::new(0, 1)];
        let mut rng = ScriptedRandom::new(vec![0, 1]);
        assert_eq!(
            pick_uniform_random_vacant_square(2, &blocked, &mut rng),
            Some(Position::new(1, 0))
        );
        assert_eq!(
            pick_uniform_random_vacant_square(2, &blocked, &mut rng),
            Some(Position::new(1, 1))
        );
    }

    #[test]
    fn test_random_vacant_square_full_board() {
        let blocked = [Position::new(0, 0)];
        let mut rng = ScriptedRandom::new(vec![0]);
        assert_eq!(pick_uniform_random_vacant_square(1, &blocked, &mut rng), None);
    }

    #[test]
    fn test_knight_distance() {
        let origin = Position::new(0, 0);
        assert_eq!(knight_distance(origin, origin), 0);
        assert_eq!(knight_distance(origin, Position::new(1, 2)), 1);
        assert_eq!(knight_distance(origin, Position::new(4, 4)), 3);
        assert_eq!(knight_distance(origin, Position::new(7, 7)), 5);
    }
}

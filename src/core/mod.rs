//! Core board types and geometry

pub mod entity;
pub mod geometry;
pub mod position;

pub use entity::{Adversary, AdversaryStatus, Bomb, BombOwner, KnightId};
pub use geometry::{
    enumerate_knight_destinations, is_knight_pattern, knight_distance,
    pick_uniform_random_vacant_square, KnightMoves, KNIGHT_OFFSETS,
};
pub use position::{is_in_bounds, is_same_square, Position};

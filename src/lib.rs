//! Knight Trap - turn-resolution engine for a knight survival puzzle
//!
//! A player knight survives on a square board against shadow knights while
//! every vacated square turns into a timed bomb. This crate decides move
//! legality, captures, bomb placement and expiry, adversary movement,
//! respawns and loss conditions. Rendering and input are left to callers.

pub mod core;
pub mod error;
pub mod game;
pub mod simulation;

pub use error::{KnightTrapError, Result};

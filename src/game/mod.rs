//! Session state, turn resolution and the adversary policy

pub mod config;
pub mod controller;
pub mod engine;
pub mod events;
pub mod logger;
pub mod policy;
pub mod random;
pub mod snapshot;
pub mod state;

pub use config::{AdversaryStart, GameConfig};
pub use controller::{CautiousController, PlayerController, RandomController};
pub use engine::{resolve_turn, start_session, GameEngine, TurnResolution};
pub use events::{GameEvent, TriggeredBy};
pub use logger::{GameLogger, LogEntry, OutputMode, VerbosityLevel};
pub use policy::{AdversaryMoves, AdversaryPolicy, GreedyPolicy};
pub use random::{RandomSource, ScriptedRandom};
pub use snapshot::{SessionSnapshot, SnapshotError};
pub use state::{multiplier_for, GameOverReason, GameStatus, SessionBuilder, SessionState};

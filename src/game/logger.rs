//! Session logger with verbosity levels and in-memory capture
//!
//! Event lines are formatted into a bump arena and copied out once, so the
//! scratch space is reused from turn to turn.

use crate::game::events::GameEvent;
use bumpalo::Bump;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::fmt::Write as FmtWrite;

/// How much of a session gets printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    Silent = 0,
    /// Only the game outcome
    Minimal = 1,
    /// Session start, captures, detonations and respawns
    #[default]
    Normal = 2,
    /// Every event, including knight movement
    Verbose = 3,
}

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputMode {
    #[default]
    Stdout,
    /// Kept in memory regardless of verbosity, nothing printed
    Memory,
}

/// A captured log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    pub category: Option<&'static str>,
}

pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,

    /// Scratch arena for event lines, reset after each one
    format_bump: RefCell<Bump>,

    log_buffer: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_mode: OutputMode::default(),
            format_bump: RefCell::new(Bump::new()),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    /// Capture to memory instead of printing
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn is_capturing(&self) -> bool {
        self.output_mode == OutputMode::Memory
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    /// Lines captured since capture was enabled
    pub fn logs(&self) -> Ref<'_, [LogEntry]> {
        Ref::map(self.log_buffer.borrow(), Vec::as_slice)
    }

    fn log(&self, level: VerbosityLevel, message: &str, category: Option<&'static str>) {
        if level == VerbosityLevel::Silent {
            return;
        }
        match self.output_mode {
            OutputMode::Memory => self.log_buffer.borrow_mut().push(LogEntry {
                level,
                message: message.to_string(),
                category,
            }),
            OutputMode::Stdout if level <= self.verbosity => {
                if level == VerbosityLevel::Minimal {
                    println!("{message}");
                } else {
                    println!("  {message}");
                }
            }
            OutputMode::Stdout => {}
        }
    }

    #[inline]
    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, message, None);
    }

    /// Log a turn event at the level its importance warrants
    pub fn game_event(&self, turn: u32, event: &GameEvent) {
        let level = match event {
            GameEvent::GameOver(_) => VerbosityLevel::Minimal,
            GameEvent::PlayerMoved { .. } | GameEvent::AdversaryMoved { .. } => VerbosityLevel::Verbose,
            _ => VerbosityLevel::Normal,
        };
        if level > self.verbosity && !self.is_capturing() {
            return;
        }

        let mut bump = self.format_bump.borrow_mut();
        {
            let mut line = bumpalo::collections::String::new_in(&bump);
            // Writing into an arena string cannot fail
            let _ = write!(line, "[turn {turn}] {event}");
            self.log(level, &line, Some("game_event"));
        }
        bump.reset();
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{KnightId, Position};
    use crate::game::{GameOverReason, TriggeredBy};

    #[test]
    fn test_logger_defaults() {
        let logger = GameLogger::new();
        assert_eq!(logger.verbosity(), VerbosityLevel::Normal);
        assert!(!logger.is_capturing());
        assert!(logger.logs().is_empty());
    }

    #[test]
    fn test_capture_ignores_verbosity() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Minimal);
        logger.enable_capture();

        logger.normal("New game");
        logger.game_event(
            1,
            &GameEvent::AdversaryMoved {
                id: KnightId::new(2),
                from: Position::new(0, 7),
                to: Position::new(2, 6),
            },
        );

        let logs = logger.logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].message, "New game");
        assert_eq!(logs[0].category, None);
        assert_eq!(logs[1].level, VerbosityLevel::Verbose);
    }

    #[test]
    fn test_game_event_format_and_level() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Verbose);
        logger.enable_capture();

        logger.game_event(
            3,
            &GameEvent::PlayerMoved {
                from: Position::new(4, 4),
                to: Position::new(6, 5),
            },
        );
        logger.game_event(
            3,
            &GameEvent::BombDetonated {
                square: Position::new(1, 2),
                triggered_by: TriggeredBy::Adversary(KnightId::new(1)),
            },
        );
        logger.game_event(3, &GameEvent::GameOver(GameOverReason::Trapped));

        let logs = logger.logs();
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0].message, "[turn 3] Player moves (4, 4) -> (6, 5)");
        assert_eq!(logs[0].category, Some("game_event"));
        assert_eq!(logs[1].level, VerbosityLevel::Normal);
        assert_eq!(logs[2].message, "[turn 3] Game over: trapped");
        assert_eq!(logs[2].level, VerbosityLevel::Minimal);
    }

    #[test]
    fn test_silent_messages_are_dropped() {
        let mut logger = GameLogger::new();
        logger.enable_capture();
        logger.log(VerbosityLevel::Silent, "never", None);
        assert!(logger.logs().is_empty());
    }
}

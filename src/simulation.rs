//! Batch simulation: play many autoplayed sessions in parallel
//!
//! Each game gets its own engine and controller seeded from the master seed
//! plus the game index, so a run is reproducible regardless of how rayon
//! schedules the work.

use crate::game::{
    CautiousController, GameConfig, GameEngine, GameOverReason, PlayerController, RandomController,
    VerbosityLevel,
};
use crate::Result;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Controller type for simulated players
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerType {
    Random,
    Cautious,
}

impl ControllerType {
    fn build(self, seed: u64) -> Box<dyn PlayerController> {
        match self {
            ControllerType::Random => Box::new(RandomController::with_seed(seed)),
            ControllerType::Cautious => Box::new(CautiousController),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub config: GameConfig,
    pub games: usize,
    pub seed: u64,
    pub controller: ControllerType,
    /// Sessions still alive after this many turns are stopped
    pub max_turns: u32,
}

/// Result of one simulated session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u64,
    pub turns: u32,
    pub captures: u32,
    /// `None` if the session hit the turn limit or the controller gave up
    pub reason: Option<GameOverReason>,
}

/// Aggregate statistics over a batch
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SimulationStats {
    pub games: usize,
    pub total_score: u64,
    pub best_score: u64,
    pub total_turns: u64,
    pub total_captures: u64,
    pub illegal_moves: usize,
    pub bombs: usize,
    pub captured: usize,
    pub trapped: usize,
    pub unfinished: usize,
    pub duration: Duration,
}

impl SimulationStats {
    fn record(&mut self, summary: &GameSummary) {
        self.games += 1;
        self.total_score += summary.score;
        self.best_score = self.best_score.max(summary.score);
        self.total_turns += u64::from(summary.turns);
        self.total_captures += u64::from(summary.captures);
        match summary.reason {
            Some(GameOverReason::IllegalMove) => self.illegal_moves += 1,
            Some(GameOverReason::Bomb) => self.bombs += 1,
            Some(GameOverReason::Captured) => self.captured += 1,
            Some(GameOverReason::Trapped) => self.trapped += 1,
            None => self.unfinished += 1,
        }
    }

    pub fn average_score(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_score as f64 / self.games as f64
        }
    }

    pub fn average_turns(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_turns as f64 / self.games as f64
        }
    }

    pub fn print_summary(&self) {
        println!("=== Simulation Results ===");
        println!("Games played:    {}", self.games);
        println!("Average score:   {:.1}", self.average_score());
        println!("Best score:      {}", self.best_score);
        println!("Average turns:   {:.1}", self.average_turns());
        println!("Total captures:  {}", self.total_captures);
        println!("Losses by reason:");
        println!("  captured:      {}", self.captured);
        println!("  trapped:       {}", self.trapped);
        println!("  bomb:          {}", self.bombs);
        println!("  illegal move:  {}", self.illegal_moves);
        println!("  unfinished:    {}", self.unfinished);
        println!("Elapsed:         {:.2}s", self.duration.as_secs_f64());
    }
}

/// Play one session to the end (or the turn limit)
pub fn play_game(
    config: &GameConfig,
    controller: &mut dyn PlayerController,
    seed: u64,
    max_turns: u32,
) -> Result<GameSummary> {
    let mut engine = GameEngine::with_seed(config.clone(), seed)?;
    engine.logger.set_verbosity(VerbosityLevel::Silent);
    engine.start()?;

    while !engine.state().is_over() && engine.state().turn() < max_turns {
        let Some(target) = controller.choose_move(engine.state()) else {
            break;
        };
        engine.submit_move(target)?;
    }

    let state = engine.state();
    Ok(GameSummary {
        score: state.score(),
        turns: state.turn(),
        captures: state.captures(),
        reason: state.game_over_reason(),
    })
}

/// Play `options.games` sessions in parallel and aggregate the results
pub fn run_simulation(options: &SimulationOptions) -> Result<SimulationStats> {
    options.config.validate()?;
    let start = Instant::now();

    let summaries: Vec<GameSummary> = (0..options.games)
        .into_par_iter()
        .map(|game_idx| {
            // Derive independent engine and controller seeds for this game
            let mut seeder =
                Xoshiro256PlusPlus::seed_from_u64(options.seed.wrapping_add(game_idx as u64));
            let engine_seed = seeder.next_u64();
            let mut controller = options.controller.build(seeder.next_u64());
            play_game(&options.config, controller.as_mut(), engine_seed, options.max_turns)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut stats = SimulationStats::default();
    for summary in &summaries {
        stats.record(summary);
    }
    stats.duration = start.elapsed();
    Ok(stats)
}

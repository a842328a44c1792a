//! Knight Trap - command-line front end
//!
//! `play` runs a session in the terminal (typed moves or an autoplay
//! controller); `sim` runs a batch of autoplayed sessions in parallel.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use knight_trap::{
    core::Position,
    game::{
        CautiousController, GameConfig, GameEngine, PlayerController, RandomController,
        SessionSnapshot, SessionState, VerbosityLevel,
    },
    simulation::{run_simulation, ControllerType as SimControllerType, SimulationOptions},
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Controller type for autoplay
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ControllerType {
    /// Random safe moves
    Random,
    /// Captures when possible, otherwise avoids threatened squares
    Cautious,
}

impl From<ControllerType> for SimControllerType {
    fn from(value: ControllerType) -> Self {
        match value {
            ControllerType::Random => SimControllerType::Random,
            ControllerType::Cautious => SimControllerType::Cautious,
        }
    }
}

/// Verbosity level for game output (accepts names or numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

#[derive(Parser)]
#[command(name = "knight-trap")]
#[command(about = "Knight Trap - survive the shadow knights and their bombs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a session in the terminal
    Play {
        /// JSON game config (defaults to the standard 8x8 game)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Seed for respawn placement
        #[arg(long)]
        seed: Option<u64>,

        /// Let a controller play instead of reading moves from stdin
        #[arg(long, value_enum)]
        auto: Option<ControllerType>,

        /// Stop autoplay after this many turns
        #[arg(long, default_value_t = 500)]
        max_turns: u32,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// Resume from a snapshot file
        #[arg(long, value_name = "FILE", conflicts_with = "config")]
        resume: Option<PathBuf>,

        /// Save a snapshot here when the session stops
        #[arg(long, value_name = "FILE")]
        save: Option<PathBuf>,
    },

    /// Autoplay many sessions in parallel and print statistics
    Sim {
        /// Number of games to play
        #[arg(long, default_value_t = 100)]
        games: usize,

        /// Master seed
        #[arg(long, default_value_t = 0)]
        seed: u64,

        #[arg(long, value_enum, default_value = "cautious")]
        controller: ControllerType,

        /// Stop each game after this many turns
        #[arg(long, default_value_t = 500)]
        max_turns: u32,

        /// JSON game config (defaults to the standard 8x8 game)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GameConfig> {
    match path {
        Some(p) => GameConfig::load_from_file(p)
            .with_context(|| format!("failed to load config {}", p.display())),
        None => Ok(GameConfig::default()),
    }
}

fn render_board(state: &SessionState, hints: Option<&[Position]>) -> String {
    let size = state.board_size();
    let mut out = String::new();
    out.push_str("    ");
    for col in 0..size {
        out.push_str(&format!("{col} "));
    }
    out.push('\n');
    for row in 0..size {
        out.push_str(&format!("{row:>2}  "));
        for col in 0..size {
            let pos = Position::new(row, col);
            let glyph = if pos == state.player() {
                'N'
            } else if state.active_adversaries().any(|a| a.position == pos) {
                'S'
            } else if state.has_bomb_at(pos) {
                '*'
            } else if hints.is_some_and(|h| h.contains(&pos)) {
                '+'
            } else {
                '.'
            };
            out.push(glyph);
            out.push(' ');
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "turn {}  score {}  x{}  bomb lifetime {}  captures {}\n",
        state.turn(),
        state.score(),
        state.multiplier(),
        state.bomb_lifetime(),
        state.captures()
    ));
    out
}

fn parse_move(line: &str) -> Option<Position> {
    let mut parts = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|p| !p.is_empty());
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Position::new(row, col))
}

fn run_play(
    mut engine: GameEngine,
    mut auto: Option<Box<dyn PlayerController>>,
    max_turns: u32,
    save: Option<PathBuf>,
) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !engine.state().is_over() {
        let hints = engine.move_hints();
        print!("{}", render_board(engine.state(), hints.as_deref()));

        let target = match auto.as_mut() {
            Some(controller) => {
                if engine.state().turn() >= max_turns {
                    break;
                }
                match controller.choose_move(engine.state()) {
                    Some(target) => {
                        println!("{} plays {}", controller.name(), target);
                        target
                    }
                    None => break,
                }
            }
            None => {
                print!("move (row col), q to quit> ");
                io::stdout().flush()?;
                let Some(line) = lines.next() else { break };
                let line = line?;
                let line = line.trim();
                if line.eq_ignore_ascii_case("q") {
                    break;
                }
                match parse_move(line) {
                    Some(target) => target,
                    None => {
                        println!("could not read '{line}', expected e.g. 6 5");
                        continue;
                    }
                }
            }
        };

        if let Err(e) = engine.submit_move(target) {
            println!("{e}");
        }
    }

    let state = engine.state();
    print!("{}", render_board(state, None));
    match state.game_over_reason() {
        Some(reason) => println!("Game over ({reason}). Final score: {}", state.score()),
        None => println!("Stopped at turn {}. Score: {}", state.turn(), state.score()),
    }

    if let Some(path) = save {
        engine
            .snapshot()
            .save_to_file(&path)
            .with_context(|| format!("failed to save snapshot {}", path.display()))?;
        println!("Snapshot saved to {}", path.display());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            config,
            seed,
            auto,
            max_turns,
            verbosity,
            resume,
            save,
        } => {
            let mut engine = match resume {
                Some(path) => {
                    let snapshot = SessionSnapshot::load_from_file(&path)
                        .with_context(|| format!("failed to load snapshot {}", path.display()))?;
                    GameEngine::from_snapshot(snapshot)?
                }
                None => {
                    let config = load_config(config.as_ref())?;
                    let mut engine = match seed {
                        Some(seed) => GameEngine::with_seed(config, seed)?,
                        None => GameEngine::new(config)?,
                    };
                    engine.logger.set_verbosity(verbosity.0);
                    engine.start()?;
                    engine
                }
            };
            engine.logger.set_verbosity(verbosity.0);

            let controller: Option<Box<dyn PlayerController>> = auto.map(|kind| match kind {
                ControllerType::Random => {
                    Box::new(RandomController::with_seed(seed.unwrap_or(0))) as Box<dyn PlayerController>
                }
                ControllerType::Cautious => Box::new(CautiousController),
            });
            run_play(engine, controller, max_turns, save)
        }
        Commands::Sim {
            games,
            seed,
            controller,
            max_turns,
            config,
        } => {
            let options = SimulationOptions {
                config: load_config(config.as_ref())?,
                games,
                seed,
                controller: controller.into(),
                max_turns,
            };
            println!("Running {games} games (seed {seed}, controller {controller:?})\n");
            let stats = run_simulation(&options)?;
            stats.print_summary();
            Ok(())
        }
    }
}

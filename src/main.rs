//! Mineopoly - command line driver
//!
//! Plays single matches, runs win-percent tournaments and steps through
//! saved match records.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mineopoly::{
    core::Side,
    game::{render_text, GameLoop, MatchConfig, MatchRecord, VerbosityLevel},
    loader::{Layout, MatchInitializer},
    tournament::{run_tourney, StrategyKind},
};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Verbosity level for match output (accepts names and numbers)
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
#[command(name = "mineopoly")]
#[command(about = "Mineopoly - two-player mining match engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one match
    Play {
        /// Board side length (ignored with --layout or --config)
        #[arg(long, default_value_t = 20)]
        size: usize,

        /// Layout file to play on instead of a generated board
        #[arg(long, value_name = "LAYOUT_FILE")]
        layout: Option<PathBuf>,

        /// JSON match configuration
        #[arg(long, value_name = "CONFIG_FILE")]
        config: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "greedy")]
        red: StrategyKind,

        #[arg(long, value_enum, default_value = "random")]
        blue: StrategyKind,

        /// Match seed (default: current time)
        #[arg(long)]
        seed: Option<u64>,

        /// Verbosity level (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// Print the board after every tick
        #[arg(long)]
        show_board: bool,

        /// Prefix tick logs with the state hash
        #[arg(long)]
        debug_state_hash: bool,

        /// Write the match record as JSON
        #[arg(long, value_name = "RECORD_FILE")]
        record: Option<PathBuf>,

        /// Store the full board in every tick of the record
        #[arg(long, requires = "record")]
        board_snapshots: bool,
    },

    /// Measure win percent over many matches
    Tourney {
        /// Board sizes to test
        #[arg(long, value_delimiter = ',', default_value = "14,20,26,32")]
        sizes: Vec<usize>,

        /// Matches per board size
        #[arg(long, short = 'g', default_value_t = 1000)]
        games: usize,

        #[arg(long, value_enum, default_value = "greedy")]
        red: StrategyKind,

        #[arg(long, value_enum, default_value = "random")]
        blue: StrategyKind,

        /// Seed of the first match; match i uses seed + i
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },

    /// Step through a saved match record
    Replay {
        /// Record written by `play --record`
        #[arg(value_name = "RECORD_FILE")]
        record: PathBuf,

        /// Print the board after every tick
        #[arg(long)]
        show_board: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            size,
            layout,
            config,
            red,
            blue,
            seed,
            verbosity,
            show_board,
            debug_state_hash,
            record,
            board_snapshots,
        } => run_play(PlayArgs {
            size,
            layout,
            config,
            red,
            blue,
            seed,
            verbosity: verbosity.0,
            show_board,
            debug_state_hash,
            record,
            board_snapshots,
        })?,
        Commands::Tourney {
            sizes,
            games,
            red,
            blue,
            seed,
        } => {
            for size in sizes {
                let config = MatchConfig::for_board_size(size);
                let stats = run_tourney(&config, red, blue, games, seed)
                    .with_context(|| format!("tournament on a {size}x{size} board"))?;
                stats.print_summary(size);
                println!();
            }
        }
        Commands::Replay { record, show_board } => run_replay(record, show_board)?,
    }

    Ok(())
}

struct PlayArgs {
    size: usize,
    layout: Option<PathBuf>,
    config: Option<PathBuf>,
    red: StrategyKind,
    blue: StrategyKind,
    seed: Option<u64>,
    verbosity: VerbosityLevel,
    show_board: bool,
    debug_state_hash: bool,
    record: Option<PathBuf>,
    board_snapshots: bool,
}

fn run_play(args: PlayArgs) -> Result<()> {
    let layout = args
        .layout
        .as_ref()
        .map(|path| {
            Layout::load(path).with_context(|| format!("loading layout {}", path.display()))
        })
        .transpose()?;

    let mut config = match &args.config {
        Some(path) => MatchConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MatchConfig::for_board_size(layout.as_ref().map_or(args.size, Layout::size)),
    };
    config.seed = args.seed.unwrap_or_else(time_seed);

    let mut initializer = MatchInitializer::new(config).with_verbosity(args.verbosity);
    if let Some(layout) = layout {
        initializer = initializer.with_layout(layout);
    }
    let mut game = initializer.init_game()?;
    game.logger.set_debug_state_hash(args.debug_state_hash);
    println!("Seed: {}", game.config.seed);

    let mut red = args.red.build();
    let mut blue = args.blue.build();
    let mut game_loop = GameLoop::new(&mut game);
    if args.record.is_some() {
        game_loop = game_loop.with_recording(args.board_snapshots);
    }
    if args.show_board {
        println!("{}\n", render_text(&game_loop.game.board));
    }

    let result = loop {
        let finished = game_loop.run_turn_once(&mut *red, &mut *blue)?;
        if args.show_board {
            println!("{}\n", render_text(&game_loop.game.board));
        }
        if let Some(result) = finished {
            break result;
        }
    };

    if let (Some(path), Some(record)) = (&args.record, game_loop.take_record()) {
        std::fs::write(path, record.to_json()?)
            .with_context(|| format!("writing record {}", path.display()))?;
        println!("Record written to {}", path.display());
    }

    if args.verbosity == VerbosityLevel::Silent {
        println!(
            "{:?} {}-{} after {} ticks",
            result.winner, result.red_score, result.blue_score, result.turns_played
        );
    }
    Ok(())
}

fn run_replay(path: PathBuf, show_board: bool) -> Result<()> {
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("reading record {}", path.display()))?;
    let record = MatchRecord::from_json(&json)?;
    let frames = record.replay_states()?;

    println!(
        "{} (Red) vs {} (Blue), seed {}",
        record.strategies[0], record.strategies[1], record.seed
    );
    if show_board {
        println!("{}\n", render_text(&record.initial_board));
    }
    for (frame, tick) in frames.iter().zip(&record.ticks) {
        let describe = |side: Side| {
            let i = side.index();
            let action = tick.actions[i].map_or("none".to_string(), |a| a.to_string());
            match tick.rejections[i] {
                Some(rejection) => format!("{action} ({rejection})"),
                None => action,
            }
        };
        let red = &frame.players[Side::Red.index()];
        let blue = &frame.players[Side::Blue.index()];
        println!(
            "Tick {}: Red {} -> {} score {} | Blue {} -> {} score {}",
            frame.tick,
            describe(Side::Red),
            red.position,
            red.score,
            describe(Side::Blue),
            blue.position,
            blue.score
        );
        if show_board {
            println!("{}\n", render_text(&frame.board));
        }
    }
    if let Some(result) = &record.result {
        println!(
            "Result: {:?} {}-{} ({:?})",
            result.winner, result.red_score, result.blue_score, result.end_reason
        );
    }
    Ok(())
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

//! Tournament mode: many seeded matches in parallel
//!
//! Match `i` of a tournament uses seed `base + i`, so a tournament is as
//! reproducible as a single match no matter how rayon schedules it.

use crate::core::Side;
use crate::game::{
    GameResult, GreedyStrategy, MatchConfig, OutputMode, PlayerStrategy, RandomStrategy,
    VerbosityLevel,
};
use crate::loader::MatchInitializer;
use crate::Result;
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Built-in strategies selectable for a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StrategyKind {
    Random,
    Greedy,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn PlayerStrategy> {
        match self {
            StrategyKind::Random => Box::new(RandomStrategy::new()),
            StrategyKind::Greedy => Box::new(GreedyStrategy::new()),
        }
    }
}

/// Aggregate outcome of a tournament
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TourneyStats {
    pub games: usize,
    pub red_wins: usize,
    pub blue_wins: usize,
    pub draws: usize,
    /// Matches red won by at least `min_score_to_win`
    pub red_margin_wins: usize,
    pub elapsed: Duration,
}

impl TourneyStats {
    fn record(&mut self, result: &GameResult, min_score_to_win: i32) {
        self.games += 1;
        match result.winner {
            Some(Side::Red) => self.red_wins += 1,
            Some(Side::Blue) => self.blue_wins += 1,
            None => self.draws += 1,
        }
        if result.margin() >= min_score_to_win {
            self.red_margin_wins += 1;
        }
    }

    /// Share of matches red won by the required margin
    pub fn win_percent(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.red_margin_wins as f64 / self.games as f64
    }

    pub fn print_summary(&self, board_size: usize) {
        let pct = |n: usize| 100.0 * n as f64 / self.games.max(1) as f64;
        println!("=== Board {board_size}x{board_size}: {} games ===", self.games);
        println!("Red wins: {} ({:.1}%)", self.red_wins, pct(self.red_wins));
        println!("Blue wins: {} ({:.1}%)", self.blue_wins, pct(self.blue_wins));
        println!("Draws: {} ({:.1}%)", self.draws, pct(self.draws));
        println!(
            "(Board size, win percent): ({board_size}, {})",
            self.win_percent()
        );
        if !self.elapsed.is_zero() {
            println!(
                "Elapsed: {:.2}s ({:.1} games/s)",
                self.elapsed.as_secs_f64(),
                self.games as f64 / self.elapsed.as_secs_f64()
            );
        }
    }
}

/// Play `games` silent matches of `red` against `blue` in parallel
pub fn run_tourney(
    config: &MatchConfig,
    red: StrategyKind,
    blue: StrategyKind,
    games: usize,
    base_seed: u64,
) -> Result<TourneyStats> {
    let start = Instant::now();
    let results = (0..games)
        .into_par_iter()
        .map(|i| {
            let config = config.clone().with_seed(base_seed.wrapping_add(i as u64));
            let mut red_strategy = red.build();
            let mut blue_strategy = blue.build();
            MatchInitializer::new(config)
                .with_verbosity(VerbosityLevel::Silent)
                .with_output_mode(OutputMode::Stdout)
                .play(&mut *red_strategy, &mut *blue_strategy)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut stats = TourneyStats::default();
    for result in &results {
        stats.record(result, config.min_score_to_win);
    }
    stats.elapsed = start.elapsed();
    Ok(stats)
}

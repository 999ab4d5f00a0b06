//! Random baseline strategy
//!
//! Picks uniformly among the eight actions and the no-op. Its generator is
//! derived from the match generator at setup, so a seeded match replays
//! the same choices.

use crate::game::{BoardView, MatchRng, PlayerStrategy, Prices, StrategySetup, TurnAction};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomStrategy {
    rng: Xoshiro256PlusPlus,
}

impl RandomStrategy {
    pub fn new() -> Self {
        RandomStrategy {
            rng: Xoshiro256PlusPlus::seed_from_u64(0),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerStrategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    fn initialize(&mut self, _setup: &StrategySetup<'_>, rng: &mut MatchRng) {
        self.rng = Xoshiro256PlusPlus::seed_from_u64(rng.gen());
    }

    fn turn_action(
        &mut self,
        _view: &BoardView,
        _prices: &Prices,
        _charge: u32,
        _favored: bool,
    ) -> Option<TurnAction> {
        // Index 8 is the no-op
        let choice = self.rng.gen_range(0..=TurnAction::ALL.len());
        TurnAction::ALL.get(choice).copied()
    }
}

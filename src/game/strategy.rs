//! Decision policy interface
//!
//! A strategy only ever sees copies: a [`BoardView`], a [`Prices`] snapshot
//! and its own charge. It tracks its inventory through the callbacks.
//!
//! Example:
//! ```ignore
//! impl PlayerStrategy for Idle {
//!     fn name(&self) -> &str { "idle" }
//!     fn initialize(&mut self, _setup: &StrategySetup<'_>, _rng: &mut MatchRng) {}
//!     fn turn_action(&mut self, _view: &BoardView, _prices: &Prices, _charge: u32, _favored: bool)
//!         -> Option<TurnAction> { None }
//! }
//! ```

use crate::core::{Coord, Item};
use crate::game::{BoardView, Prices, TurnAction};
use rand_chacha::ChaCha12Rng;

/// The match-wide seeded generator threaded through setup
pub type MatchRng = ChaCha12Rng;

/// Everything a strategy learns once before the first tick
#[derive(Debug, Clone)]
pub struct StrategySetup<'a> {
    pub board_size: usize,
    pub max_inventory_size: usize,
    pub max_charge: u32,
    pub winning_score: i32,
    /// Layout is fixed for the match, so static features can be scanned here
    pub initial_view: &'a BoardView,
    pub start_location: Coord,
    pub is_red: bool,
}

pub trait PlayerStrategy {
    /// Short name used in logs and tournament reports
    fn name(&self) -> &str;

    /// Called once before play
    ///
    /// Strategies that need randomness should derive their own generator
    /// from `rng` here, never from ambient sources.
    fn initialize(&mut self, setup: &StrategySetup<'_>, rng: &mut MatchRng);

    /// Decide this tick's action; `None` is a no-op
    ///
    /// `favored` says whether this side wins a contested destination.
    fn turn_action(
        &mut self,
        view: &BoardView,
        prices: &Prices,
        charge: u32,
        favored: bool,
    ) -> Option<TurnAction>;

    /// An item moved into this player's inventory
    fn on_receive_item(&mut self, _item: Item) {}

    /// The whole inventory was sold for `total`
    fn on_sold_inventory(&mut self, _total: i32) {}

    /// The match is over
    fn end_round(&mut self, _red_score: i32, _blue_score: i32) {}
}

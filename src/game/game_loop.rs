//! Match loop
//!
//! Drives a [`GameState`] tick by tick: asks both strategies for intents,
//! hands them to the resolver, feeds the consequences back to the
//! strategies and checks for the end of the match.

/// Macro for conditional logging that avoids allocation when feature is disabled
///
/// When verbose-logging feature is disabled, this becomes a no-op at compile time,
/// eliminating all format! allocations on the per-action path.
macro_rules! log_if_verbose {
    ($self:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            if $self.game.logger.wants(VerbosityLevel::Verbose) {
                $self.game.logger.verbose(&format!($($arg)*));
            }
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$self;
        }
    };
}

use crate::core::Side;
use crate::game::replay::{MatchRecord, TickRecord};
use crate::game::state_hash::{compute_state_hash, format_hash};
use crate::game::{
    GameEndReason, GameResult, GameState, PlayerStrategy, Rejection, StrategySetup, TickOutcome,
    TurnAction,
};
use crate::Result;
use std::panic::{self, AssertUnwindSafe};

/// Verbosity level for match output
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output
    Silent = 0,
    /// Minimal - only the match outcome
    Minimal = 1,
    /// Normal - tick headers and sales (default)
    #[default]
    Normal = 2,
    /// Verbose - every action and rejection
    Verbose = 3,
}

/// Match loop manager
pub struct GameLoop<'a> {
    pub game: &'a mut GameState,
    /// Strategies have been initialized
    initialized: bool,
    /// Set once the match is over; later calls return it unchanged
    finished: Option<GameResult>,
    /// Names of the red and blue strategies, captured at setup
    strategy_names: [String; 2],
    record: Option<MatchRecord>,
    /// Store a full board copy in every tick record
    board_snapshots: bool,
}

impl<'a> GameLoop<'a> {
    pub fn new(game: &'a mut GameState) -> Self {
        GameLoop {
            game,
            initialized: false,
            finished: None,
            strategy_names: [String::new(), String::new()],
            record: None,
            board_snapshots: false,
        }
    }

    /// Set verbosity on the match logger
    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.game.logger.set_verbosity(verbosity);
        self
    }

    /// Keep a [`MatchRecord`] of every tick
    pub fn with_recording(mut self, board_snapshots: bool) -> Self {
        self.record = Some(MatchRecord::start(self.game));
        self.board_snapshots = board_snapshots;
        self
    }

    pub fn record(&self) -> Option<&MatchRecord> {
        self.record.as_ref()
    }

    pub fn take_record(&mut self) -> Option<MatchRecord> {
        self.record.take()
    }

    /// Run the match to completion
    pub fn run_game(
        &mut self,
        red: &mut dyn PlayerStrategy,
        blue: &mut dyn PlayerStrategy,
    ) -> Result<GameResult> {
        loop {
            if let Some(result) = self.run_turn_once(red, blue)? {
                return Ok(result);
            }
        }
    }

    /// Run up to `turns_to_run` ticks
    ///
    /// Returns a `Manual` result if the match is still going afterwards.
    pub fn run_turns(
        &mut self,
        red: &mut dyn PlayerStrategy,
        blue: &mut dyn PlayerStrategy,
        turns_to_run: u32,
    ) -> Result<GameResult> {
        for _ in 0..turns_to_run {
            if let Some(result) = self.run_turn_once(red, blue)? {
                return Ok(result);
            }
        }
        Ok(self.game.result(GameEndReason::Manual))
    }

    /// Hand both strategies their setup, red first, sharing the match RNG
    fn setup_game(
        &mut self,
        red: &mut dyn PlayerStrategy,
        blue: &mut dyn PlayerStrategy,
    ) -> Result<()> {
        let game = &mut *self.game;
        let strategies: [&mut dyn PlayerStrategy; 2] = [red, blue];
        for (strategy, side) in strategies.into_iter().zip(Side::BOTH) {
            let player = game.player(side);
            let view = game
                .board
                .convert_to_view(player, game.player(side.opponent()));
            let setup = StrategySetup {
                board_size: game.config.board_size,
                max_inventory_size: game.config.max_inventory_size,
                max_charge: game.config.max_charge,
                winning_score: game.config.winning_score,
                initial_view: &view,
                start_location: player.position,
                is_red: side.is_red(),
            };
            strategy.initialize(&setup, &mut game.rng);
            self.strategy_names[side.index()] = strategy.name().to_string();
        }

        if let Some(record) = self.record.as_mut() {
            record.strategies = self.strategy_names.clone();
        }
        self.game.logger.normal(&format!(
            "Match on {0}x{0}: {1} (Red) vs {2} (Blue)",
            self.game.config.board_size, self.strategy_names[0], self.strategy_names[1]
        ));
        self.initialized = true;
        Ok(())
    }

    /// Run a single tick and check for the end of the match
    ///
    /// Returns:
    /// - `Ok(Some(GameResult))` if the match is over
    /// - `Ok(None)` if it continues
    pub fn run_turn_once(
        &mut self,
        red: &mut dyn PlayerStrategy,
        blue: &mut dyn PlayerStrategy,
    ) -> Result<Option<GameResult>> {
        if let Some(result) = &self.finished {
            return Ok(Some(result.clone()));
        }
        if !self.initialized {
            self.setup_game(red, blue)?;
        }
        if let Some(result) = self.game.check_outcome() {
            self.finish(red, blue, &result);
            return Ok(Some(result));
        }

        let mut strategies: [&mut dyn PlayerStrategy; 2] = [red, blue];
        let (actions, violations) = self.collect_intents(&mut strategies);
        let mut outcome = self.game.resolve_tick(actions);
        for side in Side::BOTH {
            if violations[side.index()] {
                outcome.rejections[side.index()] = Some(Rejection::ContractViolation);
            }
        }

        self.notify(&mut strategies, &outcome);
        self.log_tick(&outcome);
        self.record_tick(&outcome);

        let [red, blue] = strategies;
        if let Some(result) = self.game.check_outcome() {
            self.finish(red, blue, &result);
            return Ok(Some(result));
        }
        Ok(None)
    }

    /// Query both strategies with their restricted views
    ///
    /// A strategy that panics forfeits its action for the tick.
    fn collect_intents(
        &self,
        strategies: &mut [&mut dyn PlayerStrategy; 2],
    ) -> ([Option<TurnAction>; 2], [bool; 2]) {
        let mut actions = [None, None];
        let mut violations = [false, false];
        let prices = self.game.economy.current_prices();

        for side in Side::BOTH {
            let player = self.game.player(side);
            let view = self
                .game
                .board
                .convert_to_view(player, self.game.player(side.opponent()));
            let favored = side == self.game.config.favored_side;
            let strategy = &mut *strategies[side.index()];

            let decision = panic::catch_unwind(AssertUnwindSafe(|| {
                strategy.turn_action(&view, &prices, player.charge, favored)
            }));
            match decision {
                Ok(action) => {
                    if let Some(action) = action {
                        self.game.logger.strategy_choice(
                            &self.strategy_names[side.index()],
                            &format!("{side} chose {action}"),
                        );
                    }
                    actions[side.index()] = action;
                }
                Err(_) => {
                    violations[side.index()] = true;
                    self.game.logger.normal(&format!(
                        "{side} strategy {} failed to decide; skipping its turn",
                        self.strategy_names[side.index()]
                    ));
                }
            }
        }
        (actions, violations)
    }

    /// Feed inventory changes back to the strategies
    fn notify(&self, strategies: &mut [&mut dyn PlayerStrategy; 2], outcome: &TickOutcome) {
        for side in Side::BOTH {
            let strategy = &mut strategies[side.index()];
            if let Some(item) = outcome.received[side.index()] {
                strategy.on_receive_item(item);
            }
            if let Some(sale) = &outcome.sales[side.index()] {
                strategy.on_sold_inventory(sale.total);
            }
        }
    }

    fn log_tick(&self, outcome: &TickOutcome) {
        let logger = &self.game.logger;
        if logger.wants(VerbosityLevel::Normal) {
            let red = self.game.player(Side::Red);
            let blue = self.game.player(Side::Blue);
            let prefix = if logger.debug_state_hash_enabled() {
                format!("[STATE:{}] ", format_hash(compute_state_hash(&*self.game)))
            } else {
                String::new()
            };
            logger.normal(&format!(
                "{prefix}Tick {}: Red {} @ {} ({} charge), Blue {} @ {} ({} charge)",
                outcome.tick,
                red.score,
                red.position,
                red.charge,
                blue.score,
                blue.position,
                blue.charge
            ));
        }

        for side in Side::BOTH {
            let i = side.index();
            if let Some(rejection) = outcome.rejections[i] {
                match outcome.actions[i] {
                    Some(action) => {
                        log_if_verbose!(self, "{side} {action} rejected: {rejection}");
                    }
                    None => {
                        log_if_verbose!(self, "{side} rejected: {rejection}");
                    }
                }
            } else if let Some(action) = outcome.actions[i] {
                log_if_verbose!(
                    self,
                    "{side} {action} -> {}",
                    self.game.player(side).position
                );
            }
            if let Some(item) = outcome.received[i] {
                log_if_verbose!(self, "{side} picked up {item}");
            }
            if let Some(sale) = &outcome.sales[i] {
                logger.event(
                    "sale",
                    &format!("{side} sold inventory for {}", sale.total),
                );
            }
        }
    }

    fn record_tick(&mut self, outcome: &TickOutcome) {
        let Some(record) = self.record.as_mut() else {
            return;
        };
        record.ticks.push(TickRecord {
            tick: outcome.tick,
            actions: outcome.actions,
            rejections: outcome.rejections,
            sales: [0, 1].map(|i| outcome.sales[i].as_ref().map(|s| s.total)),
            players: self.game.players.clone(),
            board: self.board_snapshots.then(|| self.game.board.clone()),
        });
    }

    /// Close the match: tell both strategies and log the result
    fn finish(
        &mut self,
        red: &mut dyn PlayerStrategy,
        blue: &mut dyn PlayerStrategy,
        result: &GameResult,
    ) {
        red.end_round(result.red_score, result.blue_score);
        blue.end_round(result.red_score, result.blue_score);

        let winner = match result.winner {
            Some(side) => format!("{side} wins"),
            None => "Draw".to_string(),
        };
        self.game.logger.minimal(&format!(
            "{winner} {}-{} after {} ticks ({:?})",
            result.red_score, result.blue_score, result.turns_played, result.end_reason
        ));

        if let Some(record) = self.record.as_mut() {
            record.result = Some(result.clone());
        }
        self.finished = Some(result.clone());
    }
}

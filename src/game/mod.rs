//! Board, economy, turn resolution and the strategy contract

pub mod action;
pub mod board;
pub mod config;
pub mod economy;
pub mod game_loop;
pub mod greedy_strategy;
pub mod invariants;
pub mod logger;
pub mod random_strategy;
pub mod render;
pub mod replay;
pub mod scripted_strategy;
pub mod state;
pub mod state_hash;
pub mod strategy;
pub mod view;

pub use action::{Rejection, TurnAction};
pub use board::{Board, AUTOMINER_SLOWDOWN};
pub use config::{MatchConfig, MIN_BOARD_SIZE};
pub use economy::{
    Economy, PriceChangeCause, PriceUpdate, Prices, SaleReceipt, DEMAND_BROADCAST_INTERVAL,
};
pub use game_loop::{GameLoop, VerbosityLevel};
pub use greedy_strategy::GreedyStrategy;
pub use invariants::InvariantViolation;
pub use logger::{LogEntry, LogGuard, MatchLogger, OutputMode};
pub use random_strategy::RandomStrategy;
pub use render::{overlays, render_text, Overlay, RenderLayer, Surface, TextSurface};
pub use replay::{MatchRecord, ReplayFrame, TickRecord};
pub use scripted_strategy::ScriptedStrategy;
pub use state::{GameEndReason, GameResult, GameState, TickOutcome};
pub use state_hash::{compute_state_hash, format_hash};
pub use strategy::{MatchRng, PlayerStrategy, StrategySetup};
pub use view::BoardView;

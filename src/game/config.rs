//! Match configuration

use crate::core::Side;
use crate::{MineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smallest board that fits the recharge block, markets and both starts
pub const MIN_BOARD_SIZE: usize = 4;

/// Tunable match parameters
///
/// Defaults scale with the board size; see [`MatchConfig::for_board_size`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub board_size: usize,
    pub max_inventory_size: usize,
    pub max_charge: u32,
    /// First score to reach this ends the match
    pub winning_score: i32,
    /// Margin by which red must beat blue to count as a tournament win
    pub min_score_to_win: i32,
    /// Ticks before the match is called
    pub turn_limit: u32,
    /// Side that wins contested destinations
    pub favored_side: Side,
    /// Share of max charge a recharge tile restores per tick
    pub recharge_percent: u32,
    pub seed: u64,
}

impl MatchConfig {
    pub fn for_board_size(board_size: usize) -> Self {
        let n = board_size as i32;
        MatchConfig {
            board_size,
            max_inventory_size: 5,
            max_charge: 80,
            winning_score: 5 * n * n,
            min_score_to_win: 10 * n,
            turn_limit: 5 * (board_size * board_size) as u32,
            favored_side: Side::Red,
            recharge_percent: 10,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_inventory_size(mut self, size: usize) -> Self {
        self.max_inventory_size = size;
        self
    }

    pub fn with_max_charge(mut self, charge: u32) -> Self {
        self.max_charge = charge;
        self
    }

    pub fn with_winning_score(mut self, score: i32) -> Self {
        self.winning_score = score;
        self
    }

    pub fn with_turn_limit(mut self, turns: u32) -> Self {
        self.turn_limit = turns;
        self
    }

    pub fn with_favored_side(mut self, side: Side) -> Self {
        self.favored_side = side;
        self
    }

    pub fn with_recharge_percent(mut self, percent: u32) -> Self {
        self.recharge_percent = percent;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.board_size < MIN_BOARD_SIZE {
            return Err(MineError::InvalidConfig(format!(
                "board size {} is below the minimum of {MIN_BOARD_SIZE}",
                self.board_size
            )));
        }
        if self.max_inventory_size == 0 {
            return Err(MineError::InvalidConfig(
                "max inventory size must be at least 1".to_string(),
            ));
        }
        if self.max_charge == 0 {
            return Err(MineError::InvalidConfig(
                "max charge must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load a full configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: MatchConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig::for_board_size(20)
    }
}

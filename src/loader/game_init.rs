//! Match initialization
//!
//! Turns a configuration plus an optional fixed layout into a ready match
//! state. Without a layout the board is generated from the match seed, so
//! the seed alone reproduces the whole match.

use crate::game::{
    GameLoop, GameResult, GameState, MatchConfig, MatchRecord, OutputMode, PlayerStrategy,
    VerbosityLevel,
};
use crate::loader::{generate_layout, Layout};
use crate::{MineError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// Builder for match states
#[derive(Debug, Clone)]
pub struct MatchInitializer {
    config: MatchConfig,
    layout: Option<Layout>,
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
}

impl MatchInitializer {
    pub fn new(config: MatchConfig) -> Self {
        MatchInitializer {
            config,
            layout: None,
            verbosity: VerbosityLevel::default(),
            output_mode: OutputMode::default(),
        }
    }

    /// Play on a fixed layout instead of a generated one
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Seed the match generator, lay out the board and place both players
    pub fn init_game(&self) -> Result<GameState> {
        self.config.validate()?;
        let mut rng = ChaCha12Rng::seed_from_u64(self.config.seed);
        let layout = match &self.layout {
            Some(layout) => layout.clone(),
            None => generate_layout(self.config.board_size, &mut rng)?,
        };

        let mut game = GameState::new(self.config.clone(), layout.board, layout.starts, rng)?;
        game.logger.set_verbosity(self.verbosity);
        game.logger.set_output_mode(self.output_mode);
        Ok(game)
    }

    /// Play a full match
    pub fn play(
        &self,
        red: &mut dyn PlayerStrategy,
        blue: &mut dyn PlayerStrategy,
    ) -> Result<GameResult> {
        let mut game = self.init_game()?;
        GameLoop::new(&mut game).run_game(red, blue)
    }

    /// Play a full match and keep its record; the result is in `record.result`
    pub fn play_recorded(
        &self,
        red: &mut dyn PlayerStrategy,
        blue: &mut dyn PlayerStrategy,
        board_snapshots: bool,
    ) -> Result<MatchRecord> {
        let mut game = self.init_game()?;
        let mut game_loop = GameLoop::new(&mut game).with_recording(board_snapshots);
        game_loop.run_game(red, blue)?;
        game_loop
            .take_record()
            .ok_or_else(|| MineError::InvalidConfig("match was not recorded".to_string()))
    }
}

//! Match records and strategy-free replay
//!
//! A [`MatchRecord`] holds the starting position and every tick's actions.
//! Because the resolver is deterministic, re-resolving the actions rebuilds
//! every intermediate board without running any strategy. File handling is
//! left to the caller; records convert to and from JSON.

use crate::core::Player;
use crate::game::{
    Board, Economy, GameResult, GameState, MatchConfig, Rejection, TurnAction,
};
use crate::{MineError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// One resolved tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub tick: u32,
    /// Actions handed to the resolver, red first
    pub actions: [Option<TurnAction>; 2],
    pub rejections: [Option<Rejection>; 2],
    /// Sale totals credited this tick
    pub sales: [Option<i32>; 2],
    /// Players after the tick
    pub players: [Player; 2],
    /// Full board after the tick, when board snapshots were requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<Board>,
}

/// A post-tick position rebuilt by [`MatchRecord::replay_states`]
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayFrame {
    pub tick: u32,
    pub board: Board,
    pub players: [Player; 2],
}

/// Everything needed to reconstruct a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub seed: u64,
    pub config: MatchConfig,
    /// Red and blue strategy names
    pub strategies: [String; 2],
    /// Tick count when recording started
    pub start_turn: u32,
    pub initial_board: Board,
    pub initial_players: [Player; 2],
    pub initial_economy: Economy,
    pub ticks: Vec<TickRecord>,
    #[serde(default)]
    pub result: Option<GameResult>,
}

impl MatchRecord {
    /// Begin a record at the current state
    pub fn start(game: &GameState) -> Self {
        MatchRecord {
            seed: game.config.seed,
            config: game.config.clone(),
            strategies: [String::new(), String::new()],
            start_turn: game.turn,
            initial_board: game.board.clone(),
            initial_players: game.players.clone(),
            initial_economy: game.economy.clone(),
            ticks: Vec::new(),
            result: None,
        }
    }

    /// Re-resolve every recorded tick from the initial position
    ///
    /// Fails with [`MineError::ReplayDiverged`] if a rebuilt tick disagrees
    /// with what was recorded.
    pub fn replay_states(&self) -> Result<Vec<ReplayFrame>> {
        let mut state = GameState::from_parts(
            self.config.clone(),
            self.initial_board.clone(),
            self.initial_economy.clone(),
            self.initial_players.clone(),
            ChaCha12Rng::seed_from_u64(self.seed),
        )?;
        state.turn = self.start_turn;

        let mut frames = Vec::with_capacity(self.ticks.len());
        for tick in &self.ticks {
            state.resolve_tick(tick.actions);
            let board_matches = tick.board.as_ref().map_or(true, |b| *b == state.board);
            if state.players != tick.players || !board_matches {
                return Err(MineError::ReplayDiverged(tick.tick));
            }
            frames.push(ReplayFrame {
                tick: tick.tick,
                board: state.board.clone(),
                players: state.players.clone(),
            });
        }
        Ok(frames)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Coord, Item, Side, Tile, TileKind};
    use crate::game::{GameLoop, ScriptedStrategy};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn recorded_match(board_snapshots: bool) -> MatchRecord {
        let mut board = Board::filled(4, TileKind::Empty).unwrap();
        board
            .set_tile(Tile::new(Coord::new(1, 1), TileKind::resource(Item::Emerald)))
            .unwrap();
        board.place_item(Coord::new(2, 3), Item::Autominer).unwrap();
        let config = MatchConfig::for_board_size(4).with_turn_limit(8);
        let mut state = GameState::new(
            config,
            board,
            [Coord::new(0, 1), Coord::new(3, 3)],
            ChaCha12Rng::seed_from_u64(3),
        )
        .unwrap();
        state.logger.enable_capture();

        let mut red = ScriptedStrategy::new(vec![
            Some(TurnAction::MoveRight),
            Some(TurnAction::Mine),
            Some(TurnAction::Mine),
            Some(TurnAction::PickUpResource),
        ]);
        let mut blue = ScriptedStrategy::new(vec![
            Some(TurnAction::MoveLeft),
            Some(TurnAction::PickUpAutominer),
            Some(TurnAction::MoveDown),
            Some(TurnAction::PlaceAutominer),
        ]);

        let mut game_loop = GameLoop::new(&mut state).with_recording(board_snapshots);
        game_loop.run_game(&mut red, &mut blue).unwrap();
        game_loop.take_record().unwrap()
    }

    #[test]
    fn test_replay_rebuilds_every_tick() {
        let record = recorded_match(true);
        assert_eq!(record.ticks.len(), 8);
        assert_eq!(record.strategies[0], "scripted");

        let frames = record.replay_states().unwrap();
        assert_eq!(frames.len(), 8);
        for (frame, tick) in frames.iter().zip(&record.ticks) {
            assert_eq!(Some(&frame.board), tick.board.as_ref());
            assert_eq!(frame.players, tick.players);
        }
        let last = frames.last().unwrap();
        assert_eq!(last.players[Side::Red.index()].inventory.as_slice(), &[Item::Emerald]);
    }

    #[test]
    fn test_tampered_record_diverges() {
        let mut record = recorded_match(false);
        record.ticks[0].actions[0] = Some(TurnAction::MoveUp);
        assert!(matches!(
            record.replay_states(),
            Err(MineError::ReplayDiverged(1))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let record = recorded_match(false);
        let json = record.to_json().unwrap();
        let restored = MatchRecord::from_json(&json).unwrap();
        assert_eq!(restored, record);
        assert!(restored.replay_states().is_ok());
    }
}

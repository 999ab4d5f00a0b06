//! Match state and the per-tick resolution pipeline
//!
//! [`GameState::resolve_tick`] is the whole rules engine: given both sides'
//! intended actions it resolves conflicts, applies actions in favored order,
//! sells inventories on markets, advances the board and the economy. It never
//! talks to strategies, so recorded matches can be re-resolved without them.

use crate::core::{Coord, Item, Player, Side, TileType};
use crate::game::{
    Board, Economy, MatchConfig, MatchLogger, PriceUpdate, Rejection, SaleReceipt, TurnAction,
};
use crate::{MineError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// Result of a finished (or interrupted) match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// None on a draw or when the match did not finish
    pub winner: Option<Side>,
    pub red_score: i32,
    pub blue_score: i32,
    pub turns_played: u32,
    pub end_reason: GameEndReason,
}

impl GameResult {
    pub fn margin(&self) -> i32 {
        self.red_score - self.blue_score
    }
}

/// Reason the match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEndReason {
    /// A score reached the winning threshold
    ScoreReached,
    /// The turn limit elapsed
    TurnLimit,
    /// A bounded run stopped before the match ended
    Manual,
}

/// Everything that happened during one tick
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Tick number, starting at 1
    pub tick: u32,
    /// Intended actions, red first
    pub actions: [Option<TurnAction>; 2],
    pub rejections: [Option<Rejection>; 2],
    /// Items that entered each inventory
    pub received: [Option<Item>; 2],
    pub sales: [Option<SaleReceipt>; 2],
    /// Demand broadcast, when one is due this tick
    pub price_update: Option<PriceUpdate>,
}

/// Complete match state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub config: MatchConfig,
    pub board: Board,
    pub economy: Economy,
    /// Red first, see [`Side::index`]
    pub players: [Player; 2],
    /// Ticks resolved so far
    pub turn: u32,
    /// Match-wide generator; layout generation has already drawn from it
    pub rng: ChaCha12Rng,
    pub logger: MatchLogger,
}

impl GameState {
    /// Place both players on their start cells and open the market
    pub fn new(
        config: MatchConfig,
        board: Board,
        starts: [Coord; 2],
        rng: ChaCha12Rng,
    ) -> Result<Self> {
        let players = Side::BOTH.map(|side| {
            Player::new(
                side,
                starts[side.index()],
                config.max_charge,
                config.max_inventory_size,
            )
        });
        let mut state = GameState::from_parts(config, board, Economy::default(), players, rng)?;
        for side in Side::BOTH {
            state.board.put_player(side, starts[side.index()])?;
        }
        Ok(state)
    }

    /// Reassemble a state from already-consistent parts (replays, snapshots)
    ///
    /// `rng` becomes the match generator as given; nothing is reseeded.
    pub fn from_parts(
        config: MatchConfig,
        board: Board,
        economy: Economy,
        players: [Player; 2],
        rng: ChaCha12Rng,
    ) -> Result<Self> {
        config.validate()?;
        if board.size() != config.board_size {
            return Err(MineError::InvalidLayout(format!(
                "board is {0}x{0} but the configuration asks for {1}x{1}",
                board.size(),
                config.board_size
            )));
        }
        for player in &players {
            if !board.in_bounds(player.position) {
                return Err(MineError::OutOfBounds(player.position));
            }
        }
        if players[0].position == players[1].position {
            return Err(MineError::InvalidLayout(format!(
                "both players start on {}",
                players[0].position
            )));
        }

        Ok(GameState {
            config,
            board,
            economy,
            players,
            turn: 0,
            rng,
            logger: MatchLogger::new(),
        })
    }

    /// Reseed the match generator
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = ChaCha12Rng::seed_from_u64(seed);
    }

    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    pub fn player_mut(&mut self, side: Side) -> &mut Player {
        &mut self.players[side.index()]
    }

    /// Resolve one tick from both sides' intended actions (red first)
    pub fn resolve_tick(&mut self, actions: [Option<TurnAction>; 2]) -> TickOutcome {
        let mut outcome = TickOutcome {
            tick: self.turn + 1,
            actions,
            ..TickOutcome::default()
        };

        let favored = self.config.favored_side;
        let other = favored.opponent();

        // Contested destination: only the favored move survives. A side with
        // no charge cannot move, so it contests nothing.
        let destination = |side: Side| {
            let player = &self.players[side.index()];
            actions[side.index()]
                .filter(|_| player.has_charge())
                .and_then(TurnAction::direction)
                .map(|d| player.position.step(d))
        };
        let mut intents = actions;
        if let (Some(a), Some(b)) = (destination(favored), destination(other)) {
            if a == b {
                intents[other.index()] = None;
                outcome.rejections[other.index()] = Some(Rejection::Collision);
            }
        }

        for side in [favored, other] {
            if let Some(action) = intents[side.index()] {
                match self.apply_action(side, action) {
                    Ok(received) => outcome.received[side.index()] = received,
                    Err(rejection) => outcome.rejections[side.index()] = Some(rejection),
                }
            }
            outcome.sales[side.index()] = self.sell_if_on_market(side);
        }

        self.board
            .update(&mut self.players, self.config.recharge_percent);
        outcome.price_update = self.economy.increase_demand();
        self.turn += 1;

        debug_assert!(
            self.board.check_invariants(&self.players).is_empty(),
            "invariants broken after tick {}: {:?}",
            self.turn,
            self.board.check_invariants(&self.players)
        );
        outcome
    }

    /// Apply a single side's action. Rejected actions cost nothing.
    fn apply_action(
        &mut self,
        side: Side,
        action: TurnAction,
    ) -> std::result::Result<Option<Item>, Rejection> {
        let opponent_position = self.players[side.opponent().index()].position;
        let player = &mut self.players[side.index()];
        if !player.has_charge() {
            return Err(Rejection::NoCharge);
        }

        if let Some(direction) = action.direction() {
            let target = player.position.step(direction);
            if !self.board.in_bounds(target) {
                return Err(Rejection::OutOfBounds);
            }
            if target == opponent_position {
                return Err(Rejection::Occupied);
            }
            self.board
                .move_player(side, player.position, target)
                .map_err(|_| Rejection::OutOfBounds)?;
            player.position = target;
            player.spend_charge();
            return Ok(None);
        }

        let Some(tile_action) = action.tile_action() else {
            return Ok(None);
        };
        let received = self
            .board
            .interact(player.position, Some(&mut player.inventory), tile_action)
            .map_err(|_| Rejection::OutOfBounds)?;
        player.spend_charge();
        Ok(received)
    }

    /// Liquidate the whole inventory when standing on the side's own market
    fn sell_if_on_market(&mut self, side: Side) -> Option<SaleReceipt> {
        let player = &mut self.players[side.index()];
        if player.inventory.is_empty()
            || self.board.tile_type(player.position) != Some(TileType::market_for(side))
        {
            return None;
        }
        let items = player.inventory.take_all();
        let receipt = self.economy.sell_resources(&items);
        player.score += receipt.total;
        Some(receipt)
    }

    /// Decide whether the match is over after the latest tick
    pub fn check_outcome(&self) -> Option<GameResult> {
        let red = self.players[Side::Red.index()].score;
        let blue = self.players[Side::Blue.index()].score;

        let end_reason = if red >= self.config.winning_score || blue >= self.config.winning_score {
            GameEndReason::ScoreReached
        } else if self.turn >= self.config.turn_limit {
            GameEndReason::TurnLimit
        } else {
            return None;
        };

        Some(self.result(end_reason))
    }

    /// Current standings as a result with the given reason
    pub fn result(&self, end_reason: GameEndReason) -> GameResult {
        let red_score = self.players[Side::Red.index()].score;
        let blue_score = self.players[Side::Blue.index()].score;
        let winner = match red_score.cmp(&blue_score) {
            std::cmp::Ordering::Greater => Some(Side::Red),
            std::cmp::Ordering::Less => Some(Side::Blue),
            std::cmp::Ordering::Equal => None,
        };
        GameResult {
            winner: if end_reason == GameEndReason::Manual {
                None
            } else {
                winner
            },
            red_score,
            blue_score,
            turns_played: self.turn,
            end_reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Tile, TileKind};

    /// 4x4 empty board, red at (0, 0), blue at (3, 3)
    fn open_state() -> GameState {
        let board = Board::filled(4, TileKind::Empty).unwrap();
        let config = MatchConfig::for_board_size(4);
        GameState::new(
            config,
            board,
            [Coord::new(0, 0), Coord::new(3, 3)],
            ChaCha12Rng::seed_from_u64(0),
        )
        .unwrap()
    }

    #[test]
    fn test_new_places_players() {
        let state = open_state();
        assert_eq!(
            state.board.tile(Coord::new(0, 0)).unwrap().occupant,
            Some(Side::Red)
        );
        assert_eq!(state.player(Side::Blue).position, Coord::new(3, 3));
        assert!(state.board.check_invariants(&state.players).is_empty());
    }

    #[test]
    fn test_new_keeps_the_given_generator() {
        use rand::Rng;

        let mut drawn = ChaCha12Rng::seed_from_u64(42);
        let _: u64 = drawn.gen();
        let mut state = GameState::new(
            MatchConfig::for_board_size(4).with_seed(42),
            Board::filled(4, TileKind::Empty).unwrap(),
            [Coord::new(0, 0), Coord::new(3, 3)],
            drawn.clone(),
        )
        .unwrap();

        assert_eq!(state.rng, drawn);
        assert_ne!(state.rng, ChaCha12Rng::seed_from_u64(42));
        assert_eq!(state.rng.gen::<u64>(), drawn.gen::<u64>());
    }

    #[test]
    fn test_new_rejects_shared_start() {
        let board = Board::filled(4, TileKind::Empty).unwrap();
        let result = GameState::new(
            MatchConfig::for_board_size(4),
            board,
            [Coord::new(1, 1), Coord::new(1, 1)],
            ChaCha12Rng::seed_from_u64(0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_size_mismatch() {
        let board = Board::filled(5, TileKind::Empty).unwrap();
        let result = GameState::new(
            MatchConfig::for_board_size(4),
            board,
            [Coord::new(0, 0), Coord::new(1, 1)],
            ChaCha12Rng::seed_from_u64(0),
        );
        assert!(matches!(result, Err(MineError::InvalidLayout(_))));
    }

    #[test]
    fn test_move_costs_charge() {
        let mut state = open_state();
        let outcome = state.resolve_tick([Some(TurnAction::MoveRight), None]);
        assert_eq!(outcome.tick, 1);
        assert_eq!(outcome.rejections, [None, None]);
        assert_eq!(state.player(Side::Red).position, Coord::new(1, 0));
        assert_eq!(state.player(Side::Red).charge, 79);
        assert_eq!(state.player(Side::Blue).charge, 80);
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn test_off_board_move_is_free_noop() {
        let mut state = open_state();
        let outcome = state.resolve_tick([Some(TurnAction::MoveLeft), Some(TurnAction::MoveUp)]);
        assert_eq!(
            outcome.rejections,
            [Some(Rejection::OutOfBounds), Some(Rejection::OutOfBounds)]
        );
        assert_eq!(state.player(Side::Red).position, Coord::new(0, 0));
        assert_eq!(state.player(Side::Red).charge, 80);
    }

    #[test]
    fn test_collision_favors_red() {
        let board = Board::filled(4, TileKind::Empty).unwrap();
        let mut state = GameState::new(
            MatchConfig::for_board_size(4),
            board,
            [Coord::new(0, 1), Coord::new(2, 1)],
            ChaCha12Rng::seed_from_u64(0),
        )
        .unwrap();
        let outcome =
            state.resolve_tick([Some(TurnAction::MoveRight), Some(TurnAction::MoveLeft)]);
        assert_eq!(outcome.rejections[1], Some(Rejection::Collision));
        assert_eq!(state.player(Side::Red).position, Coord::new(1, 1));
        assert_eq!(state.player(Side::Blue).position, Coord::new(2, 1));
        assert_eq!(state.player(Side::Blue).charge, 80);
    }

    #[test]
    fn test_move_onto_opponent_is_occupied() {
        let board = Board::filled(4, TileKind::Empty).unwrap();
        let mut state = GameState::new(
            MatchConfig::for_board_size(4),
            board,
            [Coord::new(0, 0), Coord::new(1, 0)],
            ChaCha12Rng::seed_from_u64(0),
        )
        .unwrap();
        let outcome = state.resolve_tick([Some(TurnAction::MoveRight), None]);
        assert_eq!(outcome.rejections[0], Some(Rejection::Occupied));
        assert_eq!(state.player(Side::Red).position, Coord::new(0, 0));
    }

    #[test]
    fn test_favored_side_moves_first() {
        // Blue steps off (1, 0) before red steps on only when blue is favored
        let make = |favored: Side| {
            let board = Board::filled(4, TileKind::Empty).unwrap();
            GameState::new(
                MatchConfig::for_board_size(4).with_favored_side(favored),
                board,
                [Coord::new(0, 0), Coord::new(1, 0)],
                ChaCha12Rng::seed_from_u64(0),
            )
            .unwrap()
        };
        let actions = [Some(TurnAction::MoveRight), Some(TurnAction::MoveUp)];

        let mut red_first = make(Side::Red);
        red_first.resolve_tick(actions);
        assert_eq!(red_first.player(Side::Red).position, Coord::new(0, 0));

        let mut blue_first = make(Side::Blue);
        blue_first.resolve_tick(actions);
        assert_eq!(blue_first.player(Side::Red).position, Coord::new(1, 0));
        assert_eq!(blue_first.player(Side::Blue).position, Coord::new(1, 1));
    }

    #[test]
    fn test_zero_charge_blocks_everything() {
        let mut state = open_state();
        state.player_mut(Side::Red).charge = 0;
        let outcome = state.resolve_tick([Some(TurnAction::Mine), None]);
        assert_eq!(outcome.rejections[0], Some(Rejection::NoCharge));
        assert_eq!(
            state.board.tile(Coord::new(0, 0)).unwrap().kind,
            TileKind::Empty
        );
    }

    #[test]
    fn test_market_sale() {
        let mut board = Board::filled(4, TileKind::Empty).unwrap();
        board
            .set_tile(Tile::new(Coord::new(1, 0), TileKind::Market(Side::Red)))
            .unwrap();
        let config = MatchConfig::for_board_size(4).with_max_inventory_size(1);
        let mut state = GameState::new(
            config,
            board,
            [Coord::new(0, 0), Coord::new(3, 3)],
            ChaCha12Rng::seed_from_u64(0),
        )
        .unwrap();
        state.player_mut(Side::Red).inventory.try_add(Item::Diamond);

        let outcome = state.resolve_tick([Some(TurnAction::MoveRight), None]);
        let sale = outcome.sales[0].clone().unwrap();
        assert_eq!(sale.total, 150);
        assert_eq!(sale.update.prices.get(Item::Diamond), 131);
        assert_eq!(state.player(Side::Red).score, 150);
        assert!(state.player(Side::Red).inventory.is_empty());
        // Demand growth lands after the sale
        assert_eq!(state.economy.current_prices().get(Item::Diamond), 136);
    }

    #[test]
    fn test_no_sale_on_opponent_market() {
        let mut board = Board::filled(4, TileKind::Empty).unwrap();
        board
            .set_tile(Tile::new(Coord::new(1, 0), TileKind::Market(Side::Blue)))
            .unwrap();
        let mut state = GameState::new(
            MatchConfig::for_board_size(4),
            board,
            [Coord::new(0, 0), Coord::new(3, 3)],
            ChaCha12Rng::seed_from_u64(0),
        )
        .unwrap();
        state.player_mut(Side::Red).inventory.try_add(Item::Ruby);

        let outcome = state.resolve_tick([Some(TurnAction::MoveRight), None]);
        assert!(outcome.sales[0].is_none());
        assert_eq!(state.player(Side::Red).inventory.len(), 1);
    }

    #[test]
    fn test_mine_and_pick_up() {
        let mut board = Board::filled(4, TileKind::Empty).unwrap();
        board
            .set_tile(Tile::new(Coord::new(0, 0), TileKind::resource(Item::Ruby)))
            .unwrap();
        let mut state = GameState::new(
            MatchConfig::for_board_size(4),
            board,
            [Coord::new(0, 0), Coord::new(3, 3)],
            ChaCha12Rng::seed_from_u64(0),
        )
        .unwrap();

        state.resolve_tick([Some(TurnAction::Mine), None]);
        assert_eq!(state.board.items_at(Coord::new(0, 0)), &[Item::Ruby]);
        assert_eq!(
            state.board.tile(Coord::new(0, 0)).unwrap().occupant,
            Some(Side::Red)
        );

        let outcome = state.resolve_tick([Some(TurnAction::PickUpResource), None]);
        assert_eq!(outcome.received[0], Some(Item::Ruby));
        assert_eq!(state.player(Side::Red).charge, 78);
    }

    #[test]
    fn test_check_outcome() {
        let mut state = open_state();
        assert!(state.check_outcome().is_none());

        state.player_mut(Side::Blue).score = state.config.winning_score;
        let result = state.check_outcome().unwrap();
        assert_eq!(result.end_reason, GameEndReason::ScoreReached);
        assert_eq!(result.winner, Some(Side::Blue));

        state.player_mut(Side::Blue).score = 0;
        state.turn = state.config.turn_limit;
        let result = state.check_outcome().unwrap();
        assert_eq!(result.end_reason, GameEndReason::TurnLimit);
        assert_eq!(result.winner, None);
    }
}

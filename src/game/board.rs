//! The board: tile grid plus the lookup structures derived from it
//!
//! Tiles are stored row-major (see [`Coord::to_index`]). Alongside the grid
//! the board keeps a type map and an items-on-ground index, both rewritten
//! by every tile replacement so they never drift from the tiles themselves.

use crate::core::{Coord, Inventory, Item, Player, Side, Tile, TileAction, TileKind, TileType};
use crate::game::invariants::{self, InvariantViolation};
use crate::game::view::BoardView;
use crate::{MineError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Autominers mine resource tiles this many times slower than players
pub const AUTOMINER_SLOWDOWN: u32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardData", into = "BoardData")]
pub struct Board {
    size: usize,
    tiles: Vec<Tile>,
    /// Shared with views; copied on write
    types: Arc<Vec<TileType>>,
    /// Only cells with at least one item
    items: FxHashMap<Coord, Vec<Item>>,
    /// Consecutive ticks each cell has been in reach of an autominer
    autominer_counters: FxHashMap<Coord, u32>,
}

impl Board {
    /// Build a board from a full row-major tile list
    pub fn new(size: usize, tiles: Vec<Tile>) -> Result<Self> {
        if size == 0 || tiles.len() != size * size {
            return Err(MineError::InvalidLayout(format!(
                "expected {} tiles for a {size}x{size} board, got {}",
                size * size,
                tiles.len()
            )));
        }
        for (index, tile) in tiles.iter().enumerate() {
            if tile.location().to_index(size) != Some(index) {
                return Err(MineError::InvalidLayout(format!(
                    "tile for {} stored at index {index}",
                    tile.location()
                )));
            }
        }

        let types = tiles.iter().map(Tile::tile_type).collect();
        let items = tiles
            .iter()
            .filter(|tile| !tile.items.is_empty())
            .map(|tile| (tile.location(), tile.items.to_vec()))
            .collect();

        Ok(Board {
            size,
            tiles,
            types: Arc::new(types),
            items,
            autominer_counters: FxHashMap::default(),
        })
    }

    /// Build a board by asking for the kind of every cell
    pub fn from_fn(size: usize, mut kind_at: impl FnMut(Coord) -> TileKind) -> Result<Self> {
        let tiles = (0..size * size)
            .map(|index| {
                let coord = Coord::from_index(index, size);
                Tile::new(coord, kind_at(coord))
            })
            .collect();
        Board::new(size, tiles)
    }

    pub fn filled(size: usize, kind: TileKind) -> Result<Self> {
        Board::from_fn(size, |_| kind)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, coord: Coord) -> Result<usize> {
        coord
            .to_index(self.size)
            .ok_or(MineError::OutOfBounds(coord))
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.in_bounds(self.size)
    }

    pub fn tile(&self, coord: Coord) -> Option<&Tile> {
        coord.to_index(self.size).map(|i| &self.tiles[i])
    }

    /// All tiles in storage order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile_type(&self, coord: Coord) -> Option<TileType> {
        coord.to_index(self.size).map(|i| self.types[i])
    }

    pub fn type_map(&self) -> &Arc<Vec<TileType>> {
        &self.types
    }

    pub fn items_at(&self, coord: Coord) -> &[Item] {
        self.items.get(&coord).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn items_on_ground(&self) -> &FxHashMap<Coord, Vec<Item>> {
        &self.items
    }

    pub fn autominer_counter(&self, coord: Coord) -> u32 {
        self.autominer_counters.get(&coord).copied().unwrap_or(0)
    }

    /// Coordinates of every cell of the given type, in storage order
    pub fn find_all(&self, tile_type: TileType) -> Vec<Coord> {
        self.types
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == tile_type)
            .map(|(i, _)| Coord::from_index(i, self.size))
            .collect()
    }

    /// Replace the tile at `tile.location()`
    ///
    /// Whoever stood on the old tile is moved onto the new one, and the
    /// derived type map and item index are brought up to date.
    pub fn set_tile(&mut self, tile: Tile) -> Result<()> {
        let index = self.index(tile.location())?;
        self.replace(index, tile);
        Ok(())
    }

    fn replace(&mut self, index: usize, mut next: Tile) {
        let location = next.location();
        debug_assert_eq!(location.to_index(self.size), Some(index));

        next.occupant = None;
        if let Some(side) = self.tiles[index].occupant {
            self.tiles[index].on_exit(side);
            next.on_enter(side);
        }

        let tile_type = next.tile_type();
        if self.types[index] != tile_type {
            Arc::make_mut(&mut self.types)[index] = tile_type;
        }
        if next.items.is_empty() {
            self.items.remove(&location);
        } else {
            self.items.insert(location, next.items.to_vec());
        }

        self.tiles[index] = next;
    }

    /// Drop an item onto a cell (layout setup)
    pub fn place_item(&mut self, coord: Coord, item: Item) -> Result<()> {
        let index = self.index(coord)?;
        let mut tile = self.tiles[index].clone();
        tile.items.push(item);
        self.replace(index, tile);
        Ok(())
    }

    /// Mark a side as standing on a cell without leaving another one
    pub fn put_player(&mut self, side: Side, coord: Coord) -> Result<()> {
        let index = self.index(coord)?;
        self.tiles[index].on_enter(side);
        Ok(())
    }

    /// Move a side's occupancy from one cell to another
    pub fn move_player(&mut self, side: Side, from: Coord, to: Coord) -> Result<()> {
        let from_index = self.index(from)?;
        let to_index = self.index(to)?;
        self.tiles[from_index].on_exit(side);
        self.tiles[to_index].on_enter(side);
        Ok(())
    }

    /// Dispatch a tile action at `coord` and write the successor tile back
    ///
    /// Returns the item that moved into `actor`, if any.
    pub fn interact(
        &mut self,
        coord: Coord,
        actor: Option<&mut Inventory>,
        action: TileAction,
    ) -> Result<Option<Item>> {
        let index = self.index(coord)?;
        let outcome = self.tiles[index].interact(actor, action);
        if outcome.next != self.tiles[index] {
            self.replace(index, outcome.next);
        }
        Ok(outcome.received)
    }

    /// Advance background effects by one tick
    ///
    /// Tile hooks run first (recharging occupants), then autominers work.
    pub fn update(&mut self, players: &mut [Player; 2], recharge_percent: u32) {
        for side in Side::BOTH {
            let position = players[side.index()].position;
            if let Some(index) = position.to_index(self.size) {
                self.tiles[index].update(players, recharge_percent);
            }
        }
        self.advance_autominers();
    }

    /// Cells that autominers reach this tick, each listed once
    pub fn autominer_reach(&self) -> BTreeSet<Coord> {
        self.items
            .iter()
            .filter(|(_, items)| items.contains(&Item::Autominer))
            .flat_map(|(&coord, _)| coord.with_neighbours(self.size))
            .collect()
    }

    fn advance_autominers(&mut self) {
        let affected = self.autominer_reach();
        self.autominer_counters
            .retain(|coord, _| affected.contains(coord));

        for coord in affected {
            let Some(index) = coord.to_index(self.size) else {
                continue;
            };
            let counter = self.autominer_counters.entry(coord).or_insert(0);
            let fires = match self.tiles[index].kind {
                TileKind::Empty => true,
                TileKind::Resource { .. } => *counter > 0 && *counter % AUTOMINER_SLOWDOWN == 0,
                _ => false,
            };
            *counter += 1;

            if fires {
                let next = self.tiles[index].interact(None, TileAction::Mine).next;
                self.replace(index, next);
            }
        }
    }

    /// Restricted snapshot for one player
    ///
    /// The type map is shared; the items index is copied so a strategy can
    /// never reach back into the live board.
    pub fn convert_to_view(&self, viewer: &Player, opponent: &Player) -> BoardView {
        BoardView {
            size: self.size,
            types: Arc::clone(&self.types),
            items_on_ground: self.items.clone(),
            own_location: viewer.position,
            opponent_location: opponent.position,
            opponent_score: opponent.score,
        }
    }

    pub fn check_invariants(&self, players: &[Player; 2]) -> Vec<InvariantViolation> {
        invariants::check_invariants(self, players)
    }
}

/// Serialized form: the tiles carry everything the derived maps are built from
#[derive(Serialize, Deserialize)]
struct BoardData {
    size: usize,
    tiles: Vec<Tile>,
    autominer_counters: Vec<(Coord, u32)>,
}

impl From<Board> for BoardData {
    fn from(board: Board) -> Self {
        let mut autominer_counters: Vec<_> = board.autominer_counters.into_iter().collect();
        autominer_counters.sort();
        BoardData {
            size: board.size,
            tiles: board.tiles,
            autominer_counters,
        }
    }
}

impl TryFrom<BoardData> for Board {
    type Error = MineError;

    fn try_from(data: BoardData) -> Result<Self> {
        let mut board = Board::new(data.size, data.tiles)?;
        board.autominer_counters = data.autominer_counters.into_iter().collect();
        Ok(board)
    }
}

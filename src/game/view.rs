//! What a strategy is allowed to see on a given tick

use crate::core::{Coord, Item, TileType};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Restricted per-player snapshot of the board
///
/// The type map is shared read-only with the board. The items index is a
/// private copy, so changing it never touches engine state. The viewer's
/// own score and inventory are deliberately absent.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    pub size: usize,
    pub types: Arc<Vec<TileType>>,
    pub items_on_ground: FxHashMap<Coord, Vec<Item>>,
    pub own_location: Coord,
    pub opponent_location: Coord,
    pub opponent_score: i32,
}

impl BoardView {
    pub fn tile_type(&self, coord: Coord) -> Option<TileType> {
        coord.to_index(self.size).map(|i| self.types[i])
    }

    pub fn items_at(&self, coord: Coord) -> &[Item] {
        self.items_on_ground
            .get(&coord)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every cell of a type, in storage order
    pub fn find_all(&self, tile_type: TileType) -> Vec<Coord> {
        self.types
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == tile_type)
            .map(|(i, _)| Coord::from_index(i, self.size))
            .collect()
    }

    /// Closest cell of a type by Manhattan distance, ties to storage order
    pub fn nearest(&self, from: Coord, tile_type: TileType) -> Option<Coord> {
        self.find_all(tile_type)
            .into_iter()
            .min_by_key(|c| from.manhattan(*c))
    }
}

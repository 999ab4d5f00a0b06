//! Core board entities

pub mod coord;
pub mod item;
pub mod player;
pub mod tile;

pub use coord::{Coord, Direction};
pub use item::{Item, ResourceStats};
pub use player::{Inventory, Player, Side};
pub use tile::{Interaction, Tile, TileAction, TileKind, TileType};

//! Runtime player state
//!
//! A `Player` is the actor on the board, not the policy that steers it.
//! Its current tile is always looked up through the board by `position`.

use crate::core::{Coord, Item};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Which side of the match a player is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Red,
    Blue,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Red, Side::Blue];

    pub fn opponent(self) -> Side {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }

    /// Stable index for `[T; 2]` tables (red first)
    pub fn index(self) -> usize {
        match self {
            Side::Red => 0,
            Side::Blue => 1,
        }
    }

    pub fn is_red(self) -> bool {
        self == Side::Red
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Red => f.write_str("Red"),
            Side::Blue => f.write_str("Blue"),
        }
    }
}

/// Bounded, ordered bag of items carried by a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: SmallVec<[Item; 8]>,
    capacity: usize,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Inventory {
            items: SmallVec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Add an item if there is room. Returns false (and drops nothing) when full.
    pub fn try_add(&mut self, item: Item) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove the first item of the given kind
    pub fn take_first(&mut self, kind: Item) -> Option<Item> {
        let pos = self.items.iter().position(|&i| i == kind)?;
        Some(self.items.remove(pos))
    }

    pub fn contains(&self, kind: Item) -> bool {
        self.items.contains(&kind)
    }

    pub fn count(&self, kind: Item) -> usize {
        self.items.iter().filter(|&&i| i == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    /// Empty the inventory, handing back everything it held
    pub fn take_all(&mut self) -> Vec<Item> {
        self.items.drain(..).collect()
    }
}

/// A player on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub side: Side,

    /// Cell the player currently stands on
    pub position: Coord,

    /// Remaining energy, 0..=max_charge
    pub charge: u32,
    pub max_charge: u32,

    pub score: i32,

    pub inventory: Inventory,
}

impl Player {
    /// A fully charged player with an empty inventory
    pub fn new(side: Side, position: Coord, max_charge: u32, max_inventory_size: usize) -> Self {
        Player {
            side,
            position,
            charge: max_charge,
            max_charge,
            score: 0,
            inventory: Inventory::new(max_inventory_size),
        }
    }

    pub fn has_charge(&self) -> bool {
        self.charge > 0
    }

    /// Spend one unit of charge. Returns false if the player was already empty.
    pub fn spend_charge(&mut self) -> bool {
        if self.charge == 0 {
            return false;
        }
        self.charge -= 1;
        true
    }

    pub fn recharge(&mut self, amount: u32) {
        self.charge = self.charge.saturating_add(amount).min(self.max_charge);
    }
}

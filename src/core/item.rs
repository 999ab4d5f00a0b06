//! Items that rest on tiles or travel in a player's inventory

use serde::{Deserialize, Serialize};
use std::fmt;

/// Static economic and spawning parameters of a resource kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceStats {
    pub starting_price: i32,
    pub max_price: i32,
    /// Price growth applied by every demand tick
    pub price_increase_per_turn: i32,
    /// Mining interactions needed to crack a resource tile of this kind
    pub turns_to_mine: u32,
    /// Inner edge of the spawn band, as a fraction of the distance from
    /// the board center to the corner
    pub min_spawn_ratio: f64,
    pub max_spawn_ratio: f64,
    /// Spawned tile count as a fraction of the cells in a player's half
    pub spawn_count_ratio: f64,
}

const DIAMOND: ResourceStats = ResourceStats {
    starting_price: 150,
    max_price: 500,
    price_increase_per_turn: 5,
    turns_to_mine: 3,
    min_spawn_ratio: 0.8,
    max_spawn_ratio: 1.0,
    spawn_count_ratio: 0.075,
};

const EMERALD: ResourceStats = ResourceStats {
    starting_price: 100,
    max_price: 450,
    price_increase_per_turn: 4,
    turns_to_mine: 2,
    min_spawn_ratio: 0.5,
    max_spawn_ratio: 0.8,
    spawn_count_ratio: 0.09,
};

const RUBY: ResourceStats = ResourceStats {
    starting_price: 50,
    max_price: 400,
    price_increase_per_turn: 3,
    turns_to_mine: 1,
    min_spawn_ratio: 0.3,
    max_spawn_ratio: 0.5,
    spawn_count_ratio: 0.1,
};

/// Kind of a single item instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Item {
    Ruby,
    Emerald,
    Diamond,
    Autominer,
}

impl Item {
    /// Every sellable kind, in catalog order
    pub const RESOURCES: [Item; 3] = [Item::Ruby, Item::Emerald, Item::Diamond];

    pub const ALL: [Item; 4] = [Item::Ruby, Item::Emerald, Item::Diamond, Item::Autominer];

    /// Economic parameters, or `None` for autominers
    pub fn resource_stats(self) -> Option<&'static ResourceStats> {
        match self {
            Item::Ruby => Some(&RUBY),
            Item::Emerald => Some(&EMERALD),
            Item::Diamond => Some(&DIAMOND),
            Item::Autominer => None,
        }
    }

    pub fn is_resource(self) -> bool {
        self.resource_stats().is_some()
    }

    pub fn name(self) -> &'static str {
        match self {
            Item::Ruby => "ruby",
            Item::Emerald => "emerald",
            Item::Diamond => "diamond",
            Item::Autominer => "autominer",
        }
    }

    /// Parse the lower-case name used in layout files and on the command line
    pub fn from_name(name: &str) -> Option<Item> {
        Item::ALL.into_iter().find(|item| item.name() == name)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_values() {
        let diamond = Item::Diamond.resource_stats().unwrap();
        assert_eq!(diamond.starting_price, 150);
        assert_eq!(diamond.max_price, 500);
        assert_eq!(diamond.turns_to_mine, 3);

        let ruby = Item::Ruby.resource_stats().unwrap();
        assert_eq!(ruby.price_increase_per_turn, 3);
        assert_eq!(ruby.turns_to_mine, 1);
    }

    #[test]
    fn test_autominer_is_not_a_resource() {
        assert!(Item::Autominer.resource_stats().is_none());
        assert!(!Item::Autominer.is_resource());
        assert!(Item::RESOURCES.iter().all(|item| item.is_resource()));
    }

    #[test]
    fn test_name_round_trip() {
        for item in Item::ALL {
            assert_eq!(Item::from_name(item.name()), Some(item));
        }
        assert_eq!(Item::from_name("gold"), None);
    }

    #[test]
    fn test_spawn_bands_do_not_overlap() {
        let ruby = Item::Ruby.resource_stats().unwrap();
        let emerald = Item::Emerald.resource_stats().unwrap();
        let diamond = Item::Diamond.resource_stats().unwrap();
        assert!(ruby.max_spawn_ratio <= emerald.min_spawn_ratio);
        assert!(emerald.max_spawn_ratio <= diamond.min_spawn_ratio);
    }
}

//! Per-cell tile state machine
//!
//! A tile is a closed union of ground kinds plus the items resting on it and
//! the side currently standing on it. Every interaction is a total function
//! from the current tile to exactly one successor tile.

use crate::core::{Coord, Inventory, Item, Player, Side};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Ground kind of a tile, with kind-specific counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Empty,
    /// Already mined out; purely cosmetic on former empty ground
    Cracked,
    Resource { resource: Item, times_mined: u32 },
    Recharge,
    Market(Side),
    /// Unmineable rock
    Stone,
}

impl TileKind {
    pub fn resource(resource: Item) -> Self {
        debug_assert!(resource.is_resource(), "{resource} is not a resource");
        TileKind::Resource {
            resource,
            times_mined: 0,
        }
    }

    /// Character used by the layout format and text rendering
    pub fn symbol(self) -> char {
        match self {
            TileKind::Empty => '.',
            TileKind::Cracked => 'x',
            TileKind::Stone => '#',
            TileKind::Resource { resource, .. } => match resource {
                Item::Ruby => 'r',
                Item::Emerald => 'e',
                Item::Diamond => 'd',
                Item::Autominer => '?',
            },
            TileKind::Recharge => '+',
            TileKind::Market(Side::Red) => 'R',
            TileKind::Market(Side::Blue) => 'B',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<TileKind> {
        let kind = match symbol {
            '.' => TileKind::Empty,
            'x' => TileKind::Cracked,
            '#' => TileKind::Stone,
            'r' => TileKind::resource(Item::Ruby),
            'e' => TileKind::resource(Item::Emerald),
            'd' => TileKind::resource(Item::Diamond),
            '+' => TileKind::Recharge,
            'R' => TileKind::Market(Side::Red),
            'B' => TileKind::Market(Side::Blue),
            _ => return None,
        };
        Some(kind)
    }
}

/// Policy-visible classification of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    Empty,
    ResourceRuby,
    ResourceEmerald,
    ResourceDiamond,
    Recharge,
    RedMarket,
    BlueMarket,
}

impl TileType {
    pub fn resource(self) -> Option<Item> {
        match self {
            TileType::ResourceRuby => Some(Item::Ruby),
            TileType::ResourceEmerald => Some(Item::Emerald),
            TileType::ResourceDiamond => Some(Item::Diamond),
            _ => None,
        }
    }

    pub fn market_owner(self) -> Option<Side> {
        match self {
            TileType::RedMarket => Some(Side::Red),
            TileType::BlueMarket => Some(Side::Blue),
            _ => None,
        }
    }

    pub fn market_for(side: Side) -> TileType {
        match side {
            Side::Red => TileType::RedMarket,
            Side::Blue => TileType::BlueMarket,
        }
    }
}

/// An action that is dispatched to the tile under a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileAction {
    Mine,
    PickUpResource,
    PickUpAutominer,
    PlaceAutominer,
}

/// Outcome of [`Tile::interact`]
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    /// The successor tile for this cell (possibly unchanged)
    pub next: Tile,
    /// Item moved into the acting inventory, if any
    pub received: Option<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    location: Coord,
    pub kind: TileKind,
    /// Items resting on the tile, oldest first
    pub items: SmallVec<[Item; 2]>,
    pub occupant: Option<Side>,
}

impl Tile {
    pub fn new(location: Coord, kind: TileKind) -> Self {
        Tile {
            location,
            kind,
            items: SmallVec::new(),
            occupant: None,
        }
    }

    pub fn location(&self) -> Coord {
        self.location
    }

    pub fn tile_type(&self) -> TileType {
        match self.kind {
            TileKind::Empty | TileKind::Cracked | TileKind::Stone => TileType::Empty,
            TileKind::Resource { resource, .. } => match resource {
                Item::Ruby => TileType::ResourceRuby,
                Item::Emerald => TileType::ResourceEmerald,
                Item::Diamond | Item::Autominer => TileType::ResourceDiamond,
            },
            TileKind::Recharge => TileType::Recharge,
            TileKind::Market(side) => TileType::market_for(side),
        }
    }

    pub fn has_autominer(&self) -> bool {
        self.items.contains(&Item::Autominer)
    }

    /// Apply an action to this tile
    ///
    /// `actor` is the acting player's inventory, or `None` when an autominer
    /// drives the interaction. Without an actor only mining has any effect.
    /// Capacity and duplicate-autominer failures leave everything untouched.
    pub fn interact(&self, actor: Option<&mut Inventory>, action: TileAction) -> Interaction {
        let mut next = self.clone();
        let mut received = None;

        match action {
            TileAction::Mine => next.kind = self.mined_kind(&mut next.items),
            TileAction::PickUpResource | TileAction::PickUpAutominer => {
                if let Some(inventory) = actor {
                    let wanted = |item: &Item| {
                        if action == TileAction::PickUpAutominer {
                            *item == Item::Autominer
                        } else {
                            item.is_resource()
                        }
                    };
                    if let Some(pos) = next.items.iter().position(wanted) {
                        let item = next.items[pos];
                        if inventory.try_add(item) {
                            next.items.remove(pos);
                            received = Some(item);
                        }
                    }
                }
            }
            TileAction::PlaceAutominer => {
                if let Some(inventory) = actor {
                    if !self.has_autominer() && inventory.take_first(Item::Autominer).is_some() {
                        next.items.push(Item::Autominer);
                    }
                }
            }
        }

        debug_assert_eq!(next.location, self.location);
        debug_assert_eq!(next.occupant, self.occupant);
        Interaction { next, received }
    }

    /// Successor kind after one mining interaction, depositing any yield
    fn mined_kind(&self, items: &mut SmallVec<[Item; 2]>) -> TileKind {
        match self.kind {
            TileKind::Empty => TileKind::Cracked,
            TileKind::Resource {
                resource,
                times_mined,
            } => {
                let times_mined = times_mined + 1;
                let needed = resource.resource_stats().map_or(1, |s| s.turns_to_mine);
                if times_mined >= needed {
                    items.push(resource);
                    TileKind::Cracked
                } else {
                    TileKind::Resource {
                        resource,
                        times_mined,
                    }
                }
            }
            other => other,
        }
    }

    /// Per-tick hook. Recharge tiles top up whoever stands on them.
    pub fn update(&self, players: &mut [Player; 2], recharge_percent: u32) {
        if self.kind != TileKind::Recharge {
            return;
        }
        if let Some(side) = self.occupant {
            let player = &mut players[side.index()];
            let amount = u64::from(player.max_charge) * u64::from(recharge_percent) / 100;
            player.recharge(u32::try_from(amount).unwrap_or(u32::MAX).max(1));
        }
    }

    pub fn on_enter(&mut self, side: Side) {
        debug_assert!(
            self.occupant.is_none() || self.occupant == Some(side),
            "{} entered {} occupied by {:?}",
            side,
            self.location,
            self.occupant
        );
        self.occupant = Some(side);
    }

    pub fn on_exit(&mut self, side: Side) {
        debug_assert_eq!(self.occupant, Some(side));
        self.occupant = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond_tile() -> Tile {
        Tile::new(Coord::new(1, 0), TileKind::resource(Item::Diamond))
    }

    #[test]
    fn test_resource_cracks_after_turns_to_mine() {
        let mut inventory = Inventory::new(1);
        let mut tile = diamond_tile();
        tile.items.push(Item::Ruby);

        for _ in 0..2 {
            tile = tile.interact(Some(&mut inventory), TileAction::Mine).next;
            assert_eq!(tile.tile_type(), TileType::ResourceDiamond);
            assert_eq!(tile.items.as_slice(), &[Item::Ruby]);
        }

        tile = tile.interact(Some(&mut inventory), TileAction::Mine).next;
        assert_eq!(tile.kind, TileKind::Cracked);
        assert_eq!(tile.tile_type(), TileType::Empty);
        assert_eq!(tile.items.as_slice(), &[Item::Ruby, Item::Diamond]);
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_mining_empty_cracks_it() {
        let mut tile = Tile::new(Coord::new(0, 0), TileKind::Empty);
        tile.items.push(Item::Autominer);
        let next = tile.interact(None, TileAction::Mine).next;
        assert_eq!(next.kind, TileKind::Cracked);
        assert_eq!(next.items.as_slice(), &[Item::Autominer]);

        // Mining again is a no-op
        let again = next.interact(None, TileAction::Mine).next;
        assert_eq!(again, next);
    }

    #[test]
    fn test_mining_inert_kinds() {
        for kind in [TileKind::Stone, TileKind::Recharge, TileKind::Market(Side::Blue)] {
            let tile = Tile::new(Coord::new(2, 2), kind);
            assert_eq!(tile.interact(None, TileAction::Mine).next, tile);
        }
    }

    #[test]
    fn test_pickup_respects_capacity() {
        let mut tile = Tile::new(Coord::new(0, 0), TileKind::Cracked);
        tile.items.push(Item::Emerald);

        let mut full = Inventory::new(1);
        full.try_add(Item::Ruby);
        let outcome = tile.interact(Some(&mut full), TileAction::PickUpResource);
        assert_eq!(outcome.received, None);
        assert_eq!(outcome.next.items.as_slice(), &[Item::Emerald]);
        assert_eq!(full.as_slice(), &[Item::Ruby]);

        let mut open = Inventory::new(1);
        let outcome = tile.interact(Some(&mut open), TileAction::PickUpResource);
        assert_eq!(outcome.received, Some(Item::Emerald));
        assert!(outcome.next.items.is_empty());
        assert_eq!(open.as_slice(), &[Item::Emerald]);
    }

    #[test]
    fn test_pickup_takes_first_matching() {
        let mut tile = Tile::new(Coord::new(0, 0), TileKind::Cracked);
        tile.items.extend([Item::Autominer, Item::Diamond, Item::Ruby]);

        let mut inventory = Inventory::new(3);
        let outcome = tile.interact(Some(&mut inventory), TileAction::PickUpResource);
        assert_eq!(outcome.received, Some(Item::Diamond));
        assert_eq!(outcome.next.items.as_slice(), &[Item::Autominer, Item::Ruby]);

        let outcome = outcome
            .next
            .interact(Some(&mut inventory), TileAction::PickUpAutominer);
        assert_eq!(outcome.received, Some(Item::Autominer));
        assert_eq!(outcome.next.items.as_slice(), &[Item::Ruby]);
    }

    #[test]
    fn test_pickup_without_actor_is_noop() {
        let mut tile = Tile::new(Coord::new(0, 0), TileKind::Cracked);
        tile.items.push(Item::Ruby);
        let outcome = tile.interact(None, TileAction::PickUpResource);
        assert_eq!(outcome.next, tile);
        assert_eq!(outcome.received, None);
    }

    #[test]
    fn test_place_autominer_once() {
        let tile = Tile::new(Coord::new(0, 0), TileKind::Empty);
        let mut inventory = Inventory::new(3);
        inventory.try_add(Item::Autominer);
        inventory.try_add(Item::Autominer);

        let placed = tile
            .interact(Some(&mut inventory), TileAction::PlaceAutominer)
            .next;
        assert!(placed.has_autominer());
        assert_eq!(inventory.count(Item::Autominer), 1);

        let again = placed
            .interact(Some(&mut inventory), TileAction::PlaceAutominer)
            .next;
        assert_eq!(again.items.len(), 1);
        assert_eq!(inventory.count(Item::Autominer), 1);
    }

    #[test]
    fn test_place_autominer_needs_one_in_inventory() {
        let tile = Tile::new(Coord::new(0, 0), TileKind::Empty);
        let mut inventory = Inventory::new(3);
        inventory.try_add(Item::Ruby);
        let next = tile
            .interact(Some(&mut inventory), TileAction::PlaceAutominer)
            .next;
        assert!(next.items.is_empty());
        assert_eq!(inventory.as_slice(), &[Item::Ruby]);
    }

    #[test]
    fn test_interact_keeps_occupant() {
        let mut tile = diamond_tile();
        tile.on_enter(Side::Red);
        let next = tile.interact(None, TileAction::Mine).next;
        assert_eq!(next.occupant, Some(Side::Red));
        assert_eq!(next.location(), tile.location());
    }

    #[test]
    fn test_recharge_update() {
        let mut players = [
            Player::new(Side::Red, Coord::new(0, 0), 80, 5),
            Player::new(Side::Blue, Coord::new(1, 1), 80, 5),
        ];
        players[0].charge = 0;
        players[1].charge = 0;

        let mut tile = Tile::new(Coord::new(0, 0), TileKind::Recharge);
        tile.on_enter(Side::Red);
        tile.update(&mut players, 10);
        assert_eq!(players[0].charge, 8);
        assert_eq!(players[1].charge, 0);

        // Non-recharge ground does nothing
        let mut plain = Tile::new(Coord::new(1, 1), TileKind::Empty);
        plain.on_enter(Side::Blue);
        plain.update(&mut players, 10);
        assert_eq!(players[1].charge, 0);
    }

    #[test]
    fn test_recharge_huge_battery() {
        let mut players = [
            Player::new(Side::Red, Coord::new(0, 0), u32::MAX, 5),
            Player::new(Side::Blue, Coord::new(1, 1), 1_000_000_000, 5),
        ];
        players[0].charge = u32::MAX - 1;
        players[1].charge = 0;

        let mut tile = Tile::new(Coord::new(0, 0), TileKind::Recharge);
        tile.on_enter(Side::Red);
        tile.update(&mut players, 100);
        assert_eq!(players[0].charge, u32::MAX);

        let mut other = Tile::new(Coord::new(1, 1), TileKind::Recharge);
        other.on_enter(Side::Blue);
        other.update(&mut players, 10);
        assert_eq!(players[1].charge, 100_000_000);
    }

    #[test]
    fn test_symbol_round_trip() {
        for symbol in ['.', 'x', '#', 'r', 'e', 'd', '+', 'R', 'B'] {
            let kind = TileKind::from_symbol(symbol).unwrap();
            assert_eq!(kind.symbol(), symbol);
        }
        assert!(TileKind::from_symbol('z').is_none());
    }

    #[test]
    fn test_tile_types() {
        assert_eq!(
            Tile::new(Coord::new(0, 0), TileKind::Stone).tile_type(),
            TileType::Empty
        );
        assert_eq!(
            Tile::new(Coord::new(0, 0), TileKind::Market(Side::Red)).tile_type(),
            TileType::RedMarket
        );
        assert_eq!(TileType::BlueMarket.market_owner(), Some(Side::Blue));
        assert_eq!(TileType::ResourceEmerald.resource(), Some(Item::Emerald));
    }
}

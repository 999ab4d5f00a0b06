//! Value-per-step miner
//!
//! Chases the resource tile with the best `price / (distance + turns to mine)`
//! ratio, picks up what it mines, sells at its nearest market when full and
//! rests on a recharge tile when the battery runs low.

use crate::core::{Coord, Direction, Item, Side, TileType};
use crate::game::{BoardView, MatchRng, PlayerStrategy, Prices, StrategySetup, TurnAction};
use serde::{Deserialize, Serialize};

/// Head for a charger at or below this share of max charge (tenths)
const LOW_CHARGE_TENTHS: u64 = 1;
/// Leave the charger above this share of max charge (tenths)
const RESUME_CHARGE_TENTHS: u64 = 9;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GreedyStrategy {
    side: Option<Side>,
    max_charge: u32,
    max_inventory_size: usize,
    markets: Vec<Coord>,
    chargers: Vec<Coord>,
    /// Items received since the last sale
    inventory: Vec<Item>,
    charging: bool,
}

impl GreedyStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracked inventory, as reported by the callbacks
    pub fn inventory(&self) -> &[Item] {
        &self.inventory
    }

    fn nearest(cells: &[Coord], from: Coord) -> Option<Coord> {
        cells.iter().copied().min_by_key(|c| from.manhattan(*c))
    }

    /// Resource tile with the best value per step, ties to storage order
    fn best_resource(view: &BoardView, prices: &Prices, from: Coord) -> Option<Coord> {
        let mut best: Option<(Coord, i64, i64)> = None;
        for (index, tile_type) in view.types.iter().enumerate() {
            let Some(resource) = tile_type.resource() else {
                continue;
            };
            let Some(stats) = resource.resource_stats() else {
                continue;
            };
            let coord = Coord::from_index(index, view.size);
            let price = i64::from(prices.get(resource));
            let cost = i64::from(from.manhattan(coord)) + i64::from(stats.turns_to_mine);
            // price / cost > best_price / best_cost, with both costs positive
            let better = match best {
                None => true,
                Some((_, best_price, best_cost)) => price * best_cost > best_price * cost,
            };
            if better {
                best = Some((coord, price, cost));
            }
        }
        best.map(|(coord, _, _)| coord)
    }

    /// One step toward `target`, horizontal first
    ///
    /// Without the favor, steps onto the opponent's cell are skipped; if no
    /// other step gets closer the strategy waits.
    fn step_toward(view: &BoardView, target: Coord, favored: bool) -> Option<TurnAction> {
        let here = view.own_location;
        let mut candidates = Vec::with_capacity(2);
        if here.x < target.x {
            candidates.push(Direction::Right);
        } else if here.x > target.x {
            candidates.push(Direction::Left);
        }
        if here.y < target.y {
            candidates.push(Direction::Up);
        } else if here.y > target.y {
            candidates.push(Direction::Down);
        }

        candidates
            .into_iter()
            .find(|d| favored || here.step(*d) != view.opponent_location)
            .map(TurnAction::movement)
    }

    fn low_charge(&self, charge: u32) -> bool {
        u64::from(charge) * 10 <= u64::from(self.max_charge) * LOW_CHARGE_TENTHS
    }

    fn recharged(&self, charge: u32) -> bool {
        u64::from(charge) * 10 > u64::from(self.max_charge) * RESUME_CHARGE_TENTHS
    }
}

impl PlayerStrategy for GreedyStrategy {
    fn name(&self) -> &str {
        "greedy"
    }

    fn initialize(&mut self, setup: &StrategySetup<'_>, _rng: &mut MatchRng) {
        let side = if setup.is_red { Side::Red } else { Side::Blue };
        *self = GreedyStrategy {
            side: Some(side),
            max_charge: setup.max_charge,
            max_inventory_size: setup.max_inventory_size,
            markets: setup.initial_view.find_all(TileType::market_for(side)),
            chargers: setup.initial_view.find_all(TileType::Recharge),
            inventory: Vec::new(),
            charging: false,
        };
    }

    fn turn_action(
        &mut self,
        view: &BoardView,
        prices: &Prices,
        charge: u32,
        favored: bool,
    ) -> Option<TurnAction> {
        let here = view.own_location;

        if let Some(charger) = Self::nearest(&self.chargers, here) {
            if self.low_charge(charge) {
                self.charging = true;
            } else if self.charging && self.recharged(charge) {
                self.charging = false;
            }
            if self.charging {
                if here == charger || view.tile_type(here) == Some(TileType::Recharge) {
                    return None;
                }
                return Self::step_toward(view, charger, favored);
            }
        }

        if self.inventory.len() >= self.max_inventory_size {
            let market = Self::nearest(&self.markets, here)?;
            return Self::step_toward(view, market, favored);
        }

        if view.items_at(here).iter().any(|item| item.is_resource()) {
            return Some(TurnAction::PickUpResource);
        }

        match Self::best_resource(view, prices, here) {
            Some(target) if target == here => Some(TurnAction::Mine),
            Some(target) => Self::step_toward(view, target, favored),
            // Nothing left to mine; cash in what we carry
            None if !self.inventory.is_empty() => {
                let market = Self::nearest(&self.markets, here)?;
                Self::step_toward(view, market, favored)
            }
            None => None,
        }
    }

    fn on_receive_item(&mut self, item: Item) {
        self.inventory.push(item);
    }

    fn on_sold_inventory(&mut self, _total: i32) {
        self.inventory.clear();
    }
}

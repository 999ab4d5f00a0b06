//! Dynamic resource pricing
//!
//! Prices grow every tick up to each kind's cap and drop when a batch of
//! items is sold. Instead of holding observers, the economy hands back a
//! [`PriceUpdate`] whenever observers should be told about new prices.

use crate::core::Item;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Demand ticks between two demand-driven broadcasts
pub const DEMAND_BROADCAST_INTERVAL: u32 = 10;

/// Immutable copy of the current prices
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Prices(BTreeMap<Item, i32>);

impl Prices {
    /// Price of a kind, 0 if the kind is not sold in this economy
    pub fn get(&self, item: Item) -> i32 {
        self.0.get(&item).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Item, i32)> + '_ {
        self.0.iter().map(|(&item, &price)| (item, price))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceChangeCause {
    Demand,
    Sale,
}

/// Notification that prices changed, for renderers and other observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub cause: PriceChangeCause,
    pub prices: Prices,
}

/// Result of liquidating one inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleReceipt {
    /// Amount credited to the seller
    pub total: i32,
    pub update: PriceUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Economy {
    sellable: SmallVec<[Item; 3]>,
    prices: BTreeMap<Item, i32>,
    ticks_since_broadcast: u32,
}

impl Economy {
    /// Create an economy trading the given kinds at their starting prices
    ///
    /// Non-resource items are ignored.
    pub fn new(sellable: &[Item]) -> Self {
        let sellable: SmallVec<[Item; 3]> = sellable
            .iter()
            .copied()
            .filter(|item| item.is_resource())
            .collect();
        let prices = sellable
            .iter()
            .filter_map(|&item| item.resource_stats().map(|s| (item, s.starting_price)))
            .collect();
        Economy {
            sellable,
            prices,
            ticks_since_broadcast: 0,
        }
    }

    pub fn sellable(&self) -> &[Item] {
        &self.sellable
    }

    pub fn current_prices(&self) -> Prices {
        Prices(self.prices.clone())
    }

    fn update(&self, cause: PriceChangeCause) -> PriceUpdate {
        PriceUpdate {
            cause,
            prices: self.current_prices(),
        }
    }

    /// Apply one tick of demand growth, capped at each kind's max price
    ///
    /// Returns an update every [`DEMAND_BROADCAST_INTERVAL`] calls.
    pub fn increase_demand(&mut self) -> Option<PriceUpdate> {
        for (item, price) in self.prices.iter_mut() {
            if let Some(stats) = item.resource_stats() {
                *price = (*price + stats.price_increase_per_turn).min(stats.max_price);
            }
        }

        self.ticks_since_broadcast += 1;
        if self.ticks_since_broadcast >= DEMAND_BROADCAST_INTERVAL {
            self.ticks_since_broadcast = 0;
            Some(self.update(PriceChangeCause::Demand))
        } else {
            None
        }
    }

    /// Sell a batch of items at current prices, then depress each sold kind
    ///
    /// A kind sold `n` times in one batch drops to `price * (1 - n/8)`,
    /// truncated toward zero. Large batches can push a price below zero.
    /// Autominers and kinds this economy does not trade are worth nothing.
    pub fn sell_resources(&mut self, items: &[Item]) -> SaleReceipt {
        let mut counts: BTreeMap<Item, i32> = BTreeMap::new();
        for item in items.iter().filter(|item| self.sellable.contains(item)) {
            *counts.entry(*item).or_insert(0) += 1;
        }

        let mut total = 0;
        for (item, count) in counts {
            if let Some(price) = self.prices.get_mut(&item) {
                total += count * *price;
                *price = *price * (8 - count) / 8;
            }
        }

        SaleReceipt {
            total,
            update: self.update(PriceChangeCause::Sale),
        }
    }
}

impl Default for Economy {
    fn default() -> Self {
        Economy::new(&Item::RESOURCES)
    }
}

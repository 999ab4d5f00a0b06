//! Seeded board generator
//!
//! Boards are built for red's half and rotated 180° onto blue's half, so
//! both sides face the same distances to the same resources. The center
//! holds a 2x2 recharge block with one market beside it per side and the
//! start cells just outside it.

use crate::core::{Coord, Item, Side, TileKind};
use crate::game::{Board, MIN_BOARD_SIZE};
use crate::loader::Layout;
use crate::{MineError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};

/// Autominers placed per side on a board of the given size
pub fn autominers_per_side(size: usize) -> usize {
    (size / 10).max(1)
}

struct Plan {
    size: usize,
    kinds: BTreeMap<Coord, TileKind>,
    /// Cells that must stay empty ground (start cells)
    reserved: BTreeSet<Coord>,
}

impl Plan {
    fn is_free(&self, coord: Coord) -> bool {
        let mirror = coord.mirrored(self.size);
        [coord, mirror]
            .iter()
            .all(|c| !self.kinds.contains_key(c) && !self.reserved.contains(c))
    }

    fn set_mirrored(&mut self, coord: Coord, kind: TileKind) {
        self.kinds.insert(coord, kind);
        self.kinds.insert(coord.mirrored(self.size), kind);
    }

    /// Red's half: every cell that sorts before its mirror image
    fn red_half(&self) -> Vec<Coord> {
        let n = self.size as i32;
        (0..n)
            .flat_map(|y| (0..n).map(move |x| Coord::new(x, y)))
            .filter(|c| {
                let m = c.mirrored(self.size);
                (c.y, c.x) < (m.y, m.x)
            })
            .collect()
    }

    /// Distance from the board center as a share of the corner distance
    fn center_ratio(&self, coord: Coord) -> f64 {
        let center = (self.size as f64 - 1.0) / 2.0;
        let dx = coord.x as f64 - center;
        let dy = coord.y as f64 - center;
        let corner = (2.0 * center * center).sqrt();
        (dx * dx + dy * dy).sqrt() / corner
    }
}

/// Generate a mirrored layout from the match generator
pub fn generate_layout<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Layout> {
    if size < MIN_BOARD_SIZE {
        return Err(MineError::InvalidLayout(format!(
            "board must be at least {MIN_BOARD_SIZE}x{MIN_BOARD_SIZE}, got {size}x{size}"
        )));
    }

    let low = (size as i32 - 2) / 2;
    let red_market = Coord::new(low - 1, low);
    let red_start = Coord::new(low, low - 1);
    let blue_start = red_start.mirrored(size);

    let mut plan = Plan {
        size,
        kinds: BTreeMap::new(),
        reserved: [red_start, blue_start].into_iter().collect(),
    };
    for x in low..low + 2 {
        for y in low..low + 2 {
            plan.kinds.insert(Coord::new(x, y), TileKind::Recharge);
        }
    }
    plan.kinds.insert(red_market, TileKind::Market(Side::Red));
    plan.kinds
        .insert(red_market.mirrored(size), TileKind::Market(Side::Blue));

    let red_half = plan.red_half();
    let half_area = (size * size) as f64 / 2.0;

    // Scarcest first so the outer bands are filled before the inner ones
    for resource in Item::RESOURCES.into_iter().rev() {
        let Some(stats) = resource.resource_stats() else {
            continue;
        };
        let mut candidates: Vec<Coord> = red_half
            .iter()
            .copied()
            .filter(|c| plan.is_free(*c))
            .filter(|c| {
                let ratio = plan.center_ratio(*c);
                ratio >= stats.min_spawn_ratio && ratio <= stats.max_spawn_ratio
            })
            .collect();
        candidates.shuffle(rng);
        let count = ((stats.spawn_count_ratio * half_area).round() as usize).max(1);
        for coord in candidates.into_iter().take(count) {
            plan.set_mirrored(coord, TileKind::resource(resource));
        }
    }

    let mut empty: Vec<Coord> = red_half
        .iter()
        .copied()
        .filter(|c| plan.is_free(*c))
        .collect();
    empty.shuffle(rng);
    let autominer_cells: Vec<Coord> = empty.into_iter().take(autominers_per_side(size)).collect();

    let mut board = Board::from_fn(size, |c| {
        plan.kinds.get(&c).copied().unwrap_or(TileKind::Empty)
    })?;
    for coord in autominer_cells {
        board.place_item(coord, Item::Autominer)?;
        board.place_item(coord.mirrored(size), Item::Autominer)?;
    }

    Ok(Layout {
        board,
        starts: [red_start, blue_start],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TileType;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn generate(size: usize, seed: u64) -> Layout {
        generate_layout(size, &mut ChaCha12Rng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn test_rejects_tiny_board() {
        let result = generate_layout(3, &mut ChaCha12Rng::seed_from_u64(0));
        assert!(matches!(result, Err(MineError::InvalidLayout(_))));
    }

    #[test]
    fn test_center_block_markets_and_starts() {
        let layout = generate(20, 1);
        let board = &layout.board;
        for c in [(9, 9), (10, 9), (9, 10), (10, 10)] {
            assert_eq!(
                board.tile_type(Coord::new(c.0, c.1)),
                Some(TileType::Recharge)
            );
        }
        assert_eq!(board.find_all(TileType::RedMarket), vec![Coord::new(8, 9)]);
        assert_eq!(board.find_all(TileType::BlueMarket), vec![Coord::new(11, 10)]);
        assert_eq!(layout.starts, [Coord::new(9, 8), Coord::new(10, 11)]);
        for start in layout.starts {
            assert_eq!(board.tile_type(start), Some(TileType::Empty));
        }
    }

    #[test]
    fn test_layout_is_mirrored() {
        for size in [4, 14, 20, 26] {
            let layout = generate(size, size as u64);
            let board = &layout.board;
            for tile in board.tiles() {
                let mirror = board.tile(tile.location().mirrored(size)).unwrap();
                match tile.kind {
                    TileKind::Market(side) => {
                        assert_eq!(mirror.kind, TileKind::Market(side.opponent()))
                    }
                    kind => assert_eq!(mirror.kind, kind, "asymmetric at {}", tile.location()),
                }
                assert_eq!(tile.items, mirror.items);
            }
        }
    }

    #[test]
    fn test_resources_and_autominers_placed() {
        let layout = generate(20, 9);
        let board = &layout.board;
        for tile_type in [
            TileType::ResourceRuby,
            TileType::ResourceEmerald,
            TileType::ResourceDiamond,
        ] {
            let count = board.find_all(tile_type).len();
            assert!(count > 0 && count % 2 == 0, "{tile_type:?}: {count}");
        }
        let autominers: usize = board
            .items_on_ground()
            .values()
            .map(|items| items.iter().filter(|i| **i == Item::Autominer).count())
            .sum();
        assert_eq!(autominers, 2 * autominers_per_side(20));
        assert_eq!(board.find_all(TileType::market_for(Side::Red)).len(), 1);
    }

    #[test]
    fn test_seed_determines_layout() {
        assert_eq!(generate(14, 5), generate(14, 5));
        assert_ne!(generate(14, 5), generate(14, 6));
    }
}

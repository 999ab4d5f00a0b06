//! Rendering hook
//!
//! The engine never draws. It describes each tile as a stack of named
//! overlays and pushes them to whatever [`Surface`] a presentation layer
//! supplies. [`TextSurface`] is the built-in character grid.

use crate::core::{Item, Side, Tile, TileKind};
use crate::game::Board;

/// Draw order of overlays, bottom first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderLayer {
    Base,
    Texturing,
    ResourceType,
    Crack,
    Building,
    Recharge,
    Autominer,
    Item,
    Player,
}

impl RenderLayer {
    pub const COUNT: usize = 9;

    pub const ALL: [RenderLayer; RenderLayer::COUNT] = [
        RenderLayer::Base,
        RenderLayer::Texturing,
        RenderLayer::ResourceType,
        RenderLayer::Crack,
        RenderLayer::Building,
        RenderLayer::Recharge,
        RenderLayer::Autominer,
        RenderLayer::Item,
        RenderLayer::Player,
    ];
}

/// Crack stage drawn on a fully mined tile
pub const FULL_CRACK: u32 = 3;

/// Something to draw on one layer of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    Ground,
    Stone,
    ResourceTexture(Item),
    Crack(u32),
    Market(Side),
    ChargingStation,
    /// An item resting on the tile
    Item(Item),
    Player(Side),
}

impl Overlay {
    /// Image identifier a presentation layer can look up
    pub fn image_name(&self) -> String {
        match self {
            Overlay::Ground => "ground".to_string(),
            Overlay::Stone => "stone".to_string(),
            Overlay::ResourceTexture(item) => format!("tile_{item}"),
            Overlay::Crack(stage) => format!("crack_{stage}"),
            Overlay::Market(Side::Red) => "market_red".to_string(),
            Overlay::Market(Side::Blue) => "market_blue".to_string(),
            Overlay::ChargingStation => "charging_station".to_string(),
            Overlay::Item(item) => item.name().to_string(),
            Overlay::Player(Side::Red) => "player_red".to_string(),
            Overlay::Player(Side::Blue) => "player_blue".to_string(),
        }
    }
}

/// Overlays for one tile, indexed by [`RenderLayer`]
pub fn overlays(tile: &Tile) -> [Option<Overlay>; RenderLayer::COUNT] {
    let mut layers = [None; RenderLayer::COUNT];
    let mut set = |layer: RenderLayer, overlay: Overlay| layers[layer as usize] = Some(overlay);

    match tile.kind {
        TileKind::Stone => set(RenderLayer::Base, Overlay::Stone),
        _ => set(RenderLayer::Base, Overlay::Ground),
    }
    match tile.kind {
        TileKind::Resource {
            resource,
            times_mined,
        } => {
            set(RenderLayer::ResourceType, Overlay::ResourceTexture(resource));
            if times_mined > 0 {
                set(RenderLayer::Crack, Overlay::Crack(times_mined));
            }
        }
        TileKind::Cracked => set(RenderLayer::Crack, Overlay::Crack(FULL_CRACK)),
        TileKind::Market(side) => set(RenderLayer::Building, Overlay::Market(side)),
        TileKind::Recharge => set(RenderLayer::Recharge, Overlay::ChargingStation),
        TileKind::Empty | TileKind::Stone => {}
    }

    // Latest item of each category is the one on top
    for &item in &tile.items {
        let layer = if item == Item::Autominer {
            RenderLayer::Autominer
        } else {
            RenderLayer::Item
        };
        set(layer, Overlay::Item(item));
    }
    if let Some(side) = tile.occupant {
        set(RenderLayer::Player, Overlay::Player(side));
    }
    layers
}

/// Drawing target supplied by a presentation layer
pub trait Surface {
    /// Draw one overlay with its top-left corner at pixel (x, y)
    fn draw(&mut self, overlay: Overlay, x: u32, y: u32);
}

impl Board {
    /// Push every tile's overlays to `surface`, bottom layer first
    ///
    /// The top row of the board lands at y = 0.
    pub fn paint(&self, surface: &mut dyn Surface, tile_width: u32, tile_height: u32) {
        let last_row = self.size() as u32 - 1;
        for tile in self.tiles() {
            let location = tile.location();
            let x = location.x as u32 * tile_width;
            let y = (last_row - location.y as u32) * tile_height;
            for overlay in overlays(tile).into_iter().flatten() {
                surface.draw(overlay, x, y);
            }
        }
    }
}

/// One character per tile; the topmost overlay decides the character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSurface {
    size: usize,
    cells: Vec<char>,
}

impl TextSurface {
    pub fn new(size: usize) -> Self {
        TextSurface {
            size,
            cells: vec![' '; size * size],
        }
    }

    pub fn render(&self) -> String {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Surface for TextSurface {
    fn draw(&mut self, overlay: Overlay, x: u32, y: u32) {
        let index = y as usize * self.size + x as usize;
        let Some(cell) = self.cells.get_mut(index) else {
            return;
        };
        *cell = match overlay {
            Overlay::Ground => '.',
            Overlay::Stone => '#',
            Overlay::ResourceTexture(item) => TileKind::resource(item).symbol(),
            // Partial cracks keep the resource letter visible
            Overlay::Crack(stage) if stage >= FULL_CRACK || *cell == '.' => 'x',
            Overlay::Crack(_) => *cell,
            Overlay::Market(side) => TileKind::Market(side).symbol(),
            Overlay::ChargingStation => '+',
            Overlay::Item(Item::Autominer) => 'a',
            Overlay::Item(_) => '*',
            Overlay::Player(Side::Red) => '1',
            Overlay::Player(Side::Blue) => '2',
        };
    }
}

/// Character picture of the board, top row first
pub fn render_text(board: &Board) -> String {
    let mut surface = TextSurface::new(board.size());
    board.paint(&mut surface, 1, 1);
    surface.render()
}

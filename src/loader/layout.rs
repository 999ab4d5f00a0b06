//! Text layout format
//!
//! Grid rows come top row first, one symbol per cell (see
//! [`TileKind::from_symbol`]). Directive lines place the players and any
//! starting items:
//!
//! ```text
//! # 4x4 practice board
//! ..d.
//! .++R
//! B++.
//! .r..
//! @red 1,0
//! @blue 2,3
//! @item 0,0 autominer
//! ```
//!
//! A `#` followed by whitespace (or alone on its line) starts a comment;
//! grid rows never contain whitespace, so rows of stone are unambiguous.

use crate::core::{Coord, Item, Side, TileKind};
use crate::game::{Board, MIN_BOARD_SIZE};
use crate::{MineError, Result};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, char, i32 as parse_i32, space0, space1},
    combinator::{all_consuming, map, map_opt, value},
    sequence::{delimited, preceded, separated_pair, terminated},
    IResult,
};
use std::fmt::Write as _;
use std::path::Path;

/// A board plus where each side starts
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub board: Board,
    /// Red first
    pub starts: [Coord; 2],
}

#[derive(Debug, Clone, PartialEq)]
enum Line {
    Row(Vec<TileKind>),
    Start(Side, Coord),
    Item(Coord, Item),
}

fn coord(input: &str) -> IResult<&str, Coord> {
    map(
        separated_pair(parse_i32, delimited(space0, char(','), space0), parse_i32),
        |(x, y)| Coord::new(x, y),
    )(input)
}

fn side(input: &str) -> IResult<&str, Side> {
    alt((value(Side::Red, tag("red")), value(Side::Blue, tag("blue"))))(input)
}

fn start_directive(input: &str) -> IResult<&str, Line> {
    map(separated_pair(side, space1, coord), |(side, at)| {
        Line::Start(side, at)
    })(input)
}

fn item_directive(input: &str) -> IResult<&str, Line> {
    map(
        preceded(
            terminated(tag("item"), space1),
            separated_pair(coord, space1, map_opt(alpha1, Item::from_name)),
        ),
        |(at, item)| Line::Item(at, item),
    )(input)
}

fn directive(input: &str) -> IResult<&str, Line> {
    preceded(char('@'), alt((item_directive, start_directive)))(input)
}

fn grid_row(input: &str) -> IResult<&str, Line> {
    map(
        take_while1(|c: char| TileKind::from_symbol(c).is_some()),
        |row: &str| Line::Row(row.chars().filter_map(TileKind::from_symbol).collect()),
    )(input)
}

fn line(input: &str) -> IResult<&str, Line> {
    all_consuming(delimited(space0, alt((directive, grid_row)), space0))(input)
}

fn is_comment(line: &str) -> bool {
    line.strip_prefix('#')
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

impl Layout {
    /// Parse layout text
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows: Vec<Vec<TileKind>> = Vec::new();
        let mut starts: [Option<Coord>; 2] = [None, None];
        let mut items: Vec<(Coord, Item)> = Vec::new();

        for (number, raw) in text.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || is_comment(trimmed) {
                continue;
            }
            let (_, parsed) = line(trimmed).map_err(|_| {
                MineError::ParseError(format!("line {}: cannot read `{}`", number + 1, trimmed))
            })?;
            match parsed {
                Line::Row(row) => rows.push(row),
                Line::Start(side, at) => {
                    if starts[side.index()].replace(at).is_some() {
                        return Err(MineError::InvalidLayout(format!(
                            "line {}: second start for {side}",
                            number + 1
                        )));
                    }
                }
                Line::Item(at, item) => items.push((at, item)),
            }
        }

        let size = rows.len();
        if size < MIN_BOARD_SIZE {
            return Err(MineError::InvalidLayout(format!(
                "board must be at least {MIN_BOARD_SIZE}x{MIN_BOARD_SIZE}, found {size} rows"
            )));
        }
        if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != size) {
            return Err(MineError::InvalidLayout(format!(
                "row {} has {} cells, expected {size}",
                r + 1,
                row.len()
            )));
        }

        // Rows are listed top first
        let mut board = Board::from_fn(size, |c| rows[size - 1 - c.y as usize][c.x as usize])?;
        for (at, item) in items {
            board.place_item(at, item)?;
        }

        let [Some(red), Some(blue)] = starts else {
            return Err(MineError::InvalidLayout(
                "both @red and @blue starts are required".to_string(),
            ));
        };
        for start in [red, blue] {
            if !board.in_bounds(start) {
                return Err(MineError::OutOfBounds(start));
            }
        }
        if red == blue {
            return Err(MineError::InvalidLayout(format!("both players start on {red}")));
        }

        Ok(Layout {
            board,
            starts: [red, blue],
        })
    }

    /// Load layout text from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Layout::parse(&text)
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    /// Write the layout back out in the format [`Layout::parse`] reads
    ///
    /// Mining progress on resource tiles is not part of the format.
    pub fn to_text(&self) -> String {
        let size = self.board.size();
        let mut text = String::new();
        for row in self.board.tiles().chunks(size) {
            text.extend(row.iter().map(|tile| tile.kind.symbol()));
            text.push('\n');
        }
        for (side, start) in [Side::Red, Side::Blue].into_iter().zip(self.starts) {
            let name = if side.is_red() { "red" } else { "blue" };
            let _ = writeln!(text, "@{name} {},{}", start.x, start.y);
        }

        let mut cells: Vec<_> = self.board.items_on_ground().iter().collect();
        cells.sort_by_key(|(at, _)| **at);
        for (at, items) in cells {
            for item in items {
                let _ = writeln!(text, "@item {},{} {item}", at.x, at.y);
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TileType;

    const PRACTICE: &str = "\
# 4x4 practice board
..d.
.++R
B++.
.r..

@red 1,0
@blue 2,3
@item 0,0 autominer
@item 3, 3 ruby
";

    #[test]
    fn test_parse_practice_board() {
        let layout = Layout::parse(PRACTICE).unwrap();
        assert_eq!(layout.size(), 4);
        assert_eq!(layout.starts, [Coord::new(1, 0), Coord::new(2, 3)]);

        let board = &layout.board;
        assert_eq!(board.tile_type(Coord::new(2, 3)), Some(TileType::ResourceDiamond));
        assert_eq!(board.tile_type(Coord::new(1, 0)), Some(TileType::ResourceRuby));
        assert_eq!(board.tile_type(Coord::new(3, 2)), Some(TileType::RedMarket));
        assert_eq!(board.tile_type(Coord::new(0, 1)), Some(TileType::BlueMarket));
        assert_eq!(board.find_all(TileType::Recharge).len(), 4);
        assert_eq!(board.items_at(Coord::new(0, 0)), &[Item::Autominer]);
        assert_eq!(board.items_at(Coord::new(3, 3)), &[Item::Ruby]);
    }

    #[test]
    fn test_stone_rows_are_not_comments() {
        let text = "####\n#..#\n#..#\n####\n@red 1,1\n@blue 2,2\n";
        let layout = Layout::parse(text).unwrap();
        assert_eq!(layout.board.tile(Coord::new(0, 0)).unwrap().kind, TileKind::Stone);
        assert_eq!(layout.board.tile(Coord::new(1, 1)).unwrap().kind, TileKind::Empty);
    }

    #[test]
    fn test_round_trip_text() {
        let layout = Layout::parse(PRACTICE).unwrap();
        let reparsed = Layout::parse(&layout.to_text()).unwrap();
        assert_eq!(reparsed, layout);
    }

    #[test]
    fn test_rejects_bad_input() {
        let missing_blue = "....\n....\n....\n....\n@red 0,0\n";
        assert!(matches!(
            Layout::parse(missing_blue),
            Err(MineError::InvalidLayout(_))
        ));

        let too_small = "...\n...\n...\n@red 0,0\n@blue 1,1\n";
        assert!(matches!(
            Layout::parse(too_small),
            Err(MineError::InvalidLayout(_))
        ));

        let ragged = "....\n...\n....\n....\n@red 0,0\n@blue 1,1\n";
        assert!(matches!(
            Layout::parse(ragged),
            Err(MineError::InvalidLayout(_))
        ));

        let unknown_symbol = "....\n..z.\n....\n....\n@red 0,0\n@blue 1,1\n";
        assert!(matches!(
            Layout::parse(unknown_symbol),
            Err(MineError::ParseError(_))
        ));

        let unknown_item = "....\n....\n....\n....\n@red 0,0\n@blue 1,1\n@item 2,2 gold\n";
        assert!(matches!(
            Layout::parse(unknown_item),
            Err(MineError::ParseError(_))
        ));

        let off_board = "....\n....\n....\n....\n@red 0,4\n@blue 1,1\n";
        assert!(matches!(
            Layout::parse(off_board),
            Err(MineError::OutOfBounds(_))
        ));

        let shared = "....\n....\n....\n....\n@red 1,1\n@blue 1,1\n";
        assert!(Layout::parse(shared).is_err());
    }
}

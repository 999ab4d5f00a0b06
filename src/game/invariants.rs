//! Board and player consistency checks
//!
//! These never fire in a correct engine. The resolver runs them under
//! `debug_assertions` after every tick; tests call them directly.

use crate::core::{Player, Side};
use crate::game::Board;

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all board invariants against the two players.
///
/// Returns every violation found, empty if all hold.
#[must_use]
pub fn check_invariants(board: &Board, players: &[Player; 2]) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut push = |message: String| violations.push(InvariantViolation { message });

    let size = board.size();
    for (index, tile) in board.tiles().iter().enumerate() {
        let location = tile.location();
        if location.to_index(size) != Some(index) {
            push(format!("tile for {location} stored at index {index}"));
        }
        if board.tile_type(location) != Some(tile.tile_type()) {
            push(format!("type map out of date at {location}"));
        }
        if board.items_at(location) != tile.items.as_slice() {
            push(format!("item index out of date at {location}"));
        }
        if let Some(side) = tile.occupant {
            if players[side.index()].position != location {
                push(format!("{side} marked on {location} but stands elsewhere"));
            }
        }
    }

    for (coord, items) in board.items_on_ground() {
        if items.is_empty() {
            push(format!("empty item entry kept for {coord}"));
        }
    }

    for side in Side::BOTH {
        let player = &players[side.index()];
        if player.side != side {
            push(format!("player slot {} holds {}", side.index(), player.side));
        }
        match board.tile(player.position) {
            Some(tile) if tile.occupant == Some(side) => {}
            Some(_) => push(format!("{side} at {} not marked on tile", player.position)),
            None => push(format!("{side} off the board at {}", player.position)),
        }
        if player.inventory.len() > player.inventory.capacity() {
            push(format!(
                "{side} carries {} items over capacity {}",
                player.inventory.len(),
                player.inventory.capacity()
            ));
        }
        if player.charge > player.max_charge {
            push(format!("{side} charge {} over max", player.charge));
        }
    }

    if players[0].position == players[1].position {
        push(format!("both players on {}", players[0].position));
    }

    violations
}

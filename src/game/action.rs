//! Turn actions and why the resolver may refuse them

use crate::core::{Direction, TileAction};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One intended action for a tick; `None` at the call site means "do nothing"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Mine,
    PickUpResource,
    PickUpAutominer,
    PlaceAutominer,
}

impl TurnAction {
    pub const ALL: [TurnAction; 8] = [
        TurnAction::MoveUp,
        TurnAction::MoveDown,
        TurnAction::MoveLeft,
        TurnAction::MoveRight,
        TurnAction::Mine,
        TurnAction::PickUpResource,
        TurnAction::PickUpAutominer,
        TurnAction::PlaceAutominer,
    ];

    pub fn movement(direction: Direction) -> TurnAction {
        match direction {
            Direction::Up => TurnAction::MoveUp,
            Direction::Down => TurnAction::MoveDown,
            Direction::Left => TurnAction::MoveLeft,
            Direction::Right => TurnAction::MoveRight,
        }
    }

    /// Direction for movement actions
    pub fn direction(self) -> Option<Direction> {
        match self {
            TurnAction::MoveUp => Some(Direction::Up),
            TurnAction::MoveDown => Some(Direction::Down),
            TurnAction::MoveLeft => Some(Direction::Left),
            TurnAction::MoveRight => Some(Direction::Right),
            _ => None,
        }
    }

    /// The tile action dispatched for non-movement actions
    pub fn tile_action(self) -> Option<TileAction> {
        match self {
            TurnAction::Mine => Some(TileAction::Mine),
            TurnAction::PickUpResource => Some(TileAction::PickUpResource),
            TurnAction::PickUpAutominer => Some(TileAction::PickUpAutominer),
            TurnAction::PlaceAutominer => Some(TileAction::PlaceAutominer),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TurnAction::MoveUp => "move_up",
            TurnAction::MoveDown => "move_down",
            TurnAction::MoveLeft => "move_left",
            TurnAction::MoveRight => "move_right",
            TurnAction::Mine => "mine",
            TurnAction::PickUpResource => "pick_up_resource",
            TurnAction::PickUpAutominer => "pick_up_autominer",
            TurnAction::PlaceAutominer => "place_autominer",
        }
    }

    pub fn from_name(name: &str) -> Option<TurnAction> {
        TurnAction::ALL.into_iter().find(|a| a.name() == name)
    }
}

impl fmt::Display for TurnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reason an intended action was turned into a no-op
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// The move would leave the board
    OutOfBounds,
    /// Both sides aimed at the same cell and the other side is favored
    Collision,
    /// The opponent is standing on the destination
    Occupied,
    /// The player has no charge left
    NoCharge,
    /// The strategy failed to produce a decision
    ContractViolation,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rejection::OutOfBounds => "out of bounds",
            Rejection::Collision => "lost collision",
            Rejection::Occupied => "destination occupied",
            Rejection::NoCharge => "no charge",
            Rejection::ContractViolation => "strategy contract violation",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_action_is_move_or_tile_action() {
        for action in TurnAction::ALL {
            assert!(action.direction().is_some() ^ action.tile_action().is_some());
        }
    }

    #[test]
    fn test_movement_round_trip() {
        for direction in Direction::ALL {
            assert_eq!(TurnAction::movement(direction).direction(), Some(direction));
        }
    }

    #[test]
    fn test_name_round_trip() {
        for action in TurnAction::ALL {
            assert_eq!(TurnAction::from_name(action.name()), Some(action));
        }
        assert_eq!(TurnAction::from_name("dig"), None);
    }
}

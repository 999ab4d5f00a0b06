//! Strategy that plays back a fixed list of actions
//!
//! Used by tests and for feeding recorded actions back through the loop.

use crate::game::{BoardView, MatchRng, PlayerStrategy, Prices, StrategySetup, TurnAction};
use serde::{Deserialize, Serialize};

/// Plays `actions` in order, then does nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedStrategy {
    actions: Vec<Option<TurnAction>>,
    current_step: usize,
}

impl ScriptedStrategy {
    pub fn new(actions: Vec<Option<TurnAction>>) -> Self {
        ScriptedStrategy {
            actions,
            current_step: 0,
        }
    }

    /// Actions not yet played
    pub fn remaining(&self) -> usize {
        self.actions.len().saturating_sub(self.current_step)
    }
}

impl PlayerStrategy for ScriptedStrategy {
    fn name(&self) -> &str {
        "scripted"
    }

    fn initialize(&mut self, _setup: &StrategySetup<'_>, _rng: &mut MatchRng) {
        self.current_step = 0;
    }

    fn turn_action(
        &mut self,
        _view: &BoardView,
        _prices: &Prices,
        _charge: u32,
        _favored: bool,
    ) -> Option<TurnAction> {
        let action = self.actions.get(self.current_step).copied().flatten();
        self.current_step += 1;
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Coord;
    use crate::core::TileType;
    use crate::game::Economy;
    use rustc_hash::FxHashMap;
    use std::sync::Arc;

    fn empty_view() -> BoardView {
        BoardView {
            size: 4,
            types: Arc::new(vec![TileType::Empty; 16]),
            items_on_ground: FxHashMap::default(),
            own_location: Coord::new(0, 0),
            opponent_location: Coord::new(3, 3),
            opponent_score: 0,
        }
    }

    #[test]
    fn test_plays_script_then_idles() {
        let view = empty_view();
        let prices = Economy::default().current_prices();
        let mut strategy = ScriptedStrategy::new(vec![
            Some(TurnAction::MoveUp),
            None,
            Some(TurnAction::Mine),
        ]);

        let played: Vec<_> = (0..5)
            .map(|_| strategy.turn_action(&view, &prices, 80, true))
            .collect();
        assert_eq!(
            played,
            vec![
                Some(TurnAction::MoveUp),
                None,
                Some(TurnAction::Mine),
                None,
                None
            ]
        );
        assert_eq!(strategy.remaining(), 0);
    }
}

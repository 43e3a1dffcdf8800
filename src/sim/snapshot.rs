//! Read-only view of the board handed to presentation

use serde::{Deserialize, Serialize};

use super::grid::{Direction, Grid, Position};
use super::state::{GameOverCause, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlasterView {
    pub pos: Position,
    pub warning: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlyBlockView {
    pub pos: Position,
    pub flashing: bool,
}

/// Everything a renderer or HUD needs for one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid: Grid,
    /// Head first
    pub creature: Vec<Position>,
    pub direction: Direction,
    pub food: Position,
    pub multiplier: Option<Position>,
    pub boost_active: bool,
    pub blasters: Vec<BlasterView>,
    pub flames: Vec<Position>,
    pub deadly_blocks: Vec<DeadlyBlockView>,
    pub score: u64,
    pub running: bool,
    pub game_over: Option<GameOverCause>,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid,
            creature: self.creature.iter().collect(),
            direction: self.direction,
            food: self.food,
            multiplier: self.multiplier.map(|m| m.pos),
            boost_active: self.boost_active(),
            blasters: self
                .blasters
                .iter()
                .map(|b| BlasterView {
                    pos: b.pos,
                    warning: b.warning,
                })
                .collect(),
            flames: self.flames.iter().map(|f| f.pos).collect(),
            deadly_blocks: self
                .deadly_blocks
                .iter()
                .map(|b| DeadlyBlockView {
                    pos: b.pos,
                    flashing: b.flashing(),
                })
                .collect(),
            score: self.score,
            running: self.running,
            game_over: self.game_over,
        }
    }
}

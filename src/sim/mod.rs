//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied wall-clock timestamps only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod grid;
pub mod hazards;
pub mod sampler;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use grid::{Direction, Grid, Position};
pub use sampler::Occupancy;
pub use snapshot::{BlasterView, DeadlyBlockView, Snapshot};
pub use state::{
    Blaster, Creature, DeadlyBlock, Flame, GameEvent, GameOverCause, GameState, MultiplierPickup,
    SpawnChances, footprint_cells,
};
pub use tick::{TickInput, TickOutcome, tick};

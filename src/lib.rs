//! Hazard Snake - A grid snake arcade game with timed hazards
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, hazard lifecycle)
//! - `session`: Menu / running / game-over phase machine around the simulation
//! - `render`: Flat-color draw list built from simulation snapshots
//! - `platform`: Input translation, tick scheduling and the browser bindings
//! - `highscores`: Persisted best score with graceful degradation

pub mod config;
pub mod highscores;
pub mod platform;
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;

pub use config::GameConfig;
pub use highscores::{HighScore, HighScoreStore, MemoryStore};
pub use session::Session;
pub use settings::Settings;

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Delay between simulation ticks (ms)
    pub const TICK_INTERVAL_MS: u64 = 120;

    /// Size of one grid cell in canvas units
    pub const CELL_SIZE: u32 = 20;
    /// Gap left between neighbouring cells when drawing
    pub const CELL_GUTTER: u32 = 1;
    /// Fraction of the shorter window edge used for the square canvas
    pub const CANVAS_FRACTION: f64 = 0.75;

    /// Creature spawn cell
    pub const START_X: i32 = 10;
    pub const START_Y: i32 = 10;

    /// Multiplier pickup lifetime, and boost duration once collected (ms)
    pub const MULTIPLIER_TIME: u64 = 10_000;
    /// Blaster warning period before detonation (ms)
    pub const FLAME_WARNING: u64 = 2_000;
    /// Flame lifetime, and blaster lifetime after detonation (ms)
    pub const FLAME_DURATION: u64 = 3_000;
    /// Countdown between an over-cap deadly block flashing and its removal (ms)
    pub const DEADLY_BLOCK_FLASH_TIME: u64 = 1_000;
    /// Deadly blocks allowed on the board before the oldest starts flashing
    pub const DEADLY_BLOCK_CAP: usize = 5;

    /// Spawn rolls made on each food pickup
    pub const MULTIPLIER_CHANCE: f64 = 0.2;
    pub const BLASTER_CHANCE: f64 = 0.3;
    pub const DEADLY_BLOCK_CHANCE: f64 = 0.25;

    /// Score thresholds that unlock hazards
    pub const BLASTER_MIN_SCORE: u64 = 10;
    pub const DEADLY_BLOCK_MIN_SCORE: u64 = 15;

    /// Placement padding (Chebyshev cells kept clear of the creature)
    pub const MULTIPLIER_PADDING: i32 = 1;
    pub const BLASTER_PADDING: i32 = 3;
    pub const DEADLY_BLOCK_PADDING: i32 = 2;
    /// Clearance kept around existing deadly blocks
    pub const DEADLY_BLOCK_CLEARANCE: i32 = 2;
    /// Deadly block edge length in cells
    pub const DEADLY_BLOCK_SIZE: i32 = 2;

    /// Score lost when the head enters a flame
    pub const FLAME_PENALTY: u64 = 2;

    /// Random draws the sampler makes before falling back to a grid scan
    pub const MAX_SAMPLE_ATTEMPTS: u32 = 512;

    /// Undrained events kept before the oldest are dropped
    pub const MAX_PENDING_EVENTS: usize = 256;
}

/// Chebyshev distance between two cells: max(|dx|, |dy|)
#[inline]
pub fn chebyshev(a: IVec2, b: IVec2) -> i32 {
    let d = (a - b).abs();
    d.x.max(d.y)
}

//! Game state and core simulation types
//!
//! Everything the tick function reads or writes lives in [`GameState`].
//! Timers are absolute millisecond timestamps checked once per tick.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Direction, Grid, Position};
use super::sampler::Occupancy;
use crate::config::GameConfig;
use crate::consts::*;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// Head left the grid
    Wall,
    /// Head ran into the creature's own body
    SelfCollision,
    /// Head entered a deadly block footprint
    DeadlyBlock,
    /// No free cell left for food
    BoardFull,
}

impl GameOverCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverCause::Wall => "wall",
            GameOverCause::SelfCollision => "self",
            GameOverCause::DeadlyBlock => "deadly block",
            GameOverCause::BoardFull => "board full",
        }
    }
}

/// Things that happened during a tick, drained by front-ends for HUD and audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    FoodEaten { pos: Position, points: u64 },
    Burned { pos: Position, penalty: u64 },
    MultiplierSpawned { pos: Position },
    MultiplierCollected { until: u64 },
    MultiplierMissed { pos: Position },
    BoostExpired,
    BlasterSpawned { pos: Position },
    BlasterDetonated { pos: Position },
    DeadlyBlockSpawned { pos: Position },
    DeadlyBlockFlashing { pos: Position },
    DeadlyBlockRemoved { pos: Position },
    GameOver { cause: GameOverCause, score: u64 },
}

/// The player's creature, head first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    segments: VecDeque<Position>,
}

impl Creature {
    pub fn new(head: Position) -> Self {
        let mut segments = VecDeque::with_capacity(16);
        segments.push_back(head);
        Self { segments }
    }

    /// Build a creature from explicit segments (head first). Empty input yields
    /// a single segment at the origin.
    pub fn from_segments(segments: impl IntoIterator<Item = Position>) -> Self {
        let segments: VecDeque<Position> = segments.into_iter().collect();
        if segments.is_empty() {
            return Self::new(Position::ZERO);
        }
        Self { segments }
    }

    pub fn head(&self) -> Position {
        self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.segments.iter().copied()
    }

    pub(crate) fn push_head(&mut self, pos: Position) {
        self.segments.push_front(pos);
    }

    pub(crate) fn drop_tail(&mut self) {
        if self.segments.len() > 1 {
            self.segments.pop_back();
        }
    }
}

/// Uncollected score multiplier on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierPickup {
    pub pos: Position,
    /// Removed from the board at this time if nobody collects it
    pub expires_at: u64,
}

/// A timed explosive. Warns, then detonates into a 3×3 flame cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blaster {
    pub pos: Position,
    pub created_at: u64,
    pub warning: bool,
}

impl Blaster {
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flame {
    pub pos: Position,
    pub created_at: u64,
}

impl Flame {
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_at)
    }
}

/// A 2×2 obstacle anchored at its top-left cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlyBlock {
    pub pos: Position,
    pub created_at: u64,
    /// Set when the block went over the cap and started its removal countdown
    pub flashing_since: Option<u64>,
}

impl DeadlyBlock {
    pub fn new(pos: Position, created_at: u64) -> Self {
        Self {
            pos,
            created_at,
            flashing_since: None,
        }
    }

    pub fn flashing(&self) -> bool {
        self.flashing_since.is_some()
    }

    /// Cells covered by the footprint
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        footprint_cells(self.pos, DEADLY_BLOCK_SIZE)
    }

    pub fn covers(&self, pos: Position) -> bool {
        let d = pos - self.pos;
        d.x >= 0 && d.y >= 0 && d.x < DEADLY_BLOCK_SIZE && d.y < DEADLY_BLOCK_SIZE
    }
}

/// Cells of a `size × size` square anchored at its top-left corner
pub fn footprint_cells(anchor: Position, size: i32) -> impl Iterator<Item = Position> {
    (0..size).flat_map(move |dy| (0..size).map(move |dx| anchor + Position::new(dx, dy)))
}

/// Chance of each spawn roll made on a food pickup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnChances {
    pub multiplier: f64,
    pub blaster: f64,
    pub deadly_block: f64,
}

impl Default for SpawnChances {
    fn default() -> Self {
        Self {
            multiplier: MULTIPLIER_CHANCE,
            blaster: BLASTER_CHANCE,
            deadly_block: DEADLY_BLOCK_CHANCE,
        }
    }
}

impl SpawnChances {
    pub const NEVER: SpawnChances = SpawnChances {
        multiplier: 0.0,
        blaster: 0.0,
        deadly_block: 0.0,
    };

    pub const ALWAYS: SpawnChances = SpawnChances {
        multiplier: 1.0,
        blaster: 1.0,
        deadly_block: 1.0,
    };
}

/// Complete game state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub spawn_chances: SpawnChances,
    pub grid: Grid,
    pub creature: Creature,
    /// Heading committed on the last tick
    pub direction: Direction,
    /// Heading requested by input, committed at the start of the next tick
    pub pending_direction: Direction,
    pub food: Position,
    pub multiplier: Option<MultiplierPickup>,
    /// Score boost end time, while a collected multiplier is active
    pub boost_until: Option<u64>,
    pub blasters: Vec<Blaster>,
    pub flames: Vec<Flame>,
    /// Kept in spawn order
    pub deadly_blocks: Vec<DeadlyBlock>,
    pub score: u64,
    /// Gate for tick execution and input acceptance
    pub running: bool,
    pub game_over: Option<GameOverCause>,
    /// Ticks executed this run
    pub time_ticks: u64,
    /// Events since the last drain, oldest first, at most `MAX_PENDING_EVENTS`
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle state; call [`GameState::start`] to begin a run
    pub fn new(config: &GameConfig) -> Self {
        let grid = config.grid();
        let start = grid.clamp(Position::new(START_X, START_Y));
        Self {
            seed: config.seed,
            rng: Pcg32::seed_from_u64(config.seed),
            spawn_chances: SpawnChances::default(),
            grid,
            creature: Creature::new(start),
            direction: Direction::Up,
            pending_direction: Direction::Up,
            food: grid.clamp(Position::new(5, 5)),
            multiplier: None,
            boost_until: None,
            blasters: Vec::new(),
            flames: Vec::new(),
            deadly_blocks: Vec::new(),
            score: 0,
            running: false,
            game_over: None,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Reset the board for a fresh run and mark it running.
    ///
    /// The RNG keeps its stream so consecutive runs in one session differ.
    pub fn start(&mut self) {
        let start = self.grid.clamp(Position::new(START_X, START_Y));
        self.creature = Creature::new(start);
        self.direction = Direction::Up;
        self.pending_direction = Direction::Up;
        self.multiplier = None;
        self.boost_until = None;
        self.blasters.clear();
        self.flames.clear();
        self.deadly_blocks.clear();
        self.score = 0;
        self.time_ticks = 0;
        self.events.clear();
        self.game_over = None;

        // Food from the previous run must not constrain the new placement
        self.food = start;
        match self.place_food() {
            Some(pos) => {
                self.food = pos;
                self.running = true;
            }
            None => {
                self.running = false;
                self.game_over = Some(GameOverCause::BoardFull);
            }
        }
    }

    /// Request a heading change. Reversals of the current heading are rejected.
    pub fn set_pending_direction(&mut self, dir: Direction) -> bool {
        if !self.running || dir == self.direction.opposite() {
            return false;
        }
        self.pending_direction = dir;
        true
    }

    pub fn boost_active(&self) -> bool {
        self.boost_until.is_some()
    }

    /// Placement view of the board plus the RNG to draw from
    fn placement(&mut self, deadly_clearance: i32) -> (Occupancy<'_>, &mut Pcg32) {
        let occupancy = Occupancy {
            grid: self.grid,
            creature: &self.creature,
            food: Some(self.food),
            multiplier: self.multiplier.map(|m| m.pos),
            blasters: &self.blasters,
            flames: &self.flames,
            deadly_blocks: &self.deadly_blocks,
            deadly_clearance,
        };
        (occupancy, &mut self.rng)
    }

    /// Sample a free anchor cell for a `footprint × footprint` entity
    pub fn sample_free(&mut self, padding: i32, footprint: i32) -> Option<Position> {
        let (occupancy, rng) = self.placement(DEADLY_BLOCK_CLEARANCE);
        occupancy.sample(rng, padding, footprint)
    }

    /// Pick a new food cell.
    ///
    /// Falls back to ignoring the clearance ring around deadly blocks, so
    /// `None` means every cell is taken by the creature or a hazard.
    pub fn place_food(&mut self) -> Option<Position> {
        if let Some(pos) = self.sample_free(0, 1) {
            return Some(pos);
        }
        let (occupancy, rng) = self.placement(0);
        let pos = occupancy.sample(rng, 0, 1);
        if pos.is_some() {
            log::debug!("Food placed inside a deadly block clearance ring");
        }
        pos
    }

    /// Bernoulli roll against the game RNG
    pub(crate) fn roll(&mut self, probability: f64) -> bool {
        if probability.is_nan() || probability <= 0.0 {
            return false;
        }
        self.rng.random_bool(probability.min(1.0))
    }

    /// Queue an event for front-ends; the oldest go once nobody drains
    pub(crate) fn record(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            let excess = self.events.len() + 1 - MAX_PENDING_EVENTS;
            self.events.drain(..excess);
        }
        self.events.push(event);
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

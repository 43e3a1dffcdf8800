//! Menu / running / game-over phases around the simulation
//!
//! The session is what a front-end talks to: it gates input and ticks on the
//! current phase, records the final score and keeps the high score current.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::highscores::{HighScore, HighScoreStore};
use crate::sim::{Direction, GameEvent, GameState, Snapshot, TickInput, TickOutcome, tick};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen
    Idle,
    /// Ticks are running
    Running,
    /// Run ended; final score on display
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Idle => "idle",
            GamePhase::Running => "running",
            GamePhase::GameOver => "game-over",
        }
    }
}

/// Values a HUD or menu shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudView {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    /// Score of the run that just ended
    pub final_score: Option<u64>,
    pub new_high_score: bool,
    /// False once the high score can only be kept in memory
    pub high_score_saved: bool,
}

#[derive(Debug)]
pub struct Session {
    state: GameState,
    phase: GamePhase,
    high_score: HighScore,
    final_score: Option<u64>,
    new_high_score: bool,
}

impl Session {
    pub fn new(config: &GameConfig, store: Box<dyn HighScoreStore>) -> Self {
        Self {
            state: GameState::new(config),
            phase: GamePhase::Idle,
            high_score: HighScore::load(store),
            final_score: None,
            new_high_score: false,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for front-ends that script the board (demos, tests)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    /// Begin a run from the start screen. Returns false in any other phase.
    pub fn start_game(&mut self) -> bool {
        if self.phase != GamePhase::Idle {
            return false;
        }
        self.state.start();
        self.final_score = None;
        self.new_high_score = false;
        if self.state.running {
            self.phase = GamePhase::Running;
            log::info!(
                "Game started on a {}x{} grid",
                self.state.grid.cols,
                self.state.grid.rows
            );
        } else {
            // Nowhere to put food: the run is over before it began
            self.end_game();
        }
        true
    }

    /// Queue a heading for the next tick. Ignored unless running; reversals of
    /// the current heading are rejected.
    pub fn set_direction(&mut self, dir: Direction) -> bool {
        self.phase == GamePhase::Running && self.state.set_pending_direction(dir)
    }

    /// Run one tick at wall-clock time `now` (ms)
    pub fn tick(&mut self, now: u64) -> TickOutcome {
        if self.phase != GamePhase::Running {
            return TickOutcome::Halted;
        }
        let outcome = tick(&mut self.state, &TickInput::default(), now);
        if let TickOutcome::GameOver(_) = outcome {
            self.end_game();
        }
        outcome
    }

    /// Abandon the current run, scoring it as if it had ended normally.
    /// Returns false unless running.
    pub fn quit(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.state.running = false;
        log::info!("Run abandoned");
        self.end_game();
        true
    }

    fn end_game(&mut self) {
        self.phase = GamePhase::GameOver;
        let score = self.state.score;
        self.final_score = Some(score);
        self.new_high_score = self.high_score.submit(score);
        log::info!(
            "Final score {} (best {}{})",
            score,
            self.high_score.best(),
            if self.new_high_score { ", new record" } else { "" }
        );
    }

    /// Leave the game-over screen. Returns false in any other phase.
    pub fn return_to_menu(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.phase = GamePhase::Idle;
        log::info!("Back to menu");
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn hud(&self) -> HudView {
        HudView {
            phase: self.phase,
            score: self.state.score,
            high_score: self.high_score.best(),
            final_score: self.final_score,
            new_high_score: self.new_high_score,
            high_score_saved: self.high_score.is_persistent(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}

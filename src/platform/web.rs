//! Browser bindings
//!
//! The page owns the canvas, the menu markup and the `requestAnimationFrame`
//! loop. Each frame it calls [`WebGame::frame`], which runs a tick when one is
//! due, and then paints the JSON draw list.

use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::highscores::LocalStorageStore;
use crate::platform::{TickScheduler, direction_for_key};
use crate::render::draw_list;
use crate::session::{GamePhase, Session};
use crate::settings::{PaletteKind, Settings};
use crate::sim::TickOutcome;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Game handle exported to JavaScript
#[wasm_bindgen]
pub struct WebGame {
    session: Session,
    settings: Settings,
    scheduler: TickScheduler,
    canvas_size: u32,
}

#[wasm_bindgen]
impl WebGame {
    /// Size the grid from the window and load stored preferences
    #[wasm_bindgen(constructor)]
    pub fn new(window_width: f64, window_height: f64) -> WebGame {
        let config = GameConfig::from_window(window_width, window_height, now_ms() as u64);
        let (canvas_size, _) = config.canvas_size();
        log::info!(
            "Hazard Snake: {}x{} grid, canvas {}",
            config.cols,
            config.rows,
            canvas_size
        );
        WebGame {
            session: Session::new(&config, Box::new(LocalStorageStore)),
            settings: Settings::load(),
            scheduler: TickScheduler::default(),
            canvas_size,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn canvas_size(&self) -> u32 {
        self.canvas_size
    }

    /// Play button
    pub fn start(&mut self) -> bool {
        self.scheduler.reset();
        self.session.start_game()
    }

    /// Keydown handler; returns true if the key was used
    pub fn key_down(&mut self, key: &str) -> bool {
        match direction_for_key(key) {
            Some(dir) => self.session.set_direction(dir),
            None => false,
        }
    }

    /// Animation frame callback. Returns true while the run is active.
    pub fn frame(&mut self) -> bool {
        if self.session.phase() != GamePhase::Running {
            return false;
        }
        let now = now_ms();
        if self.scheduler.poll(now) {
            if let TickOutcome::GameOver(cause) = self.session.tick(now as u64) {
                log::info!("Run ended: {}", cause.as_str());
            }
        }
        self.session.phase() == GamePhase::Running
    }

    /// Return-to-menu button
    pub fn return_to_menu(&mut self) -> bool {
        self.session.return_to_menu()
    }

    /// Quit button: end the run now and record its score
    pub fn quit(&mut self) -> bool {
        self.session.quit()
    }

    /// `idle`, `running` or `game-over`, for toggling screens
    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        self.session.phase().as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> u32 {
        self.session.state().score.min(u32::MAX as u64) as u32
    }

    #[wasm_bindgen(getter)]
    pub fn high_score(&self) -> u32 {
        self.session.high_score().min(u32::MAX as u64) as u32
    }

    /// HUD values as JSON
    pub fn hud_json(&self) -> String {
        serde_json::to_string(&self.session.hud()).unwrap_or_default()
    }

    /// Board snapshot as JSON
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.session.snapshot()).unwrap_or_default()
    }

    /// Rectangles to paint this frame, as JSON
    pub fn draw_list_json(&self) -> String {
        let rects = draw_list(&self.session.snapshot(), &self.settings, now_ms() as u64);
        serde_json::to_string(&rects).unwrap_or_default()
    }

    /// Events since the last call, as JSON (for sound cues)
    pub fn drain_events_json(&mut self) -> String {
        serde_json::to_string(&self.session.drain_events()).unwrap_or_default()
    }

    pub fn set_reduced_motion(&mut self, on: bool) {
        self.settings.reduced_motion = on;
        self.settings.save();
    }

    /// Display name of the active palette
    #[wasm_bindgen(getter)]
    pub fn palette(&self) -> String {
        self.settings.palette.as_str().to_string()
    }

    /// Switch palette by name; unknown names are ignored
    pub fn set_palette(&mut self, name: &str) -> bool {
        match PaletteKind::from_name(name) {
            Some(kind) => {
                self.settings.palette = kind;
                self.settings.save();
                true
            }
            None => {
                log::warn!("Unknown palette '{}'", name);
                false
            }
        }
    }

    /// Whether the page should show the score HUD during a run
    #[wasm_bindgen(getter)]
    pub fn show_hud(&self) -> bool {
        self.settings.show_hud
    }

    pub fn set_show_hud(&mut self, on: bool) {
        self.settings.show_hud = on;
        self.settings.save();
    }
}

//! Hazard Snake entry point
//!
//! The browser build starts from `platform::web`. Natively this runs a headless
//! demo: a greedy autopilot plays one run against a simulated 60 Hz frame
//! clock and the best score is kept in a JSON file.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use hazard_snake::chebyshev;
    use hazard_snake::consts::DEADLY_BLOCK_SIZE;
    use hazard_snake::highscores::FileStore;
    use hazard_snake::platform::TickScheduler;
    use hazard_snake::session::GamePhase;
    use hazard_snake::sim::{Direction, GameEvent, Snapshot};
    use hazard_snake::{GameConfig, Session};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up on runs the autopilot survives forever
    const MAX_TICKS: u64 = 20_000;
    const HIGH_SCORE_FILE: &str = "hazard_snake_highscore.json";

    /// Cost of stepping the head onto `next`; `None` if it ends the run
    fn step_cost(snap: &Snapshot, next: glam::IVec2) -> Option<i32> {
        let grid = snap.grid;
        let inside = next.x >= 0 && next.y >= 0 && next.x < grid.cols && next.y < grid.rows;
        if !inside || snap.creature.contains(&next) {
            return None;
        }
        let deadly = snap.deadly_blocks.iter().any(|b| {
            let d = next - b.pos;
            d.x >= 0 && d.y >= 0 && d.x < DEADLY_BLOCK_SIZE && d.y < DEADLY_BLOCK_SIZE
        });
        if deadly {
            return None;
        }
        let to_food = (next - snap.food).abs();
        let mut cost = to_food.x + to_food.y;
        if snap.flames.contains(&next) {
            cost += 50;
        }
        // Stay out of blast radius of anything that has yet to go off
        if snap
            .blasters
            .iter()
            .any(|b| b.warning && chebyshev(b.pos, next) <= 1)
        {
            cost += 25;
        }
        if let Some(pickup) = snap.multiplier {
            cost = cost.min(chebyshev(next, pickup) + 1);
        }
        Some(cost)
    }

    /// Cheapest heading that does not reverse or end the run
    fn steer(snap: &Snapshot) -> Option<Direction> {
        let head = *snap.creature.first()?;
        Direction::ALL
            .into_iter()
            .filter(|&dir| dir != snap.direction.opposite())
            .filter_map(|dir| step_cost(snap, head + dir.delta()).map(|cost| (cost, dir)))
            .min_by_key(|&(cost, _)| cost)
            .map(|(_, dir)| dir)
    }

    pub fn run() {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let config = GameConfig::default().with_seed(seed);
        log::info!(
            "Hazard Snake (native demo) on a {}x{} grid, seed {}",
            config.cols,
            config.rows,
            seed
        );

        let mut session = Session::new(&config, Box::new(FileStore::new(HIGH_SCORE_FILE)));
        let mut scheduler = TickScheduler::default();
        session.start_game();

        let mut frame_time = 0.0;
        let mut ticks = 0;
        while session.phase() == GamePhase::Running && ticks < MAX_TICKS {
            frame_time += FRAME_MS;
            if !scheduler.poll(frame_time) {
                continue;
            }
            if let Some(dir) = steer(&session.snapshot()) {
                session.set_direction(dir);
            }
            session.tick(frame_time as u64);
            ticks += 1;

            for event in session.drain_events() {
                match event {
                    GameEvent::FoodEaten { points, .. } => {
                        log::debug!("+{} (score {})", points, session.state().score)
                    }
                    GameEvent::Burned { penalty, .. } => log::info!("Burned for {}", penalty),
                    GameEvent::BlasterDetonated { pos } => {
                        log::debug!("Blaster went off at ({}, {})", pos.x, pos.y)
                    }
                    _ => {}
                }
            }
        }

        if session.quit() {
            log::info!("Stopped after {} ticks", MAX_TICKS);
        }

        let hud = session.hud();
        println!(
            "Run over after {} ticks: score {}, high score {}{}",
            ticks,
            hud.final_score.unwrap_or_default(),
            hud.high_score,
            if hud.new_high_score { " (new!)" } else { "" }
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}

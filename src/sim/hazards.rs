//! Hazard lifecycle: spawning, countdowns and removal
//!
//! Spawns are probabilistic and happen on food pickup. Everything timed is
//! stored as absolute timestamps and resolved in [`advance`], once per tick.

use super::grid::{Grid, Position};
use super::state::{Blaster, DeadlyBlock, Flame, GameEvent, GameState, MultiplierPickup};
use crate::consts::*;

/// Place a multiplier pickup if none is on the board and the roll succeeds
pub fn spawn_multiplier_maybe(state: &mut GameState, probability: f64, now: u64) -> bool {
    if state.multiplier.is_some() || !state.roll(probability) {
        return false;
    }
    let Some(pos) = state.sample_free(MULTIPLIER_PADDING, 1) else {
        log::debug!("Skipping multiplier spawn: no free cell");
        return false;
    };
    state.multiplier = Some(MultiplierPickup {
        pos,
        expires_at: now + MULTIPLIER_TIME,
    });
    state.record(GameEvent::MultiplierSpawned { pos });
    log::debug!("Multiplier spawned at ({}, {})", pos.x, pos.y);
    true
}

/// Place a warning blaster once the score allows it and the roll succeeds
pub fn spawn_blaster_maybe(state: &mut GameState, probability: f64, now: u64) -> bool {
    if state.score < BLASTER_MIN_SCORE || !state.roll(probability) {
        return false;
    }
    let Some(pos) = state.sample_free(BLASTER_PADDING, 1) else {
        log::debug!("Skipping blaster spawn: no free cell");
        return false;
    };
    state.blasters.push(Blaster {
        pos,
        created_at: now,
        warning: true,
    });
    state.record(GameEvent::BlasterSpawned { pos });
    log::debug!("Blaster spawned at ({}, {})", pos.x, pos.y);
    true
}

/// Place a deadly block once the score allows it.
///
/// Spawning stops while the population is over the cap, so the board never
/// holds more than `DEADLY_BLOCK_CAP + 1` blocks: the extra one is the oldest,
/// flashing its way out.
pub fn spawn_deadly_block_maybe(state: &mut GameState, probability: f64, now: u64) -> bool {
    if state.score < DEADLY_BLOCK_MIN_SCORE
        || state.deadly_blocks.len() > DEADLY_BLOCK_CAP
        || !state.roll(probability)
    {
        return false;
    }
    let Some(pos) = state.sample_free(DEADLY_BLOCK_PADDING, DEADLY_BLOCK_SIZE) else {
        log::debug!("Skipping deadly block spawn: no free cell");
        return false;
    };
    state.deadly_blocks.push(DeadlyBlock::new(pos, now));
    state.record(GameEvent::DeadlyBlockSpawned { pos });
    log::debug!("Deadly block spawned at ({}, {})", pos.x, pos.y);
    true
}

/// The 3×3 flame cluster around a detonating blaster, clipped to the grid
fn flame_cluster(grid: Grid, center: Position, now: u64) -> impl Iterator<Item = Flame> {
    (-1..=1)
        .flat_map(move |dy| (-1..=1).map(move |dx| center + Position::new(dx, dy)))
        .filter(move |&pos| grid.contains(pos))
        .map(move |pos| Flame {
            pos,
            created_at: now,
        })
}

/// Resolve every hazard timer against `now`
pub fn advance(state: &mut GameState, now: u64) {
    let grid = state.grid;

    // Blasters: detonate after the warning, retire once their flames are out
    let mut new_flames = Vec::new();
    let mut detonated = Vec::new();
    for blaster in state.blasters.iter_mut().filter(|b| b.warning) {
        if blaster.age(now) >= FLAME_WARNING {
            blaster.warning = false;
            new_flames.extend(flame_cluster(grid, blaster.pos, now));
            detonated.push(blaster.pos);
            log::debug!("Blaster detonated at ({}, {})", blaster.pos.x, blaster.pos.y);
        }
    }
    for pos in detonated {
        state.record(GameEvent::BlasterDetonated { pos });
    }
    state.flames.extend(new_flames);
    state
        .blasters
        .retain(|b| b.age(now) < FLAME_WARNING + FLAME_DURATION);
    state.flames.retain(|f| f.age(now) < FLAME_DURATION);

    // Uncollected multiplier
    if let Some(pickup) = state.multiplier {
        if now >= pickup.expires_at {
            state.multiplier = None;
            state.record(GameEvent::MultiplierMissed { pos: pickup.pos });
        }
    }

    // Over-cap deadly blocks: the oldest flashes, then goes
    if state.deadly_blocks.len() > DEADLY_BLOCK_CAP {
        let oldest = state
            .deadly_blocks
            .iter_mut()
            .min_by_key(|b| b.created_at)
            .filter(|b| b.flashing_since.is_none());
        if let Some(oldest) = oldest {
            oldest.flashing_since = Some(now);
            let pos = oldest.pos;
            state.record(GameEvent::DeadlyBlockFlashing { pos });
        }
    }
    let mut removed = Vec::new();
    state.deadly_blocks.retain(|b| match b.flashing_since {
        Some(since) if now.saturating_sub(since) >= DEADLY_BLOCK_FLASH_TIME => {
            removed.push(b.pos);
            false
        }
        _ => true,
    });
    for pos in removed {
        state.record(GameEvent::DeadlyBlockRemoved { pos });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn running_state() -> GameState {
        let mut state = GameState::new(&GameConfig {
            cols: 30,
            rows: 30,
            seed: 42,
        });
        state.start();
        state
    }

    #[test]
    fn test_multiplier_spawn_expires_from_spawn_time() {
        let mut state = running_state();
        assert!(spawn_multiplier_maybe(&mut state, 1.0, 1_000));
        let pickup = state.multiplier.unwrap();
        assert_eq!(pickup.expires_at, 1_000 + MULTIPLIER_TIME);
        assert!(state.creature.iter().all(|s| crate::chebyshev(s, pickup.pos) > 1));

        // Only one at a time
        assert!(!spawn_multiplier_maybe(&mut state, 1.0, 2_000));

        advance(&mut state, 1_000 + MULTIPLIER_TIME - 1);
        assert!(state.multiplier.is_some());
        advance(&mut state, 1_000 + MULTIPLIER_TIME);
        assert!(state.multiplier.is_none());
        assert!(
            state
                .events
                .contains(&GameEvent::MultiplierMissed { pos: pickup.pos })
        );
    }

    #[test]
    fn test_zero_probability_never_spawns() {
        let mut state = running_state();
        state.score = 100;
        for _ in 0..50 {
            assert!(!spawn_multiplier_maybe(&mut state, 0.0, 0));
            assert!(!spawn_blaster_maybe(&mut state, 0.0, 0));
            assert!(!spawn_deadly_block_maybe(&mut state, 0.0, 0));
        }
    }

    #[test]
    fn test_score_gates() {
        let mut state = running_state();
        state.score = BLASTER_MIN_SCORE - 1;
        assert!(!spawn_blaster_maybe(&mut state, 1.0, 0));
        state.score = BLASTER_MIN_SCORE;
        assert!(spawn_blaster_maybe(&mut state, 1.0, 0));
        assert!(state.blasters[0].warning);
        assert!(!spawn_deadly_block_maybe(&mut state, 1.0, 0));
        state.score = DEADLY_BLOCK_MIN_SCORE;
        assert!(spawn_deadly_block_maybe(&mut state, 1.0, 0));
        assert!(!state.deadly_blocks[0].flashing());
    }

    #[test]
    fn test_blaster_lifecycle() {
        let mut state = running_state();
        state.blasters.push(Blaster {
            pos: Position::new(0, 5),
            created_at: 1_000,
            warning: true,
        });

        advance(&mut state, 1_000 + FLAME_WARNING - 1);
        assert!(state.blasters[0].warning);
        assert!(state.flames.is_empty());

        let detonated_at = 1_000 + FLAME_WARNING;
        advance(&mut state, detonated_at);
        assert!(!state.blasters[0].warning);
        // Left column is clipped: 2 columns × 3 rows
        assert_eq!(state.flames.len(), 6);
        assert!(state.flames.iter().all(|f| f.created_at == detonated_at));
        assert!(state.flames.iter().any(|f| f.pos == Position::new(0, 5)));
        assert!(state.flames.iter().all(|f| f.pos.x >= 0));

        // Detonation happens once
        advance(&mut state, detonated_at + 100);
        assert_eq!(state.flames.len(), 6);

        advance(&mut state, detonated_at + FLAME_DURATION - 1);
        assert_eq!(state.blasters.len(), 1);
        assert_eq!(state.flames.len(), 6);

        advance(&mut state, 1_000 + FLAME_WARNING + FLAME_DURATION);
        assert!(state.blasters.is_empty());
        assert!(state.flames.is_empty());
    }

    #[test]
    fn test_late_tick_detonates_and_retires_together() {
        let mut state = running_state();
        state.blasters.push(Blaster {
            pos: Position::new(10, 20),
            created_at: 0,
            warning: true,
        });
        advance(&mut state, FLAME_WARNING + FLAME_DURATION + 500);
        assert!(state.blasters.is_empty());
        // Fresh flames still burn for their full duration
        assert_eq!(state.flames.len(), 9);
        assert!(
            state
                .events
                .contains(&GameEvent::BlasterDetonated { pos: Position::new(10, 20) })
        );
    }

    #[test]
    fn test_oldest_deadly_block_flashes_then_goes() {
        let mut state = running_state();
        for i in 0..=DEADLY_BLOCK_CAP {
            state
                .deadly_blocks
                .push(DeadlyBlock::new(Position::new(i as i32 * 4, 0), 100 + i as u64));
        }
        // Selection goes by timestamp, not by position in the list
        state.deadly_blocks[3].created_at = 50;
        let oldest_pos = state.deadly_blocks[3].pos;

        advance(&mut state, 2_000);
        let flashing: Vec<_> = state.deadly_blocks.iter().filter(|b| b.flashing()).collect();
        assert_eq!(flashing.len(), 1);
        assert_eq!(flashing[0].pos, oldest_pos);
        assert_eq!(flashing[0].flashing_since, Some(2_000));

        // Flash countdown is measured from when flashing began, not creation
        advance(&mut state, 2_000 + DEADLY_BLOCK_FLASH_TIME - 1);
        assert_eq!(state.deadly_blocks.len(), DEADLY_BLOCK_CAP + 1);
        assert_eq!(state.deadly_blocks.iter().filter(|b| b.flashing()).count(), 1);

        advance(&mut state, 2_000 + DEADLY_BLOCK_FLASH_TIME);
        assert_eq!(state.deadly_blocks.len(), DEADLY_BLOCK_CAP);
        assert!(state.deadly_blocks.iter().all(|b| !b.flashing()));
        assert!(
            state
                .events
                .contains(&GameEvent::DeadlyBlockRemoved { pos: oldest_pos })
        );
    }

    #[test]
    fn test_deadly_block_population_bounded() {
        let mut state = running_state();
        state.score = DEADLY_BLOCK_MIN_SCORE;
        let mut now = 0;
        for _ in 0..200 {
            spawn_deadly_block_maybe(&mut state, 1.0, now);
            advance(&mut state, now);
            assert!(state.deadly_blocks.len() <= DEADLY_BLOCK_CAP + 1);
            assert!(state.deadly_blocks.iter().filter(|b| b.flashing()).count() <= 1);
            now += TICK_INTERVAL_MS;
        }
    }

    #[test]
    fn test_under_cap_nothing_flashes() {
        let mut state = running_state();
        for i in 0..DEADLY_BLOCK_CAP {
            state
                .deadly_blocks
                .push(DeadlyBlock::new(Position::new(i as i32 * 4, 0), i as u64));
        }
        advance(&mut state, 10_000);
        assert!(state.deadly_blocks.iter().all(|b| !b.flashing()));
    }
}

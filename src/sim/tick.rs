//! Simulation tick
//!
//! One call advances the creature by a cell and resolves every collision
//! class in a fixed order. The function is synchronous and deterministic for
//! a given `(state, input, now)`; scheduling the next call is the caller's job.

use super::grid::Direction;
use super::hazards;
use super::state::{GameEvent, GameOverCause, GameState};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Heading requested since the previous tick (last writer wins)
    pub direction: Option<Direction>,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The run is not active; nothing changed
    Halted,
    /// The creature moved and the run continues
    Advanced,
    /// This tick ended the run
    GameOver(GameOverCause),
}

/// Advance the game state by one tick at wall-clock time `now` (ms)
pub fn tick(state: &mut GameState, input: &TickInput, now: u64) -> TickOutcome {
    if !state.running {
        return TickOutcome::Halted;
    }
    if let Some(dir) = input.direction {
        state.set_pending_direction(dir);
    }
    state.time_ticks += 1;

    // Commit the heading; a reversal is never applied even if one got queued
    if state.pending_direction != state.direction.opposite() {
        state.direction = state.pending_direction;
    }

    let head = state.creature.head() + state.direction.delta();

    if !state.grid.contains(head) {
        return finish(state, GameOverCause::Wall);
    }
    if state.creature.contains(head) {
        return finish(state, GameOverCause::SelfCollision);
    }

    // Flames hurt but do not kill
    if state.flames.iter().any(|f| f.pos == head) {
        let before = state.score;
        state.score = state.score.saturating_sub(FLAME_PENALTY);
        let penalty = before - state.score;
        state.record(GameEvent::Burned { pos: head, penalty });
    }

    if state.deadly_blocks.iter().any(|b| b.covers(head)) {
        return finish(state, GameOverCause::DeadlyBlock);
    }

    state.creature.push_head(head);

    if head == state.food {
        let points = if state.boost_active() { 2 } else { 1 };
        state.score += points;
        state.record(GameEvent::FoodEaten { pos: head, points });

        match state.place_food() {
            Some(pos) => state.food = pos,
            None => return finish(state, GameOverCause::BoardFull),
        }

        // Independent rolls; several hazards may appear on one pickup
        let chances = state.spawn_chances;
        hazards::spawn_multiplier_maybe(state, chances.multiplier, now);
        if state.score >= BLASTER_MIN_SCORE {
            hazards::spawn_blaster_maybe(state, chances.blaster, now);
        }
        if state.score >= DEADLY_BLOCK_MIN_SCORE {
            hazards::spawn_deadly_block_maybe(state, chances.deadly_block, now);
        }
    } else {
        state.creature.drop_tail();
    }

    if let Some(pickup) = state.multiplier {
        if pickup.pos == head {
            let until = now + MULTIPLIER_TIME;
            state.boost_until = Some(until);
            state.multiplier = None;
            state.record(GameEvent::MultiplierCollected { until });
        }
    }

    if let Some(until) = state.boost_until {
        if now > until {
            state.boost_until = None;
            state.record(GameEvent::BoostExpired);
        }
    }

    hazards::advance(state, now);

    TickOutcome::Advanced
}

fn finish(state: &mut GameState, cause: GameOverCause) -> TickOutcome {
    state.running = false;
    state.game_over = Some(cause);
    let score = state.score;
    state.record(GameEvent::GameOver { cause, score });
    log::info!(
        "Game over ({}) after {} ticks with score {}",
        cause.as_str(),
        state.time_ticks,
        state.score
    );
    TickOutcome::GameOver(cause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::grid::Position;
    use crate::sim::state::{Creature, DeadlyBlock, Flame, MultiplierPickup, SpawnChances};
    use proptest::prelude::*;

    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new(&GameConfig {
            cols: 20,
            rows: 20,
            seed,
        });
        state.start();
        // Keep food out of the way unless a test places it
        state.food = Position::new(0, 19);
        state
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_no_input_runs_into_top_wall() {
        let mut state = running_state(1);
        let start = state.creature.head();
        let mut now = 0;
        for step in 1..=start.y {
            now += TICK_INTERVAL_MS;
            assert_eq!(tick(&mut state, &idle(), now), TickOutcome::Advanced);
            assert_eq!(state.creature.head(), start - Position::new(0, step));
            assert_eq!(state.creature.len(), 1);
        }
        assert_eq!(state.creature.head().y, 0);

        now += TICK_INTERVAL_MS;
        assert_eq!(
            tick(&mut state, &idle(), now),
            TickOutcome::GameOver(GameOverCause::Wall)
        );
        assert!(!state.running);
        assert_eq!(state.score, 0);
        // No mutation on the terminal tick
        assert_eq!(state.creature.head().y, 0);
        assert_eq!(tick(&mut state, &idle(), now + 120), TickOutcome::Halted);
    }

    #[test]
    fn test_eat_food_scores_one_and_grows() {
        let mut state = running_state(2);
        let head = state.creature.head();
        state.food = head + Position::new(0, -1);

        tick(&mut state, &idle(), 120);
        assert_eq!(state.score, 1);
        assert_eq!(state.creature.len(), 2);
        assert_ne!(state.food, head + Position::new(0, -1));
        assert!(!state.creature.contains(state.food));
        assert!(state.grid.contains(state.food));
        assert!(
            state
                .events
                .contains(&GameEvent::FoodEaten { pos: head + Position::new(0, -1), points: 1 })
        );
    }

    #[test]
    fn test_eat_food_with_boost_scores_two() {
        let mut state = running_state(3);
        state.boost_until = Some(5_000);
        state.food = state.creature.head() + Position::new(0, -1);
        tick(&mut state, &idle(), 120);
        assert_eq!(state.score, 2);
        assert!(state.boost_active());
    }

    #[test]
    fn test_boost_expires_after_deadline() {
        let mut state = running_state(4);
        state.boost_until = Some(1_000);
        tick(&mut state, &idle(), 1_000);
        assert!(state.boost_active());
        tick(&mut state, &idle(), 1_001);
        assert!(!state.boost_active());
        assert!(state.events.contains(&GameEvent::BoostExpired));
    }

    #[test]
    fn test_collect_multiplier_starts_boost() {
        let mut state = running_state(5);
        let target = state.creature.head() + Position::new(0, -1);
        state.multiplier = Some(MultiplierPickup {
            pos: target,
            expires_at: 99_999,
        });
        tick(&mut state, &idle(), 2_000);
        assert!(state.multiplier.is_none());
        assert_eq!(state.boost_until, Some(2_000 + MULTIPLIER_TIME));
    }

    #[test]
    fn test_flame_costs_two_points() {
        let mut state = running_state(6);
        state.score = 5;
        let target = state.creature.head() + Position::new(0, -1);
        state.flames.push(Flame {
            pos: target,
            created_at: 100,
        });
        assert_eq!(tick(&mut state, &idle(), 200), TickOutcome::Advanced);
        assert_eq!(state.score, 3);
        assert!(state.running);
        assert_eq!(state.creature.head(), target);
    }

    #[test]
    fn test_flame_penalty_floors_at_zero() {
        let mut state = running_state(7);
        state.score = 1;
        let target = state.creature.head() + Position::new(0, -1);
        state.flames.push(Flame {
            pos: target,
            created_at: 100,
        });
        tick(&mut state, &idle(), 200);
        assert_eq!(state.score, 0);
        assert!(state.events.contains(&GameEvent::Burned { pos: target, penalty: 1 }));
    }

    #[test]
    fn test_deadly_block_ends_run() {
        let mut state = running_state(8);
        state.score = 40;
        let head = state.creature.head();
        // Head enters the bottom-right cell of the footprint
        state
            .deadly_blocks
            .push(DeadlyBlock::new(head + Position::new(-1, -2), 0));
        let outcome = tick(&mut state, &idle(), 120);
        assert_eq!(outcome, TickOutcome::GameOver(GameOverCause::DeadlyBlock));
        assert!(!state.running);
        assert_eq!(state.creature.head(), head);
        assert_eq!(state.score, 40);
    }

    #[test]
    fn test_self_collision_ends_run() {
        let mut state = running_state(9);
        // A hook shape: heading left into the body at (4, 5)
        state.creature = Creature::from_segments([
            Position::new(5, 5),
            Position::new(5, 4),
            Position::new(4, 4),
            Position::new(4, 5),
            Position::new(4, 6),
        ]);
        state.direction = Direction::Down;
        state.pending_direction = Direction::Left;
        assert_eq!(
            tick(&mut state, &idle(), 120),
            TickOutcome::GameOver(GameOverCause::SelfCollision)
        );
    }

    #[test]
    fn test_queued_reversal_is_never_applied() {
        let mut state = running_state(10);
        state.pending_direction = Direction::Down;
        let head = state.creature.head();
        tick(&mut state, &idle(), 120);
        assert_eq!(state.direction, Direction::Up);
        assert_eq!(state.creature.head(), head + Position::new(0, -1));
    }

    #[test]
    fn test_input_turns_creature() {
        let mut state = running_state(11);
        let head = state.creature.head();
        let input = TickInput {
            direction: Some(Direction::Right),
        };
        tick(&mut state, &input, 120);
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.creature.head(), head + Position::new(1, 0));
    }

    #[test]
    fn test_filling_the_board_ends_run() {
        let mut state = GameState::new(&GameConfig {
            cols: 2,
            rows: 1,
            seed: 1,
        });
        state.start();
        state.creature = Creature::new(Position::new(1, 0));
        state.food = Position::new(0, 0);
        state.direction = Direction::Left;
        state.pending_direction = Direction::Left;
        assert_eq!(
            tick(&mut state, &idle(), 120),
            TickOutcome::GameOver(GameOverCause::BoardFull)
        );
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_food_placed_inside_clearance_on_crowded_board() {
        // The block's clearance ring covers the whole board, yet 30 cells are empty
        let mut state = GameState::new(&GameConfig {
            cols: 6,
            rows: 6,
            seed: 3,
        });
        state.start();
        state.spawn_chances = SpawnChances::NEVER;
        state.score = 20;
        state.deadly_blocks.push(DeadlyBlock::new(Position::new(2, 2), 0));
        state.creature = Creature::new(Position::new(5, 5));
        state.food = Position::new(5, 4);

        assert_eq!(tick(&mut state, &idle(), 120), TickOutcome::Advanced);
        assert!(state.running);
        assert_eq!(state.score, 21);
        assert!(state.grid.contains(state.food));
        assert!(!state.creature.contains(state.food));
        assert!(!state.deadly_blocks[0].covers(state.food));
    }

    /// Eat the food directly above the head with the given score beforehand
    fn eat_with_score(score: u64, chances: SpawnChances) -> GameState {
        let mut state = running_state(12);
        state.spawn_chances = chances;
        state.score = score;
        state.food = state.creature.head() + Position::new(0, -1);
        assert_eq!(tick(&mut state, &idle(), 1_000), TickOutcome::Advanced);
        assert_eq!(state.score, score + 1);
        state
    }

    #[test]
    fn test_pickup_below_thresholds_spawns_no_hazards() {
        for score in 0..BLASTER_MIN_SCORE - 1 {
            let state = eat_with_score(score, SpawnChances::ALWAYS);
            assert!(state.blasters.is_empty());
            assert!(state.deadly_blocks.is_empty());
            assert!(state.multiplier.is_some());
        }
    }

    #[test]
    fn test_pickup_reaching_ten_rolls_for_blaster() {
        let state = eat_with_score(BLASTER_MIN_SCORE - 1, SpawnChances::ALWAYS);
        assert_eq!(state.blasters.len(), 1);
        assert!(state.blasters[0].warning);
        assert_eq!(state.blasters[0].created_at, 1_000);
        assert!(state.deadly_blocks.is_empty());
        let head = state.creature.head();
        assert!(crate::chebyshev(head, state.blasters[0].pos) > BLASTER_PADDING);
    }

    #[test]
    fn test_pickup_can_spawn_every_hazard_at_once() {
        let state = eat_with_score(DEADLY_BLOCK_MIN_SCORE - 1, SpawnChances::ALWAYS);
        assert!(state.multiplier.is_some());
        assert_eq!(state.blasters.len(), 1);
        assert_eq!(state.deadly_blocks.len(), 1);
        for event in [
            GameEvent::MultiplierSpawned {
                pos: state.multiplier.unwrap().pos,
            },
            GameEvent::BlasterSpawned {
                pos: state.blasters[0].pos,
            },
            GameEvent::DeadlyBlockSpawned {
                pos: state.deadly_blocks[0].pos,
            },
        ] {
            assert!(state.events.contains(&event));
        }
    }

    #[test]
    fn test_failed_rolls_spawn_nothing() {
        let state = eat_with_score(30, SpawnChances::NEVER);
        assert!(state.multiplier.is_none());
        assert!(state.blasters.is_empty());
        assert!(state.deadly_blocks.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut a = running_state(99);
        let mut b = running_state(99);
        let turns = [
            Direction::Left,
            Direction::Up,
            Direction::Right,
            Direction::Down,
        ];
        for i in 0..40u64 {
            let input = TickInput {
                direction: Some(turns[(i / 3) as usize % 4]),
            };
            tick(&mut a, &input, i * TICK_INTERVAL_MS);
            tick(&mut b, &input, i * TICK_INTERVAL_MS);
        }
        assert_eq!(a.creature, b.creature);
        assert_eq!(a.food, b.food);
        assert_eq!(a.score, b.score);
        assert_eq!(a.running, b.running);
    }

    fn direction_strategy() -> impl Strategy<Value = Option<Direction>> {
        prop_oneof![
            Just(None),
            Just(Some(Direction::Up)),
            Just(Some(Direction::Down)),
            Just(Some(Direction::Left)),
            Just(Some(Direction::Right)),
        ]
    }

    proptest! {
        #[test]
        fn prop_tick_invariants(
            seed in any::<u64>(),
            inputs in prop::collection::vec(direction_strategy(), 1..200),
        ) {
            let mut state = GameState::new(&GameConfig { cols: 16, rows: 16, seed });
            state.start();
            let mut now = 0;
            for dir in inputs {
                if !state.running {
                    break;
                }
                now += TICK_INTERVAL_MS;
                let prev_head = state.creature.head();
                let prev_len = state.creature.len();
                let prev_dir = state.direction;
                let prev_food = state.food;

                let outcome = tick(&mut state, &TickInput { direction: dir }, now);

                prop_assert_ne!(state.direction, prev_dir.opposite());
                if outcome == TickOutcome::Advanced {
                    prop_assert_eq!(state.creature.head(), prev_head + state.direction.delta());
                    if state.creature.head() == prev_food {
                        prop_assert_eq!(state.creature.len(), prev_len + 1);
                        // Flames from a detonation later in the same tick may land on food
                        let occupied = state.creature.contains(state.food)
                            || state.flames.iter().any(|f| f.pos == state.food && f.created_at < now)
                            || state.blasters.iter().any(|b| b.pos == state.food)
                            || state.deadly_blocks.iter().any(|b| b.covers(state.food))
                            || state.multiplier.map(|m| m.pos) == Some(state.food);
                        prop_assert!(!occupied);
                    } else {
                        prop_assert_eq!(state.creature.len(), prev_len);
                    }
                }
                prop_assert!(state.deadly_blocks.len() <= DEADLY_BLOCK_CAP + 1);
            }
        }
    }
}

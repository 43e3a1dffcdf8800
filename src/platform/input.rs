//! Keyboard translation
//!
//! Key names follow `KeyboardEvent.key`. Arrow keys and WASD both steer.

use crate::sim::Direction;

/// Heading for a key, or `None` for keys the game ignores
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "Up" => Some(Direction::Up),
        "ArrowDown" | "Down" => Some(Direction::Down),
        "ArrowLeft" | "Left" => Some(Direction::Left),
        "ArrowRight" | "Right" => Some(Direction::Right),
        _ if key.len() == 1 => match key.to_ascii_lowercase().as_str() {
            "w" => Some(Direction::Up),
            "s" => Some(Direction::Down),
            "a" => Some(Direction::Left),
            "d" => Some(Direction::Right),
            _ => None,
        },
        _ => None,
    }
}

//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key names to headings)
//! - Tick scheduling against frame callbacks
//! - Browser bindings (wasm32 only)

pub mod input;
pub mod scheduler;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::direction_for_key;
pub use scheduler::TickScheduler;

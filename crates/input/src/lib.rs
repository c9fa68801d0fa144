//! Interaction: pointer events resolved into splits.
//!
//! # Invariants
//! - Exactly one interaction mode is active at a time; unknown mode names
//!   are rejected, never defaulted.
//! - An accepted hit records the cooldown before the split is attempted.
//! - The scene adapter is re-synced after every reset and every split.

pub mod controller;
pub mod mode;
pub mod pointer;
pub mod resolver;
#[cfg(test)]
mod testing;

pub use controller::Controller;
pub use mode::InteractionMode;
pub use pointer::PointerEvent;
pub use resolver::{HitOutcome, InteractionResolver};

pub fn crate_info() -> &'static str {
    "splitcube-input v0.1.0"
}

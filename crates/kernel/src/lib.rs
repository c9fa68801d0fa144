//! Splitcube Kernel: the authoritative volume set, split operations,
//! per-volume debounce and per-frame animation.
//!
//! # Invariants
//! - A split replaces exactly one parent with exactly eight children that
//!   tile the parent's bounding cube.
//! - Terminal volumes (too small or too deep) never split.
//! - All state mutations flow through explicit operations and are logged.

pub mod animator;
pub mod config;
pub mod cooldown;
pub mod engine;
pub mod volume;

pub use animator::{Animator, VolumePose};
pub use config::{ConfigError, EngineConfig, MIN_DEBOUNCE_WINDOW};
pub use cooldown::CooldownLedger;
pub use engine::{EngineEvent, SceneDelta, SplitOutcome, SubdivisionEngine};
pub use volume::{Pose, Volume, VolumeSet};

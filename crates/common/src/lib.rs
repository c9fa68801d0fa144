//! Shared value types for the splitcube workspace.
//!
//! # Invariants
//! - Volume ids are never reused within one engine lifetime.
//! - Timestamps are monotonic milliseconds supplied by the host.

pub mod geometry;
pub mod types;

pub use geometry::{Aabb, Ray};
pub use types::{Timestamp, VolumeId};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Unique identifier for a volume.
///
/// Ids are handed out by the engine from a monotonic counter, so a value is
/// never observed twice even across resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VolumeId(pub u64);

impl fmt::Display for VolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Host-supplied clock reading in milliseconds.
///
/// The engine never reads a clock itself; every operation that needs time
/// takes a `Timestamp` so tests can drive time explicitly.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Self = Self(0);

    pub fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Seconds since the host epoch, for animation phase. Kept in `f64` so
    /// epoch-scale clocks still resolve milliseconds.
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 * 0.001
    }

    /// Time elapsed since `earlier`. Clamps to zero if the clock went backwards.
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }

    pub fn plus(self, d: Duration) -> Self {
        Self(self.0.saturating_add(d.as_millis() as u64))
    }
}

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Sensitivity at which the configured debounce window applies unscaled.
pub const DEFAULT_SENSITIVITY: f32 = 5.0;

/// Shortest window sensitivity scaling can produce.
pub const MIN_DEBOUNCE_WINDOW: Duration = Duration::from_millis(1);

/// Configuration misuse surfaced to the host.
///
/// Every other invalid operation in the engine is a silent policy no-op;
/// only these are reported.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown interaction mode {0:?} (expected click, hover or motion)")]
    UnknownMode(String),
    #[error("base size must be finite and positive, got {0}")]
    InvalidBaseSize(f32),
    #[error("minimum size must be finite and non-negative, got {0}")]
    InvalidMinSize(f32),
    #[error("sensitivity must be finite and positive, got {0}")]
    InvalidSensitivity(f32),
    #[error("debounce window must be non-zero")]
    InvalidDebounce,
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tunables for the subdivision engine and animator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Edge length of the seed volume created by `reset`.
    pub base_size: f32,
    /// Volumes at or below this size are terminal.
    pub min_size: f32,
    /// Volumes at or above this generation are terminal.
    pub max_generation: u32,
    /// Debounce window at default sensitivity.
    pub debounce_ms: u64,
    /// Scales the debounce window; higher is more eager.
    pub sensitivity: f32,
    /// Full range of the seed's per-axis angular velocity (radians per tick).
    pub seed_spin: f32,
    /// Full range of a child's per-axis angular velocity (radians per tick).
    pub child_spin: f32,
    /// Hue advance per generation.
    pub hue_step: f32,
    /// Maximum random hue jitter added at creation.
    pub hue_jitter: f32,
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_size: 20.0,
            min_size: 0.1,
            max_generation: 4,
            debounce_ms: 200,
            sensitivity: DEFAULT_SENSITIVITY,
            seed_spin: 0.02,
            child_spin: 0.04,
            hue_step: 0.15,
            hue_jitter: 0.3,
            bob_amplitude: 0.3,
            bob_frequency: 1.0,
        }
    }
}

impl EngineConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_base_size(self.base_size)?;
        if !self.min_size.is_finite() || self.min_size < 0.0 {
            return Err(ConfigError::InvalidMinSize(self.min_size));
        }
        check_sensitivity(self.sensitivity)?;
        if self.debounce_ms == 0 {
            return Err(ConfigError::InvalidDebounce);
        }
        for (name, value) in [
            ("seed_spin", self.seed_spin),
            ("child_spin", self.child_spin),
            ("hue_step", self.hue_step),
            ("hue_jitter", self.hue_jitter),
            ("bob_amplitude", self.bob_amplitude),
            ("bob_frequency", self.bob_frequency),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }
        Ok(())
    }

    /// Debounce window after sensitivity scaling, never shorter than
    /// [`MIN_DEBOUNCE_WINDOW`].
    pub fn debounce_window(&self) -> Duration {
        let scale = f64::from(DEFAULT_SENSITIVITY) / f64::from(self.sensitivity);
        let micros = (self.debounce_ms as f64 * 1000.0 * scale).round() as u64;
        Duration::from_micros(micros).max(MIN_DEBOUNCE_WINDOW)
    }

    pub fn is_terminal(&self, size: f32, generation: u32) -> bool {
        size <= self.min_size || generation >= self.max_generation
    }
}

pub(crate) fn check_base_size(value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidBaseSize(value))
    }
}

pub(crate) fn check_sensitivity(value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSensitivity(value))
    }
}

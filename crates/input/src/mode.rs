use splitcube_kernel::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Which pointer gestures trigger a split.
///
/// `Hover` and `Motion` resolve hits identically; the distinction is which
/// raw events the host chooses to forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InteractionMode {
    /// Press and release over a volume.
    #[default]
    Click,
    /// Pointer enters a volume.
    Hover,
    /// Pointer moves across volumes.
    Motion,
}

impl InteractionMode {
    pub const ALL: [Self; 3] = [Self::Click, Self::Hover, Self::Motion];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Hover => "hover",
            Self::Motion => "motion",
        }
    }

    /// True if pointer moves are resolved in this mode.
    pub fn resolves_moves(self) -> bool {
        match self {
            Self::Click => false,
            Self::Hover | Self::Motion => true,
        }
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "click" => Ok(Self::Click),
            "hover" => Ok(Self::Hover),
            "motion" => Ok(Self::Motion),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

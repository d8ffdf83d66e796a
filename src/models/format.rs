//! Tournament format descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Overall tournament format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    SingleElimination,
    #[default]
    DoubleElimination,
    RoundRobin,
}

impl Format {
    /// Whether elimination brackets of this format carry a losers bracket.
    pub fn includes_losers(&self) -> bool {
        matches!(self, Format::DoubleElimination)
    }
}

impl FromStr for Format {
    type Err = String;

    /// Lenient parse by prefix: "Single Elimination", "double", "round-robin" all work.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower.starts_with("single") {
            Ok(Format::SingleElimination)
        } else if lower.starts_with("double") {
            Ok(Format::DoubleElimination)
        } else if lower.starts_with("round") {
            Ok(Format::RoundRobin)
        } else {
            Err(format!("unknown tournament format: {s}"))
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::SingleElimination => write!(f, "single-elimination"),
            Format::DoubleElimination => write!(f, "double-elimination"),
            Format::RoundRobin => write!(f, "round-robin"),
        }
    }
}

/// Bracket played after a round-robin group stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayoffMode {
    #[default]
    None,
    SingleElimination,
    DoubleElimination,
}

impl PlayoffMode {
    /// Parse by prefix, falling back to `None` for anything unrecognised.
    pub fn parse_lenient(s: &str) -> Self {
        let lower = s.trim().to_lowercase();
        if lower.starts_with("double") {
            PlayoffMode::DoubleElimination
        } else if lower.starts_with("single") {
            PlayoffMode::SingleElimination
        } else {
            PlayoffMode::None
        }
    }

    pub fn includes_losers(&self) -> bool {
        matches!(self, PlayoffMode::DoubleElimination)
    }
}

impl fmt::Display for PlayoffMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayoffMode::None => write!(f, "none"),
            PlayoffMode::SingleElimination => write!(f, "single-elimination"),
            PlayoffMode::DoubleElimination => write!(f, "double-elimination"),
        }
    }
}

/// Group-stage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRobinSettings {
    #[serde(default = "default_groups")]
    pub groups: usize,

    #[serde(default = "default_advance_per_group")]
    pub advance_per_group: usize,

    #[serde(default)]
    pub playoffs: PlayoffMode,

    #[serde(default = "default_group_best_of")]
    pub best_of: u32,
}

fn default_groups() -> usize {
    4
}

fn default_advance_per_group() -> usize {
    2
}

fn default_group_best_of() -> u32 {
    3
}

impl Default for RoundRobinSettings {
    fn default() -> Self {
        Self {
            groups: default_groups(),
            advance_per_group: default_advance_per_group(),
            playoffs: PlayoffMode::default(),
            best_of: default_group_best_of(),
        }
    }
}

impl RoundRobinSettings {
    /// Clamp settings into a usable range.
    pub fn normalize(mut self) -> Self {
        self.groups = self.groups.max(1);
        self.best_of = self.best_of.max(1);
        self
    }
}

/// Format tag plus any format-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSpec {
    pub format: Format,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_robin: Option<RoundRobinSettings>,
}

impl FormatSpec {
    pub fn single_elimination() -> Self {
        Self {
            format: Format::SingleElimination,
            round_robin: None,
        }
    }

    pub fn double_elimination() -> Self {
        Self {
            format: Format::DoubleElimination,
            round_robin: None,
        }
    }

    pub fn round_robin(settings: RoundRobinSettings) -> Self {
        Self {
            format: Format::RoundRobin,
            round_robin: Some(settings.normalize()),
        }
    }

    /// Round-robin settings, defaulted when the format is round robin but none were given.
    pub fn round_robin_settings(&self) -> RoundRobinSettings {
        self.round_robin.clone().unwrap_or_default().normalize()
    }
}

//! Match model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{BracketKind, EntrantId, MatchCoord, MatchId, SourceSpec};

/// Whether a match has been decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Complete,
}

/// One side of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn index(&self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    pub fn other(&self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" => Ok(Side::A),
            "b" => Ok(Side::B),
            _ => Err(format!("unknown side: {s} (expected a or b)")),
        }
    }
}

/// A single match between two sources.
///
/// `sources` are fixed when the bracket is built; only the result fields
/// change as the match is played. A match never points at the matches that
/// consume its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Coordinate-derived identifier, e.g. `W1-M1`
    pub id: MatchId,

    pub bracket: BracketKind,

    /// Zero-based round (group index for group matches)
    pub round: usize,

    /// Zero-based position within the round
    pub index: usize,

    pub sources: [SourceSpec; 2],

    #[serde(default)]
    pub scores: [u32; 2],

    #[serde(default)]
    pub status: MatchStatus,

    #[serde(default)]
    pub winner_id: Option<EntrantId>,

    #[serde(default)]
    pub loser_id: Option<EntrantId>,

    /// Side awarded the match without playing
    #[serde(default)]
    pub walkover: Option<Side>,

    /// Explicit best-of; None falls back to the configured round defaults
    #[serde(default)]
    pub best_of: Option<u32>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Vertical placement hint carried over from templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_slot: Option<f64>,
}

impl Match {
    /// Create a pending match at the given coordinate.
    pub fn new(coord: MatchCoord, a: SourceSpec, b: SourceSpec) -> Self {
        Self {
            id: coord.match_id(),
            bracket: coord.bracket,
            round: coord.round,
            index: coord.index,
            sources: [a, b],
            scores: [0, 0],
            status: MatchStatus::Pending,
            winner_id: None,
            loser_id: None,
            walkover: None,
            best_of: None,
            updated_at: None,
            display_slot: None,
        }
    }

    /// Builder method to set an explicit best-of.
    pub fn with_best_of(mut self, best_of: u32) -> Self {
        self.best_of = Some(best_of);
        self
    }

    /// Builder method to set the display slot.
    pub fn with_display_slot(mut self, slot: Option<f64>) -> Self {
        self.display_slot = slot;
        self
    }

    pub fn coord(&self) -> MatchCoord {
        MatchCoord::new(self.bracket, self.round, self.index)
    }

    pub fn is_complete(&self) -> bool {
        self.status == MatchStatus::Complete
    }

    /// True once anything about the match outcome has been recorded.
    pub fn has_result(&self) -> bool {
        self.is_complete()
            || self.winner_id.is_some()
            || self.walkover.is_some()
            || self.scores != [0, 0]
    }

    /// True when neither side is a structurally empty slot.
    pub fn has_both_sides(&self) -> bool {
        !self.sources[0].is_empty() && !self.sources[1].is_empty()
    }

    /// Forget any recorded result.
    pub fn reset(&mut self) {
        self.scores = [0, 0];
        self.status = MatchStatus::Pending;
        self.winner_id = None;
        self.loser_id = None;
        self.walkover = None;
        self.updated_at = None;
    }
}

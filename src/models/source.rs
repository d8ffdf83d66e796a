//! Match sources: where each side of a match gets its participant from.
//!
//! A source never holds the match it refers to, only its coordinates, so
//! matches can be rebuilt or reordered without invalidating references.
//! Results propagate by being read through these sources, never pushed.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::MatchId;

/// Which part of the tournament a match belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketKind {
    Winners,
    Losers,
    Finals,
    Group,
}

impl BracketKind {
    /// Single-letter prefix used in match ids.
    pub fn prefix(&self) -> char {
        match self {
            BracketKind::Winners => 'W',
            BracketKind::Losers => 'L',
            BracketKind::Finals => 'F',
            BracketKind::Group => 'G',
        }
    }

    fn from_prefix(c: char) -> Option<Self> {
        match c {
            'W' => Some(BracketKind::Winners),
            'L' => Some(BracketKind::Losers),
            'F' => Some(BracketKind::Finals),
            'G' => Some(BracketKind::Group),
            _ => None,
        }
    }
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::Winners => write!(f, "winners"),
            BracketKind::Losers => write!(f, "losers"),
            BracketKind::Finals => write!(f, "finals"),
            BracketKind::Group => write!(f, "group"),
        }
    }
}

/// Zero-based position of a match. For group matches `round` is the group index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchCoord {
    pub bracket: BracketKind,
    pub round: usize,
    pub index: usize,
}

impl MatchCoord {
    pub fn new(bracket: BracketKind, round: usize, index: usize) -> Self {
        Self {
            bracket,
            round,
            index,
        }
    }

    pub fn winners(round: usize, index: usize) -> Self {
        Self::new(BracketKind::Winners, round, index)
    }

    pub fn losers(round: usize, index: usize) -> Self {
        Self::new(BracketKind::Losers, round, index)
    }

    pub fn finals() -> Self {
        Self::new(BracketKind::Finals, 0, 0)
    }

    pub fn group(group: usize, index: usize) -> Self {
        Self::new(BracketKind::Group, group, index)
    }

    /// The match id for this coordinate, e.g. `W1-M2`.
    pub fn match_id(&self) -> MatchId {
        MatchId::new(format!(
            "{}{}-M{}",
            self.bracket.prefix(),
            self.round + 1,
            self.index + 1
        ))
    }

    /// Parse a match id back into its coordinate.
    pub fn parse(id: &str) -> Option<Self> {
        let mut chars = id.chars();
        let bracket = BracketKind::from_prefix(chars.next()?)?;
        let (round, index) = chars.as_str().split_once("-M")?;
        let round: usize = round.parse().ok()?;
        let index: usize = index.parse().ok()?;
        if round == 0 || index == 0 {
            return None;
        }
        Some(Self::new(bracket, round - 1, index - 1))
    }
}

/// Which result of a referenced match feeds this side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Winner,
    Loser,
}

/// One side of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceSpec {
    /// An entrant by seed, or an unfilled slot.
    Player { seed: Option<u32> },
    /// The winner or loser of another match.
    Match { coord: MatchCoord, outcome: Outcome },
}

impl SourceSpec {
    pub fn seed(seed: u32) -> Self {
        SourceSpec::Player { seed: Some(seed) }
    }

    pub fn empty() -> Self {
        SourceSpec::Player { seed: None }
    }

    pub fn winner_of(coord: MatchCoord) -> Self {
        SourceSpec::Match {
            coord,
            outcome: Outcome::Winner,
        }
    }

    pub fn loser_of(coord: MatchCoord) -> Self {
        SourceSpec::Match {
            coord,
            outcome: Outcome::Loser,
        }
    }

    /// True for a slot that can never hold a participant.
    pub fn is_empty(&self) -> bool {
        matches!(self, SourceSpec::Player { seed: None })
    }
}

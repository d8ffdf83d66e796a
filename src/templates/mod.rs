//! Template catalog: hand-authored bracket layouts keyed by entrant count.
//!
//! A catalog is configuration data, not logic. Every lookup may miss, and
//! the builder falls back to its generic pairing algorithms when it does.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::Outcome;

const BUNDLED_CATALOG: &str = include_str!("default_catalog.json");

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read template catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse template catalog: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// One side of a winners-bracket template entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TemplateSource {
    /// A concrete seed.
    Player { seed: u32 },
    /// The result of an earlier template match, by template position.
    Match {
        round: usize,
        #[serde(rename = "match")]
        index: usize,
        #[serde(default = "default_outcome")]
        outcome: Outcome,
    },
}

fn default_outcome() -> Outcome {
    Outcome::Winner
}

/// A winners-bracket template entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinnersSlot {
    pub a: Option<TemplateSource>,
    pub b: Option<TemplateSource>,
    /// Rendering hint only
    #[serde(default)]
    pub slot: Option<f64>,
}

/// Rounds of winners-bracket entries.
pub type WinnersTemplate = Vec<Vec<WinnersSlot>>;

/// Which bracket a losers-template reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefBracket {
    #[serde(rename = "W")]
    Winners,
    #[serde(rename = "L")]
    Losers,
}

/// Which result of the referenced match is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefResult {
    #[serde(rename = "W")]
    Winner,
    #[serde(rename = "L")]
    Loser,
}

/// A losers-template reference to a winners or earlier losers match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LosersRef {
    pub from: RefBracket,
    pub r: usize,
    pub m: usize,
    pub res: RefResult,
}

/// A losers-bracket template entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LosersSlot {
    pub a: Option<LosersRef>,
    pub b: Option<LosersRef>,
    #[serde(default)]
    pub slot: Option<f64>,
}

/// Rounds of losers-bracket entries.
pub type LosersTemplate = Vec<Vec<LosersSlot>>;

/// Losers layouts for one core size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LosersVariants {
    /// Keyed by play-in count
    #[serde(default)]
    pub play_ins: BTreeMap<usize, LosersTemplate>,

    /// Keyed by bye count
    #[serde(default)]
    pub byes: BTreeMap<usize, LosersTemplate>,
}

/// Source of hand-authored bracket layouts.
pub trait TemplateCatalog: Send + Sync {
    /// Catalog identifier for logging.
    fn name(&self) -> &str;

    /// Winners layout for `total` entrants.
    fn winners(&self, total: usize) -> Option<&WinnersTemplate>;

    /// Losers layout for a core size with `play_ins` play-in matches.
    fn losers_for_play_ins(&self, base_size: usize, play_ins: usize) -> Option<&LosersTemplate>;

    /// Losers layout for a core size with `byes` byes.
    fn losers_for_byes(&self, base_size: usize, byes: usize) -> Option<&LosersTemplate>;
}

/// A catalog with no entries; every bracket is built generically.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTemplates;

impl TemplateCatalog for NoTemplates {
    fn name(&self) -> &str {
        "none"
    }

    fn winners(&self, _total: usize) -> Option<&WinnersTemplate> {
        None
    }

    fn losers_for_play_ins(&self, _base_size: usize, _play_ins: usize) -> Option<&LosersTemplate> {
        None
    }

    fn losers_for_byes(&self, _base_size: usize, _byes: usize) -> Option<&LosersTemplate> {
        None
    }
}

/// A catalog held in memory, loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticCatalog {
    #[serde(default)]
    pub winners: BTreeMap<usize, WinnersTemplate>,

    /// Keyed by core size
    #[serde(default)]
    pub losers: BTreeMap<usize, LosersVariants>,
}

impl StaticCatalog {
    /// Parse a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: StaticCatalog = serde_json::from_str(json)?;
        debug!(
            "Loaded template catalog with {} winners layouts and {} losers cores",
            catalog.winners.len(),
            catalog.losers.len()
        );
        Ok(catalog)
    }

    /// Load a catalog from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// The catalog compiled into the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }
}

impl TemplateCatalog for StaticCatalog {
    fn name(&self) -> &str {
        "static"
    }

    fn winners(&self, total: usize) -> Option<&WinnersTemplate> {
        self.winners.get(&total)
    }

    fn losers_for_play_ins(&self, base_size: usize, play_ins: usize) -> Option<&LosersTemplate> {
        self.losers.get(&base_size)?.play_ins.get(&play_ins)
    }

    fn losers_for_byes(&self, base_size: usize, byes: usize) -> Option<&LosersTemplate> {
        self.losers.get(&base_size)?.byes.get(&byes)
    }
}

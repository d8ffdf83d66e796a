//! Bracket snapshots and the stored format descriptor.
//!
//! Snapshots store elimination rounds as index-keyed maps
//! (`{"0": {"0": match, "1": match}, "1": {...}}`) rather than nested
//! arrays. Keys are decoded in numeric order, so rounds round-trip
//! losslessly.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::StorageError;
use crate::models::{
    Bracket, EntrantId, Format, FormatSpec, Group, Match, PlayoffState, Round, RoundRobinSettings,
};

/// Rounds keyed by round index, then match index.
pub type IndexedRounds = BTreeMap<usize, BTreeMap<usize, Match>>;

/// Storage form of a [`Bracket`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketSnapshot {
    pub format: Format,

    #[serde(default)]
    pub seed_order: Vec<EntrantId>,

    #[serde(default)]
    pub winners: IndexedRounds,

    #[serde(default)]
    pub losers: IndexedRounds,

    #[serde(default)]
    pub finals: Option<Match>,

    #[serde(default)]
    pub groups: Vec<Group>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_robin: Option<RoundRobinSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playoffs: Option<PlayoffState>,
}

fn encode_rounds(rounds: &[Round]) -> IndexedRounds {
    rounds
        .iter()
        .enumerate()
        .map(|(r, round)| (r, round.iter().cloned().enumerate().collect()))
        .collect()
}

fn decode_rounds(indexed: IndexedRounds, label: &str) -> Result<Vec<Round>, StorageError> {
    let mut rounds = Vec::with_capacity(indexed.len());
    for (expected_round, (r, matches)) in indexed.into_iter().enumerate() {
        if r != expected_round {
            return Err(StorageError::InvalidSnapshot(format!(
                "{} round {} is missing",
                label, expected_round
            )));
        }
        let mut round = Vec::with_capacity(matches.len());
        for (expected_index, (i, m)) in matches.into_iter().enumerate() {
            if i != expected_index || m.round != r || m.index != i {
                return Err(StorageError::InvalidSnapshot(format!(
                    "{} match at round {} index {} is out of place ({})",
                    label, r, i, m.id
                )));
            }
            round.push(m);
        }
        rounds.push(round);
    }
    Ok(rounds)
}

impl From<&Bracket> for BracketSnapshot {
    fn from(bracket: &Bracket) -> Self {
        Self {
            format: bracket.format,
            seed_order: bracket.seed_order.clone(),
            winners: encode_rounds(&bracket.winners),
            losers: encode_rounds(&bracket.losers),
            finals: bracket.finals.clone(),
            groups: bracket.groups.clone(),
            round_robin: bracket.round_robin.clone(),
            playoffs: bracket.playoffs.clone(),
        }
    }
}

impl BracketSnapshot {
    /// Decode back into a bracket, checking every match sits at its own coordinate.
    pub fn into_bracket(self) -> Result<Bracket, StorageError> {
        Ok(Bracket {
            format: self.format,
            seed_order: self.seed_order,
            winners: decode_rounds(self.winners, "winners")?,
            losers: decode_rounds(self.losers, "losers")?,
            finals: self.finals,
            groups: self.groups,
            round_robin: self.round_robin,
            playoffs: self.playoffs,
        })
    }

    /// Write the snapshot as pretty-printed JSON.
    pub fn write(&self, path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("Wrote bracket snapshot to {:?}", path);
        Ok(())
    }

    /// Read a snapshot from disk.
    pub fn read(path: &Path) -> Result<Self, StorageError> {
        if !path.exists() {
            return Err(StorageError::PathNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let snapshot: BracketSnapshot = serde_json::from_str(&contents)?;
        debug!("Read bracket snapshot from {:?}", path);
        Ok(snapshot)
    }
}

/// Write the tournament format descriptor.
pub fn write_format(path: &Path, format: &FormatSpec) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(format)?)?;
    Ok(())
}

/// Read the tournament format descriptor.
pub fn read_format(path: &Path) -> Result<FormatSpec, StorageError> {
    if !path.exists() {
        return Err(StorageError::PathNotFound(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

//! Filesystem storage for a tournament.
//!
//! A tournament directory holds:
//! - `entrants.jsonl`: the roster, one entrant per line
//! - `format.json`: the format and round-robin settings
//! - `scores.jsonl`: the append-only score log
//! - `bracket.json`: the last rendered bracket snapshot
//!
//! The roster, format and score log are the source of truth; the snapshot
//! is always rebuildable from them.

pub mod jsonl;
pub mod snapshot;

pub use jsonl::{
    append_score, read_roster, read_scores, write_roster, EntityType, JsonlReader, JsonlWriter,
};
pub use snapshot::{read_format, write_format, BracketSnapshot};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn roster_path(&self) -> PathBuf {
        self.data_dir.join(EntityType::Entrant.filename())
    }

    pub fn scores_path(&self) -> PathBuf {
        self.data_dir.join(EntityType::ScoreRecord.filename())
    }

    pub fn bracket_path(&self) -> PathBuf {
        self.data_dir.join("bracket.json")
    }

    pub fn format_path(&self) -> PathBuf {
        self.data_dir.join("format.json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

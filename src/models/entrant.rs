//! Entrant model.

use serde::{Deserialize, Serialize};

use super::{EntityId, EntrantId};

/// A ranked participant, before or after seeding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrant {
    /// Stable identifier for the lifetime of the tournament
    #[serde(default)]
    pub id: EntrantId,

    /// Display name
    pub name: String,

    /// Primary ranking (circuit points); higher seeds first
    #[serde(default)]
    pub ranking_score: i64,

    /// Secondary ranking (ladder rating); breaks primary ties
    #[serde(default)]
    pub secondary_ranking_score: i64,

    /// Seed (1 = best), assigned by the seeder
    #[serde(default)]
    pub seed: Option<u32>,
}

impl Entrant {
    /// Create a new Entrant with an ID derived from its fields.
    pub fn new(name: String, ranking_score: i64, secondary_ranking_score: i64) -> Self {
        let id = derive_id(&name, ranking_score, secondary_ranking_score);
        Self {
            id,
            name,
            ranking_score,
            secondary_ranking_score,
            seed: None,
        }
    }

    /// Builder method to set an explicit ID.
    pub fn with_id(mut self, id: impl Into<EntrantId>) -> Self {
        self.id = id.into();
        self
    }

    /// Fill in a derived ID when the roster did not supply one.
    pub fn ensure_id(&mut self) {
        if self.id.is_empty() {
            self.id = derive_id(&self.name, self.ranking_score, self.secondary_ranking_score);
        }
    }
}

fn derive_id(name: &str, ranking_score: i64, secondary_ranking_score: i64) -> EntrantId {
    EntityId::generate(&[
        name,
        &ranking_score.to_string(),
        &secondary_ranking_score.to_string(),
    ])
}

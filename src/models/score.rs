//! Score log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MatchId, Side};

/// One submitted result, as appended to the score log.
///
/// Replaying the log in order over a freshly built bracket reproduces the
/// bracket; a later record for the same match replaces an earlier one.
/// A `0-0` score without a walkover clears the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub match_id: MatchId,

    #[serde(default)]
    pub scores: [u32; 2],

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walkover: Option<Side>,

    pub recorded_at: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn score(match_id: MatchId, score_a: u32, score_b: u32, recorded_at: DateTime<Utc>) -> Self {
        Self {
            match_id,
            scores: [score_a, score_b],
            walkover: None,
            recorded_at,
        }
    }

    pub fn walkover(match_id: MatchId, side: Side, recorded_at: DateTime<Utc>) -> Self {
        Self {
            match_id,
            scores: [0, 0],
            walkover: Some(side),
            recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_record_json() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let record = ScoreRecord::score(MatchId::from("W1-M1"), 2, 1, at);
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains("\"match_id\":\"W1-M1\""));
        assert!(!json.contains("walkover"));
        assert_eq!(serde_json::from_str::<ScoreRecord>(&json).unwrap(), record);
    }

    #[test]
    fn test_walkover_record_parses() {
        let json = r#"{"match_id":"L2-M1","walkover":"b","recorded_at":"2024-05-01T12:00:00Z"}"#;
        let record: ScoreRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.walkover, Some(Side::B));
        assert_eq!(record.scores, [0, 0]);
    }
}

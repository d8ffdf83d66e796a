//! Engine errors.
//!
//! Building, resolving and ranking never fail; degenerate input yields a
//! degenerate bracket. Errors only arise from externally triggered
//! mutations that name something that does not exist or is not allowed.

use thiserror::Error;

use crate::models::{MatchId, Side};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("Match {match_id} has no participant on side {side:?} yet")]
    ParticipantMissing { match_id: MatchId, side: Side },

    #[error("Results are already recorded; rebuild the bracket explicitly to change the roster")]
    ResultsRecorded,
}

//! Score submission.
//!
//! Recording a result is the only externally triggered mutation of a
//! bracket. It touches the result fields of exactly one match and never its
//! sources, so every downstream match picks the result up through the
//! resolver.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::BestOfDefaults;
use crate::error::EngineError;
use crate::models::{Bracket, BracketKind, Match, MatchId, MatchStatus, Side};
use crate::resolve::Resolver;

/// Wins needed to take a best-of series.
pub fn needed_wins(best_of: u32) -> u32 {
    best_of.div_ceil(2).max(1)
}

/// Best-of for a match: its explicit value, else the default for its position.
pub fn best_of_for(bracket: &Bracket, m: &Match, defaults: &BestOfDefaults) -> u32 {
    if let Some(best_of) = m.best_of.filter(|b| *b > 0) {
        return best_of;
    }

    match m.bracket {
        BracketKind::Winners => {
            let from_end = bracket.winners.len().saturating_sub(m.round);
            match from_end {
                1 => defaults.final_,
                2 => defaults.semi,
                3 => defaults.quarter,
                _ => defaults.upper,
            }
        }
        BracketKind::Losers => {
            let from_end = bracket.losers.len().saturating_sub(m.round);
            match from_end {
                1 => defaults.lower_final,
                2 => defaults.lower_semi,
                _ => defaults.lower,
            }
        }
        BracketKind::Group => defaults.upper,
        BracketKind::Finals => defaults.final_,
    }
}

/// Record a score.
///
/// Participants are resolved at submission time. The match completes once
/// the scores differ and the leader reaches the needed wins; otherwise the
/// scores are kept and the match stays pending. Any walkover is cleared.
pub fn submit_score(
    bracket: &mut Bracket,
    match_id: &MatchId,
    score_a: u32,
    score_b: u32,
    defaults: &BestOfDefaults,
    at: DateTime<Utc>,
) -> Result<Match, EngineError> {
    let m = bracket
        .match_by_id(match_id)
        .ok_or_else(|| EngineError::MatchNotFound(match_id.clone()))?;

    let needed = needed_wins(best_of_for(bracket, m, defaults));
    let [id_a, id_b] = Resolver::new(bracket).participants(m);

    let (winner_id, loser_id) = if score_a != score_b && score_a.max(score_b) >= needed {
        if score_a > score_b {
            (id_a, id_b)
        } else {
            (id_b, id_a)
        }
    } else {
        (None, None)
    };

    let m = bracket
        .match_by_id_mut(match_id)
        .ok_or_else(|| EngineError::MatchNotFound(match_id.clone()))?;
    m.scores = [score_a, score_b];
    m.walkover = None;
    m.status = if winner_id.is_some() {
        MatchStatus::Complete
    } else {
        MatchStatus::Pending
    };
    m.loser_id = winner_id.as_ref().and(loser_id);
    m.winner_id = winner_id;
    m.updated_at = Some(at);

    debug!(
        "Recorded {} {}-{} (needed {}, status {:?})",
        m.id, score_a, score_b, needed, m.status
    );
    Ok(m.clone())
}

/// Award a match to the participant on `side` without playing it.
pub fn submit_walkover(
    bracket: &mut Bracket,
    match_id: &MatchId,
    side: Side,
    at: DateTime<Utc>,
) -> Result<Match, EngineError> {
    let m = bracket
        .match_by_id(match_id)
        .ok_or_else(|| EngineError::MatchNotFound(match_id.clone()))?;

    let resolver = Resolver::new(bracket);
    let winner = resolver
        .participant(m, side)
        .ok_or_else(|| EngineError::ParticipantMissing {
            match_id: match_id.clone(),
            side,
        })?;
    let loser = resolver.participant(m, side.other());

    let m = bracket
        .match_by_id_mut(match_id)
        .ok_or_else(|| EngineError::MatchNotFound(match_id.clone()))?;
    m.scores = [0, 0];
    m.walkover = Some(side);
    m.status = MatchStatus::Complete;
    m.winner_id = Some(winner);
    m.loser_id = loser;
    m.updated_at = Some(at);

    debug!("Recorded walkover for side {:?} in {}", side, m.id);
    Ok(m.clone())
}

/// Reset a match to pending.
pub fn clear_result(bracket: &mut Bracket, match_id: &MatchId) -> Result<Match, EngineError> {
    let m = bracket
        .match_by_id_mut(match_id)
        .ok_or_else(|| EngineError::MatchNotFound(match_id.clone()))?;
    m.reset();
    Ok(m.clone())
}

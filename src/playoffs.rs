//! Playoff promotion out of a round-robin group stage.

use tracing::{debug, info};

use crate::build::build_elimination;
use crate::calculate::all_standings;
use crate::models::{Bracket, Entrant, EntrantId, PlayoffMode, PlayoffState};
use crate::seeding::seed;
use crate::templates::TemplateCatalog;

/// Entrants advancing out of the group stage, in group order then standing order.
pub fn advancing_ids(bracket: &Bracket, roster: &[Entrant], per_group: usize) -> Vec<EntrantId> {
    all_standings(bracket, roster)
        .into_iter()
        .flat_map(|rows| rows.into_iter().take(per_group).map(|row| row.entrant_id))
        .collect()
}

/// Build the playoff bracket once every group match is complete.
///
/// Returns true when the elimination part of the bracket was (re)built. An
/// unchanged advancing set and mode leaves the bracket untouched, so
/// playoff results already recorded survive repeated calls.
pub fn promote_playoffs(bracket: &mut Bracket, roster: &[Entrant], catalog: &dyn TemplateCatalog) -> bool {
    if !bracket.is_round_robin() {
        return false;
    }
    let Some(settings) = bracket.round_robin.clone() else {
        return false;
    };
    if settings.advance_per_group == 0 || settings.playoffs == PlayoffMode::None {
        return false;
    }
    if !bracket.group_stage_complete() {
        debug!("Group stage incomplete, playoffs not promoted");
        return false;
    }

    let advancing = advancing_ids(bracket, roster, settings.advance_per_group);
    let entrants: Vec<Entrant> = roster
        .iter()
        .filter(|e| advancing.contains(&e.id))
        .cloned()
        .collect();
    if entrants.is_empty() {
        return false;
    }

    let seeded = seed(&entrants);
    let seeded_ids: Vec<EntrantId> = seeded.iter().map(|e| e.id.clone()).collect();
    let state = PlayoffState {
        mode: settings.playoffs,
        seeded_ids,
    };
    if bracket.playoffs.as_ref() == Some(&state) {
        debug!("Advancing set unchanged, keeping existing playoffs");
        return false;
    }

    let elimination = build_elimination(&seeded, settings.playoffs.includes_losers(), catalog);
    bracket.set_elimination(elimination);
    info!(
        "Promoted {} entrants to {} playoffs",
        state.seeded_ids.len(),
        state.mode
    );
    bracket.playoffs = Some(state);
    true
}

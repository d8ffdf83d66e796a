//! Single and double elimination brackets.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use super::losers::build_losers;
use crate::models::{
    BracketKind, EliminationBracket, Entrant, Match, MatchCoord, Round, SourceSpec,
};
use crate::seeding::{base_size, seed_positions};
use crate::templates::{TemplateCatalog, TemplateSource, WinnersTemplate};

/// Build an elimination bracket for seeded entrants.
///
/// Entrants without a seed are seeded by their position in the slice.
pub fn build_elimination(
    entrants: &[Entrant],
    include_losers: bool,
    catalog: &dyn TemplateCatalog,
) -> EliminationBracket {
    let total = entrants.len();
    if total == 0 {
        return EliminationBracket::default();
    }

    let seeds: BTreeSet<u32> = entrants
        .iter()
        .enumerate()
        .map(|(idx, e)| e.seed.unwrap_or(idx as u32 + 1))
        .collect();
    let base = base_size(total);
    let play_ins = total.saturating_sub(base);

    let winners = match catalog.winners(total) {
        Some(template) => {
            debug!("Building winners bracket for {} entrants from template", total);
            winners_from_template(template, &seeds)
        }
        None if total <= 4 => {
            debug!("No winners template for {} entrants, using straight elimination", total);
            let slots = seed_positions(base)
                .into_iter()
                .map(|s| player_source(s, &seeds))
                .collect();
            eliminate(Vec::new(), slots)
        }
        None => {
            debug!(
                "No winners template for {} entrants, pairing {} play-ins into a {} core",
                total, play_ins, base
            );
            winners_with_play_ins(base, play_ins, &seeds)
        }
    };

    let losers = if include_losers {
        build_losers(&winners, base, total, play_ins, catalog)
    } else {
        Vec::new()
    };

    let finals = match (winners.last(), losers.last()) {
        (Some(_), Some(_)) if include_losers => Some(Match::new(
            MatchCoord::finals(),
            SourceSpec::winner_of(MatchCoord::winners(winners.len() - 1, 0)),
            SourceSpec::winner_of(MatchCoord::losers(losers.len() - 1, 0)),
        )),
        _ => None,
    };

    EliminationBracket {
        winners,
        losers,
        finals,
    }
}

fn player_source(seed: u32, seeds: &BTreeSet<u32>) -> Option<SourceSpec> {
    seeds.contains(&seed).then(|| SourceSpec::seed(seed))
}

/// Play one round of pairings, skipping byes.
///
/// A pair with one absent side advances the present side without a match.
/// Returns the sources entering the next round.
pub(super) fn play_round(
    rounds: &mut Vec<Round>,
    kind: BracketKind,
    entrants: Vec<Option<SourceSpec>>,
) -> Vec<Option<SourceSpec>> {
    let round_idx = rounds.len();
    let mut round = Vec::new();
    let mut next = Vec::with_capacity(entrants.len().div_ceil(2));

    for pair in entrants.chunks(2) {
        let a = pair[0];
        let b = pair.get(1).copied().flatten();
        match (a, b) {
            (Some(a), Some(b)) => {
                let coord = MatchCoord::new(kind, round_idx, round.len());
                round.push(Match::new(coord, a, b));
                next.push(Some(SourceSpec::winner_of(coord)));
            }
            (Some(only), None) | (None, Some(only)) => next.push(Some(only)),
            (None, None) => next.push(None),
        }
    }

    if !round.is_empty() {
        rounds.push(round);
    }
    next
}

/// Pair slots down to a single survivor, appending rounds to `rounds`.
fn eliminate(mut rounds: Vec<Round>, mut current: Vec<Option<SourceSpec>>) -> Vec<Round> {
    while current.len() > 1 {
        current = play_round(&mut rounds, BracketKind::Winners, current);
    }
    rounds
}

fn winners_with_play_ins(base: usize, play_ins: usize, seeds: &BTreeSet<u32>) -> Vec<Round> {
    let mut rounds = Vec::new();
    let mut seed_to_source: BTreeMap<u32, Option<SourceSpec>> = BTreeMap::new();

    // Bottom seeds play in for the high seed's slot.
    let mut play_in_round = Vec::new();
    for i in 0..play_ins {
        let high = (base - i) as u32;
        let low = (base + 1 + i) as u32;
        let a = player_source(high, seeds).unwrap_or_else(SourceSpec::empty);
        let b = player_source(low, seeds).unwrap_or_else(SourceSpec::empty);
        let coord = MatchCoord::winners(0, play_in_round.len());
        play_in_round.push(Match::new(coord, a, b));
        seed_to_source.insert(high, Some(SourceSpec::winner_of(coord)));
    }
    if !play_in_round.is_empty() {
        rounds.push(play_in_round);
    }

    let slots = seed_positions(base)
        .into_iter()
        .map(|seed| match seed_to_source.get(&seed) {
            Some(source) => *source,
            None => player_source(seed, seeds),
        })
        .collect();
    eliminate(rounds, slots)
}

fn winners_from_template(template: &WinnersTemplate, seeds: &BTreeSet<u32>) -> Vec<Round> {
    let mut rounds: Vec<Round> = Vec::new();
    // Built coordinates by template position; empty template rounds are not emitted.
    let mut built: Vec<Vec<MatchCoord>> = Vec::with_capacity(template.len());

    for round_tpl in template {
        let round_pos = rounds.len();
        let mut round = Vec::with_capacity(round_tpl.len());
        let mut coords = Vec::with_capacity(round_tpl.len());

        for entry in round_tpl {
            let a = template_source(entry.a, &built, seeds);
            let b = template_source(entry.b, &built, seeds);
            let coord = MatchCoord::winners(round_pos, round.len());
            round.push(Match::new(coord, a, b).with_display_slot(entry.slot));
            coords.push(coord);
        }

        built.push(coords);
        if !round.is_empty() {
            rounds.push(round);
        }
    }
    rounds
}

fn template_source(
    source: Option<TemplateSource>,
    built: &[Vec<MatchCoord>],
    seeds: &BTreeSet<u32>,
) -> SourceSpec {
    match source {
        None => SourceSpec::empty(),
        Some(TemplateSource::Player { seed }) => {
            player_source(seed, seeds).unwrap_or_else(SourceSpec::empty)
        }
        Some(TemplateSource::Match {
            round,
            index,
            outcome,
        }) => match built.get(round).and_then(|r| r.get(index)) {
            Some(coord) => SourceSpec::Match {
                coord: *coord,
                outcome,
            },
            None => {
                warn!(
                    "Template references missing winners match round {} match {}",
                    round, index
                );
                SourceSpec::empty()
            }
        },
    }
}

//! Losers bracket construction for double elimination.

use tracing::{debug, warn};

use super::elimination::play_round;
use crate::models::{BracketKind, Match, MatchCoord, Round, SourceSpec};
use crate::templates::{LosersRef, LosersTemplate, RefBracket, RefResult, TemplateCatalog};

/// Build the losers bracket fed by `winners`.
///
/// Template selection: the bye-indexed layout when the core has byes,
/// otherwise the play-in-indexed layout, otherwise the generic builder.
pub fn build_losers(
    winners: &[Round],
    base_size: usize,
    total: usize,
    play_ins: usize,
    catalog: &dyn TemplateCatalog,
) -> Vec<Round> {
    if winners.is_empty() {
        return Vec::new();
    }

    let byes = base_size.saturating_sub(total);
    // A missing bye layout goes generic: the play-in layouts reference winners matches that byes remove.
    let template = if byes > 0 {
        catalog.losers_for_byes(base_size, byes)
    } else {
        catalog.losers_for_play_ins(base_size, play_ins)
    };

    match template {
        Some(template) => {
            debug!(
                "Building losers bracket from template (core {}, {} byes, {} play-ins)",
                base_size, byes, play_ins
            );
            losers_from_template(winners, template)
        }
        None => {
            debug!(
                "No losers template for core {} ({} byes, {} play-ins), using generic builder",
                base_size, byes, play_ins
            );
            generic_losers(winners)
        }
    }
}

/// Loser of a match, only when it is a real two-sided match.
fn safe_loser(m: &Match) -> Option<SourceSpec> {
    m.has_both_sides().then(|| SourceSpec::loser_of(m.coord()))
}

/// Built losers matches by template position: coordinate and whether both sides exist.
type BuiltLosers = Vec<Vec<(MatchCoord, bool)>>;

fn losers_from_template(winners: &[Round], template: &LosersTemplate) -> Vec<Round> {
    let mut losers: Vec<Round> = Vec::new();
    let mut built: BuiltLosers = Vec::with_capacity(template.len());

    for (r_idx, round_tpl) in template.iter().enumerate() {
        let round_pos = losers.len();
        let mut round = Vec::with_capacity(round_tpl.len());
        built.push(Vec::with_capacity(round_tpl.len()));

        for (m_idx, entry) in round_tpl.iter().enumerate() {
            let a = resolve_ref(entry.a, winners, &built);
            let b = resolve_ref(entry.b, winners, &built);
            let coord = MatchCoord::losers(round_pos, round.len());
            let m = Match::new(coord, a, b).with_display_slot(entry.slot.or(Some(m_idx as f64)));
            built[r_idx].push((coord, m.has_both_sides()));
            round.push(m);
        }

        if !round.is_empty() {
            losers.push(round);
        }
    }
    losers
}

fn resolve_ref(reference: Option<LosersRef>, winners: &[Round], built: &BuiltLosers) -> SourceSpec {
    let Some(reference) = reference else {
        return SourceSpec::empty();
    };

    let resolved = match reference.from {
        RefBracket::Winners => winners
            .get(reference.r)
            .and_then(|round| round.get(reference.m))
            .and_then(|m| match reference.res {
                RefResult::Loser => safe_loser(m),
                RefResult::Winner => Some(SourceSpec::winner_of(m.coord())),
            }),
        RefBracket::Losers => built
            .get(reference.r)
            .and_then(|round| round.get(reference.m))
            .and_then(|&(coord, both_sides)| match reference.res {
                RefResult::Loser => both_sides.then(|| SourceSpec::loser_of(coord)),
                RefResult::Winner => Some(SourceSpec::winner_of(coord)),
            }),
    };

    resolved.unwrap_or_else(|| {
        warn!(
            "Losers template reference {:?} r{} m{} did not resolve",
            reference.from, reference.r, reference.m
        );
        SourceSpec::empty()
    })
}

/// Generic losers bracket.
///
/// Losers of winners round 0 pair off first. Each later winners round drops
/// its losers in behind the survivors (minor round); whenever more than two
/// survivors remain an extra pairing round (major round) follows. The
/// survivors then pair down to one.
fn generic_losers(winners: &[Round]) -> Vec<Round> {
    let collect = |round: &Round| -> Vec<Option<SourceSpec>> {
        round.iter().filter_map(safe_loser).map(Some).collect()
    };

    let mut losers = Vec::new();
    let mut carry = collect(&winners[0]);
    if !carry.is_empty() {
        carry = play_round(&mut losers, BracketKind::Losers, carry);
    }

    for round in &winners[1..] {
        let mut minor = carry;
        minor.extend(collect(round));
        carry = if minor.is_empty() {
            minor
        } else {
            play_round(&mut losers, BracketKind::Losers, minor)
        };
        if carry.len() > 2 {
            carry = play_round(&mut losers, BracketKind::Losers, carry);
        }
    }

    while carry.len() > 1 {
        carry = play_round(&mut losers, BracketKind::Losers, carry);
    }
    losers
}

//! Final placements of a decided elimination bracket.

use std::collections::BTreeMap;

use crate::models::{Bracket, EntrantId};
use crate::resolve::Resolver;

/// Final placements keyed by entrant, or `None` until the deciding match is complete.
///
/// `total` is only used when the bracket carries no seed order of its own.
/// Round-robin tournaments place the promoted playoff field.
pub fn placements(bracket: &Bracket, total: usize) -> Option<BTreeMap<EntrantId, u32>> {
    let seeded = bracket.elimination_seed_order().len();
    let total = if seeded > 0 { seeded } else { total };
    if total == 0 {
        return None;
    }

    let deciding = bracket
        .finals
        .as_ref()
        .or_else(|| bracket.winners.last().and_then(|round| round.first()))?;
    if !deciding.is_complete() {
        return None;
    }
    let resolver = Resolver::new(bracket);
    let champion = resolver.winner(deciding)?;
    let runner_up = resolver.loser(deciding)?;

    let mut placed = BTreeMap::new();
    placed.insert(champion, 1);
    placed.insert(runner_up, 2);

    if bracket.losers.is_empty() {
        // Everyone knocked out in the same winners round shares a placement.
        let rounds = bracket.winners.len();
        for (idx, round) in bracket.winners.iter().enumerate() {
            let from_end = rounds - idx;
            if from_end <= 1 {
                continue;
            }
            let placement = 2u32.saturating_pow(from_end as u32 - 1) + 1;
            for m in round {
                if let Some(loser) = resolver.loser(m) {
                    placed.entry(loser).or_insert(placement);
                }
            }
        }
    } else {
        // Losers-bracket eliminations count up from the bottom of the field.
        let mut placement = total as u32;
        for round in &bracket.losers {
            let mut eliminated: Vec<EntrantId> = Vec::new();
            for m in round {
                if let Some(loser) = resolver.loser(m) {
                    if !placed.contains_key(&loser) && !eliminated.contains(&loser) {
                        eliminated.push(loser);
                    }
                }
            }
            if eliminated.is_empty() {
                continue;
            }
            let start = placement.saturating_sub(eliminated.len() as u32 - 1).max(1);
            for id in eliminated {
                placed.insert(id, start);
            }
            placement = start.saturating_sub(1);
        }
    }

    Some(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_bracket;
    use crate::models::{Entrant, FormatSpec, MatchCoord, MatchStatus};
    use crate::templates::NoTemplates;
    use pretty_assertions::assert_eq;

    fn roster(n: usize) -> Vec<Entrant> {
        (1..=n)
            .map(|i| Entrant::new(format!("P{}", i), (100 - i) as i64, 0).with_id(format!("p{}", i)))
            .collect()
    }

    /// Play every match in bracket order; the better seed always wins.
    fn play_out(bracket: &mut Bracket) {
        let coords: Vec<MatchCoord> = bracket.all_matches().map(|m| m.coord()).collect();
        for coord in coords {
            let [a, b] = {
                let resolver = Resolver::new(bracket);
                resolver.participants(bracket.match_at(coord).unwrap())
            };
            let (a, b) = (a.unwrap(), b.unwrap());
            let rank = |id: &EntrantId| bracket.seed_order.iter().position(|x| x == id).unwrap();
            let (winner, loser) = if rank(&a) < rank(&b) { (a, b) } else { (b, a) };
            let m = bracket.match_at_mut(coord).unwrap();
            m.status = MatchStatus::Complete;
            m.winner_id = Some(winner);
            m.loser_id = Some(loser);
        }
    }

    fn place_of(placed: &BTreeMap<EntrantId, u32>, id: &str) -> u32 {
        placed[&EntrantId::from(id)]
    }

    #[test]
    fn test_undecided_bracket_has_no_placements() {
        let bracket = build_bracket(&roster(4), &FormatSpec::single_elimination(), &NoTemplates);
        assert_eq!(placements(&bracket, 4), None);
        assert_eq!(placements(&Bracket::empty(bracket.format), 0), None);
    }

    #[test]
    fn test_single_elimination_shared_placements() {
        let mut bracket = build_bracket(&roster(8), &FormatSpec::single_elimination(), &NoTemplates);
        play_out(&mut bracket);
        let placed = placements(&bracket, 8).unwrap();

        assert_eq!(placed.len(), 8);
        assert_eq!(place_of(&placed, "p1"), 1);
        assert_eq!(place_of(&placed, "p2"), 2);
        assert_eq!(place_of(&placed, "p3"), 3);
        assert_eq!(place_of(&placed, "p4"), 3);
        for id in ["p5", "p6", "p7", "p8"] {
            assert_eq!(place_of(&placed, id), 5);
        }
    }

    #[test]
    fn test_double_elimination_counts_up_from_bottom() {
        let mut bracket = build_bracket(&roster(8), &FormatSpec::double_elimination(), &NoTemplates);
        play_out(&mut bracket);
        let placed = placements(&bracket, 8).unwrap();

        assert_eq!(placed.len(), 8);
        assert_eq!(place_of(&placed, "p1"), 1);
        assert_eq!(place_of(&placed, "p2"), 2);
        // Losers rounds eliminate {8, 7}, {6, 4}, {5} and {3}.
        assert_eq!(place_of(&placed, "p8"), 7);
        assert_eq!(place_of(&placed, "p7"), 7);
        assert_eq!(place_of(&placed, "p6"), 5);
        assert_eq!(place_of(&placed, "p4"), 5);
        assert_eq!(place_of(&placed, "p5"), 4);
        assert_eq!(place_of(&placed, "p3"), 3);
    }
}

//! Match-source resolution.
//!
//! Participants are never pushed forward into downstream matches. Each side
//! of a match is resolved on demand by reading the live seed order and the
//! current state of the referenced match, so a completed result shows up
//! everywhere the next time anyone asks.

use crate::models::{
    Bracket, BracketKind, EliminationBracket, EntrantId, Match, MatchCoord, Outcome, Side,
    SourceSpec,
};

/// Guard against reference cycles in hand-edited snapshots.
const MAX_DEPTH: usize = 128;

/// Lookup of matches by coordinate.
pub trait MatchLookup {
    fn match_at(&self, coord: MatchCoord) -> Option<&Match>;
}

impl MatchLookup for Bracket {
    fn match_at(&self, coord: MatchCoord) -> Option<&Match> {
        Bracket::match_at(self, coord)
    }
}

impl MatchLookup for EliminationBracket {
    fn match_at(&self, coord: MatchCoord) -> Option<&Match> {
        match coord.bracket {
            BracketKind::Winners => self.winners.get(coord.round)?.get(coord.index),
            BracketKind::Losers => self.losers.get(coord.round)?.get(coord.index),
            BracketKind::Finals => self
                .finals
                .as_ref()
                .filter(|_| coord.round == 0 && coord.index == 0),
            BracketKind::Group => None,
        }
    }
}

/// Seed to entrant mapping backed by a seed-ordered id list.
#[derive(Debug, Clone, Copy)]
pub struct SeedMap<'a> {
    order: &'a [EntrantId],
}

impl<'a> SeedMap<'a> {
    pub fn new(order: &'a [EntrantId]) -> Self {
        Self { order }
    }

    pub fn entrant(&self, seed: u32) -> Option<&'a EntrantId> {
        let idx = (seed as usize).checked_sub(1)?;
        self.order.get(idx)
    }
}

/// Resolves match sources against a lookup and the live seed maps.
pub struct Resolver<'a> {
    lookup: &'a dyn MatchLookup,
    group_seeds: SeedMap<'a>,
    elimination_seeds: SeedMap<'a>,
}

impl<'a> Resolver<'a> {
    /// Resolver over a whole tournament bracket.
    pub fn new(bracket: &'a Bracket) -> Self {
        Self {
            lookup: bracket,
            group_seeds: SeedMap::new(&bracket.seed_order),
            elimination_seeds: SeedMap::new(bracket.elimination_seed_order()),
        }
    }

    /// Resolver over a bare elimination bracket seeded by `seed_order`.
    pub fn for_elimination(elimination: &'a EliminationBracket, seed_order: &'a [EntrantId]) -> Self {
        Self {
            lookup: elimination,
            group_seeds: SeedMap::new(seed_order),
            elimination_seeds: SeedMap::new(seed_order),
        }
    }

    /// Resolve one source appearing in a match of bracket `within`.
    pub fn resolve(&self, source: &SourceSpec, within: BracketKind) -> Option<EntrantId> {
        self.resolve_at(source, within, 0)
    }

    /// Both participants of a match; `None` for a side not yet known.
    pub fn participants(&self, m: &Match) -> [Option<EntrantId>; 2] {
        [
            self.resolve(&m.sources[0], m.bracket),
            self.resolve(&m.sources[1], m.bracket),
        ]
    }

    /// The participant on one side of a match.
    pub fn participant(&self, m: &Match, side: Side) -> Option<EntrantId> {
        self.resolve(&m.sources[side.index()], m.bracket)
    }

    /// Winner of a match: its recorded result, or the lone participant of a bye.
    pub fn winner(&self, m: &Match) -> Option<EntrantId> {
        self.outcome_at(m, Outcome::Winner, 0)
    }

    /// Loser of a match; byes never produce one.
    pub fn loser(&self, m: &Match) -> Option<EntrantId> {
        self.outcome_at(m, Outcome::Loser, 0)
    }

    fn resolve_at(&self, source: &SourceSpec, within: BracketKind, depth: usize) -> Option<EntrantId> {
        match source {
            SourceSpec::Player { seed } => {
                let seeds = match within {
                    BracketKind::Group => self.group_seeds,
                    _ => self.elimination_seeds,
                };
                seeds.entrant((*seed)?).cloned()
            }
            SourceSpec::Match { coord, outcome } => {
                let referenced = self.lookup.match_at(*coord)?;
                self.outcome_at(referenced, *outcome, depth + 1)
            }
        }
    }

    fn outcome_at(&self, m: &Match, outcome: Outcome, depth: usize) -> Option<EntrantId> {
        if depth > MAX_DEPTH {
            return None;
        }

        if m.is_complete() {
            if let Some(side) = m.walkover {
                let side = match outcome {
                    Outcome::Winner => side,
                    Outcome::Loser => side.other(),
                };
                return self.resolve_at(&m.sources[side.index()], m.bracket, depth);
            }
            return match outcome {
                Outcome::Winner => m.winner_id.clone(),
                Outcome::Loser => m.loser_id.clone(),
            };
        }

        // A side that can never be filled hands the match to its opponent.
        if outcome == Outcome::Winner {
            match (m.sources[0].is_empty(), m.sources[1].is_empty()) {
                (true, false) => return self.resolve_at(&m.sources[1], m.bracket, depth),
                (false, true) => return self.resolve_at(&m.sources[0], m.bracket, depth),
                _ => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Format, MatchStatus};

    fn ids(names: &[&str]) -> Vec<EntrantId> {
        names.iter().map(|n| EntrantId::from(*n)).collect()
    }

    fn complete(m: &mut Match, winner: &str, loser: &str) {
        m.status = MatchStatus::Complete;
        m.winner_id = Some(EntrantId::from(winner));
        m.loser_id = Some(EntrantId::from(loser));
    }

    fn four_player_double() -> Bracket {
        let w00 = Match::new(MatchCoord::winners(0, 0), SourceSpec::seed(1), SourceSpec::seed(4));
        let w01 = Match::new(MatchCoord::winners(0, 1), SourceSpec::seed(2), SourceSpec::seed(3));
        let w10 = Match::new(
            MatchCoord::winners(1, 0),
            SourceSpec::winner_of(MatchCoord::winners(0, 0)),
            SourceSpec::winner_of(MatchCoord::winners(0, 1)),
        );
        let l00 = Match::new(
            MatchCoord::losers(0, 0),
            SourceSpec::loser_of(MatchCoord::winners(0, 0)),
            SourceSpec::loser_of(MatchCoord::winners(0, 1)),
        );
        let l10 = Match::new(
            MatchCoord::losers(1, 0),
            SourceSpec::winner_of(MatchCoord::losers(0, 0)),
            SourceSpec::loser_of(MatchCoord::winners(1, 0)),
        );
        let finals = Match::new(
            MatchCoord::finals(),
            SourceSpec::winner_of(MatchCoord::winners(1, 0)),
            SourceSpec::winner_of(MatchCoord::losers(1, 0)),
        );

        let mut bracket = Bracket::empty(Format::DoubleElimination);
        bracket.seed_order = ids(&["a", "b", "c", "d"]);
        bracket.set_elimination(EliminationBracket {
            winners: vec![vec![w00, w01], vec![w10]],
            losers: vec![vec![l00], vec![l10]],
            finals: Some(finals),
        });
        bracket
    }

    #[test]
    fn test_player_source_resolves_by_seed() {
        let bracket = four_player_double();
        let resolver = Resolver::new(&bracket);

        assert_eq!(
            resolver.resolve(&SourceSpec::seed(3), BracketKind::Winners),
            Some(EntrantId::from("c"))
        );
        assert_eq!(resolver.resolve(&SourceSpec::seed(9), BracketKind::Winners), None);
        assert_eq!(resolver.resolve(&SourceSpec::seed(0), BracketKind::Winners), None);
        assert_eq!(resolver.resolve(&SourceSpec::empty(), BracketKind::Winners), None);
    }

    #[test]
    fn test_reseeding_changes_participants_without_rebuild() {
        let mut bracket = four_player_double();
        let before = Resolver::new(&bracket).participants(&bracket.winners[0][0]);
        assert_eq!(before, [Some(EntrantId::from("a")), Some(EntrantId::from("d"))]);

        bracket.seed_order = ids(&["d", "c", "b", "a"]);
        let after = Resolver::new(&bracket).participants(&bracket.winners[0][0]);
        assert_eq!(after, [Some(EntrantId::from("d")), Some(EntrantId::from("a"))]);
    }

    #[test]
    fn test_finals_resolve_after_dependencies_complete() {
        let mut bracket = four_player_double();
        let finals_coord = MatchCoord::finals();

        {
            let resolver = Resolver::new(&bracket);
            let finals = bracket.match_at(finals_coord).unwrap();
            assert_eq!(resolver.participants(finals), [None, None]);
        }

        complete(&mut bracket.winners[0][0], "a", "d");
        complete(&mut bracket.winners[0][1], "b", "c");
        complete(&mut bracket.winners[1][0], "a", "b");
        complete(&mut bracket.losers[0][0], "c", "d");

        {
            let resolver = Resolver::new(&bracket);
            let l10 = bracket.match_at(MatchCoord::losers(1, 0)).unwrap();
            assert_eq!(
                resolver.participants(l10),
                [Some(EntrantId::from("c")), Some(EntrantId::from("b"))]
            );
            let finals = bracket.match_at(finals_coord).unwrap();
            assert_eq!(resolver.participants(finals), [Some(EntrantId::from("a")), None]);
        }

        complete(&mut bracket.losers[1][0], "b", "c");
        let resolver = Resolver::new(&bracket);
        let finals = bracket.match_at(finals_coord).unwrap();
        assert_eq!(
            resolver.participants(finals),
            [Some(EntrantId::from("a")), Some(EntrantId::from("b"))]
        );
    }

    #[test]
    fn test_pending_match_has_no_winner() {
        let bracket = four_player_double();
        let resolver = Resolver::new(&bracket);
        assert_eq!(resolver.winner(&bracket.winners[0][0]), None);
        assert_eq!(resolver.loser(&bracket.winners[0][0]), None);
    }

    #[test]
    fn test_bye_slot_auto_advances() {
        let bye = Match::new(MatchCoord::winners(0, 0), SourceSpec::seed(2), SourceSpec::empty());
        let elimination = EliminationBracket {
            winners: vec![vec![bye]],
            losers: Vec::new(),
            finals: None,
        };
        let order = ids(&["a", "b"]);
        let resolver = Resolver::for_elimination(&elimination, &order);

        let m = &elimination.winners[0][0];
        assert_eq!(resolver.winner(m), Some(EntrantId::from("b")));
        assert_eq!(resolver.loser(m), None);
    }

    #[test]
    fn test_walkover_resolves_from_sources() {
        let mut bracket = four_player_double();
        let m = &mut bracket.winners[0][1];
        m.status = MatchStatus::Complete;
        m.walkover = Some(Side::B);

        let resolver = Resolver::new(&bracket);
        let m = &bracket.winners[0][1];
        assert_eq!(resolver.winner(m), Some(EntrantId::from("c")));
        assert_eq!(resolver.loser(m), Some(EntrantId::from("b")));
    }

    #[test]
    fn test_dangling_reference_resolves_to_none() {
        let bracket = four_player_double();
        let resolver = Resolver::new(&bracket);
        let dangling = SourceSpec::winner_of(MatchCoord::winners(7, 3));
        assert_eq!(resolver.resolve(&dangling, BracketKind::Winners), None);
    }

    #[test]
    fn test_self_reference_terminates() {
        let looped = Match::new(
            MatchCoord::winners(0, 0),
            SourceSpec::winner_of(MatchCoord::winners(0, 0)),
            SourceSpec::empty(),
        );
        let elimination = EliminationBracket {
            winners: vec![vec![looped]],
            losers: Vec::new(),
            finals: None,
        };
        let order = ids(&["a"]);
        let resolver = Resolver::for_elimination(&elimination, &order);
        assert_eq!(resolver.winner(&elimination.winners[0][0]), None);
    }
}

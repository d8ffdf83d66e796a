//! Tournament session: the explicit context every engine call goes through.
//!
//! A session owns the roster, the format, the template catalog and the
//! bracket built from them. There is no process-wide tournament state; a
//! caller holding two sessions holds two independent tournaments.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::build::build_bracket;
use crate::calculate::{self, StandingRow};
use crate::config::BestOfDefaults;
use crate::error::EngineError;
use crate::models::{Bracket, Entrant, EntrantId, FormatSpec, Match, MatchId, ScoreRecord, Side};
use crate::playoffs;
use crate::resolve::Resolver;
use crate::scoring;
use crate::seeding::seed;
use crate::storage::BracketSnapshot;
use crate::templates::TemplateCatalog;

/// A tournament in progress.
pub struct TournamentSession {
    roster: Vec<Entrant>,
    format: FormatSpec,
    catalog: Arc<dyn TemplateCatalog>,
    best_of: BestOfDefaults,
    bracket: Bracket,
}

impl TournamentSession {
    /// Seed the roster and build a fresh bracket.
    pub fn new(
        roster: Vec<Entrant>,
        format: FormatSpec,
        catalog: Arc<dyn TemplateCatalog>,
        best_of: BestOfDefaults,
    ) -> Self {
        let roster = with_ids(roster);
        let bracket = build_bracket(&roster, &format, catalog.as_ref());
        let mut session = Self {
            roster,
            format,
            catalog,
            best_of,
            bracket,
        };
        session.promote_if_ready();
        session
    }

    pub fn roster(&self) -> &[Entrant] {
        &self.roster
    }

    pub fn format(&self) -> &FormatSpec {
        &self.format
    }

    pub fn bracket(&self) -> &Bracket {
        &self.bracket
    }

    pub fn entrant(&self, id: &EntrantId) -> Option<&Entrant> {
        self.roster.iter().find(|e| &e.id == id)
    }

    /// Replace the roster and rebuild. Refused once any result is recorded.
    pub fn set_roster(&mut self, roster: Vec<Entrant>) -> Result<(), EngineError> {
        if self.bracket.has_results() {
            return Err(EngineError::ResultsRecorded);
        }
        self.roster = with_ids(roster);
        self.rebuild();
        Ok(())
    }

    /// Re-run the seeder over an updated roster.
    ///
    /// When the entrant set is unchanged only the seed map moves: match
    /// sources stay as built and group membership follows the seed slots.
    /// A different entrant set rebuilds the bracket.
    pub fn reseed(&mut self, roster: Vec<Entrant>) -> Result<(), EngineError> {
        if self.bracket.has_results() {
            return Err(EngineError::ResultsRecorded);
        }
        let roster = with_ids(roster);

        let mut current: Vec<&EntrantId> = self.roster.iter().map(|e| &e.id).collect();
        let mut updated: Vec<&EntrantId> = roster.iter().map(|e| &e.id).collect();
        current.sort();
        updated.sort();
        if current != updated {
            self.roster = roster;
            self.rebuild();
            return Ok(());
        }

        let order: Vec<EntrantId> = seed(&roster).into_iter().map(|e| e.id).collect();
        let previous = std::mem::replace(&mut self.bracket.seed_order, order);
        for group in &mut self.bracket.groups {
            for id in &mut group.player_ids {
                if let Some(slot) = previous.iter().position(|p| p == id) {
                    if let Some(moved) = self.bracket.seed_order.get(slot) {
                        *id = moved.clone();
                    }
                }
            }
        }
        self.roster = roster;
        info!("Reseeded {} entrants", self.roster.len());
        self.promote_if_ready();
        Ok(())
    }

    /// Record a score; a finished group stage promotes its playoffs.
    pub fn submit_score(
        &mut self,
        match_id: &MatchId,
        score_a: u32,
        score_b: u32,
        at: DateTime<Utc>,
    ) -> Result<Match, EngineError> {
        let m = scoring::submit_score(&mut self.bracket, match_id, score_a, score_b, &self.best_of, at)?;
        self.promote_if_ready();
        Ok(m)
    }

    /// Award a match by walkover.
    pub fn submit_walkover(
        &mut self,
        match_id: &MatchId,
        side: Side,
        at: DateTime<Utc>,
    ) -> Result<Match, EngineError> {
        let m = scoring::submit_walkover(&mut self.bracket, match_id, side, at)?;
        self.promote_if_ready();
        Ok(m)
    }

    pub fn clear_result(&mut self, match_id: &MatchId) -> Result<Match, EngineError> {
        scoring::clear_result(&mut self.bracket, match_id)
    }

    /// Apply one score log record.
    pub fn apply(&mut self, record: &ScoreRecord) -> Result<Match, EngineError> {
        match record.walkover {
            Some(side) => self.submit_walkover(&record.match_id, side, record.recorded_at),
            None => self.submit_score(
                &record.match_id,
                record.scores[0],
                record.scores[1],
                record.recorded_at,
            ),
        }
    }

    /// Rebuild from the roster and format, then apply `records` in order.
    ///
    /// Returns the number of records applied. Records that no longer fit the
    /// bracket are skipped.
    pub fn replay(&mut self, records: &[ScoreRecord]) -> usize {
        self.rebuild();
        let mut applied = 0;
        for record in records {
            match self.apply(record) {
                Ok(_) => applied += 1,
                Err(e) => warn!("Skipping score record for {}: {}", record.match_id, e),
            }
        }
        info!("Replayed {} of {} score records", applied, records.len());
        applied
    }

    /// Current participants of a match.
    pub fn participants(&self, match_id: &MatchId) -> Result<[Option<EntrantId>; 2], EngineError> {
        let m = self
            .bracket
            .match_by_id(match_id)
            .ok_or_else(|| EngineError::MatchNotFound(match_id.clone()))?;
        Ok(Resolver::new(&self.bracket).participants(m))
    }

    /// Standings of every group, in group order.
    pub fn standings(&self) -> Vec<Vec<StandingRow>> {
        calculate::all_standings(&self.bracket, &self.roster)
    }

    /// Promote the group stage into playoffs. See [`playoffs::promote_playoffs`].
    pub fn promote_playoffs(&mut self) -> bool {
        playoffs::promote_playoffs(&mut self.bracket, &self.roster, self.catalog.as_ref())
    }

    pub fn placements(&self) -> Option<BTreeMap<EntrantId, u32>> {
        calculate::placements(&self.bracket, self.roster.len())
    }

    pub fn snapshot(&self) -> BracketSnapshot {
        BracketSnapshot::from(&self.bracket)
    }

    fn rebuild(&mut self) {
        self.bracket = build_bracket(&self.roster, &self.format, self.catalog.as_ref());
        self.promote_if_ready();
    }

    /// Groups without matches are complete from the start, so this also
    /// runs straight after a build.
    fn promote_if_ready(&mut self) {
        if self.bracket.is_round_robin() {
            self.promote_playoffs();
        }
    }
}

fn with_ids(mut roster: Vec<Entrant>) -> Vec<Entrant> {
    for entrant in &mut roster {
        entrant.ensure_id();
    }
    roster
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchCoord, MatchStatus, PlayoffMode, RoundRobinSettings};
    use crate::templates::{NoTemplates, StaticCatalog};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn roster(n: usize) -> Vec<Entrant> {
        (1..=n)
            .map(|i| Entrant::new(format!("P{}", i), (100 - i) as i64, 0).with_id(format!("p{}", i)))
            .collect()
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap()
    }

    fn session(n: usize, format: FormatSpec) -> TournamentSession {
        TournamentSession::new(
            roster(n),
            format,
            Arc::new(StaticCatalog::bundled().unwrap()),
            BestOfDefaults::default(),
        )
    }

    fn id(s: &str) -> MatchId {
        MatchId::from(s)
    }

    fn ids(names: &[&str]) -> [Option<EntrantId>; 2] {
        [Some(EntrantId::from(names[0])), Some(EntrantId::from(names[1]))]
    }

    #[test]
    fn test_new_builds_bracket() {
        let session = session(8, FormatSpec::double_elimination());
        assert_eq!(session.bracket().winners.len(), 3);
        assert_eq!(session.participants(&id("W1-M1")).unwrap(), ids(&["p1", "p8"]));
        assert_eq!(
            session.participants(&id("W9-M1")),
            Err(EngineError::MatchNotFound(id("W9-M1")))
        );
    }

    #[test]
    fn test_roster_without_ids_gets_ids() {
        let roster = vec![Entrant::new("A".into(), 1, 0).with_id(""), Entrant::new("B".into(), 2, 0)];
        let session = TournamentSession::new(
            roster,
            FormatSpec::single_elimination(),
            Arc::new(NoTemplates),
            BestOfDefaults::default(),
        );
        assert!(session.roster().iter().all(|e| !e.id.is_empty()));
        assert_eq!(session.bracket().seed_order.len(), 2);
    }

    #[test]
    fn test_results_propagate_by_reading() {
        let mut session = session(4, FormatSpec::single_elimination());
        assert_eq!(session.participants(&id("W2-M1")).unwrap(), [None, None]);

        session.submit_score(&id("W1-M1"), 2, 0, at(0)).unwrap();
        session.submit_score(&id("W1-M2"), 0, 2, at(1)).unwrap();
        assert_eq!(session.participants(&id("W2-M1")).unwrap(), ids(&["p1", "p3"]));
    }

    #[test]
    fn test_roster_locked_after_results() {
        let mut session = session(4, FormatSpec::single_elimination());
        session.set_roster(roster(5)).unwrap();
        assert_eq!(session.bracket().seed_order.len(), 5);

        session.submit_score(&id("W1-M1"), 2, 0, at(0)).unwrap();
        assert_eq!(session.set_roster(roster(6)), Err(EngineError::ResultsRecorded));
        assert_eq!(session.reseed(roster(5)), Err(EngineError::ResultsRecorded));
    }

    #[test]
    fn test_reseed_moves_seed_map_only() {
        let mut session = session(4, FormatSpec::double_elimination());
        let sources_before: Vec<_> = session.bracket().all_matches().map(|m| m.sources).collect();

        // p4 jumps to the top of the rankings.
        let mut updated = roster(4);
        updated[3].ranking_score = 1000;
        session.reseed(updated).unwrap();

        let sources_after: Vec<_> = session.bracket().all_matches().map(|m| m.sources).collect();
        assert_eq!(sources_before, sources_after);
        assert_eq!(session.bracket().seed_order[0], EntrantId::from("p4"));
        assert_eq!(session.participants(&id("W1-M1")).unwrap(), ids(&["p4", "p3"]));
    }

    #[test]
    fn test_reseed_keeps_group_membership_by_slot() {
        let format = FormatSpec::round_robin(RoundRobinSettings {
            groups: 2,
            ..RoundRobinSettings::default()
        });
        let mut session = session(4, format);
        assert_eq!(
            session.bracket().groups[0].player_ids,
            vec![EntrantId::from("p1"), EntrantId::from("p3")]
        );

        let mut updated = roster(4);
        updated[1].ranking_score = 1000;
        session.reseed(updated).unwrap();

        // New seed order: p2, p1, p3, p4. Slots 1 and 3 form the first group.
        assert_eq!(
            session.bracket().groups[0].player_ids,
            vec![EntrantId::from("p2"), EntrantId::from("p3")]
        );
        assert_eq!(session.participants(&id("G1-M1")).unwrap(), ids(&["p2", "p3"]));
    }

    #[test]
    fn test_round_robin_promotes_automatically() {
        let format = FormatSpec::round_robin(RoundRobinSettings {
            groups: 2,
            advance_per_group: 1,
            playoffs: PlayoffMode::SingleElimination,
            best_of: 1,
        });
        let mut session = session(4, format);

        session.submit_score(&id("G1-M1"), 1, 0, at(0)).unwrap();
        assert!(session.bracket().playoffs.is_none());
        session.submit_score(&id("G2-M1"), 0, 1, at(1)).unwrap();

        let playoffs = session.bracket().playoffs.clone().unwrap();
        assert_eq!(
            playoffs.seeded_ids,
            vec![EntrantId::from("p1"), EntrantId::from("p4")]
        );
        assert_eq!(session.participants(&id("W1-M1")).unwrap(), ids(&["p1", "p4"]));
        assert_eq!(session.standings().len(), 2);
    }

    #[test]
    fn test_replay_matches_live_session() {
        let records = vec![
            ScoreRecord::score(id("W1-M1"), 2, 0, at(0)),
            ScoreRecord::score(id("W1-M2"), 2, 1, at(1)),
            ScoreRecord::score(id("W1-M1"), 0, 2, at(2)),
            ScoreRecord::walkover(id("L1-M1"), Side::A, at(3)),
            ScoreRecord::score(id("X9-M9"), 1, 0, at(4)),
        ];

        let mut live = session(4, FormatSpec::double_elimination());
        for record in &records {
            let _ = live.apply(record);
        }

        let mut replayed = session(4, FormatSpec::double_elimination());
        assert_eq!(replayed.replay(&records), 4);
        assert_eq!(replayed.bracket(), live.bracket());

        // Last write wins.
        let m = replayed.bracket().match_at(MatchCoord::winners(0, 0)).unwrap();
        assert_eq!(m.winner_id, Some(EntrantId::from("p4")));
        assert_eq!(m.updated_at, Some(at(2)));
    }

    #[test]
    fn test_replay_is_deterministic() {
        let records = vec![
            ScoreRecord::score(id("W1-M1"), 3, 0, at(0)),
            ScoreRecord::score(id("W1-M2"), 3, 0, at(1)),
        ];
        let mut a = session(6, FormatSpec::double_elimination());
        let mut b = session(6, FormatSpec::double_elimination());
        a.replay(&records);
        b.replay(&records);

        let json_a = serde_json::to_string(&a.snapshot()).unwrap();
        let json_b = serde_json::to_string(&b.snapshot()).unwrap();
        assert_eq!(json_a, json_b);
    }

    #[test]
    fn test_placements_after_final() {
        let mut session = session(2, FormatSpec::single_elimination());
        assert_eq!(session.placements(), None);

        let m = session.submit_score(&id("W1-M1"), 0, 3, at(0)).unwrap();
        assert_eq!(m.status, MatchStatus::Complete);

        let placed = session.placements().unwrap();
        assert_eq!(placed[&EntrantId::from("p2")], 1);
        assert_eq!(placed[&EntrantId::from("p1")], 2);
    }

    #[test]
    fn test_groups_without_matches_promote_on_build() {
        let format = FormatSpec::round_robin(RoundRobinSettings {
            groups: 3,
            advance_per_group: 1,
            playoffs: PlayoffMode::SingleElimination,
            best_of: 3,
        });
        let mut session = session(3, format);

        assert!(session.bracket().groups.iter().all(|g| g.matches.is_empty()));
        let playoffs = session.bracket().playoffs.clone().unwrap();
        assert_eq!(playoffs.seeded_ids.len(), 3);
        assert!(!session.bracket().winners.is_empty());
        assert!(!session.promote_playoffs());

        // Replay rebuilds and promotes again.
        assert_eq!(session.replay(&[]), 0);
        assert_eq!(session.bracket().playoffs, Some(playoffs));
    }

    #[test]
    fn test_huge_group_score_keeps_session_usable() {
        let format = FormatSpec::round_robin(RoundRobinSettings {
            groups: 1,
            advance_per_group: 2,
            playoffs: PlayoffMode::SingleElimination,
            best_of: 3,
        });
        let records = vec![
            ScoreRecord::score(id("G1-M1"), u32::MAX, 0, at(0)),
            ScoreRecord::score(id("G1-M2"), 2, 0, at(1)),
            ScoreRecord::score(id("G1-M3"), 2, 1, at(2)),
        ];
        let mut session = session(3, format);
        assert_eq!(session.replay(&records), 3);
        assert!(session.bracket().playoffs.is_some());

        let rows = &session.standings()[0];
        assert_eq!(rows[0].entrant_id, EntrantId::from("p1"));
        assert_eq!(rows[0].maps_for, u64::from(u32::MAX) + 2);
    }
}

//! Group standings.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Bracket, Entrant, EntrantId, Group, Match};
use crate::resolve::Resolver;

/// One ranked row of a group table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRow {
    pub entrant_id: EntrantId,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub maps_for: u64,
    pub maps_against: u64,
    pub map_diff: i64,
}

impl StandingRow {
    fn new(entrant_id: EntrantId, name: String) -> Self {
        Self {
            entrant_id,
            name,
            ..Default::default()
        }
    }

    fn add_maps(&mut self, won: u32, lost: u32) {
        self.maps_for = self.maps_for.saturating_add(u64::from(won));
        self.maps_against = self.maps_against.saturating_add(u64::from(lost));
    }
}

fn map_diff(maps_for: u64, maps_against: u64) -> i64 {
    let diff = i128::from(maps_for) - i128::from(maps_against);
    i64::try_from(diff).unwrap_or(if diff < 0 { i64::MIN } else { i64::MAX })
}

/// Ordering of standings rows: wins desc, losses asc, map differential desc,
/// maps for desc, name asc, then id asc so the order is total.
pub fn standing_order(a: &StandingRow, b: &StandingRow) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| a.losses.cmp(&b.losses))
        .then_with(|| b.map_diff.cmp(&a.map_diff))
        .then_with(|| b.maps_for.cmp(&a.maps_for))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.entrant_id.cmp(&b.entrant_id))
}

/// Ranked standings of one group.
///
/// Every member of the group gets a row, even before playing. Scores count
/// toward map totals as soon as they are recorded; a match counts as a win
/// only once scoring has completed it, which happens when the leader reaches
/// the best-of threshold. Completed walkovers count as a win without maps.
/// Map totals saturate rather than overflow on absurd scores.
pub fn standings(bracket: &Bracket, group: &Group, roster: &[Entrant]) -> Vec<StandingRow> {
    let resolver = Resolver::new(bracket);
    let name_of = |id: &EntrantId| -> String {
        roster
            .iter()
            .find(|e| &e.id == id)
            .map(|e| e.name.clone())
            .unwrap_or_default()
    };

    let mut rows: BTreeMap<EntrantId, StandingRow> = group
        .player_ids
        .iter()
        .map(|id| (id.clone(), StandingRow::new(id.clone(), name_of(id))))
        .collect();

    for m in &group.matches {
        let [Some(a), Some(b)] = resolver.participants(m) else {
            continue;
        };
        for id in [&a, &b] {
            rows.entry(id.clone())
                .or_insert_with(|| StandingRow::new(id.clone(), name_of(id)));
        }

        if let Some(winner) = decided_winner(&resolver, m, &a, &b) {
            let loser = if winner == a { &b } else { &a };
            if let Some(row) = rows.get_mut(&winner) {
                row.wins += 1;
            }
            if let Some(row) = rows.get_mut(loser) {
                row.losses += 1;
            }
        }

        if m.walkover.is_none() {
            let [score_a, score_b] = m.scores;
            if let Some(row) = rows.get_mut(&a) {
                row.add_maps(score_a, score_b);
            }
            if let Some(row) = rows.get_mut(&b) {
                row.add_maps(score_b, score_a);
            }
        }
    }

    let mut rows: Vec<StandingRow> = rows
        .into_values()
        .map(|mut row| {
            row.map_diff = map_diff(row.maps_for, row.maps_against);
            row
        })
        .collect();
    rows.sort_by(standing_order);
    rows
}

/// Standings of every group, in group order.
pub fn all_standings(bracket: &Bracket, roster: &[Entrant]) -> Vec<Vec<StandingRow>> {
    bracket
        .groups
        .iter()
        .map(|group| standings(bracket, group, roster))
        .collect()
}

/// Winner of a group match once scoring has completed it.
fn decided_winner(resolver: &Resolver<'_>, m: &Match, a: &EntrantId, b: &EntrantId) -> Option<EntrantId> {
    if !m.is_complete() {
        return None;
    }
    resolver.winner(m).filter(|winner| winner == a || winner == b)
}

//! Round-robin group stage.

use tracing::debug;

use crate::models::{
    Bracket, Entrant, EntrantId, Format, Group, GroupId, Match, MatchCoord, RoundRobinSettings,
    SourceSpec,
};

/// A seeded entrant assigned to a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSlot {
    pub entrant_id: EntrantId,
    pub seed: u32,
}

/// Split seeded entrants into `group_count` groups.
///
/// Entrants are dealt out in seed order, one per group in turn, so strength
/// is spread across groups and sizes differ by at most one. The group count
/// is clamped to `1..=entrants.len()` (at least one group).
pub fn create_groups(entrants: &[Entrant], group_count: usize) -> Vec<Vec<GroupSlot>> {
    let count = group_count.max(1).min(entrants.len().max(1));
    let mut groups: Vec<Vec<GroupSlot>> = vec![Vec::new(); count];

    for (idx, entrant) in entrants.iter().enumerate() {
        groups[idx % count].push(GroupSlot {
            entrant_id: entrant.id.clone(),
            seed: entrant.seed.unwrap_or(idx as u32 + 1),
        });
    }
    groups
}

/// Display name for the group at `idx`.
pub fn group_name(idx: usize, group_count: usize) -> String {
    if group_count > 26 {
        format!("Group {}", idx + 1)
    } else {
        let label = (b'A' + (idx % 26) as u8) as char;
        format!("Group {}", label)
    }
}

/// Every unordered pairing within a group, in slot order.
pub fn round_robin_matches(group_idx: usize, slots: &[GroupSlot], best_of: u32) -> Vec<Match> {
    let mut matches = Vec::with_capacity(slots.len() * slots.len().saturating_sub(1) / 2);
    for (i, a) in slots.iter().enumerate() {
        for b in &slots[i + 1..] {
            let coord = MatchCoord::group(group_idx, matches.len());
            matches.push(
                Match::new(coord, SourceSpec::seed(a.seed), SourceSpec::seed(b.seed))
                    .with_best_of(best_of),
            );
        }
    }
    matches
}

/// Build the group stage for seeded entrants. Playoffs are added later by promotion.
pub fn build_round_robin(entrants: &[Entrant], settings: &RoundRobinSettings) -> Bracket {
    let settings = settings.clone().normalize();
    let slots = create_groups(entrants, settings.groups);
    let group_count = slots.len();

    let groups: Vec<Group> = slots
        .iter()
        .enumerate()
        .map(|(idx, members)| Group {
            id: GroupId::new(format!("G{}", idx + 1)),
            name: group_name(idx, group_count),
            player_ids: members.iter().map(|s| s.entrant_id.clone()).collect(),
            matches: round_robin_matches(idx, members, settings.best_of),
        })
        .collect();

    debug!(
        "Built {} round-robin groups with {} matches for {} entrants",
        groups.len(),
        groups.iter().map(|g| g.matches.len()).sum::<usize>(),
        entrants.len()
    );

    let mut bracket = Bracket::empty(Format::RoundRobin);
    bracket.groups = groups;
    bracket.round_robin = Some(settings);
    bracket
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayoffMode;
    use crate::seeding::seed;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn entrants(n: usize) -> Vec<Entrant> {
        let roster: Vec<Entrant> = (1..=n)
            .map(|i| Entrant::new(format!("P{:02}", i), (100 - i) as i64, 0).with_id(format!("p{}", i)))
            .collect();
        seed(&roster)
    }

    fn settings(groups: usize) -> RoundRobinSettings {
        RoundRobinSettings {
            groups,
            advance_per_group: 2,
            playoffs: PlayoffMode::SingleElimination,
            best_of: 3,
        }
    }

    #[test]
    fn test_groups_spread_seeds() {
        let groups = create_groups(&entrants(8), 2);
        let seeds: Vec<Vec<u32>> = groups
            .iter()
            .map(|g| g.iter().map(|s| s.seed).collect())
            .collect();
        assert_eq!(seeds, vec![vec![1, 3, 5, 7], vec![2, 4, 6, 8]]);
    }

    #[test]
    fn test_group_sizes_differ_by_at_most_one() {
        for n in 0..=40 {
            for count in 1..=9 {
                let groups = create_groups(&entrants(n), count);
                let sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
                let max = sizes.iter().copied().max().unwrap_or(0);
                let min = sizes.iter().copied().min().unwrap_or(0);
                assert!(max - min <= 1, "n={} groups={} sizes={:?}", n, count, sizes);
                assert_eq!(sizes.iter().sum::<usize>(), n);
            }
        }
    }

    #[test]
    fn test_group_count_clamped() {
        assert_eq!(create_groups(&entrants(3), 8).len(), 3);
        assert_eq!(create_groups(&entrants(5), 0).len(), 1);
        assert_eq!(create_groups(&[], 4).len(), 1);
    }

    #[test]
    fn test_every_pair_plays_once() {
        for size in 0..=9usize {
            let slots: Vec<GroupSlot> = (1..=size as u32)
                .map(|seed| GroupSlot {
                    entrant_id: EntrantId::new(format!("p{}", seed)),
                    seed,
                })
                .collect();
            let matches = round_robin_matches(0, &slots, 3);
            assert_eq!(matches.len(), size * size.saturating_sub(1) / 2);

            let pairs: HashSet<(SourceSpec, SourceSpec)> = matches
                .iter()
                .map(|m| (m.sources[0], m.sources[1]))
                .collect();
            assert_eq!(pairs.len(), matches.len());
            assert!(matches.iter().all(|m| m.best_of == Some(3)));
        }
    }

    #[test]
    fn test_build_round_robin() {
        let bracket = build_round_robin(&entrants(6), &settings(2));

        assert_eq!(bracket.format, Format::RoundRobin);
        assert_eq!(bracket.groups.len(), 2);
        assert_eq!(bracket.groups[0].id.as_str(), "G1");
        assert_eq!(bracket.groups[1].name, "Group B");
        assert_eq!(
            bracket.groups[0].player_ids,
            vec![EntrantId::from("p1"), EntrantId::from("p3"), EntrantId::from("p5")]
        );
        assert_eq!(bracket.groups[1].matches[2].id.as_str(), "G2-M3");
        assert!(bracket.winners.is_empty());
        assert!(bracket.playoffs.is_none());
        assert_eq!(bracket.round_robin, Some(settings(2)));
    }

    #[test]
    fn test_group_names_past_alphabet() {
        assert_eq!(group_name(0, 4), "Group A");
        assert_eq!(group_name(25, 26), "Group Z");
        assert_eq!(group_name(26, 30), "Group 27");
    }
}

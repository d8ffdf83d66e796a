//! Seeding: entrant ordering, core bracket size, and slot placement.
//!
//! - `seed` ranks entrants and assigns seeds 1..N
//! - `base_size` picks the core bracket size, which decides between
//!   play-in matches (entrants above the core) and byes (below it)
//! - `seed_positions` lays seeds into bracket slots so the top seeds
//!   cannot meet early

use std::cmp::Ordering;

use crate::models::Entrant;

/// Ranking order: primary score desc, secondary score desc, name asc.
///
/// Id is the last tie-break so the order is total even for duplicate names.
pub fn ranking_order(a: &Entrant, b: &Entrant) -> Ordering {
    b.ranking_score
        .cmp(&a.ranking_score)
        .then(b.secondary_ranking_score.cmp(&a.secondary_ranking_score))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort entrants into seed order and assign `seed = position + 1`.
pub fn seed(entrants: &[Entrant]) -> Vec<Entrant> {
    let mut seeded = entrants.to_vec();
    seeded.sort_by(ranking_order);
    for (idx, entrant) in seeded.iter_mut().enumerate() {
        entrant.seed = Some(idx as u32 + 1);
    }
    seeded
}

/// Smallest power of two >= n (1 for n <= 1).
pub fn pow2(n: usize) -> usize {
    if n <= 1 {
        1
    } else {
        n.next_power_of_two()
    }
}

/// Core bracket size for `total` entrants.
pub fn base_size(total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    if total <= 4 {
        return pow2(total).max(2);
    }
    // One bye into a 32 core beats fifteen play-ins into a 16 core.
    if total == 31 {
        return 32;
    }
    if (12..=15).contains(&total) {
        return 8;
    }
    if total > 16 && total < 32 {
        return 16;
    }

    let lower = 1usize << (usize::BITS - 1 - total.leading_zeros());
    let upper = lower * 2;
    let lower_gap = total - lower;
    let upper_gap = upper - total;
    if lower_gap <= upper_gap {
        lower
    } else {
        upper
    }
}

/// Number of play-in matches needed to reduce `total` to its core size.
pub fn play_in_count(total: usize) -> usize {
    total.saturating_sub(base_size(total))
}

/// Number of byes in the core for `total` entrants.
pub fn bye_count(total: usize) -> usize {
    base_size(total).saturating_sub(total)
}

/// Seed order across bracket slots, e.g. `[1, 8, 4, 5, 2, 7, 3, 6]` for 8.
///
/// Non-power-of-two sizes are built at the next power of two and truncated.
pub fn seed_positions(size: usize) -> Vec<u32> {
    if size == 0 {
        return Vec::new();
    }
    let full = pow2(size);
    let mut seeds = build_positions(full);
    seeds.truncate(size);
    seeds
}

fn build_positions(n: usize) -> Vec<u32> {
    match n {
        1 => vec![1],
        2 => vec![1, 2],
        _ => {
            let half = build_positions(n / 2);
            let top = n as u32 + 1;
            half.iter().flat_map(|&s| [s, top - s]).collect()
        }
    }
}

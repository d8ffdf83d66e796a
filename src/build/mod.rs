//! Bracket builders.
//!
//! Builders turn a seeded roster into a match graph whose sources refer to
//! seeds and earlier matches by coordinate. Building never fails: an empty
//! roster yields an empty bracket, and missing or malformed templates fall
//! back to the generic pairing algorithms.

mod elimination;
mod losers;
mod round_robin;

pub use elimination::build_elimination;
pub use losers::build_losers;
pub use round_robin::{build_round_robin, create_groups, group_name, round_robin_matches, GroupSlot};

use tracing::info;

use crate::models::{Bracket, Entrant, Format, FormatSpec};
use crate::seeding::seed;
use crate::templates::TemplateCatalog;

/// Seed `roster` and build the bracket for `format`.
pub fn build_bracket(roster: &[Entrant], format: &FormatSpec, catalog: &dyn TemplateCatalog) -> Bracket {
    let seeded = seed(roster);

    let mut bracket = match format.format {
        Format::RoundRobin => build_round_robin(&seeded, &format.round_robin_settings()),
        Format::SingleElimination | Format::DoubleElimination => {
            let mut bracket = Bracket::empty(format.format);
            bracket.set_elimination(build_elimination(
                &seeded,
                format.format.includes_losers(),
                catalog,
            ));
            bracket
        }
    };
    bracket.seed_order = seeded.iter().map(|e| e.id.clone()).collect();

    info!(
        "Built {} bracket for {} entrants ({} matches, catalog: {})",
        format.format,
        seeded.len(),
        bracket.all_matches().count(),
        catalog.name()
    );
    bracket
}

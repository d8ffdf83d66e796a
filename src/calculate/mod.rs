//! Derived results computed from a bracket.
//!
//! - Group standings with the full tie-break chain
//! - Final placements once an elimination bracket is decided
//!
//! Nothing here mutates the bracket; every value is read through the resolver.

mod placements;
mod standings;

pub use placements::placements;
pub use standings::{all_standings, standing_order, standings, StandingRow};

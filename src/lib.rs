//! # Bracket Engine
//!
//! A deterministic tournament bracket engine: seeding, single and double
//! elimination brackets, round-robin groups with playoffs, and the
//! derived results (standings and placements) read from them.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (entrants, matches, sources, brackets)
//! - **seeding**: Ranking order, base sizes and standard seed positions
//! - **templates**: Hand-authored bracket layouts keyed by entrant count
//! - **build**: Elimination, losers and round-robin builders
//! - **resolve**: Pull-based participant resolution through match sources
//! - **scoring**: Score and walkover submission
//! - **playoffs**: Group stage to playoff promotion
//! - **calculate**: Standings and placements
//! - **session**: A tournament in progress, the entry point for callers
//! - **storage**: Roster, score log and bracket snapshots on disk
//! - **config**: Configuration loading and validation
//!
//! Match results are never pushed forward. Every match names where its two
//! participants come from, and the resolver reads them on demand, so a
//! corrected score anywhere in the bracket is reflected everywhere at once.

pub mod build;
pub mod calculate;
pub mod config;
pub mod error;
pub mod models;
pub mod playoffs;
pub mod resolve;
pub mod scoring;
pub mod seeding;
pub mod session;
pub mod storage;
pub mod templates;

pub use error::EngineError;
pub use models::*;
pub use resolve::Resolver;
pub use session::TournamentSession;

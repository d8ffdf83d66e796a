//! Core data models for the bracket engine.

mod bracket;
mod entrant;
mod format;
mod ids;
mod match_record;
mod score;
mod source;

pub use bracket::*;
pub use entrant::*;
pub use format::*;
pub use ids::*;
pub use match_record::*;
pub use score::*;
pub use source::*;

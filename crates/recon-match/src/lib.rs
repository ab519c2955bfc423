//! Approximate record linkage between a source and a target catalog.
//!
//! The [`score`] function is the sole equivalence signal; the
//! [`MatchEngine`] computes the initial automatic alignment, derives
//! ranked suggestions for anything left unaligned, and exposes the
//! state-transition commands an operator uses to confirm, override, or
//! reject proposals while the one-to-one source/target invariant holds.

pub mod engine;
pub mod error;
pub mod repository;
pub mod score;

pub use engine::{
    CatalogDelta, CommandStatus, MatchEngine, MatchListing, MatchSummary, Suggestion,
};
pub use error::MatchError;
pub use repository::{MatchRepository, MatchSetMetadata, StoredMatchSet};
pub use score::{ConfidenceLevel, ConfidenceThresholds, score};

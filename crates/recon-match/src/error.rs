//! Error types for match-engine commands.

use thiserror::Error;

/// Rejected commands. Not-found conditions are deliberately not errors;
/// they surface as [`crate::engine::CommandStatus::NoOp`] instead so the
/// engine tolerates stale host state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MatchError {
    /// The target record is already paired with a different source record.
    #[error("target '{target_id}' is already matched to source '{claimed_by}'")]
    TargetAlreadyClaimed {
        target_id: String,
        claimed_by: String,
    },
    /// A record with the same name already exists in the target category.
    #[error("a record named '{name}' already exists in target category '{category_id}'")]
    DuplicateName { name: String, category_id: String },
}

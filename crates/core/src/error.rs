use std::time::Duration;

use thiserror::Error;

/// Errors raised by a row source or sink while talking to the backing sheet.
///
/// Cloneable so that one failed refresh attempt can be handed to every caller
/// that was waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Spreadsheet or worksheet does not exist.
    #[error("source not found: {0}")]
    NotFound(String),

    /// Credentials were rejected.
    #[error("source rejected credentials: {0}")]
    Unauthorized(String),

    /// Transport failure or unexpected status.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The call did not finish within the configured deadline.
    #[error("source timed out after {0:?}")]
    Timeout(Duration),

    /// Response body did not have the expected shape.
    #[error("malformed source response: {0}")]
    Malformed(String),
}

impl SourceError {
    /// Whether this error is likely transient (worth retrying on next access).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

/// Reasons a single verified row could not be turned into a `TutorRecord`.
///
/// These are per-row and never abort a refresh.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("row {row}: missing tutor name")]
    MissingName { row: usize },

    #[error("row {row}: duplicate profile id '{profile_id}'")]
    DuplicateProfileId { row: usize, profile_id: String },
}

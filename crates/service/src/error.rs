//! Typed error enum for the service layer.
//!
//! Separates failures of the backing sheet (`SourceUnavailable`) from the
//! conditions surfaced to HTTP callers (`NotFound`, `ServiceUnavailable`,
//! `InvalidInput`, `Duplicate`).

use aplus_core::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Row source fetch, append or auth failed. The previous snapshot is kept.
    #[error("source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    /// No tutor with this profile id in the current snapshot.
    #[error("tutor '{profile_id}' not found")]
    NotFound { profile_id: String },

    /// No snapshot was ever published and the refresh just failed.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Caller provided invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A registration with the same id card already exists.
    #[error("duplicate: {0}")]
    Duplicate(String),
}

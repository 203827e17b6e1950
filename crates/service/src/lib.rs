//! Service layer for the tutor directory
//!
//! Owns the cached directory snapshot and the business rules sitting between
//! the HTTP handlers and the spreadsheet row source.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]

mod directory_cache;
mod error;
mod jobs;
mod query_service;
mod registration;
#[cfg(test)]
mod test_support;

pub use directory_cache::{DirectoryCache, RefreshOutcome, RefreshReport, Snapshot};
pub use error::ServiceError;
pub use jobs::{JOBS_UNAVAILABLE, JobBoardService};
pub use query_service::{
    DIRECTORY_UNAVAILABLE, DirectoryQueryService, DirectoryStatus, PageRequest, TutorFilter,
    TutorPage,
};
pub use registration::{RegistrationInput, RegistrationReceipt, RegistrationService};

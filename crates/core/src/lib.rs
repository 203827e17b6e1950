//! Core types and traits for the tutor directory
//!
//! This crate contains the domain types shared across all other crates: the
//! canonical `TutorRecord`, the row-to-record mapping and the row source traits.

mod columns;
mod constants;
mod env_config;
mod error;
mod id_card;
mod normalize;
mod row_source;
mod tutor;

pub use columns::*;
pub use constants::*;
pub use env_config::*;
pub use error::*;
pub use id_card::*;
pub use normalize::*;
pub use row_source::*;
pub use tutor::*;

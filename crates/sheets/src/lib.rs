//! Google Sheets row source for the tutor directory
//!
//! Reads worksheets (tutors, jobs) through the Sheets v4 `values` API and appends
//! new registrations to it. Credentials are a pre-issued bearer token.

mod client;
mod values;

pub use client::{DEFAULT_API_URL, SheetsClient, SheetsConfig};

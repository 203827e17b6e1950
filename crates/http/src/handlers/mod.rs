#![allow(clippy::single_call_fn, reason = "HTTP handlers are called once from router")]

pub mod admin;
pub mod jobs;
pub mod registration;
pub mod tutors;

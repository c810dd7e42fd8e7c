//! Domain models for FormHub.
//!
//! These are the core types shared across all crates. Wire names are
//! camelCase to match what the browser client sends and expects.

pub mod form;
pub mod revision;
pub mod submission;
pub mod user;

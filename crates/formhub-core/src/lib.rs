//! FormHub Core — domain models, error taxonomy, repository traits and
//! the access-scoping policy shared by every other crate.

pub mod error;
pub mod models;
pub mod policy;
pub mod repository;

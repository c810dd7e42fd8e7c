//! FormHub Forms — form and submission workflows on top of the
//! repository traits and the access-scoping policy.

pub mod service;
pub mod validation;

pub use service::FormService;

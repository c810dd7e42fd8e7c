//! FormHub Server — configuration, logging bootstrap and the HTTP API.

pub mod api;
pub mod config;
pub mod state;

pub use api::router;
pub use config::{LogFormat, ServerConfig};
pub use state::AppState;

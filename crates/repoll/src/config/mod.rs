//! Configuration types and loading

mod loader;
mod types;

pub(crate) use types::duration_to_ms;
pub use types::{BackoffConfig, PollerConfig};

//! retail-core: Shared infrastructure for the retail service.
pub mod error;
pub mod observability;

pub use anyhow;
pub use tracing;

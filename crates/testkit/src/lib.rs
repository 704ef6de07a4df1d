//! # faultline-testkit
//!
//! Test helpers, recording adapters, and violation fixtures.
//! This crate depends on `ports`, `domain`, and `shared`.

pub mod in_memory;
pub mod violations;

pub use in_memory::{NoopLogger, RecordingLogger};

/// Returns the testkit crate version.
#[must_use]
pub const fn testkit_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

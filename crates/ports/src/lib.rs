//! # faultline-ports
//!
//! Port traits for the faultline hexagonal architecture.
//!
//! This crate defines the interfaces between the mapping/validation glue and
//! the engines it wraps. It depends only on `domain` and `shared`.

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod codec;
pub mod logger;
pub mod validation;

pub use codec::*;
pub use logger::*;
pub use validation::*;

// Re-export selected domain types used in port signatures, so adapter crates
// can implement ports without directly depending on `faultline-domain`.
pub use faultline_domain::{
    EntityValue, JsonFailure, JsonFailureKind, MethodDescriptor, ValidationGroup, ViolationSet,
};

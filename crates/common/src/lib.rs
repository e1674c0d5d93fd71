//! Domain-agnostic utilities shared across EagleView crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: payload hydration into typed shapes
//! - `runtime`: resilience (clock abstraction, bounded polling retry)
//! - `observability`: tracing output from runtime modules

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod hydrate;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use hydrate::{
    canonical_field_name, hydrate, hydrate_collection, hydrate_map, FillFn, Fillers, HydrationError,
    HydrationResult, Resource, Shape,
};
#[cfg(feature = "runtime")]
pub use resilience::{
    retry_until, Clock, MockClock, RetryError, RetryPolicy, RetryResult, SystemClock, Truthy,
};

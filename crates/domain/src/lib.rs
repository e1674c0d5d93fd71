//! # EagleView Domain
//!
//! Data types shared by every EagleView SDK crate.
//!
//! This crate contains:
//! - Access tokens, grant responses and client credentials
//! - The closed set of measurement request types
//! - Client configuration structures
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other EagleView crates
//! - No I/O: everything here is plain data plus pure functions

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;

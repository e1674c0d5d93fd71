//! # EagleView Infrastructure
//!
//! Everything in the SDK that touches the network or the filesystem.
//!
//! This crate contains:
//! - The blocking HTTP transport (reqwest) behind the `HttpTransport` trait
//! - Request execution, error classification and token grants
//! - The `EagleView` client and its domain endpoints
//! - Configuration loading from environment variables and files
//!
//! ## Architecture
//! - Depends on `eagleview-domain` for data types and `eagleview-common`
//!   for hydration and polling
//! - Contains all "impure" code (I/O)

#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod errors;
pub mod http;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used items
pub use api::{ApiError, ApiErrorCategory, EagleView, Payload, Product, RequestOptions, Session};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder, HttpTransport};

//! EagleView API client
//!
//! This module provides the blocking client for the EagleView
//! measurement-ordering API: token grants, single-call request execution,
//! error classification, and the domain endpoints built on top of them.
//!
//! # Architecture
//!
//! - `executor` sends one call through an `HttpTransport` and classifies failures
//! - `auth` issues and refreshes tokens through the same executor
//! - `client` composes both and owns the session
//! - `actions` and `resources` add the domain endpoints and their shapes
//!
//! Nothing here retries on its own; polling goes through
//! [`EagleView::retry_policy`].

pub mod actions;
pub mod auth;
pub mod classifier;
pub mod client;
pub mod errors;
pub mod executor;
pub mod resources;

pub use auth::TokenManager;
pub use classifier::{classify, classify_parts};
pub use client::{EagleView, Session};
pub use errors::{ApiError, ApiErrorCategory};
pub use executor::{BodyEncoding, Payload, RequestExecutor, RequestOptions};
pub use resources::Product;

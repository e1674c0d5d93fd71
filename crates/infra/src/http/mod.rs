//! HTTP transport layer
//!
//! `HttpClient` is the production transport (blocking reqwest); tests swap
//! in any other [`HttpTransport`].

pub mod client;
pub mod query;
pub mod transport;

pub use client::{HttpClient, HttpClientBuilder};
pub use query::flatten_query;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, RequestBody};

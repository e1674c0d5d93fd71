//! Domain types and models

pub mod credentials;
pub mod measurement;
pub mod token;

pub use credentials::Credentials;
pub use measurement::MeasurementRequest;
pub use token::{parse_timestamp, Token, TokenResponse};

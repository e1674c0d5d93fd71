//! Resilience patterns for polling remote resources
//!
//! - **Clock**: time abstraction so waits and expiry checks are testable
//!   without real delays (`MockClock`)
//! - **Retry**: constant-interval polling bounded by a wall-clock timeout,
//!   ending as soon as the producer yields a truthy value
//!
//! Waits are constant; there is no backoff.

pub mod clock;
pub mod retry;
pub mod truthy;

pub use clock::{Clock, MockClock, SystemClock};
pub use retry::{retry_until, RetryError, RetryPolicy, RetryResult, DEFAULT_RETRY_INTERVAL};
pub use truthy::Truthy;

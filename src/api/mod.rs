//! HTTP access to the remote process API.
//!
//! [`ProcessApi`] is the seam the sync engine is written against;
//! [`ApiClient`] is the reqwest implementation used at runtime.

pub mod client;
pub mod credentials;
pub mod error;

pub use client::{ApiClient, HealthStatus, ProcessApi};
pub use credentials::Credentials;
pub use error::{ApiError, ReadFailure};

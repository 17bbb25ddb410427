//! Authenticated HTTP client for the Nexus API.
//!
//! `ApiClient` attaches the session's bearer token to every request and
//! recovers from an expired token with a single refresh-and-retry. The
//! `Transport` trait is the seam between the client and the wire.

pub mod client;
pub mod error;
pub mod transport;

pub use client::ApiClient;
pub use error::ApiError;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

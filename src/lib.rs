//! Client library for the Nexus business-admin API.
//!
//! The crate centers on [`ApiClient`], which attaches the current session's
//! bearer token to every outgoing request and transparently recovers from an
//! expired access token: on a 401 it performs a single refresh call and
//! retries the original request exactly once. A refresh that fails ends the
//! session and broadcasts a logout signal that observers can subscribe to
//! through [`Session::subscribe`].
//!
//! The long-lived refresh credential is an HTTP-only cookie managed by the
//! transport layer; this crate never reads or writes it directly.

pub mod api;
pub mod auth;
pub mod config;

pub use api::{ApiClient, ApiError, ApiRequest, ApiResponse, HttpTransport, Transport};
pub use auth::{
    AddUserRequest, AddUserResponse, AuthOutcome, AuthService, LoginRequest, OrganizationResponse,
    PeopleResponse, Session, SignupRequest, User, UserRole,
};
pub use config::Config;

//! Authentication: session state and IAM auth flows.
//!
//! This module provides:
//! - `Session`: in-memory access-token store with a logout broadcast
//! - `AuthService`: login, signup, and admin user-management flows
//!
//! Tokens live only in memory and are never persisted; the long-lived
//! refresh credential is an HTTP-only cookie the transport layer manages.

pub mod service;
pub mod session;

pub use service::{
    AddUserRequest, AddUserResponse, AuthOutcome, AuthService, LoginRequest, OrganizationResponse,
    PeopleResponse, SignupRequest, User, UserRole,
};
pub use session::Session;

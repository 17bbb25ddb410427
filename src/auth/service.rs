//! Authentication flows against the Nexus IAM service.
//!
//! `AuthService` wraps an [`ApiClient`] and manages the session token around
//! login, signup, and logout. The backend sets the refresh credential as an
//! HTTP-only cookie on login; only the short-lived access token is handled
//! here.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::ApiClient;

/// Wire representation of an account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
    #[serde(rename = "ROLE_DIRECTOR")]
    Director,
    #[serde(rename = "ROLE_PRODUCT_MANAGER")]
    ProductManager,
    #[serde(rename = "ROLE_CLERK")]
    Clerk,
    #[serde(rename = "ROLE_ACCOUNT_MANAGER")]
    AccountManager,
    #[serde(rename = "ROLE_OPERATION_MANAGER")]
    OperationManager,
    #[serde(rename = "ROLE_WAREHOUSE_MANAGER")]
    WarehouseManager,
    #[serde(rename = "ROLE_FLEET_MANAGER")]
    FleetManager,
    #[serde(rename = "ROLE_DRIVER")]
    Driver,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    /// Sent as an empty string when absent, matching the backend contract.
    pub profile_photo: String,
}

/// Raw auth payload as the IAM service returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiAuthResponse {
    access_token: String,
    token_type: String,
    expires_in: i64,
    user_id: String,
    #[serde(default)]
    org_id: Option<String>,
    name: String,
    role: UserRole,
    email: String,
}

/// Signed-in account identity, assembled from the auth response.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub org_id: Option<String>,
}

/// Outcome of a successful login or signup.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub access_token: String,
    pub token_type: String,
    /// Token validity in seconds. Informational only; the client relies on
    /// reactive 401 detection rather than a timer.
    pub expires_in: i64,
    pub user: User,
}

impl ApiAuthResponse {
    fn into_outcome(self) -> AuthOutcome {
        AuthOutcome {
            access_token: self.access_token,
            token_type: self.token_type,
            expires_in: self.expires_in,
            user: User {
                id: self.user_id,
                email: self.email,
                name: self.name,
                role: self.role,
                org_id: self.org_id,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub joining_date: NaiveDate,
    pub salary: f64,
    pub address: String,
    pub notes: String,
    pub role: UserRole,
    pub org_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserResponse {
    pub email: String,
    /// Generated initial password for the new account.
    pub password: String,
    pub message: String,
    pub user_id: String,
}

/// Confirmation payload for the people-creation endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PeopleResponse {
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationResponse {
    pub org_id: i64,
    pub org_name: String,
    pub org_type: String,
    pub trust_score: i64,
    pub created_at: String,
}

/// High-level auth flows over the refreshing [`ApiClient`].
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Sign in with email and password. Installs the returned access token
    /// in the session on success; clears any stale token on failure.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthOutcome> {
        match self
            .client
            .post::<ApiAuthResponse, _>("/iam/auth/login", credentials)
            .await
        {
            Ok(raw) => {
                self.client.session().set_token(raw.access_token.clone());
                debug!(user = %raw.name, "login succeeded");
                Ok(raw.into_outcome())
            }
            Err(err) => {
                self.client.session().clear_token();
                Err(err.context("Login failed"))
            }
        }
    }

    /// Register a new account. Same token handling as [`login`](Self::login).
    pub async fn signup(&self, data: &SignupRequest) -> Result<AuthOutcome> {
        match self
            .client
            .post::<ApiAuthResponse, _>("/iam/auth/register", data)
            .await
        {
            Ok(raw) => {
                self.client.session().set_token(raw.access_token.clone());
                debug!(user = %raw.name, "signup succeeded");
                Ok(raw.into_outcome())
            }
            Err(err) => {
                self.client.session().clear_token();
                Err(err.context("Signup failed"))
            }
        }
    }

    /// Access tokens are stateless JWTs, so logout is purely local: drop the
    /// in-memory token. No logout signal is broadcast for a user-initiated
    /// logout; the signal is reserved for involuntary session termination.
    pub fn logout(&self) {
        self.client.session().clear_token();
    }

    /// Create an organization owned by `user_id`.
    pub async fn create_organization(
        &self,
        user_id: &str,
        org_name: &str,
        org_type: &str,
    ) -> Result<OrganizationResponse> {
        let path = format!("/iam/organizations/add?member={}", user_id);
        let body = serde_json::json!({
            "orgName": org_name,
            "orgType": org_type,
            "trustScore": 0,
        });
        self.client
            .post(&path, &body)
            .await
            .context("Organization creation failed")
    }

    /// Add an employee account to an organization. The backend generates the
    /// initial password and returns it in the response.
    pub async fn add_user(&self, new_user: &AddUserRequest) -> Result<AddUserResponse> {
        self.client
            .post("/iam/users/add", new_user)
            .await
            .context("Add user failed")
    }

    /// Attach a people record with the given role to an existing account.
    pub async fn create_people(&self, user_id: &str, role: UserRole) -> Result<PeopleResponse> {
        let body = serde_json::json!({
            "userId": user_id,
            "role": role,
        });
        self.client
            .post("/iam/people/create", &body)
            .await
            .context("People creation failed")
    }

    /// Attach a people record tied to an organization; used when onboarding
    /// the founding member right after [`create_organization`](Self::create_organization).
    pub async fn create_people_with_org(
        &self,
        user_id: &str,
        org_id: i64,
        role: UserRole,
    ) -> Result<PeopleResponse> {
        let body = serde_json::json!({
            "userId": user_id,
            "orgId": org_id,
            "role": role,
        });
        self.client
            .post("/iam/people/create-with-org", &body)
            .await
            .context("People creation with org failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_auth_response() {
        let json = r#"{
            "accessToken": "eyJhbGciOiJIUzI1NiJ9.e30.sig",
            "refreshToken": "opaque",
            "tokenType": "Bearer",
            "expiresIn": 900,
            "userId": "u-42",
            "orgId": "org-7",
            "name": "Amina Diallo",
            "role": "ROLE_OPERATION_MANAGER",
            "email": "amina@example.com"
        }"#;

        let raw: ApiAuthResponse =
            serde_json::from_str(json).expect("Failed to parse auth test JSON");
        let outcome = raw.into_outcome();

        assert_eq!(outcome.access_token, "eyJhbGciOiJIUzI1NiJ9.e30.sig");
        assert_eq!(outcome.token_type, "Bearer");
        assert_eq!(outcome.expires_in, 900);
        assert_eq!(outcome.user.id, "u-42");
        assert_eq!(outcome.user.org_id.as_deref(), Some("org-7"));
        assert_eq!(outcome.user.role, UserRole::OperationManager);
    }

    #[test]
    fn auth_response_tolerates_missing_org() {
        let json = r#"{
            "accessToken": "t",
            "tokenType": "Bearer",
            "expiresIn": 900,
            "userId": "u-1",
            "name": "n",
            "role": "ROLE_ADMIN",
            "email": "n@example.com"
        }"#;

        let raw: ApiAuthResponse =
            serde_json::from_str(json).expect("Failed to parse auth test JSON");
        assert_eq!(raw.org_id, None);
    }

    #[test]
    fn add_user_request_uses_wire_field_names() {
        let req = AddUserRequest {
            name: "Jon Ali".to_string(),
            email: "jon@example.com".to_string(),
            phone: "555-0100".to_string(),
            joining_date: NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date"),
            salary: 52000.0,
            address: "12 Dock Rd".to_string(),
            notes: String::new(),
            role: UserRole::Clerk,
            org_id: "org-7".to_string(),
        };

        let value = serde_json::to_value(&req).expect("Failed to serialize add-user request");
        assert_eq!(value["joiningDate"], "2026-03-01");
        assert_eq!(value["orgId"], "org-7");
        assert_eq!(value["role"], "ROLE_CLERK");
    }
}

//! Wire types for the identity service

use serde::{Deserialize, Serialize};
use tessera_core::{Credentials, RegistrationForm, SessionTokens, UserProfile};

/// Login request
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub cedula: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a Credentials> for LoginRequest<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            cedula: &credentials.cedula,
            password: &credentials.password,
        }
    }
}

/// Login response envelope
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub data: LoginData,
}

/// Token payload of a login response
#[derive(Deserialize)]
pub struct LoginData {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl std::fmt::Debug for LoginData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginData")
            .field("expires_in", &self.expires_in)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// Registration request
#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub cedula: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
}

impl<'a> From<&'a RegistrationForm> for RegisterRequest<'a> {
    fn from(form: &'a RegistrationForm) -> Self {
        Self {
            cedula: &form.cedula,
            first_name: &form.first_name,
            last_name: &form.last_name,
            phone: &form.phone,
            address: &form.address,
            password: &form.password,
            confirm_password: &form.confirm_password,
        }
    }
}

/// Registration confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Refresh request
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest<'a> {
    pub refresh_token: &'a str,
}

/// Refresh response
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Token verification response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTokenResponse {
    pub is_valid: bool,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl VerifyTokenResponse {
    /// The answer when there is nothing to verify
    pub fn invalid() -> Self {
        Self {
            is_valid: false,
            user: None,
        }
    }
}

/// Error body returned by the identity service
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Tokens issued by login or refresh, before they are stored
#[derive(Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    pub user: Option<UserProfile>,
}

impl std::fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGrant")
            .field("expires_in", &self.expires_in)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl From<LoginResponse> for TokenGrant {
    fn from(response: LoginResponse) -> Self {
        let LoginData {
            access_token,
            refresh_token,
            expires_in,
            user,
        } = response.data;
        Self {
            access_token,
            refresh_token,
            expires_in,
            user,
        }
    }
}

impl From<RefreshTokenResponse> for TokenGrant {
    fn from(response: RefreshTokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_in: response.expires_in,
            user: None,
        }
    }
}

/// A stored session and, when known, who it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionGrant {
    #[serde(skip)]
    pub tokens: SessionTokens,
    pub expires_at: i64,
    pub user: Option<UserProfile>,
}

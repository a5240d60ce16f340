//! Authentication API client methods

use super::{ApiRequest, AuthClient, ClientError};
use crate::types::{
    LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse, RegisterRequest,
    RegisterResponse, TokenGrant, VerifyTokenResponse,
};
use tessera_core::validation::{validate_login, validate_registration};
use tessera_core::{Credentials, RegistrationForm};

impl AuthClient {
    /// Exchange credentials for tokens. Does not store them.
    ///
    /// Credentials that fail validation are rejected without a request.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenGrant, ClientError> {
        validate_login(credentials)?;
        let request = ApiRequest::post("/auth/login").json(&LoginRequest::from(credentials))?;
        let response: LoginResponse = self.execute(request).await?;
        Ok(response.into())
    }

    /// Create an account, after validating the form locally
    pub async fn register(&self, form: &RegistrationForm) -> Result<RegisterResponse, ClientError> {
        validate_registration(form)?;
        let request = ApiRequest::post("/auth/register").json(&RegisterRequest::from(form))?;
        self.execute(request).await
    }

    /// Trade the stored refresh token for a new token pair. Does not store
    /// them.
    pub async fn refresh(&self) -> Result<TokenGrant, ClientError> {
        let refresh_token = self
            .tokens
            .refresh_token()
            .ok_or(ClientError::MissingRefreshToken)?;

        let request = ApiRequest::post("/auth/refresh-token").json(&RefreshTokenRequest {
            refresh_token: &refresh_token,
        })?;
        let response: RefreshTokenResponse = self.send_once(&request).await?;
        Ok(response.into())
    }

    /// Ask the identity service whether the stored access token is valid.
    ///
    /// A rejected token is cleared from the store.
    pub async fn verify(&self) -> Result<VerifyTokenResponse, ClientError> {
        let result = self.execute(ApiRequest::get("/auth/verify-token")).await;
        if let Err(error) = &result {
            if error.is_auth_expired() {
                self.tokens.clear();
            }
        }
        result
    }
}

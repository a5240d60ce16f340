//! Identity service HTTP client
//!
//! Every request goes through [`AuthClient::execute`], which attaches the
//! stored access token and applies the refresh policy: a 401 on a request
//! that has not been retried yet triggers one refresh with the stored refresh
//! token, followed by one resend of the original request. If the refresh
//! fails the tokens are cleared and the session-expired hook fires. The
//! refresh request itself is sent once through `send_once` and never
//! refreshes.

pub mod auth;
pub mod error;

use error::ClientError;
use reqwest::{Client, ClientBuilder, Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tessera_core::{AuthConfig, TokenStore};
use tracing::{debug, warn};

/// How many times a request may be resent after refreshing the session
const MAX_REFRESH_RETRIES: u8 = 1;

/// Callback fired when the session cannot be renewed and the host should
/// send the user back to its unauthenticated entry point
pub type SessionExpiredHook = Arc<dyn Fn() + Send + Sync>;

/// A request as it moves through the pipeline.
///
/// The body is kept as JSON so the request can be rebuilt for a resend, and
/// `retries` counts how many times it has already been resent after a
/// refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
    retries: u8,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            retries: 0,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Attach a JSON body
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    fn may_refresh(&self) -> bool {
        self.retries < MAX_REFRESH_RETRIES
    }
}

/// Identity service client
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
    tokens: TokenStore,
    on_session_expired: Option<SessionExpiredHook>,
}

impl AuthClient {
    /// Create a new client with default configuration and in-memory tokens
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> AuthClientBuilder {
        AuthClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The token store this client reads and writes
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Build the outgoing request, attaching the current access token
    fn build_request(&self, request: &ApiRequest) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.client.request(request.method.clone(), url);

        if let Some(token) = self.tokens.access_token() {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        builder
    }

    /// Send a request once, without the refresh policy
    pub(crate) async fn send_once<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<T, ClientError> {
        debug!(
            method = %request.method,
            path = %request.path,
            retries = request.retries,
            "Sending request"
        );
        let response = self.build_request(request).send().await?;
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            return Ok(serde_json::from_slice(&bytes)?);
        }

        Err(error_from_response(status, response).await)
    }

    /// Send a request, refreshing and resending once on a 401
    pub async fn execute<T: DeserializeOwned>(
        &self,
        mut request: ApiRequest,
    ) -> Result<T, ClientError> {
        loop {
            let error = match self.send_once(&request).await {
                Ok(body) => return Ok(body),
                Err(error) => error,
            };
            if !matches!(error, ClientError::AuthenticationFailed(_)) || !request.may_refresh() {
                return Err(error);
            }

            // Counted before refreshing so a second 401 is final
            request.retries += 1;

            if self.tokens.refresh_token().is_none() {
                return Err(error);
            }

            debug!(path = %request.path, "Access token rejected, refreshing session");
            if let Err(refresh_error) = self.refresh_session().await {
                warn!(error = %refresh_error, "Session refresh failed, clearing tokens");
                self.tokens.clear();
                self.notify_session_expired();
                return Err(ClientError::SessionExpired(Some(
                    refresh_error.user_message("Session expired"),
                )));
            }
        }
    }

    /// Refresh with the stored refresh token and store the new triple
    pub(crate) async fn refresh_session(&self) -> Result<(), ClientError> {
        let grant = self.refresh().await?;
        self.tokens
            .save(&grant.access_token, &grant.refresh_token, grant.expires_in);
        Ok(())
    }

    fn notify_session_expired(&self) {
        if let Some(hook) = &self.on_session_expired {
            hook();
        }
    }
}

async fn error_from_response(status: StatusCode, response: reqwest::Response) -> ClientError {
    let message = response
        .text()
        .await
        .ok()
        .and_then(|body| serde_json::from_str::<crate::types::ErrorBody>(&body).ok())
        .and_then(|body| body.message);
    ClientError::from_status(status, message)
}

/// Builder for AuthClient
#[derive(Default)]
pub struct AuthClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    tokens: Option<TokenStore>,
    on_session_expired: Option<SessionExpiredHook>,
}

impl AuthClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Use this token store instead of an in-memory one
    pub fn token_store(mut self, tokens: TokenStore) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Called after an unrecoverable refresh failure has cleared the tokens
    pub fn on_session_expired(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_session_expired = Some(Arc::new(hook));
        self
    }

    /// Build the client
    pub fn build(self) -> Result<AuthClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("base_url is empty".into()));
        }

        let mut client_builder = ClientBuilder::new();

        #[cfg(not(target_arch = "wasm32"))]
        {
            let timeout = self
                .timeout
                .unwrap_or(Duration::from_secs(AuthConfig::DEFAULT_TIMEOUT_SECS));
            client_builder = client_builder.timeout(timeout);
        }
        #[cfg(target_arch = "wasm32")]
        let _ = self.timeout; // Timeouts not supported on WASM

        client_builder = client_builder.user_agent(
            self.user_agent
                .unwrap_or_else(|| format!("tessera-client/{}", env!("CARGO_PKG_VERSION"))),
        );

        let client = client_builder.build()?;

        Ok(AuthClient {
            client,
            base_url,
            tokens: self.tokens.unwrap_or_else(TokenStore::in_memory),
            on_session_expired: self.on_session_expired,
        })
    }
}

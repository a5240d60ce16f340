//! Session controller
//!
//! Owns the session state and drives it with the use cases. Every operation
//! returns the resulting snapshot; other parts of the host can follow along
//! through [`SessionController::subscribe`].

use crate::client::AuthClient;
use crate::use_cases::{LoginUseCase, RefreshTokenUseCase, RegisterUseCase, VerifyTokenUseCase};
use std::sync::Arc;
use tessera_core::{RegistrationForm, SessionAction, SessionSnapshot, UserProfile};
use tokio::sync::watch;
use tracing::{debug, info};

const PROFILE_UNAVAILABLE: &str = "Could not load user profile";

/// Single owner of the session state
pub struct SessionController {
    client: AuthClient,
    login: LoginUseCase,
    register: RegisterUseCase,
    refresh: RefreshTokenUseCase,
    verify: VerifyTokenUseCase,
    state: watch::Sender<Arc<SessionSnapshot>>,
}

impl SessionController {
    pub fn new(client: AuthClient) -> Self {
        let (state, _) = watch::channel(Arc::new(SessionSnapshot::default()));
        Self {
            login: LoginUseCase::new(client.clone()),
            register: RegisterUseCase::new(client.clone()),
            refresh: RefreshTokenUseCase::new(client.clone()),
            verify: VerifyTokenUseCase::new(client.clone()),
            client,
            state,
        }
    }

    /// The current snapshot
    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        Arc::clone(&self.state.borrow())
    }

    /// Receive every snapshot published from now on
    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionSnapshot>> {
        self.state.subscribe()
    }

    pub fn client(&self) -> &AuthClient {
        &self.client
    }

    fn dispatch(&mut self, action: SessionAction) -> Arc<SessionSnapshot> {
        let next = self.snapshot().reduce(action);
        self.state.send_if_modified(|current| {
            if Arc::ptr_eq(current, &next) {
                false
            } else {
                *current = Arc::clone(&next);
                true
            }
        });
        next
    }

    /// Start an operation, or return `None` if one cannot start from here
    fn begin(&mut self) -> Option<Arc<SessionSnapshot>> {
        let before = self.snapshot();
        let after = self.dispatch(SessionAction::Start);
        if Arc::ptr_eq(&before, &after) {
            debug!(status = before.status.name(), "Operation not started");
            None
        } else {
            Some(after)
        }
    }

    /// Restore the session from stored tokens.
    ///
    /// Verifies the access token; if that does not yield a valid session,
    /// refreshes and verifies once more. Anything else ends logged out.
    pub async fn check_auth_status(&mut self) -> Arc<SessionSnapshot> {
        if self.begin().is_none() {
            return self.snapshot();
        }

        if let Some(user) = self.verified_user().await {
            return self.dispatch(SessionAction::Succeeded(user));
        }

        let refreshed = self.refresh.execute().await;
        if refreshed.is_success() {
            if let Some(user) = self.verified_user().await {
                return self.dispatch(SessionAction::Succeeded(user));
            }
        }

        info!("No usable stored session");
        self.client.tokens().clear();
        self.dispatch(SessionAction::Logout)
    }

    /// `Some(user)` when the stored access token verifies as valid
    async fn verified_user(&self) -> Option<Option<UserProfile>> {
        let result = self.verify.execute().await;
        match result.data() {
            Some(response) if result.is_success() && response.is_valid => {
                Some(response.user.clone())
            }
            _ => None,
        }
    }

    pub async fn login(&mut self, cedula: &str, password: &str) -> Arc<SessionSnapshot> {
        if self.begin().is_none() {
            return self.snapshot();
        }

        let result = self.login.execute(cedula, password).await;
        let Some(grant) = result.data() else {
            let message = result.error().unwrap_or("Login failed").to_string();
            return self.dispatch(SessionAction::Failed(message));
        };

        if grant.user.is_some() {
            let user = grant.user.clone();
            return self.dispatch(SessionAction::Succeeded(user));
        }

        // The login response carries no profile; ask for it
        let verified = self.verify.execute().await;
        match verified.data() {
            Some(response) if verified.is_success() && response.is_valid => {
                let user = response.user.clone();
                self.dispatch(SessionAction::Succeeded(user))
            }
            _ => {
                let message = verified.error().unwrap_or(PROFILE_UNAVAILABLE).to_string();
                self.dispatch(SessionAction::Failed(message))
            }
        }
    }

    /// Register a new account. The session stays logged out and the
    /// snapshot's `notice` carries the service's confirmation.
    pub async fn register(&mut self, form: &RegistrationForm) -> Arc<SessionSnapshot> {
        if self.begin().is_none() {
            return self.snapshot();
        }

        let result = self.register.execute(form).await;
        match (result.data(), result.error()) {
            (Some(response), _) if result.is_success() => {
                let message = if response.message.is_empty() {
                    "Registration complete. Log in to continue.".to_string()
                } else {
                    response.message.clone()
                };
                self.dispatch(SessionAction::Registered { message })
            }
            (_, error) => {
                let message = error.unwrap_or("Registration failed").to_string();
                self.dispatch(SessionAction::Failed(message))
            }
        }
    }

    /// Drop the session and its tokens
    pub fn logout(&mut self) -> Arc<SessionSnapshot> {
        self.client.tokens().clear();
        self.dispatch(SessionAction::Logout)
    }
}

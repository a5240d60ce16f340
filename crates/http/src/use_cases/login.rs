use crate::client::AuthClient;
use crate::types::SessionGrant;
use tessera_core::{Credentials, ResultEnvelope};
use tracing::{info, warn};

const LOGIN_FAILED: &str = "Login failed";

/// Log in and store the issued tokens
#[derive(Clone)]
pub struct LoginUseCase {
    client: AuthClient,
}

impl LoginUseCase {
    pub fn new(client: AuthClient) -> Self {
        Self { client }
    }

    pub async fn execute(&self, cedula: &str, password: &str) -> ResultEnvelope<SessionGrant> {
        let credentials = Credentials::new(cedula, password);
        match self.client.login(&credentials).await {
            Ok(grant) => {
                let tokens = self.client.tokens().save(
                    &grant.access_token,
                    &grant.refresh_token,
                    grant.expires_in,
                );
                info!("Logged in");
                ResultEnvelope::ok(SessionGrant {
                    expires_at: tokens.expires_at,
                    tokens,
                    user: grant.user,
                })
            }
            Err(error) => {
                warn!(kind = ?error.kind(), error = %error, "Login failed");
                ResultEnvelope::err(error.user_message(LOGIN_FAILED))
            }
        }
    }
}

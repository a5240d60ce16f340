use crate::client::AuthClient;
use tessera_core::{ResultEnvelope, SessionTokens};
use tracing::warn;

const REFRESH_FAILED: &str = "Token refresh failed";

/// Renew the stored tokens. Any failure clears them.
#[derive(Clone)]
pub struct RefreshTokenUseCase {
    client: AuthClient,
}

impl RefreshTokenUseCase {
    pub fn new(client: AuthClient) -> Self {
        Self { client }
    }

    pub async fn execute(&self) -> ResultEnvelope<SessionTokens> {
        match self.client.refresh().await {
            Ok(grant) => ResultEnvelope::ok(self.client.tokens().save(
                &grant.access_token,
                &grant.refresh_token,
                grant.expires_in,
            )),
            Err(error) => {
                warn!(error = %error, "Token refresh failed");
                self.client.tokens().clear();
                ResultEnvelope::err(error.user_message(REFRESH_FAILED))
            }
        }
    }
}

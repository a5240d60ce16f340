use crate::client::AuthClient;
use crate::types::VerifyTokenResponse;
use tessera_core::ResultEnvelope;
use tracing::{debug, warn};

const INVALID_TOKEN: &str = "Invalid token";

/// Check the stored access token with the identity service
#[derive(Clone)]
pub struct VerifyTokenUseCase {
    client: AuthClient,
}

impl VerifyTokenUseCase {
    pub fn new(client: AuthClient) -> Self {
        Self { client }
    }

    pub async fn execute(&self) -> ResultEnvelope<VerifyTokenResponse> {
        if self.client.tokens().access_token().is_none() {
            debug!("No access token stored, skipping verification");
            return ResultEnvelope::rejected(VerifyTokenResponse::invalid());
        }

        match self.client.verify().await {
            Ok(response) => ResultEnvelope::ok(response),
            Err(error) => {
                // A rejected token was already cleared by the client
                warn!(error = %error, "Token verification failed");
                ResultEnvelope::err(error.user_message(INVALID_TOKEN))
            }
        }
    }
}

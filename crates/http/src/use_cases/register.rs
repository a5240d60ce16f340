use crate::client::AuthClient;
use crate::types::RegisterResponse;
use tessera_core::{RegistrationForm, ResultEnvelope};
use tracing::{info, warn};

const REGISTRATION_FAILED: &str = "Registration failed";

/// Create an account. Does not log in.
#[derive(Clone)]
pub struct RegisterUseCase {
    client: AuthClient,
}

impl RegisterUseCase {
    pub fn new(client: AuthClient) -> Self {
        Self { client }
    }

    pub async fn execute(&self, form: &RegistrationForm) -> ResultEnvelope<RegisterResponse> {
        match self.client.register(form).await {
            Ok(response) => {
                info!("Registered user");
                ResultEnvelope::ok(response)
            }
            Err(error) => {
                warn!(kind = ?error.kind(), error = %error, "Registration failed");
                ResultEnvelope::err(error.user_message(REGISTRATION_FAILED))
            }
        }
    }
}

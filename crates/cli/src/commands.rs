//! CLI commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tessera_core::{RegistrationForm, ResultEnvelope};
use tessera_http::{RefreshTokenUseCase, SessionController, VerifyTokenUseCase};
use tracing::info;

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the issued tokens
    Login {
        /// National ID
        #[arg(long)]
        cedula: String,

        #[arg(long, env = "TESSERA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account. Does not log in.
    Register {
        #[arg(long)]
        cedula: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        address: String,

        #[arg(long, env = "TESSERA_PASSWORD", hide_env_values = true)]
        password: String,

        /// Defaults to the password
        #[arg(long, env = "TESSERA_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm_password: Option<String>,
    },

    /// Ask the identity service whether the stored token is valid
    Verify,

    /// Trade the stored refresh token for a new token pair
    Refresh,

    /// Restore the session from stored tokens and print it
    Status,

    /// Forget the stored tokens
    Logout,
}

impl Commands {
    /// Run the command, print its outcome as JSON and report whether it
    /// succeeded
    pub async fn execute(self, controller: &mut SessionController) -> Result<bool> {
        match self {
            Commands::Login { cedula, password } => {
                let snapshot = controller.login(&cedula, &password).await;
                print_json(&*snapshot)?;
                Ok(snapshot.is_authenticated())
            }
            Commands::Register {
                cedula,
                first_name,
                last_name,
                phone,
                address,
                password,
                confirm_password,
            } => {
                let form = RegistrationForm {
                    confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                    cedula,
                    password,
                    first_name,
                    last_name,
                    phone,
                    address,
                };
                let snapshot = controller.register(&form).await;
                print_json(&*snapshot)?;
                Ok(snapshot.error().is_none())
            }
            Commands::Verify => {
                let result = VerifyTokenUseCase::new(controller.client().clone())
                    .execute()
                    .await;
                print_envelope(&result)
            }
            Commands::Refresh => {
                let result = RefreshTokenUseCase::new(controller.client().clone())
                    .execute()
                    .await;
                // Only the expiry is printed; the tokens stay in the store
                print_envelope(&result.map(|tokens| tokens.expires_at))
            }
            Commands::Status => {
                let snapshot = controller.check_auth_status().await;
                print_json(&*snapshot)?;
                Ok(snapshot.is_authenticated())
            }
            Commands::Logout => {
                let snapshot = controller.logout();
                info!("Logged out");
                print_json(&*snapshot)?;
                Ok(true)
            }
        }
    }
}

fn print_envelope<T: Serialize>(result: &ResultEnvelope<T>) -> Result<bool> {
    print_json(result)?;
    Ok(result.is_success())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

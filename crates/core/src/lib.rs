//! Tessera core types and utilities
//!
//! Everything here is transport-agnostic: the domain model, form validation,
//! key-value storage backends, the token store and the session state reducer.

pub mod clock;
pub mod config;
pub mod envelope;
pub mod error;
pub mod state;
pub mod storage;
pub mod tokens;
pub mod types;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AuthConfig;
pub use envelope::ResultEnvelope;
pub use error::{CoreError, CoreResult};
pub use state::{SessionAction, SessionSnapshot, SessionStatus};
#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStorage;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use tokens::TokenStore;
pub use types::{Credentials, RegistrationForm, SessionTokens, UserProfile};
pub use validation::{Field, ValidationErrors};

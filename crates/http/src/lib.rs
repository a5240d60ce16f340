//! Tessera HTTP layer
//!
//! The identity service client with its bearer-token and refresh policy, the
//! use cases built on top of it, and the session controller that drives the
//! session state machine.

pub mod client;
pub mod session;
pub mod types;
pub mod use_cases;

pub use client::error::{ClientError, ErrorKind};
pub use client::{ApiRequest, AuthClient, AuthClientBuilder};
pub use session::SessionController;
pub use use_cases::{LoginUseCase, RefreshTokenUseCase, RegisterUseCase, VerifyTokenUseCase};

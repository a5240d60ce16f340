//! One use case per identity operation
//!
//! Each use case builds the request input, calls the client, performs the
//! success side effect and reports the outcome as a [`ResultEnvelope`].
//! Failures never escape as errors.
//!
//! [`ResultEnvelope`]: tessera_core::ResultEnvelope

mod login;
mod refresh;
mod register;
mod verify;

pub use login::LoginUseCase;
pub use refresh::RefreshTokenUseCase;
pub use register::RegisterUseCase;
pub use verify::VerifyTokenUseCase;

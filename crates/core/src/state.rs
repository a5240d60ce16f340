//! Session state machine
//!
//! A `SessionSnapshot` is immutable. `reduce` consumes the current snapshot
//! and an action and hands back the next one; transitions that are not
//! allowed from the current status return the snapshot unchanged.

use crate::types::UserProfile;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Where the session currently stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionStatus {
    Unauthenticated,
    Authenticating,
    Authenticated { user: Option<UserProfile> },
    Error { message: String },
}

impl SessionStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticating => "authenticating",
            Self::Authenticated { .. } => "authenticated",
            Self::Error { .. } => "error",
        }
    }
}

/// Inputs to the session state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// A login, registration or verification has started
    Start,
    /// The running operation produced a session
    Succeeded(Option<UserProfile>),
    /// Registration went through; the user still has to log in
    Registered { message: String },
    /// The running operation failed
    Failed(String),
    Logout,
}

/// Immutable view of the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    #[serde(flatten)]
    pub status: SessionStatus,
    /// Informational message from the last operation, e.g. a registration
    /// confirmation
    pub notice: Option<String>,
    /// Bumped on every accepted transition
    pub revision: u64,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            notice: None,
            revision: 0,
        }
    }
}

impl SessionSnapshot {
    /// Apply an action, producing the next snapshot
    pub fn reduce(self: Arc<Self>, action: SessionAction) -> Arc<Self> {
        use SessionAction as A;
        use SessionStatus as S;

        let (status, notice) = match (&self.status, action) {
            (S::Unauthenticated | S::Error { .. }, A::Start) => (S::Authenticating, None),
            (S::Authenticating, A::Succeeded(user)) => (S::Authenticated { user }, None),
            (S::Authenticating, A::Registered { message }) => {
                (S::Unauthenticated, Some(message))
            }
            (S::Authenticating, A::Failed(message)) => (S::Error { message }, None),
            (_, A::Logout) => (S::Unauthenticated, None),
            (current, action) => {
                debug!(status = current.name(), ?action, "Ignoring session action");
                return self;
            }
        };

        info!(from = self.status.name(), to = status.name(), "Session transition");
        Arc::new(Self {
            status,
            notice,
            revision: self.revision + 1,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.status, SessionStatus::Authenticated { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, SessionStatus::Authenticating)
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match &self.status {
            SessionStatus::Authenticated { user } => user.as_ref(),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            SessionStatus::Error { message } => Some(message),
            _ => None,
        }
    }
}

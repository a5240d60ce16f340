//! Token store: the access token, refresh token and their absolute expiry
//!
//! The three values are always written and cleared together. Storage failures
//! are logged and otherwise swallowed; a failed read looks like a missing
//! token.

use crate::clock::{Clock, SystemClock};
use crate::config::AuthConfig;
use crate::storage::{KeyValueStorage, MemoryStorage};
use crate::types::SessionTokens;
use std::sync::Arc;
use tracing::{info, warn};

/// Persists the session token triple on top of a key-value backend
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    pub fn with_clock(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// A store backed by process memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Store a new token triple, replacing any previous one.
    ///
    /// The expiry is computed as now + `expires_in_secs`.
    pub fn save(
        &self,
        access_token: &str,
        refresh_token: &str,
        expires_in_secs: i64,
    ) -> SessionTokens {
        let expires_at = self
            .clock
            .now_millis()
            .saturating_add(expires_in_secs.saturating_mul(1000));

        let tokens = SessionTokens {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
            expires_at,
        };

        let batch = [
            (AuthConfig::ACCESS_TOKEN_KEY, tokens.access_token.clone()),
            (AuthConfig::REFRESH_TOKEN_KEY, tokens.refresh_token.clone()),
            (AuthConfig::EXPIRATION_KEY, expires_at.to_string()),
        ];
        match self.storage.set_many(&batch) {
            Ok(()) => info!(expires_at, "Saved session tokens"),
            Err(e) => warn!(error = %e, "Failed to persist session tokens"),
        }

        tokens
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(AuthConfig::ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(AuthConfig::REFRESH_TOKEN_KEY)
    }

    /// Absolute expiry in milliseconds, if one is recorded and parseable
    pub fn expires_at(&self) -> Option<i64> {
        self.read(AuthConfig::EXPIRATION_KEY)?.trim().parse().ok()
    }

    /// The full triple, if all three parts are present
    pub fn tokens(&self) -> Option<SessionTokens> {
        Some(SessionTokens {
            access_token: self.access_token()?,
            refresh_token: self.refresh_token()?,
            expires_at: self.expires_at()?,
        })
    }

    /// Remove all three values. Safe to call repeatedly.
    pub fn clear(&self) {
        match self.storage.remove_many(&AuthConfig::TOKEN_KEYS) {
            Ok(()) => info!("Cleared session tokens"),
            Err(e) => warn!(error = %e, "Failed to clear session tokens"),
        }
    }

    /// True when no expiry is recorded or the recorded expiry has passed
    pub fn is_expired(&self) -> bool {
        match self.expires_at() {
            Some(expires_at) => self.clock.now_millis() >= expires_at,
            None => true,
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read token storage");
                None
            }
        }
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::CoreError;

    /// Backend where every operation fails
    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get(&self, _key: &str) -> crate::CoreResult<Option<String>> {
            Err(CoreError::storage_error("unreadable"))
        }

        fn set_many(&self, _entries: &[(&str, String)]) -> crate::CoreResult<()> {
            Err(CoreError::storage_error("disk full"))
        }

        fn remove_many(&self, _keys: &[&str]) -> crate::CoreResult<()> {
            Err(CoreError::storage_error("read-only"))
        }
    }

    const T0: i64 = 1_700_000_000_000;

    fn store_with_clock() -> (TokenStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(T0));
        let store = TokenStore::with_clock(Arc::new(MemoryStorage::new()), clock.clone());
        (store, clock)
    }

    #[test]
    fn test_save_writes_all_three_fields() {
        let (store, _) = store_with_clock();
        let tokens = store.save("access", "refresh", 3600);

        assert_eq!(tokens.expires_at, T0 + 3_600_000);
        assert_eq!(store.access_token().as_deref(), Some("access"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh"));
        assert_eq!(store.expires_at(), Some(T0 + 3_600_000));
        assert_eq!(store.tokens(), Some(tokens));
        assert!(!store.is_expired());
    }

    #[test]
    fn test_expiry_boundary() {
        let (store, clock) = store_with_clock();
        store.save("access", "refresh", 3600);

        clock.set(T0 + 3599 * 1000);
        assert!(!store.is_expired());

        clock.set(T0 + 3600 * 1000);
        assert!(store.is_expired());

        clock.set(T0 + 3601 * 1000);
        assert!(store.is_expired());
    }

    #[test]
    fn test_missing_expiry_counts_as_expired() {
        let (store, _) = store_with_clock();
        assert!(store.is_expired());
        assert_eq!(store.tokens(), None);
    }

    #[test]
    fn test_save_overwrites_previous_triple() {
        let (store, clock) = store_with_clock();
        store.save("old-access", "old-refresh", 10);
        clock.advance_secs(60);
        store.save("new-access", "new-refresh", 10);

        assert_eq!(store.access_token().as_deref(), Some("new-access"));
        assert_eq!(store.refresh_token().as_deref(), Some("new-refresh"));
        assert!(!store.is_expired());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (store, _) = store_with_clock();
        store.save("access", "refresh", 3600);

        store.clear();
        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);
        assert_eq!(store.expires_at(), None);

        store.clear();
        assert!(store.is_expired());
    }

    #[test]
    fn test_login_recovers_from_corrupt_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, r#"{"accessToken": "trunc"#).unwrap();

        let store = TokenStore::new(Arc::new(crate::storage::FileStorage::new(&path)));
        store.save("access", "refresh", 3600);
        assert_eq!(store.access_token().as_deref(), Some("access"));
        assert!(!store.is_expired());

        store.clear();
        assert_eq!(store.tokens(), None);
    }

    #[test]
    fn test_storage_failures_are_swallowed() {
        let store = TokenStore::new(Arc::new(BrokenStorage));
        let tokens = store.save("access", "refresh", 60);
        assert_eq!(tokens.access_token, "access");
        assert_eq!(store.access_token(), None);
        assert!(store.is_expired());
        store.clear();
    }
}

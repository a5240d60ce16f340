//! Authentication configuration

/// Authentication configuration
pub struct AuthConfig;

impl AuthConfig {
    /// Storage key for the access token
    pub const ACCESS_TOKEN_KEY: &'static str = "accessToken";

    /// Storage key for the refresh token
    pub const REFRESH_TOKEN_KEY: &'static str = "refreshToken";

    /// Storage key for the absolute expiry, in milliseconds since the epoch
    pub const EXPIRATION_KEY: &'static str = "tokenExpiration";

    /// Every key the token store owns
    pub const TOKEN_KEYS: [&'static str; 3] = [
        Self::ACCESS_TOKEN_KEY,
        Self::REFRESH_TOKEN_KEY,
        Self::EXPIRATION_KEY,
    ];

    /// Default identity service base URL
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000/api/v1";

    /// Default per-request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
}

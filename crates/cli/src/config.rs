//! CLI configuration
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `TESSERA_*` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tessera_core::AuthConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Identity service base URL, including the API prefix
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Where the token triple is persisted
    pub token_file: PathBuf,

    /// Default log level when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: AuthConfig::DEFAULT_BASE_URL.to_string(),
            timeout_secs: AuthConfig::DEFAULT_TIMEOUT_SECS,
            token_file: default_token_file(),
            log_level: "info".to_string(),
        }
    }
}

fn default_token_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tessera")
        .join("tokens.json")
}

impl Settings {
    /// Load settings, reading `path` if given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(Environment::with_prefix("TESSERA").try_parsing(true));

        builder.build()?.try_deserialize()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.base_url, "http://localhost:8000/api/v1");
        assert_eq!(settings.timeout(), Duration::from_secs(10));
        assert!(settings.token_file.ends_with("tessera/tokens.json"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "base_url = \"https://id.example.com/api/v1\"").unwrap();
        writeln!(file, "timeout_secs = 3").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.base_url, "https://id.example.com/api/v1");
        assert_eq!(settings.timeout_secs, 3);
        assert_eq!(settings.log_level, "info");
    }
}

//! Server configuration, layered from an optional TOML file and
//! `ROLLCALL_*` environment variables.

use std::path::{Path, PathBuf};

use chrono::Duration;
use rollcall_core::attendance::MarkingMode;
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  /// SQLite database file. A leading `~/` is expanded by the binary.
  pub store_path:        PathBuf,
  pub marking_mode:      MarkingMode,
  pub session_ttl_hours: i64,
  /// Add the `Secure` attribute to the session cookie.
  pub secure_cookies:    bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:              "127.0.0.1".to_string(),
      port:              8080,
      store_path:        PathBuf::from("attendance.db"),
      marking_mode:      MarkingMode::Ledger,
      session_ttl_hours: 24 * 7,
      secure_cookies:    false,
    }
  }
}

impl ServerConfig {
  /// Read `path` (if it exists), then apply environment overrides.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("ROLLCALL").try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn session_ttl(&self) -> Duration { Duration::hours(self.session_ttl_hours) }
}

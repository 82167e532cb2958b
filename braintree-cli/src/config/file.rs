//! TOML file configuration structures.
//!
//! These structs directly map to the `braintree.toml` file format.

use braintree_sdk::Environment;
use serde::{Deserialize, Serialize};

/// Root configuration structure as read from the TOML file.
///
/// Credentials are optional here because they may come from the command
/// line or the environment instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub environment: EnvironmentSetting,
    pub merchant_id: Option<String>,
    pub public_key: Option<String>,
    pub private_key: Option<String>,
    /// Discard credentials after a single request.
    #[serde(default)]
    pub use_once: bool,
    /// Disable TLS certificate verification. Never enable in production.
    #[serde(default)]
    pub use_unsafe_ssl: bool,
    /// `httplib`, `pycurl` or `requests`.
    pub http_strategy: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Either a built-in environment name or a full descriptor table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvironmentSetting {
    Named(String),
    Custom(Environment),
}

impl Default for EnvironmentSetting {
    fn default() -> Self {
        Self::Named("sandbox".to_string())
    }
}

//! Gateway environments.
//!
//! An [`Environment`] describes which Braintree host a client talks to: the
//! protocol prefix and the `server:port` pair used to build base URLs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

const DEVELOPMENT_SERVER: &str = "localhost:3000";
const SANDBOX_SERVER: &str = "api.sandbox.braintreegateway.com:443";
const PRODUCTION_SERVER: &str = "api.braintreegateway.com:443";

/// Descriptor of a remote Braintree API host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Environment {
    /// Short name used in logs and configuration files.
    pub name: String,
    /// Scheme prefix including the separator, e.g. `https://`.
    pub protocol: String,
    /// Host and port, e.g. `api.braintreegateway.com:443`.
    pub server_and_port: String,
}

impl Environment {
    /// Build a custom environment.
    pub fn custom(
        name: impl Into<String>,
        protocol: impl Into<String>,
        server_and_port: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            protocol: protocol.into(),
            server_and_port: server_and_port.into(),
        }
    }

    /// Local gateway instance, plain HTTP.
    pub fn development() -> Self {
        Self::custom("development", "http://", DEVELOPMENT_SERVER)
    }

    pub fn sandbox() -> Self {
        Self::custom("sandbox", "https://", SANDBOX_SERVER)
    }

    pub fn production() -> Self {
        Self::custom("production", "https://", PRODUCTION_SERVER)
    }

    /// `protocol + server_and_port`, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}{}", self.protocol, self.server_and_port)
    }

    /// Whether requests to this environment go over TLS.
    pub fn is_ssl(&self) -> bool {
        self.protocol.eq_ignore_ascii_case("https://")
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Self::development()),
            "sandbox" => Ok(Self::sandbox()),
            "production" => Ok(Self::production()),
            other => Err(ConfigError::InvalidConfiguration(format!(
                "unknown environment: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_environments() {
        let sandbox = Environment::sandbox();
        assert_eq!(sandbox.base_url(), "https://api.sandbox.braintreegateway.com:443");
        assert!(sandbox.is_ssl());

        let development = Environment::development();
        assert_eq!(development.base_url(), "http://localhost:3000");
        assert!(!development.is_ssl());
    }

    #[test]
    fn test_parse_environment_name() {
        assert_eq!(
            "Production".parse::<Environment>().unwrap(),
            Environment::production()
        );
        assert_eq!(" sandbox ".parse::<Environment>().unwrap(), Environment::sandbox());

        let err = "staging".parse::<Environment>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration(_)));
    }
}

//! Per-call configuration snapshots.

use std::sync::Arc;

use tracing::debug;

use super::{ConfigError, Credentials, SecretString};
use crate::environment::Environment;
use crate::strategy::{HttpStrategy, ReqwestStrategy, StrategyKind, StrategySettings};

/// Point-in-time copy of a [`Configuration`](super::Configuration), bound to
/// the transport strategy resolved when it was taken.
#[derive(Debug)]
pub struct ConfigSnapshot {
    credentials: Credentials,
    settings: StrategySettings,
    strategy: Arc<dyn HttpStrategy>,
    use_once: bool,
    use_unsafe_ssl: bool,
}

impl ConfigSnapshot {
    pub(super) fn new(
        credentials: Credentials,
        settings: StrategySettings,
        strategy: Arc<dyn HttpStrategy>,
        use_once: bool,
        use_unsafe_ssl: bool,
    ) -> Self {
        Self {
            credentials,
            settings,
            strategy,
            use_once,
            use_unsafe_ssl,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.settings.environment
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn merchant_id(&self) -> &str {
        &self.credentials.merchant_id
    }

    pub fn public_key(&self) -> &SecretString {
        &self.credentials.public_key
    }

    pub fn private_key(&self) -> &SecretString {
        &self.credentials.private_key
    }

    pub fn is_use_once(&self) -> bool {
        self.use_once
    }

    pub fn is_use_unsafe_ssl(&self) -> bool {
        self.use_unsafe_ssl
    }

    /// False once a `use_once` snapshot has completed its request.
    pub fn has_credentials(&self) -> bool {
        !self.credentials.is_cleared()
    }

    /// `/merchants/{merchant_id}`
    pub fn base_merchant_path(&self) -> String {
        format!("/merchants/{}", self.credentials.merchant_id)
    }

    /// `protocol + server_and_port + base_merchant_path()`
    pub fn base_merchant_url(&self) -> String {
        format!("{}{}", self.environment().base_url(), self.base_merchant_path())
    }

    /// Strategy to send requests with.
    ///
    /// With `use_unsafe_ssl` a new certificate-ignoring strategy is built on
    /// every call, whatever was resolved at construction. Otherwise the
    /// cached strategy is returned.
    pub fn http_strategy(&self) -> Result<Arc<dyn HttpStrategy>, ConfigError> {
        if self.use_unsafe_ssl {
            let strategy = ReqwestStrategy::new(StrategyKind::UnsafeSsl, &self.settings)?;
            return Ok(Arc::new(strategy));
        }
        Ok(Arc::clone(&self.strategy))
    }

    /// Called by the gateway after each request. Clears this snapshot's
    /// credentials when `use_once` is set.
    pub fn request_complete(&mut self) {
        if self.use_once {
            debug!(merchant_id = %self.credentials.merchant_id, "clearing single-use credentials");
            self.credentials.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigError, Configuration};
    use crate::environment::Environment;

    fn configured() -> Configuration {
        let mut config = Configuration::new(
            Environment::custom("sandbox", "https://", "sandbox.example.com"),
            "m1",
            "pub1",
            "priv1",
        );
        config.set_strategy_override(Some("requests".to_string()));
        config
    }

    #[test]
    fn test_base_merchant_path_and_url() {
        let snapshot = configured().instantiate().unwrap();
        assert_eq!(snapshot.base_merchant_path(), "/merchants/m1");
        assert_eq!(
            snapshot.base_merchant_url(),
            "https://sandbox.example.com/merchants/m1"
        );

        let mut config = Configuration::new(Environment::sandbox(), "abc", "pub", "priv");
        config.set_strategy_override(Some("httplib".to_string()));
        let snapshot = config.instantiate().unwrap();
        assert_eq!(
            snapshot.base_merchant_url(),
            "https://api.sandbox.braintreegateway.com:443/merchants/abc"
        );
    }

    #[test]
    fn test_strategy_is_cached_per_snapshot() {
        let snapshot = configured().instantiate().unwrap();
        let first = snapshot.http_strategy().unwrap();
        let second = snapshot.http_strategy().unwrap();
        assert!(std::sync::Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "requests");
    }

    #[test]
    fn test_each_named_override() {
        for name in ["httplib", "pycurl", "requests"] {
            let mut config = configured();
            config.set_strategy_override(Some(name.to_string()));
            let snapshot = config.instantiate().unwrap();
            assert_eq!(snapshot.http_strategy().unwrap().name(), name);
        }
    }

    #[test]
    fn test_unsafe_ssl_overrides_named_strategy() {
        let mut config = configured();
        config.set_strategy_override(Some("pycurl".to_string()));
        config.set_use_unsafe_ssl(true);

        let snapshot = config.instantiate().unwrap();
        assert!(snapshot.is_use_unsafe_ssl());
        assert_eq!(snapshot.http_strategy().unwrap().name(), "unsafe");
    }

    #[test]
    fn test_unsafe_ssl_still_validates_override() {
        let mut config = configured();
        config.set_strategy_override(Some("invalid-name".to_string()));
        config.set_use_unsafe_ssl(true);
        assert!(matches!(
            config.instantiate(),
            Err(ConfigError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_request_complete_clears_only_use_once() {
        let mut snapshot = configured().instantiate().unwrap();
        snapshot.request_complete();
        assert!(snapshot.has_credentials());
        assert_eq!(snapshot.merchant_id(), "m1");

        let mut snapshot = configured().use_once(true).instantiate().unwrap();
        snapshot.request_complete();
        assert!(!snapshot.has_credentials());
        assert_eq!(snapshot.merchant_id(), "");
        assert!(snapshot.private_key().is_empty());
    }
}

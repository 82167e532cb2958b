//! Account configuration.
//!
//! A [`Configuration`] holds the environment, the account credentials and
//! the transport settings. Every unit of work takes a [`ConfigSnapshot`] from
//! it via [`Configuration::instantiate`] (or a [`Gateway`] via
//! [`Configuration::gateway`]).
//!
//! With `use_once` enabled the credentials are handed to the first snapshot
//! and removed from the configuration, so a multi-merchant caller must
//! re-configure before every request and can never send one merchant's
//! request with another merchant's keys.

mod credentials;
mod shared;
mod snapshot;

pub use credentials::{Credentials, SecretString};
pub use shared::SharedConfiguration;
pub use snapshot::ConfigSnapshot;

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::client::Gateway;
use crate::environment::Environment;
use crate::strategy::{
    DEFAULT_TIMEOUT, HttpStrategy, StrategyRegistry, StrategySettings, TransportError,
};

/// Gateway API version sent in the `X-ApiVersion` header.
pub const API_VERSION: &str = "3";

/// Environment variable naming the transport strategy to use.
pub const HTTP_STRATEGY_ENV: &str = "BRAINTREE_HTTP_STRATEGY";

/// Returns [`API_VERSION`].
pub fn api_version() -> &'static str {
    API_VERSION
}

/// Errors produced while building snapshots or resolving strategies.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No environment/credentials are available: `configure` was never
    /// called, or a `use_once` configuration was already consumed.
    #[error("braintree is not configured; call configure before creating a gateway")]
    NotConfigured,

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The resolved strategy could not be constructed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Account configuration for the Braintree gateway.
///
/// `Configuration::default()` is unconfigured; any attempt to instantiate it
/// fails with [`ConfigError::NotConfigured`].
#[derive(Debug, Clone)]
pub struct Configuration {
    environment: Option<Environment>,
    credentials: Option<Credentials>,
    use_once: bool,
    use_unsafe_ssl: bool,
    strategy_override: Option<String>,
    timeout: Duration,
    registry: StrategyRegistry,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            environment: None,
            credentials: None,
            use_once: false,
            use_unsafe_ssl: false,
            strategy_override: None,
            timeout: DEFAULT_TIMEOUT,
            registry: StrategyRegistry::default(),
        }
    }
}

impl Configuration {
    /// A configured instance with `use_once` disabled.
    pub fn new(
        environment: Environment,
        merchant_id: impl Into<String>,
        public_key: impl Into<SecretString>,
        private_key: impl Into<SecretString>,
    ) -> Self {
        let mut config = Self::default();
        config.configure(environment, merchant_id, public_key, private_key, false);
        config
    }

    /// Set `use_once` on a freshly built configuration.
    pub fn use_once(mut self, use_once: bool) -> Self {
        self.use_once = use_once;
        self
    }

    /// Replace the strategy registry.
    pub fn with_registry(mut self, registry: StrategyRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Overwrite environment, credentials and `use_once`.
    ///
    /// Also resets `use_unsafe_ssl` to `false`; strategy override, timeout and
    /// registry are kept.
    pub fn configure(
        &mut self,
        environment: Environment,
        merchant_id: impl Into<String>,
        public_key: impl Into<SecretString>,
        private_key: impl Into<SecretString>,
        use_once: bool,
    ) {
        debug!(environment = %environment, use_once, "configuring braintree");
        self.environment = Some(environment);
        self.credentials = Some(Credentials::new(merchant_id, public_key, private_key));
        self.use_once = use_once;
        self.use_unsafe_ssl = false;
    }

    /// Disable certificate verification for every snapshot taken afterwards.
    pub fn set_use_unsafe_ssl(&mut self, use_unsafe_ssl: bool) {
        self.use_unsafe_ssl = use_unsafe_ssl;
    }

    /// Pin the strategy by name instead of reading [`HTTP_STRATEGY_ENV`].
    pub fn set_strategy_override(&mut self, name: Option<String>) {
        self.strategy_override = name;
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn environment(&self) -> Option<&Environment> {
        self.environment.as_ref()
    }

    /// Current credentials; `None` before `configure` or after a `use_once`
    /// snapshot consumed them.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.environment.is_some() && self.credentials.is_some()
    }

    pub fn is_use_once(&self) -> bool {
        self.use_once
    }

    pub fn is_use_unsafe_ssl(&self) -> bool {
        self.use_unsafe_ssl
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut StrategyRegistry {
        &mut self.registry
    }

    pub fn api_version() -> &'static str {
        API_VERSION
    }

    /// A gateway bound to a new snapshot.
    pub fn gateway(&mut self) -> Result<Gateway, ConfigError> {
        self.instantiate().map(Gateway::new)
    }

    /// Take a snapshot of the current configuration.
    ///
    /// The transport strategy is resolved here, once per snapshot. If that
    /// fails nothing is consumed. With `use_once` set the credentials move
    /// into the snapshot and this configuration becomes unconfigured.
    pub fn instantiate(&mut self) -> Result<ConfigSnapshot, ConfigError> {
        let environment = self
            .environment
            .clone()
            .ok_or(ConfigError::NotConfigured)?;
        if self.credentials.is_none() {
            return Err(ConfigError::NotConfigured);
        }

        let settings = StrategySettings::new(environment.clone(), self.timeout);
        let strategy = self.resolve_strategy(&settings)?;

        let credentials = if self.use_once {
            debug!("use_once enabled; credentials handed to snapshot and cleared");
            self.credentials.take()
        } else {
            self.credentials.clone()
        };
        let credentials = credentials.ok_or(ConfigError::NotConfigured)?;

        debug!(
            environment = %environment,
            merchant_id = %credentials.merchant_id,
            strategy = strategy.name(),
            "configuration snapshot created"
        );

        Ok(ConfigSnapshot::new(
            credentials,
            settings,
            strategy,
            self.use_once,
            self.use_unsafe_ssl,
        ))
    }

    fn resolve_strategy(
        &self,
        settings: &StrategySettings,
    ) -> Result<Arc<dyn HttpStrategy>, ConfigError> {
        let requested = match &self.strategy_override {
            Some(name) => Some(name.clone()),
            None => strategy_override_from_env(),
        };
        self.registry.resolve(requested.as_deref(), settings)
    }
}

/// Value of [`HTTP_STRATEGY_ENV`], if set.
pub fn strategy_override_from_env() -> Option<String> {
    std::env::var(HTTP_STRATEGY_ENV).ok()
}

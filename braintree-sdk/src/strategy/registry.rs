//! Name → strategy factory registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{HttpStrategy, ReqwestStrategy, StrategyKind, StrategySettings, TransportError};
use crate::config::ConfigError;

/// Builds a fresh strategy instance for one configuration snapshot.
pub type StrategyFactory = Arc<
    dyn Fn(&StrategySettings) -> Result<Arc<dyn HttpStrategy>, TransportError> + Send + Sync,
>;

/// Strategies selectable by name, plus the name used when nothing is
/// requested.
///
/// [`StrategyRegistry::default`] holds `httplib`, `pycurl` and `requests`,
/// defaulting to `requests`.
#[derive(Clone)]
pub struct StrategyRegistry {
    factories: HashMap<String, StrategyFactory>,
    default_name: String,
}

impl StrategyRegistry {
    /// An empty registry whose default is `default_name`.
    pub fn empty(default_name: impl Into<String>) -> Self {
        Self {
            factories: HashMap::new(),
            default_name: default_name.into(),
        }
    }

    /// Add or replace the factory for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&StrategySettings) -> Result<Arc<dyn HttpStrategy>, TransportError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    /// Change the strategy used when no override is given.
    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        self.default_name = name.into();
        self
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build the strategy named `requested`, or the default when `None`.
    ///
    /// An unknown name is an [`ConfigError::InvalidConfiguration`].
    pub fn resolve(
        &self,
        requested: Option<&str>,
        settings: &StrategySettings,
    ) -> Result<Arc<dyn HttpStrategy>, ConfigError> {
        let name = requested.unwrap_or(&self.default_name);
        let factory = self.factories.get(name).ok_or_else(|| {
            ConfigError::InvalidConfiguration(format!("invalid http strategy: {name:?}"))
        })?;
        debug!(
            strategy = name,
            overridden = requested.is_some(),
            "resolved http strategy"
        );
        Ok(factory(settings)?)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        let mut registry = Self::empty(StrategyKind::Requests.name());
        for kind in StrategyKind::NAMED {
            registry.register(kind.name(), move |settings| {
                let strategy = ReqwestStrategy::new(kind, settings)?;
                Ok(Arc::new(strategy) as Arc<dyn HttpStrategy>)
            });
        }
        registry
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.names())
            .field("default_name", &self.default_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use crate::strategy::DEFAULT_TIMEOUT;

    fn settings() -> StrategySettings {
        StrategySettings::new(Environment::sandbox(), DEFAULT_TIMEOUT)
    }

    #[test]
    fn test_default_registry() {
        let registry = StrategyRegistry::default();
        assert_eq!(registry.names(), vec!["httplib", "pycurl", "requests"]);
        assert_eq!(registry.default_name(), "requests");

        let strategy = registry.resolve(None, &settings()).unwrap();
        assert_eq!(strategy.name(), "requests");
    }

    #[test]
    fn test_resolve_by_name() {
        let registry = StrategyRegistry::default();
        for name in ["httplib", "pycurl", "requests"] {
            let strategy = registry.resolve(Some(name), &settings()).unwrap();
            assert_eq!(strategy.name(), name);
        }
    }

    #[test]
    fn test_unknown_name_is_invalid_configuration() {
        let registry = StrategyRegistry::default();
        let err = registry
            .resolve(Some("invalid-name"), &settings())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_changed_default() {
        let registry = StrategyRegistry::default().with_default("httplib");
        let strategy = registry.resolve(None, &settings()).unwrap();
        assert_eq!(strategy.name(), "httplib");

        let broken = StrategyRegistry::empty("missing");
        assert!(broken.resolve(None, &settings()).is_err());
    }
}

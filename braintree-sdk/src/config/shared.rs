//! Configuration shared between tasks.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use super::{ConfigError, ConfigSnapshot, Configuration, SecretString};
use crate::client::Gateway;
use crate::environment::Environment;

/// A [`Configuration`] behind `Arc<Mutex<_>>`.
///
/// `configure` and `instantiate` each hold the lock for their whole
/// read-modify-clear sequence, so concurrent tasks using `use_once` cannot
/// observe half-consumed credentials. Pairing one `configure` with exactly
/// one `instantiate` across tasks still needs [`with`](Self::with).
#[derive(Debug, Clone, Default)]
pub struct SharedConfiguration {
    inner: Arc<Mutex<Configuration>>,
}

impl SharedConfiguration {
    pub fn new(config: Configuration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(config)),
        }
    }

    /// Lock the configuration for direct access.
    pub async fn lock(&self) -> MutexGuard<'_, Configuration> {
        self.inner.lock().await
    }

    /// Run `f` with exclusive access.
    pub async fn with<R>(&self, f: impl FnOnce(&mut Configuration) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }

    pub async fn configure(
        &self,
        environment: Environment,
        merchant_id: impl Into<String>,
        public_key: impl Into<SecretString>,
        private_key: impl Into<SecretString>,
        use_once: bool,
    ) {
        self.inner.lock().await.configure(
            environment,
            merchant_id,
            public_key,
            private_key,
            use_once,
        );
    }

    pub async fn instantiate(&self) -> Result<ConfigSnapshot, ConfigError> {
        self.inner.lock().await.instantiate()
    }

    pub async fn gateway(&self) -> Result<Gateway, ConfigError> {
        self.inner.lock().await.gateway()
    }
}

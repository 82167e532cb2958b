//! Braintree SDK
//!
//! Account configuration, environment selection and pluggable HTTP transport
//! strategies for talking to the Braintree gateway API.
//!
//! ```no_run
//! use braintree_sdk::{Configuration, Environment};
//!
//! # async fn example() -> Result<(), braintree_sdk::ClientError> {
//! let mut config = Configuration::new(Environment::sandbox(), "merchant", "public", "private");
//! let mut gateway = config.gateway()?;
//! let plans: serde_json::Value = gateway.get("/plans").await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod environment;
pub mod strategy;

pub use client::{ApiErrorKind, ClientError, Gateway};
pub use config::{
    API_VERSION, ConfigError, ConfigSnapshot, Configuration, Credentials, HTTP_STRATEGY_ENV,
    SecretString, SharedConfiguration, api_version,
};
pub use environment::Environment;
pub use strategy::{HttpStrategy, StrategyKind, StrategyRegistry};

//! Interchangeable HTTP transport strategies.
//!
//! A strategy performs the raw request/response exchange for the gateway.
//! The gateway builds a fully formed [`HttpRequest`] (URL, auth and version
//! headers, body) and hands it to whichever [`HttpStrategy`] the
//! configuration snapshot resolved.
//!
//! Built-in strategies are reqwest clients with different connection
//! profiles (see [`StrategyKind`]). Additional strategies can be injected
//! through the [`StrategyRegistry`].

mod registry;
mod transport;

pub use registry::{StrategyFactory, StrategyRegistry};
pub use transport::{ReqwestStrategy, StrategyKind};

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use url::Url;

use crate::environment::Environment;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors produced by transport strategies.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),

    /// Transport-level failure (DNS, TLS, connection reset, timeout, …).
    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Inputs every strategy factory receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategySettings {
    pub environment: Environment,
    pub timeout: Duration,
}

impl StrategySettings {
    pub fn new(environment: Environment, timeout: Duration) -> Self {
        Self {
            environment,
            timeout,
        }
    }
}

/// A request ready to go on the wire.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// Raw response returned by a strategy.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// HTTP request/response mechanics.
///
/// Implementations must not interpret the response status; non-2xx handling
/// belongs to the gateway.
#[async_trait]
pub trait HttpStrategy: Debug + Send + Sync {
    /// Registry name of this strategy, e.g. `"requests"`.
    fn name(&self) -> &str;

    /// Execute one request.
    async fn http_do(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

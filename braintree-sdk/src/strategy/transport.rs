//! reqwest-backed strategies.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use super::{HttpRequest, HttpResponse, HttpStrategy, StrategySettings, TransportError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection profile of a built-in strategy.
///
/// The names are the values accepted by `BRAINTREE_HTTP_STRATEGY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// HTTP/1.1 only, a fresh connection per request.
    Httplib,
    /// HTTP/1.1 only, pooled, bounded connect time.
    Pycurl,
    /// Pooled, compressed, HTTP version negotiated. The default.
    Requests,
    /// `Httplib` with certificate verification disabled.
    UnsafeSsl,
}

impl StrategyKind {
    /// Kinds selectable by name.
    pub const NAMED: [StrategyKind; 3] = [Self::Httplib, Self::Pycurl, Self::Requests];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Httplib => "httplib",
            Self::Pycurl => "pycurl",
            Self::Requests => "requests",
            Self::UnsafeSsl => "unsafe",
        }
    }
}

fn user_agent() -> String {
    format!("Braintree Rust {}", env!("CARGO_PKG_VERSION"))
}

/// Strategy issuing requests through a [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestStrategy {
    kind: StrategyKind,
    client: Client,
}

impl ReqwestStrategy {
    /// Build the client profile for `kind`.
    pub fn new(kind: StrategyKind, settings: &StrategySettings) -> Result<Self, TransportError> {
        let builder = Client::builder()
            .timeout(settings.timeout)
            .user_agent(user_agent());

        let builder = match kind {
            StrategyKind::Httplib => builder.http1_only().pool_max_idle_per_host(0),
            StrategyKind::Pycurl => builder.http1_only().connect_timeout(CONNECT_TIMEOUT),
            StrategyKind::Requests => builder.gzip(true),
            StrategyKind::UnsafeSsl => {
                warn!(
                    environment = %settings.environment,
                    "SSL certificate verification is disabled for Braintree requests"
                );
                builder
                    .http1_only()
                    .pool_max_idle_per_host(0)
                    .danger_accept_invalid_certs(true)
            }
        };

        let client = builder.build().map_err(TransportError::Build)?;
        Ok(Self { kind, client })
    }

    /// Wrap an existing client (e.g. one configured with a proxy).
    pub fn with_client(kind: StrategyKind, client: Client) -> Self {
        Self { kind, client }
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }
}

#[async_trait]
impl HttpStrategy for ReqwestStrategy {
    fn name(&self) -> &str {
        self.kind.name()
    }

    async fn http_do(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

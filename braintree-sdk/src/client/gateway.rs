//! Gateway handle.

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::ClientError;
use crate::config::{ConfigError, ConfigSnapshot, api_version};
use crate::strategy::{HttpRequest, HttpResponse};

/// Header carrying [`api_version`].
pub const API_VERSION_HEADER: &str = "X-ApiVersion";

const JSON: &str = "application/json";

/// Typed entry point to the gateway API, bound to one snapshot.
///
/// Requests go to `base_merchant_url() + path` and carry basic auth built
/// from the snapshot's public/private key pair. After every request the
/// snapshot's `request_complete` hook runs, so a `use_once` gateway sends
/// exactly one request.
#[derive(Debug)]
pub struct Gateway {
    config: ConfigSnapshot,
}

impl Gateway {
    pub fn new(config: ConfigSnapshot) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConfigSnapshot {
        &self.config
    }

    pub fn into_config(self) -> ConfigSnapshot {
        self.config
    }

    /// `GET {path}`
    pub async fn get<T: DeserializeOwned>(&mut self, path: &str) -> Result<T, ClientError> {
        let response = self.send(Method::GET, path, None).await?;
        parse_response(response)
    }

    /// `POST {path}` with a JSON body.
    pub async fn post<B, T>(&mut self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = Bytes::from(serde_json::to_vec(body)?);
        let response = self.send(Method::POST, path, Some(body)).await?;
        parse_response(response)
    }

    /// `PUT {path}` with a JSON body.
    pub async fn put<B, T>(&mut self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = Bytes::from(serde_json::to_vec(body)?);
        let response = self.send(Method::PUT, path, Some(body)).await?;
        parse_response(response)
    }

    /// `DELETE {path}`; the response body is ignored.
    pub async fn delete(&mut self, path: &str) -> Result<(), ClientError> {
        self.send(Method::DELETE, path, None).await?;
        Ok(())
    }

    async fn send(
        &mut self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> Result<HttpResponse, ClientError> {
        if !self.config.has_credentials() {
            return Err(ConfigError::NotConfigured.into());
        }

        let url = self.url_for(path)?;
        let headers = self.headers(body.is_some())?;
        let strategy = self.config.http_strategy()?;

        debug!(strategy = strategy.name(), %method, %url, "sending gateway request");
        let result = strategy
            .http_do(HttpRequest {
                method,
                url,
                headers,
                body,
            })
            .await;
        self.config.request_complete();

        let response = result?;
        debug!(status = %response.status, "gateway request completed");

        if !response.status.is_success() {
            return Err(ClientError::Api {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }
        Ok(response)
    }

    fn url_for(&self, path: &str) -> Result<Url, ClientError> {
        let separator = if path.starts_with('/') { "" } else { "/" };
        let url = format!("{}{separator}{path}", self.config.base_merchant_url());
        Ok(Url::parse(&url)?)
    }

    fn headers(&self, has_body: bool) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        headers.insert(
            HeaderName::from_static("x-apiversion"),
            HeaderValue::from_static(api_version()),
        );
        if has_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        }

        let mut authorization = HeaderValue::from_str(&basic_auth(&self.config))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        Ok(headers)
    }
}

fn basic_auth(config: &ConfigSnapshot) -> String {
    let pair = format!(
        "{}:{}",
        config.public_key().expose_secret(),
        config.private_key().expose_secret()
    );
    format!("Basic {}", fast32::base64::RFC4648.encode(pair.as_bytes()))
}

fn parse_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ClientError> {
    serde_json::from_slice(&response.body).map_err(ClientError::Json)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::{Value, json};

    use super::*;
    use crate::client::ApiErrorKind;
    use crate::config::Configuration;
    use crate::environment::Environment;
    use crate::strategy::{HttpStrategy, StrategyRegistry, TransportError};

    /// Records every request and answers with a canned response.
    #[derive(Debug)]
    struct RecordingStrategy {
        requests: Arc<Mutex<Vec<HttpRequest>>>,
        status: StatusCode,
        body: &'static str,
    }

    #[async_trait]
    impl HttpStrategy for RecordingStrategy {
        fn name(&self) -> &str {
            "recording"
        }

        async fn http_do(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            Ok(HttpResponse {
                status: self.status,
                headers: HeaderMap::new(),
                body: Bytes::from_static(self.body.as_bytes()),
            })
        }
    }

    fn config_with(
        status: StatusCode,
        body: &'static str,
    ) -> (Configuration, Arc<Mutex<Vec<HttpRequest>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        let mut registry = StrategyRegistry::default();
        registry.register("recording", move |_settings| {
            let strategy: Arc<dyn HttpStrategy> = Arc::new(RecordingStrategy {
                requests: Arc::clone(&recorded),
                status,
                body,
            });
            Ok(strategy)
        });

        let mut config = Configuration::new(
            Environment::custom("sandbox", "https://", "sandbox.example.com"),
            "m1",
            "pub1",
            "priv1",
        )
        .with_registry(registry.with_default("recording"));
        config.set_strategy_override(Some("recording".to_string()));
        (config, requests)
    }

    #[tokio::test]
    async fn test_get_sends_authenticated_request() {
        let (mut config, requests) = config_with(StatusCode::OK, r#"{"plans":[]}"#);
        let mut gateway = config.gateway().unwrap();

        let value: Value = gateway.get("/plans").await.unwrap();
        assert_eq!(value, json!({ "plans": [] }));

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.url.as_str(),
            "https://sandbox.example.com/merchants/m1/plans"
        );
        assert_eq!(request.headers[API_VERSION_HEADER], "3");
        assert_eq!(request.headers[ACCEPT], JSON);
        // base64("pub1:priv1")
        assert_eq!(request.headers[AUTHORIZATION], "Basic cHViMTpwcml2MQ==");
        assert!(request.headers[AUTHORIZATION].is_sensitive());
        assert!(request.headers.get(CONTENT_TYPE).is_none());
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_post_serializes_body() {
        let (mut config, requests) = config_with(StatusCode::CREATED, r#"{"id":"c1"}"#);
        let mut gateway = config.gateway().unwrap();

        let created: Value = gateway
            .post("customers", &json!({ "first_name": "Ada" }))
            .await
            .unwrap();
        assert_eq!(created["id"], "c1");

        let requests = requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url.path(), "/merchants/m1/customers");
        assert_eq!(request.headers[CONTENT_TYPE], JSON);
        let body: Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
        assert_eq!(body, json!({ "first_name": "Ada" }));
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let (mut config, _requests) = config_with(StatusCode::UNAUTHORIZED, "denied");
        let mut gateway = config.gateway().unwrap();

        let err = gateway.delete("/customers/c1").await.unwrap_err();
        assert_eq!(err.api_error_kind(), Some(ApiErrorKind::Authentication));
        match err {
            ClientError::Api { status, body } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, "denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_use_once_gateway_sends_a_single_request() {
        let (config, requests) = config_with(StatusCode::OK, "{}");
        let mut config = config.use_once(true);
        let mut gateway = config.gateway().unwrap();
        assert!(!config.is_configured());

        let _: Value = gateway.get("/plans").await.unwrap();
        assert!(!gateway.config().has_credentials());

        let err = gateway.get::<Value>("/plans").await.unwrap_err();
        assert!(matches!(err, ClientError::Config(ConfigError::NotConfigured)));
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reusable_gateway_keeps_credentials() {
        let (mut config, requests) = config_with(StatusCode::OK, "{}");
        let mut gateway = config.gateway().unwrap();

        let _: Value = gateway.get("/plans").await.unwrap();
        let _: Value = gateway.get("/plans").await.unwrap();
        assert!(gateway.config().has_credentials());
        assert_eq!(requests.lock().unwrap().len(), 2);
    }
}

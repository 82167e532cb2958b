//! Gateway HTTP client.
//!
//! The [`Gateway`] turns a [`ConfigSnapshot`](crate::config::ConfigSnapshot)
//! into authenticated JSON requests and sends them through the snapshot's
//! transport strategy.

mod gateway;

pub use gateway::{API_VERSION_HEADER, Gateway};

use reqwest::StatusCode;
use reqwest::header::InvalidHeaderValue;

use crate::config::ConfigError;
use crate::strategy::TransportError;

/// Errors produced by the gateway.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Snapshot could not be created or has no credentials left.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The merchant URL and path did not form a valid URL.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// Credentials contained bytes not allowed in a header.
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

impl ClientError {
    /// Classification of an [`Api`](Self::Api) error.
    pub fn api_error_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Self::Api { status, .. } => Some(ApiErrorKind::from_status(*status)),
            _ => None,
        }
    }
}

/// What a non-2xx gateway status means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// 401: keys rejected.
    Authentication,
    /// 403: keys valid but not allowed to perform the action.
    Authorization,
    NotFound,
    /// 426: the client library version is no longer supported.
    UpgradeRequired,
    TooManyRequests,
    ServerError,
    DownForMaintenance,
    Unexpected,
}

impl ApiErrorKind {
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            401 => Self::Authentication,
            403 => Self::Authorization,
            404 => Self::NotFound,
            426 => Self::UpgradeRequired,
            429 => Self::TooManyRequests,
            500 => Self::ServerError,
            503 => Self::DownForMaintenance,
            _ => Self::Unexpected,
        }
    }
}

//! Minimal REST plumbing shared by the auth client and review store.
//!
//! Client-side (hydrate): requests go out via `gloo-net`.
//! Server-side (SSR): `send` fails with `ApiError::Unavailable` since the
//! backend is only contacted from the browser.
//!
//! DESIGN
//! ======
//! Requests are plain data (`RestRequest`) and responses are decoded by pure
//! functions, so URL/header/query construction and error mapping are unit
//! tested without a network.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiResult};
use crate::config::BackendConfig;

/// HTTP verbs used against the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

/// Which backend surface a response came from; affects status mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// GoTrue (`/auth/v1/*`).
    Auth,
    /// PostgREST (`/rest/v1/*`).
    Data,
}

/// A fully described backend request.
#[derive(Clone, Debug, PartialEq)]
pub struct RestRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<serde_json::Value>,
}

impl RestRequest {
    /// Start a request to `path`, authenticated with the anon key until
    /// [`RestRequest::bearer`] replaces it.
    pub fn new(method: Method, config: &BackendConfig, path: &str) -> Self {
        Self {
            method,
            url: config.endpoint(path),
            query: Vec::new(),
            headers: vec![
                ("apikey", config.anon_key.clone()),
                ("Authorization", format!("Bearer {}", config.anon_key)),
            ],
            body: None,
        }
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_owned(), value.into()));
        self
    }

    #[must_use]
    pub fn bearer(mut self, token: &str) -> Self {
        self.set_header("Authorization", format!("Bearer {token}"));
        self
    }

    /// Ask PostgREST to echo written rows back.
    #[must_use]
    pub fn return_representation(mut self) -> Self {
        self.set_header("Prefer", "return=representation".to_owned());
        self
    }

    #[must_use]
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    fn set_header(&mut self, name: &'static str, value: String) {
        match self.headers.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
    }
}

/// Status and raw body of a completed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Send a request and collect its status and body.
///
/// # Errors
///
/// Returns `ApiError::Network` if the request cannot be built or sent, and
/// `ApiError::Unavailable` outside the browser.
pub async fn send(request: RestRequest) -> ApiResult<RawResponse> {
    #[cfg(feature = "hydrate")]
    {
        use gloo_net::http::{Method as HttpMethod, RequestBuilder};

        let method = match request.method {
            Method::Get => HttpMethod::GET,
            Method::Post => HttpMethod::POST,
            Method::Patch => HttpMethod::PATCH,
            Method::Delete => HttpMethod::DELETE,
        };
        let mut builder = RequestBuilder::new(&request.url)
            .method(method)
            .query(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let built = match &request.body {
            Some(body) => builder.json(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Network(e.to_string()))?;

        let resp = built.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(RawResponse { status, body })
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = request;
        Err(ApiError::Unavailable)
    }
}

/// Seam between the backend clients and the wire.
#[async_trait(?Send)]
pub trait Transport {
    async fn execute(&self, request: RestRequest) -> ApiResult<RawResponse>;
}

/// Transport backed by [`send`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn execute(&self, request: RestRequest) -> ApiResult<RawResponse> {
        send(request).await
    }
}

/// Pull the most specific message GoTrue/PostgREST put in an error body.
pub fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(serde_json::Value::as_str).map(str::to_owned))
        })
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("request failed: {status}"))
}

/// Map a non-success response into the error taxonomy.
pub fn error_from_response(endpoint: Endpoint, resp: &RawResponse) -> ApiError {
    let message = error_message(resp.status, &resp.body);
    let is_auth = match endpoint {
        Endpoint::Auth => matches!(resp.status, 400 | 401 | 403 | 422),
        Endpoint::Data => matches!(resp.status, 401 | 403),
    };
    if is_auth {
        ApiError::Auth(message)
    } else {
        ApiError::Backend { status: resp.status, message }
    }
}

/// Fail on non-success statuses, ignoring the body otherwise.
///
/// # Errors
///
/// Returns the mapped error for any non-2xx status.
pub fn ensure_success(endpoint: Endpoint, resp: &RawResponse) -> ApiResult<()> {
    if resp.is_success() { Ok(()) } else { Err(error_from_response(endpoint, resp)) }
}

/// Decode a successful JSON body.
///
/// # Errors
///
/// Returns the mapped error for non-2xx statuses and `ApiError::Decode` when
/// the body does not match `T`.
pub fn decode_json<T: DeserializeOwned>(endpoint: Endpoint, resp: &RawResponse) -> ApiResult<T> {
    ensure_success(endpoint, resp)?;
    serde_json::from_str(&resp.body).map_err(|e| ApiError::Decode(e.to_string()))
}

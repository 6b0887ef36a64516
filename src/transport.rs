//! Transport seam.
//!
//! The dispatcher depends on the [`Transport`] contract, not on any
//! particular HTTP stack: one call with a target address and a wire-level
//! options bag, resolving to an ok flag and a text body. A per-call
//! `custom_fetch` may substitute any implementation of the same contract.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::RequestMethod;

/// A transport rejection, carried unmodified through the dispatcher.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Wire-level options handed to a transport.
///
/// Exactly one method, an optional pre-serialized text body, and whatever
/// else the merged configuration carried. `extra` is deliberately an open
/// bag; transports interpret the keys they understand and ignore the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: RequestMethod,
    pub body: Option<String>,
    pub extra: Map<String, Value>,
}

impl RequestOptions {
    pub fn new(method: RequestMethod) -> Self {
        Self {
            method,
            body: None,
            extra: Map::new(),
        }
    }

    /// String-valued entries of the `headers` object in the options bag.
    pub fn header_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extra
            .get("headers")
            .and_then(Value::as_object)
            .into_iter()
            .flatten()
            .filter_map(|(name, value)| value.as_str().map(|v| (name.as_str(), v)))
    }
}

/// What a transport resolves to: a success flag and the body as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub ok: bool,
    pub body: String,
}

impl RawResponse {
    pub fn new(ok: bool, body: impl Into<String>) -> Self {
        Self {
            ok,
            body: body.into(),
        }
    }

    /// Build a response from a numeric status; `ok` is the 2xx range.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        Self::new((200..300).contains(&status), body)
    }
}

/// The network-fetch primitive contract.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request. Rejection means the request never produced a
    /// readable response; a non-success status is still a resolution.
    async fn send(&self, url: &str, options: &RequestOptions)
    -> Result<RawResponse, TransportError>;
}

static SHARED_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Default transport over a shared reqwest client.
///
/// Honors a `headers` object of string values in the options bag; other
/// extra keys are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestTransport;

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<RawResponse, TransportError> {
        let mut request = SHARED_CLIENT.request(options.method.into(), url);
        for (name, value) in options.header_pairs() {
            request = request.header(name, value);
        }
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%url, status = status.as_u16(), "transport resolved");

        Ok(RawResponse::new(status.is_success(), body))
    }
}

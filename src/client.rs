//! The request dispatcher.
//!
//! One network call per invocation, every outcome folded into a
//! `Result<Value, FetchError>`: transport rejection, parse failure,
//! non-success status, classifier veto, and a panicking classifier all
//! terminate in the `Err` variant. No retries, no re-entry.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;
use serde_json::error::Category;
use tracing::debug;

use crate::config::{Classifier, LocalConfig};
use crate::convert;
use crate::error::{FetchError, Result};
use crate::store::{self, ConfigStore};
use crate::transport::{ReqwestTransport, RequestOptions, Transport};
use crate::wrap::CaughtPanic;

/// Request methods the dispatcher accepts. Sent as literal uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl RequestMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RequestMethod> for http::Method {
    fn from(method: RequestMethod) -> Self {
        match method {
            RequestMethod::Get => http::Method::GET,
            RequestMethod::Post => http::Method::POST,
            RequestMethod::Put => http::Method::PUT,
            RequestMethod::Patch => http::Method::PATCH,
            RequestMethod::Delete => http::Method::DELETE,
        }
    }
}

/// Dispatch one request against the process-wide ambient configuration.
///
/// See [`smart_fetch_with`] for the full contract.
pub async fn smart_fetch(
    method: RequestMethod,
    uri: &str,
    config: LocalConfig,
) -> Result<Value> {
    smart_fetch_with(store::ambient(), method, uri, config).await
}

/// Dispatch one request against an explicit configuration store.
///
/// The ambient configuration is merged with `config` (local keys win), the
/// target address is the literal concatenation of the effective base URL
/// and `uri`, the body (if any) is serialized to text, and the transport is
/// invoked exactly once. The parsed body comes back as `Ok` when the
/// response is a success and the `should_throw` classifier (if any) does
/// not veto it; every other outcome is an `Err` (see [`FetchError`]).
pub async fn smart_fetch_with(
    store: &ConfigStore,
    method: RequestMethod,
    uri: &str,
    config: LocalConfig,
) -> Result<Value> {
    let global = store.get();
    let resolved = config.merge_over(&global);

    // Literal concatenation: no encoding, no normalization.
    let target = format!("{}{}", resolved.base_url.as_deref().unwrap_or(""), uri);

    let mut options = RequestOptions::new(method);
    options.extra = resolved.options;
    if let Some(body) = resolved.body.filter(|body| !body.is_null()) {
        options.body = Some(convert::stringify(&body)?);
    }

    let transport: Arc<dyn Transport> = resolved
        .custom_fetch
        .unwrap_or_else(|| Arc::new(ReqwestTransport));

    debug!(
        method = %method,
        target = %target,
        has_body = options.body.is_some(),
        "dispatching request"
    );

    let response = match transport.send(&target, &options).await {
        Ok(response) => response,
        Err(rejection) => return Err(FetchError::Transport(rejection)),
    };

    let parsed = parse_body(&response.body)?;
    classify(response.ok, parsed, resolved.should_throw.as_ref())
}

/// Two-stage body interpretation: JSON first, raw text on a syntax-class
/// failure. Anything else is a genuine parse error.
fn parse_body(text: &str) -> Result<Value> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(e) if matches!(e.classify(), Category::Syntax | Category::Eof) => {
            Ok(Value::String(text.to_owned()))
        }
        Err(e) => Err(FetchError::Parse(e)),
    }
}

/// Fold status and classifier verdict into the terminal result.
///
/// The classifier is only consulted on a success status, and runs inside a
/// panic guard: a broken classifier is an error condition, not a crash.
fn classify(ok: bool, parsed: Value, should_throw: Option<&Classifier>) -> Result<Value> {
    if !ok {
        return Err(FetchError::Rejected(parsed));
    }

    let vetoed = match should_throw {
        Some(classifier) => panic::catch_unwind(AssertUnwindSafe(|| classifier(&parsed)))
            .map_err(|payload| FetchError::Classifier(CaughtPanic::new(payload)))?,
        None => false,
    };

    if vetoed {
        Err(FetchError::Rejected(parsed))
    } else {
        Ok(parsed)
    }
}

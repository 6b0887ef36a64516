//! Fetch error types.

use serde_json::Value;
use thiserror::Error;

use crate::transport::TransportError;
use crate::wrap::CaughtPanic;

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Everything a dispatch can fail with.
///
/// All failure modes converge here; callers distinguish cause by matching
/// the variant and inspecting its payload. Nothing ever escapes the
/// dispatcher as a panic.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The transport rejected outright: network failure, DNS failure,
    /// unusable target address. The rejection is carried unmodified.
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    /// The response arrived and parsed, but was classified as a failure:
    /// either a non-success status or a `should_throw` veto. The payload is
    /// the parsed body.
    #[error("rejected response: {0}")]
    Rejected(Value),

    /// The `should_throw` classifier itself panicked. Its payload replaces
    /// the parsed body.
    #[error("classifier panicked: {0}")]
    Classifier(#[source] CaughtPanic),

    /// The response body could not be interpreted: a parse failure that is
    /// not a plain syntax error (syntax errors fall back to raw text).
    #[error("unparseable response body: {0}")]
    Parse(#[source] serde_json::Error),

    /// The request body could not be serialized. A programming error in the
    /// caller, surfaced rather than sent.
    #[error(transparent)]
    Stringify(#[from] ConvertError),
}

/// Raised by the [`convert`](crate::convert) collaborators when a value
/// cannot be represented as JSON text.
#[derive(Debug, Error)]
#[error("value cannot be represented as JSON: {0}")]
pub struct ConvertError(#[from] serde_json::Error);

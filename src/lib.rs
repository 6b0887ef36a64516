//! # Smart Fetch
//!
//! A small result-oriented HTTP request layer: one network call per
//! dispatch, with every outcome (transport rejection, parse failure, bad
//! status, application-defined veto) folded into a single
//! `Result<Value, FetchError>` instead of escaping as a panic or requiring
//! manual status checks.
//!
//! ## Features
//!
//! - **Uniform results**: every failure mode converges on the `Err` variant
//! - **Layered configuration**: a process-wide config merged with per-call
//!   overrides, local keys winning ties
//! - **Pluggable transport**: the default reqwest transport can be swapped
//!   per call with anything implementing [`Transport`]
//! - **Text/JSON fallback parsing**: JSON bodies parse structurally, plain
//!   text comes back as a string value
//! - **Panic-catching combinators**: [`wrapped`] and [`async_wrapped`]
//!   adapt any callable into one that never panics
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use smart_fetch::{init_smart_fetch, smart_fetch, GlobalConfig, LocalConfig, RequestMethod};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_smart_fetch(
//!         GlobalConfig::builder()
//!             .base_url("https://api.example.com")
//!             .header("accept", "application/json")
//!             .build(),
//!     );
//!
//!     match smart_fetch(RequestMethod::Get, "/users", LocalConfig::default()).await {
//!         Ok(users) => println!("users: {users}"),
//!         Err(e) => eprintln!("request failed: {e}"),
//!     }
//! }
//! ```
//!
//! ## With a classifier and a body
//!
//! ```rust,no_run
//! use serde_json::{json, Value};
//! use smart_fetch::{smart_fetch, LocalConfig, RequestMethod};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = LocalConfig::builder()
//!         .base_url("https://api.example.com")
//!         .body(json!({ "item": "widget", "quantity": 5 }))
//!         // Treat a 200 carrying an error key as a failure.
//!         .should_throw(|body: &Value| body.get("error").is_some())
//!         .build();
//!
//!     let result = smart_fetch(RequestMethod::Post, "/orders", config).await;
//!     println!("{result:?}");
//! }
//! ```

mod client;
mod config;
pub mod convert;
mod error;
mod store;
mod transport;
mod wrap;

pub use client::{RequestMethod, smart_fetch, smart_fetch_with};
pub use config::{Classifier, GlobalConfig, GlobalConfigBuilder, LocalConfig, LocalConfigBuilder};
pub use error::{ConvertError, FetchError, Result};
pub use store::{ConfigStore, init_smart_fetch, reset_smart_fetch, smart_fetch_config};
pub use transport::{RawResponse, RequestOptions, ReqwestTransport, Transport, TransportError};
pub use wrap::{CaughtPanic, async_wrapped, wrapped};

/// Prelude for common imports.
///
/// ```
/// use smart_fetch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::{RequestMethod, smart_fetch, smart_fetch_with};
    pub use crate::config::{Classifier, GlobalConfig, LocalConfig};
    pub use crate::convert::{clone, stringify};
    pub use crate::error::{ConvertError, FetchError, Result};
    pub use crate::store::{ConfigStore, init_smart_fetch, reset_smart_fetch, smart_fetch_config};
    pub use crate::transport::{RawResponse, RequestOptions, ReqwestTransport, Transport};
    pub use crate::wrap::{CaughtPanic, async_wrapped, wrapped};
}

//! Request configuration and per-call merging.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::transport::Transport;

/// Application-defined failure classifier.
///
/// Inspects the parsed response body and returns `true` when the response
/// should be treated as a failure despite a success status.
pub type Classifier = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Process-wide request configuration.
///
/// Holds everything a call does not have to repeat: an optional base URL,
/// an optional classifier, and an open bag of transport options (headers
/// and friends). The bag never carries `body` or `method`.
#[derive(Clone, Default)]
pub struct GlobalConfig {
    /// Prefix prepended verbatim to every request target.
    pub base_url: Option<String>,
    /// Classifier consulted on success statuses.
    pub should_throw: Option<Classifier>,
    /// Open transport options, passed through to the transport untouched.
    pub options: Map<String, Value>,
}

impl GlobalConfig {
    /// Create a new configuration builder.
    pub fn builder() -> GlobalConfigBuilder {
        GlobalConfigBuilder::default()
    }
}

impl fmt::Debug for GlobalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalConfig")
            .field("base_url", &self.base_url)
            .field("should_throw", &self.should_throw.is_some())
            .field("options", &self.options)
            .finish()
    }
}

/// Builder for [`GlobalConfig`].
#[derive(Default)]
pub struct GlobalConfigBuilder {
    config: GlobalConfig,
}

impl GlobalConfigBuilder {
    /// Set the base URL prepended to every request target.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the failure classifier.
    pub fn should_throw<F>(mut self, classifier: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.config.should_throw = Some(Arc::new(classifier));
        self
    }

    /// Set an arbitrary transport option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.options.insert(key.into(), value.into());
        self
    }

    /// Add a header to the `headers` object of the options bag.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert_header(&mut self.config.options, name.into(), value.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GlobalConfig {
        self.config
    }
}

/// Per-call request configuration.
///
/// Same shape as [`GlobalConfig`] plus the two things that only make sense
/// for a single call: an optional request body and an optional transport
/// override. Local keys win over global keys when the two merge.
#[derive(Clone, Default)]
pub struct LocalConfig {
    /// Overrides the global base URL when set.
    pub base_url: Option<String>,
    /// Overrides the global classifier when set.
    pub should_throw: Option<Classifier>,
    /// Request body; serialized to text at dispatch. `None` or `Null`
    /// means no body is sent at all.
    pub body: Option<Value>,
    /// Transport override for this call only.
    pub custom_fetch: Option<Arc<dyn Transport>>,
    /// Open transport options; each key overrides the same global key.
    pub options: Map<String, Value>,
}

impl LocalConfig {
    /// Create a new configuration builder.
    pub fn builder() -> LocalConfigBuilder {
        LocalConfigBuilder::default()
    }

    /// Merge this call's configuration over the ambient one.
    ///
    /// Local keys win ties; the options bag merges per top-level key, so a
    /// local `headers` object replaces the global one wholesale.
    pub(crate) fn merge_over(self, global: &GlobalConfig) -> Resolved {
        let mut options = global.options.clone();
        for (key, value) in self.options {
            options.insert(key, value);
        }

        Resolved {
            base_url: self.base_url.or_else(|| global.base_url.clone()),
            should_throw: self.should_throw.or_else(|| global.should_throw.clone()),
            body: self.body,
            custom_fetch: self.custom_fetch,
            options,
        }
    }
}

impl fmt::Debug for LocalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalConfig")
            .field("base_url", &self.base_url)
            .field("should_throw", &self.should_throw.is_some())
            .field("body", &self.body)
            .field("custom_fetch", &self.custom_fetch.is_some())
            .field("options", &self.options)
            .finish()
    }
}

/// Builder for [`LocalConfig`].
#[derive(Default)]
pub struct LocalConfigBuilder {
    config: LocalConfig,
}

impl LocalConfigBuilder {
    /// Override the base URL for this call.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Override the failure classifier for this call.
    pub fn should_throw<F>(mut self, classifier: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.config.should_throw = Some(Arc::new(classifier));
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.config.body = Some(body.into());
        self
    }

    /// Substitute the transport for this call.
    pub fn custom_fetch(mut self, transport: Arc<dyn Transport>) -> Self {
        self.config.custom_fetch = Some(transport);
        self
    }

    /// Set an arbitrary transport option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.options.insert(key.into(), value.into());
        self
    }

    /// Add a header to the `headers` object of the options bag.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert_header(&mut self.config.options, name.into(), value.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> LocalConfig {
        self.config
    }
}

/// One call's fully merged configuration, ready for dispatch.
pub(crate) struct Resolved {
    pub base_url: Option<String>,
    pub should_throw: Option<Classifier>,
    pub body: Option<Value>,
    pub custom_fetch: Option<Arc<dyn Transport>>,
    pub options: Map<String, Value>,
}

fn insert_header(options: &mut Map<String, Value>, name: String, value: String) {
    let headers = options
        .entry("headers")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(map) = headers {
        map.insert(name, Value::String(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn local_base_url_wins_over_global() {
        let global = GlobalConfig::builder().base_url("https://h.test").build();
        let local = LocalConfig::builder().base_url("https://h2.test").build();

        let resolved = local.merge_over(&global);
        assert_eq!(resolved.base_url.as_deref(), Some("https://h2.test"));
    }

    #[test]
    fn global_base_url_survives_when_local_is_silent() {
        let global = GlobalConfig::builder().base_url("https://h.test").build();
        let resolved = LocalConfig::default().merge_over(&global);
        assert_eq!(resolved.base_url.as_deref(), Some("https://h.test"));
    }

    #[test]
    fn options_merge_per_key_with_local_winning() {
        let global = GlobalConfig::builder()
            .option("mode", "cors")
            .header("x-shared", "global")
            .build();
        let local = LocalConfig::builder().header("x-shared", "local").build();

        let resolved = local.merge_over(&global);
        // The local headers object replaces the global one wholesale.
        assert_eq!(
            resolved.options.get("headers"),
            Some(&json!({ "x-shared": "local" }))
        );
        // Untouched global keys survive.
        assert_eq!(resolved.options.get("mode"), Some(&json!("cors")));
    }

    #[test]
    fn local_classifier_wins_over_global() {
        let global = GlobalConfig::builder().should_throw(|_| true).build();
        let local = LocalConfig::builder().should_throw(|_| false).build();

        let resolved = local.merge_over(&global);
        let classifier = resolved.should_throw.expect("classifier merged away");
        assert!(!classifier(&Value::Null));
    }

    #[test]
    fn header_builder_nests_under_the_headers_key() {
        let config = GlobalConfig::builder()
            .header("x-api-key", "secret")
            .header("accept", "application/json")
            .build();

        assert_eq!(
            config.options.get("headers"),
            Some(&json!({ "x-api-key": "secret", "accept": "application/json" }))
        );
    }
}

//! Ambient configuration store.
//!
//! The only shared mutable state in the crate. A store holds at most one
//! live [`GlobalConfig`]; `set` overwrites it wholesale (last write wins,
//! never a merge) as a single `Arc` swap, so a concurrent reader observes
//! either the old or the new configuration, never a torn one.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::GlobalConfig;

/// An injectable configuration store.
///
/// Dispatch reads through a store reference, so tests and multi-tenant
/// callers can keep isolated configurations instead of sharing the
/// process-wide one.
pub struct ConfigStore {
    inner: RwLock<Option<Arc<GlobalConfig>>>,
}

impl ConfigStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Install a configuration, replacing any previous one wholesale.
    pub fn set(&self, config: GlobalConfig) {
        *self.inner.write() = Some(Arc::new(config));
    }

    /// Read the current configuration; empty if none was ever installed.
    pub fn get(&self) -> Arc<GlobalConfig> {
        self.inner.read().clone().unwrap_or_default()
    }

    /// Drop the installed configuration, returning the store to empty.
    pub fn reset(&self) {
        *self.inner.write() = None;
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

static AMBIENT: ConfigStore = ConfigStore::new();

/// The process-wide store that [`smart_fetch`](crate::smart_fetch) reads.
pub fn ambient() -> &'static ConfigStore {
    &AMBIENT
}

/// Install the process-wide configuration. Calling again replaces the
/// previous configuration entirely.
pub fn init_smart_fetch(config: GlobalConfig) {
    AMBIENT.set(config);
}

/// Read the process-wide configuration; empty if never initialized.
pub fn smart_fetch_config() -> Arc<GlobalConfig> {
    AMBIENT.get()
}

/// Clear the process-wide configuration.
pub fn reset_smart_fetch() {
    AMBIENT.reset();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_reads_as_default_config() {
        let store = ConfigStore::new();
        let config = store.get();
        assert!(config.base_url.is_none());
        assert!(config.should_throw.is_none());
        assert!(config.options.is_empty());
    }

    #[test]
    fn last_write_wins_wholesale() {
        let store = ConfigStore::new();
        store.set(
            GlobalConfig::builder()
                .base_url("https://google.com")
                .header("x-from-a", "1")
                .build(),
        );
        store.set(GlobalConfig::builder().base_url("https://twitch.tv").build());

        let config = store.get();
        assert_eq!(config.base_url.as_deref(), Some("https://twitch.tv"));
        // No merge with the first write.
        assert!(config.options.is_empty());
    }

    #[test]
    fn reset_returns_the_store_to_empty() {
        let store = ConfigStore::new();
        store.set(GlobalConfig::builder().base_url("https://h.test").build());
        store.reset();
        assert!(store.get().base_url.is_none());
    }
}

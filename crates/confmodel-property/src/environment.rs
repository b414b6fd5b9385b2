//! System and test property resolvers
//!
//! These form the global defaults at the tail of every resolver chain. They
//! are plain values handed to the model layer, not process-wide statics, so
//! tests can substitute deterministic ones.

use crate::compound::compact;
use crate::config::ResolverConfig;
use crate::resolver::{PropertyResolver, SharedResolver};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// System properties plus a snapshot of the process environment
///
/// Keys starting with the configured environment prefix (`env.` by default)
/// read the environment; all other keys read the system properties.
#[derive(Debug, Clone)]
pub struct SystemResolver {
    properties: HashMap<String, String>,
    environment: HashMap<String, String>,
    env_prefix: String,
}

impl SystemResolver {
    /// Create resolver with no properties and an empty environment
    #[inline]
    #[must_use]
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            properties: HashMap::new(),
            environment: HashMap::new(),
            env_prefix: config.env_prefix.clone(),
        }
    }

    /// Create resolver over the current process environment
    #[must_use]
    pub fn from_process(config: &ResolverConfig) -> Self {
        let environment: HashMap<String, String> = std::env::vars().collect();
        tracing::debug!(
            "Captured {} environment variables for property resolution",
            environment.len()
        );
        Self {
            environment,
            ..Self::new(config)
        }
    }

    /// With system property
    #[inline]
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// With environment variable
    #[inline]
    #[must_use]
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(name.into(), value.into());
        self
    }
}

impl PropertyResolver for SystemResolver {
    fn resolve(&self, key: &str) -> Option<String> {
        match key.strip_prefix(self.env_prefix.as_str()) {
            Some(name) if !self.env_prefix.is_empty() => self.environment.get(name).cloned(),
            _ => self.properties.get(key).cloned(),
        }
    }
}

/// Mutable property overlay for tests
#[derive(Debug, Default)]
pub struct TestResolver {
    values: RwLock<HashMap<String, String>>,
}

impl TestResolver {
    /// Create empty overlay
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, returning the previous value
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.write().insert(key.into(), value.into())
    }

    /// Remove a property
    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.write().remove(key)
    }

    /// Remove all properties
    pub fn clear(&self) {
        self.values.write().clear();
    }

    /// Number of properties set
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Check if no properties are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl PropertyResolver for TestResolver {
    fn resolve(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }
}

/// Default tail of every chain: system properties, then test properties
#[must_use]
pub fn system_and_test(system: Arc<SystemResolver>, test: Arc<TestResolver>) -> SharedResolver {
    let system: SharedResolver = system;
    let test: SharedResolver = test;
    compact([system, test])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_properties_and_env_are_separate() {
        let resolver = SystemResolver::new(&ResolverConfig::default())
            .with_property("HOME", "property")
            .with_env("HOME", "/home/tester");

        assert_eq!(resolver.resolve("HOME").as_deref(), Some("property"));
        assert_eq!(resolver.resolve("env.HOME").as_deref(), Some("/home/tester"));
        assert_eq!(resolver.resolve("env.MISSING"), None);
    }

    #[test]
    fn custom_env_prefix() {
        let config = ResolverConfig::default().with_env_prefix("ENV:");
        let resolver = SystemResolver::new(&config).with_env("USER", "tester");
        assert_eq!(resolver.resolve("ENV:USER").as_deref(), Some("tester"));
        assert_eq!(resolver.resolve("env.USER"), None);
    }

    #[test]
    fn from_process_sees_environment() {
        let resolver = SystemResolver::from_process(&ResolverConfig::default());
        if let Some((name, value)) = std::env::vars().next() {
            assert_eq!(resolver.resolve(&format!("env.{name}")), Some(value));
        }
    }

    #[test]
    fn test_resolver_overlay() {
        let resolver = TestResolver::new();
        assert!(resolver.is_empty());

        assert_eq!(resolver.set("a", "1"), None);
        assert_eq!(resolver.set("a", "2").as_deref(), Some("1"));
        assert_eq!(resolver.resolve("a").as_deref(), Some("2"));

        assert_eq!(resolver.remove("a").as_deref(), Some("2"));
        assert_eq!(resolver.resolve("a"), None);

        resolver.set("b", "1");
        resolver.clear();
        assert_eq!(resolver.len(), 0);
    }

    #[test]
    fn system_wins_over_test() {
        let system = Arc::new(SystemResolver::new(&ResolverConfig::default()).with_property("k", "system"));
        let test = Arc::new(TestResolver::new());
        test.set("k", "test");
        test.set("only_test", "yes");

        let defaults = system_and_test(system, Arc::clone(&test));
        assert_eq!(defaults.resolve("k").as_deref(), Some("system"));
        assert_eq!(defaults.resolve("only_test").as_deref(), Some("yes"));

        // Overlay stays live through the chain
        test.set("late", "value");
        assert_eq!(defaults.resolve("late").as_deref(), Some("value"));
    }
}

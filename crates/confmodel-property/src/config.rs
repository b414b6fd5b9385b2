//! Resolver configuration

use serde::{Deserialize, Serialize};

/// Placeholder syntax and expansion limits
///
/// The defaults give `${key}` placeholders with `${key:default}` fallbacks,
/// and route `env.`-prefixed keys to the process environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Placeholder opening token
    pub prefix: String,
    /// Placeholder closing token
    pub suffix: String,
    /// Separator between key and inline default
    pub default_separator: char,
    /// Maximum nesting of recursive expansion
    pub max_depth: usize,
    /// Key prefix that reads the process environment
    pub env_prefix: String,
}

impl ResolverConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With placeholder delimiters
    #[inline]
    #[must_use]
    pub fn with_delimiters(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self.suffix = suffix.into();
        self
    }

    /// With default-value separator
    #[inline]
    #[must_use]
    pub fn with_default_separator(mut self, separator: char) -> Self {
        self.default_separator = separator;
        self
    }

    /// With recursion limit
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// With environment key prefix
    #[inline]
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            prefix: "${".to_string(),
            suffix: "}".to_string(),
            default_separator: ':',
            max_depth: 8,
            env_prefix: "env.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ResolverConfig::new();
        assert_eq!(config.prefix, "${");
        assert_eq!(config.suffix, "}");
        assert_eq!(config.default_separator, ':');
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.env_prefix, "env.");
    }

    #[test]
    fn builder() {
        let config = ResolverConfig::new()
            .with_delimiters("#{", "}#")
            .with_default_separator('|')
            .with_max_depth(2)
            .with_env_prefix("ENV:");
        assert_eq!(config.prefix, "#{");
        assert_eq!(config.suffix, "}#");
        assert_eq!(config.default_separator, '|');
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.env_prefix, "ENV:");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ResolverConfig = serde_json::from_str(r#"{"max_depth": 3}"#).unwrap();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.prefix, "${");
    }
}

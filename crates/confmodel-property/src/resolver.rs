//! Property resolver capability
//!
//! Provides the [`PropertyResolver`] trait and the simplest concrete resolver,
//! [`MapResolver`].

use indexmap::IndexMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Maps a placeholder key to a value
///
/// A miss is reported as `None`, never as an error: callers decide whether an
/// unresolved key matters in their context.
///
/// # Contract
/// - `resolve` must not block on locks held by tree mutation
/// - Implementations are shared across threads behind [`SharedResolver`]
pub trait PropertyResolver: Send + Sync + Debug {
    /// Resolve `key`, returning `None` when this resolver does not know it
    fn resolve(&self, key: &str) -> Option<String>;

    /// Members of this resolver when it is a chain
    ///
    /// Used by [`compact`](crate::compact) to flatten nested chains.
    /// Leaf resolvers keep the default.
    fn members(&self) -> Option<&[SharedResolver]> {
        None
    }
}

/// Shared, thread-safe resolver handle
pub type SharedResolver = Arc<dyn PropertyResolver>;

/// Identity comparison of two resolver handles
///
/// Compares the data pointer only, so two handles to the same resolver are
/// equal even when their vtable pointers differ.
#[inline]
#[must_use]
pub fn same_resolver(a: &SharedResolver, b: &SharedResolver) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

/// Resolver backed by an in-memory map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapResolver {
    values: IndexMap<String, String>,
}

impl MapResolver {
    /// Create empty resolver
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key/value pair
    #[inline]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Number of keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if resolver knows no keys
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MapResolver
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl PropertyResolver for MapResolver {
    fn resolve(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

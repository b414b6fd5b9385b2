//! Marshaller dispatch from element names to model types
//!
//! A [`Marshaller`] covers one namespace and maps local names to factories.
//! A [`MarshallerRegistry`] maps namespaces to marshallers.
//!
//! # Lookup order
//! 1. The registry's marshaller for the element's namespace
//! 2. That marshaller's delegate chain
//! 3. The registry's fallback registry, recursively
//!
//! An element nothing recognizes reads as `None`; callers skip it.

use crate::context::ModelContext;
use crate::error::ModelResult;
use crate::model::{Model, ModelType};
use confmodel_node::{ConfigNode, QName};
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Constructor producing a model for a node
pub type ModelFactory = Arc<dyn Fn(ConfigNode, &ModelContext) -> ModelResult<Arc<dyn Model>> + Send + Sync>;

/// Factory for a [`ModelType`]
#[must_use]
pub fn factory<T: ModelType>() -> ModelFactory {
    Arc::new(|node, context| {
        let model: Arc<dyn Model> = Arc::new(T::from_node(node, context)?);
        Ok(model)
    })
}

/// Factory from a closure
#[must_use]
pub fn factory_fn<F>(f: F) -> ModelFactory
where
    F: Fn(ConfigNode, &ModelContext) -> ModelResult<Arc<dyn Model>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Local-name to factory mapping for one namespace
pub struct Marshaller {
    namespace: String,
    factories: HashMap<String, ModelFactory>,
    delegate: Option<Arc<Marshaller>>,
}

impl Marshaller {
    /// Create empty marshaller for `namespace`
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            factories: HashMap::new(),
            delegate: None,
        }
    }

    /// With factory for `local`
    #[must_use]
    pub fn with_factory(mut self, local: impl Into<String>, factory: ModelFactory) -> Self {
        self.factories.insert(local.into(), factory);
        self
    }

    /// With model type for `local`
    #[must_use]
    pub fn with_model<T: ModelType>(self, local: impl Into<String>) -> Self {
        self.with_factory(local, factory::<T>())
    }

    /// With marshaller consulted for names this one does not map
    #[must_use]
    pub fn with_delegate(mut self, delegate: Arc<Marshaller>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Namespace this marshaller covers
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Factory for `local`, searching the delegate chain
    #[must_use]
    pub fn factory(&self, local: &str) -> Option<&ModelFactory> {
        std::iter::successors(Some(self), |m| m.delegate.as_deref()).find_map(|m| m.factories.get(local))
    }

    /// Check if `local` is mapped here or by a delegate
    #[must_use]
    pub fn recognizes(&self, local: &str) -> bool {
        self.factory(local).is_some()
    }
}

impl Debug for Marshaller {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Marshaller")
            .field("namespace", &self.namespace)
            .field("names", &names)
            .field("delegate", &self.delegate)
            .finish()
    }
}

/// Namespace to marshaller mapping, optionally layered over a fallback
///
/// Built once at startup and read-only afterwards, so it is shared across
/// threads without locking.
#[derive(Default)]
pub struct MarshallerRegistry {
    marshallers: HashMap<String, Arc<Marshaller>>,
    fallback: Option<Arc<MarshallerRegistry>>,
}

impl MarshallerRegistry {
    /// Create empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With marshaller, replacing any registered for the same namespace
    #[must_use]
    pub fn with_marshaller(self, marshaller: Marshaller) -> Self {
        self.with_shared_marshaller(Arc::new(marshaller))
    }

    /// With marshaller shared with other registries or delegators
    #[must_use]
    pub fn with_shared_marshaller(mut self, marshaller: Arc<Marshaller>) -> Self {
        self.marshallers.insert(marshaller.namespace().to_string(), marshaller);
        self
    }

    /// With registry consulted for names this one does not map
    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<MarshallerRegistry>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Marshaller registered for `namespace` in this registry only
    #[must_use]
    pub fn marshaller(&self, namespace: &str) -> Option<&Arc<Marshaller>> {
        self.marshallers.get(namespace)
    }

    /// Factory for `name`, searching delegates then fallbacks
    #[must_use]
    pub fn factory(&self, name: &QName) -> Option<&ModelFactory> {
        std::iter::successors(Some(self), |r| r.fallback.as_deref()).find_map(|registry| {
            registry
                .marshallers
                .get(name.namespace())
                .and_then(|m| m.factory(name.local_name()))
        })
    }

    /// Check if some marshaller maps `name`
    #[must_use]
    pub fn recognizes(&self, name: &QName) -> bool {
        self.factory(name).is_some()
    }

    /// Wrap `node` in the model its name maps to
    ///
    /// Returns `Ok(None)` when nothing recognizes the element.
    ///
    /// # Errors
    /// Propagates factory failures
    pub fn read(&self, node: ConfigNode, context: &ModelContext) -> ModelResult<Option<Arc<dyn Model>>> {
        let Some(factory) = self.factory(node.name()) else {
            tracing::debug!("No marshaller recognizes '{}', skipping", node.name());
            return Ok(None);
        };
        factory(node, context).map(Some)
    }
}

impl Debug for MarshallerRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut namespaces: Vec<&str> = self.marshallers.keys().map(String::as_str).collect();
        namespaces.sort_unstable();
        f.debug_struct("MarshallerRegistry")
            .field("namespaces", &namespaces)
            .field("fallback", &self.fallback)
            .finish()
    }
}

//! Shared model construction context

use crate::error::ModelResult;
use crate::marshaller::MarshallerRegistry;
use crate::model::{downcast, Model};
use crate::models::core_registry;
use confmodel_node::ConfigNode;
use confmodel_property::{expand, system_and_test, ResolverConfig, SharedResolver, SystemResolver, TestResolver};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Everything a model needs besides its node
///
/// Carries the marshaller registry used to read child models, the default
/// resolver that terminates every resolver chain, and the placeholder
/// syntax. Cheap to clone; models keep their own copy.
#[derive(Clone)]
pub struct ModelContext {
    registry: Arc<MarshallerRegistry>,
    defaults: SharedResolver,
    config: Arc<ResolverConfig>,
}

impl ModelContext {
    /// Create context over `registry` with process defaults
    ///
    /// The default resolver is a snapshot of the process environment followed
    /// by an empty test overlay.
    #[must_use]
    pub fn new(registry: Arc<MarshallerRegistry>) -> Self {
        let config = ResolverConfig::default();
        let defaults = system_and_test(
            Arc::new(SystemResolver::from_process(&config)),
            Arc::new(TestResolver::new()),
        );
        Self {
            registry,
            defaults,
            config: Arc::new(config),
        }
    }

    /// Context over the core model catalog
    #[must_use]
    pub fn core() -> Self {
        Self::new(Arc::new(core_registry()))
    }

    /// With default resolver
    #[must_use]
    pub fn with_defaults(mut self, defaults: SharedResolver) -> Self {
        self.defaults = defaults;
        self
    }

    /// With placeholder configuration
    ///
    /// Only affects expansion; an already built default resolver keeps the
    /// environment prefix it was created with.
    #[must_use]
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Marshaller registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &MarshallerRegistry {
        &self.registry
    }

    /// Default resolver at the tail of every chain
    #[inline]
    #[must_use]
    pub fn defaults(&self) -> &SharedResolver {
        &self.defaults
    }

    /// Placeholder configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Wrap `node` in the model its registry maps it to
    ///
    /// Returns `Ok(None)` for unrecognized elements.
    ///
    /// # Errors
    /// Propagates factory failures
    pub fn read(&self, node: &ConfigNode) -> ModelResult<Option<Arc<dyn Model>>> {
        self.registry.read(node.clone(), self)
    }

    /// Wrap `node` and downcast to a concrete model type
    ///
    /// Returns `Ok(None)` when the element is unrecognized or maps to a
    /// different model type.
    ///
    /// # Errors
    /// Propagates factory failures
    pub fn read_as<T: Model>(&self, node: &ConfigNode) -> ModelResult<Option<Arc<T>>> {
        Ok(self.read(node)?.and_then(downcast::<T>))
    }

    /// Upstream resolver for a node: its parent's effective resolver, or
    /// the defaults when nothing above it has one
    #[must_use]
    pub fn upstream_resolver(&self, node: &ConfigNode) -> SharedResolver {
        node.parent()
            .and_then(|parent| parent.effective_resolver())
            .unwrap_or_else(|| Arc::clone(&self.defaults))
    }

    /// Expand placeholders in `text` as seen from `node`
    #[must_use]
    pub fn expand_at(&self, node: &ConfigNode, text: &str) -> String {
        match node.effective_resolver() {
            Some(resolver) => expand(text, &*resolver, &self.config),
            None => expand(text, &*self.defaults, &self.config),
        }
    }
}

impl Debug for ModelContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelContext")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confmodel_node::QName;
    use confmodel_property::{MapResolver, PropertyResolver};

    fn context() -> ModelContext {
        ModelContext::new(Arc::new(MarshallerRegistry::new()))
            .with_defaults(Arc::new(MapResolver::new().with("who", "defaults")))
    }

    #[test]
    fn detached_node_expands_against_defaults() {
        let node = ConfigNode::new(QName::unqualified("n"));
        assert_eq!(context().expand_at(&node, "hello ${who}"), "hello defaults");
    }

    #[test]
    fn installed_resolver_takes_over() {
        let ctx = context();
        let parent = ConfigNode::new(QName::unqualified("p"));
        let child = ConfigNode::new(QName::unqualified("c"));
        parent.add_child(&child, None).unwrap();
        parent.set_property_resolver(Arc::new(MapResolver::new().with("who", "parent")));

        assert_eq!(ctx.expand_at(&child, "${who}"), "parent");
        let upstream = ctx.upstream_resolver(&child);
        assert_eq!(upstream.resolve("who").as_deref(), Some("parent"));
    }

    #[test]
    fn custom_delimiters() {
        let ctx = context().with_config(ResolverConfig::default().with_delimiters("@{", "}"));
        let node = ConfigNode::new(QName::unqualified("n"));
        assert_eq!(ctx.expand_at(&node, "@{who} ${who}"), "defaults ${who}");
    }

    #[test]
    fn unrecognized_element_reads_as_none() {
        let node = ConfigNode::new(QName::unqualified("unknown"));
        assert!(context().read(&node).unwrap().is_none());
    }
}

//! Composite elements
//!
//! A composite groups services, references and components, and declares
//! properties visible to every component inside it.

use super::{install_chain, ApplicationModel, ComponentModel, PropertyModel, ReferenceModel, ServiceModel};
use crate::context::ModelContext;
use crate::error::ModelResult;
use crate::model::{BaseModel, Model, ModelType};
use crate::names::{COMPONENT, COMPOSITE, COMPOSITE_PROPERTY, NAME_ATTR, REFERENCE, SERVICE, TARGET_NAMESPACE_ATTR};
use crate::scope::scope_of;
use confmodel_node::{ConfigNode, QName};
use confmodel_property::PropertyResolver;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// A `composite` element
///
/// # Concurrency
/// Getters return point-in-time snapshots. Adds are serialized by one lock
/// per composite that guards both the node mutation and the cached lists.
/// Locks are only taken parent before child: a newly added child is rewired
/// under this lock, while propagation to held components runs after it is
/// released.
#[derive(Debug)]
pub struct CompositeModel {
    base: BaseModel,
    state: Mutex<CompositeState>,
}

#[derive(Debug, Default)]
struct CompositeState {
    services: Vec<Arc<ServiceModel>>,
    references: Vec<Arc<ReferenceModel>>,
    components: Vec<Arc<ComponentModel>>,
    properties: IndexMap<String, Arc<PropertyModel>>,
}

impl CompositeModel {
    /// Create detached composite
    #[must_use]
    pub fn new(context: &ModelContext) -> Self {
        let composite = Self {
            base: Self::ordered(BaseModel::create(COMPOSITE, context)),
            state: Mutex::new(CompositeState::default()),
        };
        composite.set_composite_property_resolver();
        composite
    }

    fn ordered(base: BaseModel) -> BaseModel {
        base.with_children_order([SERVICE, REFERENCE, COMPONENT, COMPOSITE_PROPERTY])
    }

    /// Composite name
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.base.attribute(NAME_ATTR)
    }

    /// Set composite name
    pub fn set_name(&self, name: &str) -> &Self {
        self.base.set_attribute(NAME_ATTR, Some(name));
        self
    }

    /// Target namespace
    #[must_use]
    pub fn target_namespace(&self) -> Option<String> {
        self.base.attribute(TARGET_NAMESPACE_ATTR)
    }

    /// Set target namespace
    pub fn set_target_namespace(&self, namespace: &str) -> &Self {
        self.base.set_attribute(TARGET_NAMESPACE_ATTR, Some(namespace));
        self
    }

    /// Enclosing application
    ///
    /// # Errors
    /// Propagates factory failures
    pub fn application(&self) -> ModelResult<Option<Arc<ApplicationModel>>> {
        self.base.ancestor::<ApplicationModel>()
    }

    /// Snapshot of composite services
    #[must_use]
    pub fn services(&self) -> Vec<Arc<ServiceModel>> {
        self.state.lock().services.clone()
    }

    /// Add detached service at its canonical position
    ///
    /// # Errors
    /// - `ModelError::AlreadyAttached` if the service has a parent
    pub fn add_service(&self, service: Arc<ServiceModel>) -> ModelResult<&Self> {
        let mut state = self.state.lock();
        self.base.add_child_model(&*service)?;
        state.services.push(service);
        Ok(self)
    }

    /// Snapshot of composite references
    #[must_use]
    pub fn references(&self) -> Vec<Arc<ReferenceModel>> {
        self.state.lock().references.clone()
    }

    /// Add detached reference at its canonical position
    ///
    /// # Errors
    /// - `ModelError::AlreadyAttached` if the reference has a parent
    pub fn add_reference(&self, reference: Arc<ReferenceModel>) -> ModelResult<&Self> {
        let mut state = self.state.lock();
        self.base.add_child_model(&*reference)?;
        state.references.push(reference);
        Ok(self)
    }

    /// Snapshot of components
    #[must_use]
    pub fn components(&self) -> Vec<Arc<ComponentModel>> {
        self.state.lock().components.clone()
    }

    /// Add detached component, chaining its resolver through this composite
    ///
    /// # Errors
    /// - `ModelError::AlreadyAttached` if the component has a parent
    pub fn add_component(&self, component: Arc<ComponentModel>) -> ModelResult<&Self> {
        let mut state = self.state.lock();
        self.base.add_child_model(&*component)?;
        state.components.push(component);
        Ok(self)
    }

    /// Snapshot of properties keyed by name
    #[must_use]
    pub fn properties(&self) -> IndexMap<String, Arc<PropertyModel>> {
        self.state.lock().properties.clone()
    }

    /// Property declared under `name`
    #[must_use]
    pub fn property(&self, name: &str) -> Option<Arc<PropertyModel>> {
        self.state.lock().properties.get(name).cloned()
    }

    /// Add detached property and rewire resolver chains
    ///
    /// # Errors
    /// - `ModelError::AlreadyAttached` if the property has a parent
    pub fn add_property(&self, property: Arc<PropertyModel>) -> ModelResult<&Self> {
        {
            let mut state = self.state.lock();
            self.base.add_child_model(&*property)?;
            state
                .properties
                .insert(property.name().unwrap_or_default(), property);
        }
        self.set_composite_property_resolver();
        Ok(self)
    }

    /// Expanded value of the property declared here under `key`
    #[must_use]
    pub fn resolve_property(&self, key: &str) -> Option<String> {
        self.property(key).and_then(|p| p.value())
    }

    /// Install `compact(composite scope, parent effective or defaults)` and
    /// propagate into held components
    ///
    /// Components no longer attached to this composite are skipped.
    pub fn set_composite_property_resolver(&self) {
        install_chain(&self.base, Some(scope_of(self.base.node())));

        for component in self.components() {
            let attached = component
                .node()
                .parent()
                .is_some_and(|parent| parent.ptr_eq(self.base.node()));
            if attached {
                component.set_component_property_resolver();
            } else {
                tracing::debug!(
                    "Skipping resolver rewire of component {:?}, no longer attached",
                    component.node().attribute(NAME_ATTR)
                );
            }
        }
    }
}

impl Model for CompositeModel {
    fn base(&self) -> &BaseModel {
        &self.base
    }

    fn rewire_resolver(&self) {
        self.set_composite_property_resolver();
    }
}

impl ModelType for CompositeModel {
    const NAME: QName = COMPOSITE;

    fn from_node(node: ConfigNode, context: &ModelContext) -> ModelResult<Self> {
        let base = Self::ordered(BaseModel::wrap(node, &Self::NAME, context)?);
        // Components chain through this resolver while being read
        install_chain(&base, Some(scope_of(base.node())));

        let state = CompositeState {
            services: base.child_models_as(&SERVICE)?,
            references: base.child_models_as(&REFERENCE)?,
            components: base.child_models_as(&COMPONENT)?,
            properties: base
                .child_models_as::<PropertyModel>(&COMPOSITE_PROPERTY)?
                .into_iter()
                .map(|p| (p.name().unwrap_or_default(), p))
                .collect(),
        };

        Ok(Self {
            base,
            state: Mutex::new(state),
        })
    }
}

impl PropertyResolver for CompositeModel {
    fn resolve(&self, key: &str) -> Option<String> {
        scope_of(self.base.node()).resolve(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::core_registry;
    use confmodel_property::MapResolver;

    fn context() -> ModelContext {
        ModelContext::new(Arc::new(core_registry())).with_defaults(Arc::new(MapResolver::new().with("x", "default")))
    }

    fn property(ctx: &ModelContext, name: &str, value: &str) -> Arc<PropertyModel> {
        let property = PropertyModel::new(ctx);
        property.set_name(name).set_value(value);
        Arc::new(property)
    }

    #[test]
    fn canonical_order_component_service_property() {
        let ctx = context();
        let composite = CompositeModel::new(&ctx);
        composite.add_component(Arc::new(ComponentModel::new(&ctx))).unwrap();
        composite.add_service(Arc::new(ServiceModel::new(&ctx))).unwrap();
        composite.add_property(property(&ctx, "p", "1")).unwrap();

        let names: Vec<QName> = composite.node().children().iter().map(|c| c.name().clone()).collect();
        assert_eq!(names, vec![SERVICE, COMPONENT, COMPOSITE_PROPERTY]);
    }

    #[test]
    fn added_component_chains_through_composite() {
        let ctx = context();
        let composite = CompositeModel::new(&ctx);
        composite.add_property(property(&ctx, "x", "composite")).unwrap();

        let component = Arc::new(ComponentModel::new(&ctx));
        composite.add_component(Arc::clone(&component)).unwrap();

        let chain = component.node().property_resolver().unwrap();
        assert_eq!(chain.resolve("x").as_deref(), Some("composite"));
    }

    #[test]
    fn resolves_as_own_scope() {
        let ctx = context();
        let composite = CompositeModel::new(&ctx);
        composite.add_property(property(&ctx, "y", "${x}-suffix")).unwrap();

        assert_eq!(composite.resolve("y").as_deref(), Some("${x}-suffix"));
        assert_eq!(composite.resolve("x"), None);
        assert_eq!(composite.resolve_property("y").as_deref(), Some("default-suffix"));
    }

    #[test]
    fn detached_component_skipped_on_propagation() {
        let ctx = context();
        let composite = CompositeModel::new(&ctx);
        let component = Arc::new(ComponentModel::new(&ctx));
        composite.add_component(Arc::clone(&component)).unwrap();

        component.node().detach();
        assert!(component.node().property_resolver().is_none());

        composite.set_composite_property_resolver();
        assert!(component.node().property_resolver().is_none());
    }
}

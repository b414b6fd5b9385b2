//! Component elements

use super::{install_chain, CompositeModel, PropertyModel, ReferenceModel, ServiceModel};
use crate::context::ModelContext;
use crate::error::ModelResult;
use crate::model::{BaseModel, Model, ModelType};
use crate::names::{COMPONENT, COMPOSITE_PROPERTY, NAME_ATTR, REFERENCE, SERVICE};
use crate::scope::scope_of;
use confmodel_node::{ConfigNode, QName};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// A `component` element inside a composite
///
/// Its properties form the innermost scope of the chain:
/// `compact(component scope, composite effective)`.
#[derive(Debug)]
pub struct ComponentModel {
    base: BaseModel,
    state: Mutex<ComponentState>,
}

#[derive(Debug, Default)]
struct ComponentState {
    services: Vec<Arc<ServiceModel>>,
    references: Vec<Arc<ReferenceModel>>,
    properties: IndexMap<String, Arc<PropertyModel>>,
}

impl ComponentModel {
    /// Create detached component
    #[must_use]
    pub fn new(context: &ModelContext) -> Self {
        let component = Self {
            base: Self::ordered(BaseModel::create(COMPONENT, context)),
            state: Mutex::new(ComponentState::default()),
        };
        component.set_component_property_resolver();
        component
    }

    fn ordered(base: BaseModel) -> BaseModel {
        base.with_children_order([SERVICE, REFERENCE, COMPOSITE_PROPERTY])
    }

    /// Component name
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.base.attribute(NAME_ATTR)
    }

    /// Set component name
    pub fn set_name(&self, name: &str) -> &Self {
        self.base.set_attribute(NAME_ATTR, Some(name));
        self
    }

    /// Enclosing composite
    ///
    /// # Errors
    /// Propagates factory failures
    pub fn composite(&self) -> ModelResult<Option<Arc<CompositeModel>>> {
        self.base.ancestor::<CompositeModel>()
    }

    /// Snapshot of component services
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

    /// Snapshot of component references
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

    /// Snapshot of component properties keyed by name
    #[must_use]
    pub fn properties(&self) -> IndexMap<String, Arc<PropertyModel>> {
        self.state.lock().properties.clone()
    }

    /// Property declared under `name`
    #[must_use]
    pub fn property(&self, name: &str) -> Option<Arc<PropertyModel>> {
        self.state.lock().properties.get(name).cloned()
    }

    /// Add detached property and rewire the resolver chain
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
        self.set_component_property_resolver();
        Ok(self)
    }

    /// Expanded value of the property declared here under `key`
    #[must_use]
    pub fn resolve_property(&self, key: &str) -> Option<String> {
        self.property(key).and_then(|p| p.value())
    }

    /// Install `compact(component scope, composite effective)`
    pub fn set_component_property_resolver(&self) {
        install_chain(&self.base, Some(scope_of(self.base.node())));
    }
}

impl Model for ComponentModel {
    fn base(&self) -> &BaseModel {
        &self.base
    }

    fn rewire_resolver(&self) {
        self.set_component_property_resolver();
    }
}

impl ModelType for ComponentModel {
    const NAME: QName = COMPONENT;

    fn from_node(node: ConfigNode, context: &ModelContext) -> ModelResult<Self> {
        let base = Self::ordered(BaseModel::wrap(node, &Self::NAME, context)?);
        install_chain(&base, Some(scope_of(base.node())));

        let state = ComponentState {
            services: base.child_models_as(&SERVICE)?,
            references: base.child_models_as(&REFERENCE)?,
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

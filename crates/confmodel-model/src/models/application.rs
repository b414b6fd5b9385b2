//! Application root

use super::{install_chain, CompositeModel, DomainModel, NamedModel};
use crate::context::ModelContext;
use crate::error::ModelResult;
use crate::model::{BaseModel, Model, ModelType};
use crate::names::{APPLICATION, COMPOSITE, DOMAIN, NAME_ATTR, PROPERTIES, TRANSFORMS, VALIDATES};
use crate::scope::scope_of;
use confmodel_node::{ConfigNode, QName};
use confmodel_property::SharedResolver;
use parking_lot::Mutex;
use std::sync::Arc;

/// An `application` element, the document root
///
/// The root chain is `compact(domain properties scope, defaults)`; every
/// composite chains through it.
#[derive(Debug)]
pub struct ApplicationModel {
    base: BaseModel,
    state: Mutex<ApplicationState>,
}

#[derive(Debug, Default)]
struct ApplicationState {
    composite: Option<Arc<CompositeModel>>,
    domain: Option<Arc<DomainModel>>,
    transforms: Option<Arc<NamedModel>>,
    validates: Option<Arc<NamedModel>>,
}

impl ApplicationModel {
    /// Create empty application
    #[must_use]
    pub fn new(context: &ModelContext) -> Self {
        let application = Self {
            base: Self::ordered(BaseModel::create(APPLICATION, context)),
            state: Mutex::new(ApplicationState::default()),
        };
        application.set_domain_property_resolver();
        application
    }

    fn ordered(base: BaseModel) -> BaseModel {
        base.with_children_order([COMPOSITE, TRANSFORMS, VALIDATES, DOMAIN])
    }

    /// Application name
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.base.attribute(NAME_ATTR)
    }

    /// Set application name
    pub fn set_name(&self, name: &str) -> &Self {
        self.base.set_attribute(NAME_ATTR, Some(name));
        self
    }

    /// Composite of this application
    #[must_use]
    pub fn composite(&self) -> Option<Arc<CompositeModel>> {
        self.state.lock().composite.clone()
    }

    /// Replace the composite and chain it through this application
    ///
    /// # Errors
    /// - `ModelError::AlreadyAttached` if `composite` belongs to another node
    pub fn set_composite(&self, composite: Arc<CompositeModel>) -> ModelResult<&Self> {
        {
            let mut state = self.state.lock();
            self.base.set_child_model(&*composite)?;
            state.composite = Some(Arc::clone(&composite));
        }
        composite.set_composite_property_resolver();
        Ok(self)
    }

    /// Domain section
    ///
    /// # Errors
    /// Propagates factory failures
    pub fn domain(&self) -> ModelResult<Option<Arc<DomainModel>>> {
        let mut state = self.state.lock();
        if state.domain.is_none() {
            state.domain = self.base.first_child_model_as(&DOMAIN)?;
        }
        Ok(state.domain.clone())
    }

    /// Replace the domain section and rewire resolver chains
    ///
    /// # Errors
    /// - `ModelError::AlreadyAttached` if `domain` belongs to another node
    pub fn set_domain(&self, domain: Arc<DomainModel>) -> ModelResult<&Self> {
        {
            let mut state = self.state.lock();
            self.base.set_child_model(&*domain)?;
            state.domain = Some(domain);
        }
        self.set_domain_property_resolver();
        Ok(self)
    }

    /// Transform section
    ///
    /// # Errors
    /// Propagates factory failures
    pub fn transforms(&self) -> ModelResult<Option<Arc<NamedModel>>> {
        let mut state = self.state.lock();
        if state.transforms.is_none() {
            state.transforms = self.base.first_child_model_as(&TRANSFORMS)?;
        }
        Ok(state.transforms.clone())
    }

    /// Replace transform section
    ///
    /// # Errors
    /// - `ModelError::AlreadyAttached` if `transforms` belongs to another node
    pub fn set_transforms(&self, transforms: Arc<NamedModel>) -> ModelResult<&Self> {
        let mut state = self.state.lock();
        self.base.set_child_model(&*transforms)?;
        state.transforms = Some(transforms);
        Ok(self)
    }

    /// Validate section
    ///
    /// # Errors
    /// Propagates factory failures
    pub fn validates(&self) -> ModelResult<Option<Arc<NamedModel>>> {
        let mut state = self.state.lock();
        if state.validates.is_none() {
            state.validates = self.base.first_child_model_as(&VALIDATES)?;
        }
        Ok(state.validates.clone())
    }

    /// Replace validate section
    ///
    /// # Errors
    /// - `ModelError::AlreadyAttached` if `validates` belongs to another node
    pub fn set_validates(&self, validates: Arc<NamedModel>) -> ModelResult<&Self> {
        let mut state = self.state.lock();
        self.base.set_child_model(&*validates)?;
        state.validates = Some(validates);
        Ok(self)
    }

    /// Install the root chain and propagate into the composite
    pub fn set_domain_property_resolver(&self) {
        install_chain(&self.base, domain_properties_scope(self.base.node()));

        let Some(composite) = self.composite() else {
            return;
        };
        let attached = composite
            .node()
            .parent()
            .is_some_and(|parent| parent.ptr_eq(self.base.node()));
        if attached {
            composite.set_composite_property_resolver();
        } else {
            tracing::debug!("Skipping resolver rewire of detached composite");
        }
    }
}

/// Scope of `application/domain/properties`, if declared
fn domain_properties_scope(application: &ConfigNode) -> Option<SharedResolver> {
    application
        .first_child(&DOMAIN)?
        .first_child(&PROPERTIES)
        .map(|properties| scope_of(&properties))
}

impl Model for ApplicationModel {
    fn base(&self) -> &BaseModel {
        &self.base
    }

    fn rewire_resolver(&self) {
        self.set_domain_property_resolver();
    }
}

impl ModelType for ApplicationModel {
    const NAME: QName = APPLICATION;

    fn from_node(node: ConfigNode, context: &ModelContext) -> ModelResult<Self> {
        let base = Self::ordered(BaseModel::wrap(node, &Self::NAME, context)?);
        install_chain(&base, domain_properties_scope(base.node()));

        let composite = base.first_child_model_as(&COMPOSITE)?;
        Ok(Self {
            base,
            state: Mutex::new(ApplicationState {
                composite,
                ..ApplicationState::default()
            }),
        })
    }
}

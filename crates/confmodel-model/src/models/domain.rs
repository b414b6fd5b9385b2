//! Domain section of an application

use super::{ApplicationModel, NamedModel, PropertiesModel};
use crate::context::ModelContext;
use crate::error::ModelResult;
use crate::model::{BaseModel, Model, ModelType};
use crate::names::{DOMAIN, HANDLERS, PROPERTIES, SECURITIES, TRANSFORMS, VALIDATES};
use confmodel_node::{ConfigNode, QName};
use parking_lot::Mutex;
use std::sync::Arc;

/// A `domain` element
///
/// Sections are read lazily on first access and cached.
#[derive(Debug)]
pub struct DomainModel {
    base: BaseModel,
    state: Mutex<DomainState>,
}

#[derive(Debug, Default)]
struct DomainState {
    properties: Option<Arc<PropertiesModel>>,
    handlers: Option<Arc<NamedModel>>,
    securities: Option<Arc<NamedModel>>,
}

impl DomainModel {
    /// Create detached domain
    #[must_use]
    pub fn new(context: &ModelContext) -> Self {
        Self::with_base(BaseModel::create(DOMAIN, context))
    }

    fn with_base(base: BaseModel) -> Self {
        Self {
            base: base.with_children_order([TRANSFORMS, VALIDATES, PROPERTIES, HANDLERS, SECURITIES]),
            state: Mutex::new(DomainState::default()),
        }
    }

    /// Enclosing application
    ///
    /// # Errors
    /// Propagates factory failures
    pub fn application(&self) -> ModelResult<Option<Arc<ApplicationModel>>> {
        self.base.ancestor::<ApplicationModel>()
    }

    /// Domain-wide properties
    ///
    /// # Errors
    /// Propagates factory failures
    pub fn properties(&self) -> ModelResult<Option<Arc<PropertiesModel>>> {
        let mut state = self.state.lock();
        if state.properties.is_none() {
            state.properties = self.base.first_child_model_as(&PROPERTIES)?;
        }
        Ok(state.properties.clone())
    }

    /// Replace domain-wide properties and rewire the application chain
    ///
    /// # Errors
    /// - `ModelError::AlreadyAttached` if `properties` belongs to another node
    pub fn set_properties(&self, properties: Arc<PropertiesModel>) -> ModelResult<&Self> {
        {
            let mut state = self.state.lock();
            self.base.set_child_model(&*properties)?;
            state.properties = Some(properties);
        }
        if let Some(application) = self.application()? {
            application.set_domain_property_resolver();
        }
        Ok(self)
    }

    /// Handler section
    ///
    /// # Errors
    /// Propagates factory failures
    pub fn handlers(&self) -> ModelResult<Option<Arc<NamedModel>>> {
        let mut state = self.state.lock();
        if state.handlers.is_none() {
            state.handlers = self.base.first_child_model_as(&HANDLERS)?;
        }
        Ok(state.handlers.clone())
    }

    /// Replace handler section
    ///
    /// # Errors
    /// - `ModelError::AlreadyAttached` if `handlers` belongs to another node
    pub fn set_handlers(&self, handlers: Arc<NamedModel>) -> ModelResult<&Self> {
        let mut state = self.state.lock();
        self.base.set_child_model(&*handlers)?;
        state.handlers = Some(handlers);
        Ok(self)
    }

    /// Security section
    ///
    /// # Errors
    /// Propagates factory failures
    pub fn securities(&self) -> ModelResult<Option<Arc<NamedModel>>> {
        let mut state = self.state.lock();
        if state.securities.is_none() {
            state.securities = self.base.first_child_model_as(&SECURITIES)?;
        }
        Ok(state.securities.clone())
    }

    /// Replace security section
    ///
    /// # Errors
    /// - `ModelError::AlreadyAttached` if `securities` belongs to another node
    pub fn set_securities(&self, securities: Arc<NamedModel>) -> ModelResult<&Self> {
        let mut state = self.state.lock();
        self.base.set_child_model(&*securities)?;
        state.securities = Some(securities);
        Ok(self)
    }
}

impl Model for DomainModel {
    fn base(&self) -> &BaseModel {
        &self.base
    }
}

impl ModelType for DomainModel {
    const NAME: QName = DOMAIN;

    fn from_node(node: ConfigNode, context: &ModelContext) -> ModelResult<Self> {
        Ok(Self::with_base(BaseModel::wrap(node, &Self::NAME, context)?))
    }
}

//! Service elements

use crate::context::ModelContext;
use crate::error::ModelResult;
use crate::model::{BaseModel, Model, ModelType};
use crate::names::{NAME_ATTR, PROMOTE_ATTR, SERVICE};
use confmodel_node::{ConfigNode, QName};

/// A `service` element of a composite or component
#[derive(Debug)]
pub struct ServiceModel {
    base: BaseModel,
}

impl ServiceModel {
    /// Create detached service
    #[must_use]
    pub fn new(context: &ModelContext) -> Self {
        Self {
            base: BaseModel::create(SERVICE, context),
        }
    }

    /// Service name
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.base.attribute(NAME_ATTR)
    }

    /// Set service name
    pub fn set_name(&self, name: &str) -> &Self {
        self.base.set_attribute(NAME_ATTR, Some(name));
        self
    }

    /// Component service this service promotes
    #[must_use]
    pub fn promote(&self) -> Option<String> {
        self.base.attribute(PROMOTE_ATTR)
    }

    /// Set promoted component service
    pub fn set_promote(&self, promote: &str) -> &Self {
        self.base.set_attribute(PROMOTE_ATTR, Some(promote));
        self
    }
}

impl Model for ServiceModel {
    fn base(&self) -> &BaseModel {
        &self.base
    }
}

impl ModelType for ServiceModel {
    const NAME: QName = SERVICE;

    fn from_node(node: ConfigNode, context: &ModelContext) -> ModelResult<Self> {
        Ok(Self {
            base: BaseModel::wrap(node, &Self::NAME, context)?,
        })
    }
}

//! Property declarations

use crate::context::ModelContext;
use crate::error::{ModelError, ModelResult};
use crate::model::{BaseModel, Model, ModelType};
use crate::names::{COMPOSITE_PROPERTY, CORE_PROPERTY, NAME_ATTR, PROPERTY_LOCAL, VALUE_ATTR};
use confmodel_node::{ConfigNode, QName};

/// A `property` element declaring one key/value pair for its scope
///
/// Accepted in any namespace. The value is the `value` attribute, or the
/// element text when the attribute is absent.
#[derive(Debug)]
pub struct PropertyModel {
    base: BaseModel,
}

impl PropertyModel {
    /// Create composite-level property
    #[must_use]
    pub fn new(context: &ModelContext) -> Self {
        Self::named(COMPOSITE_PROPERTY, context)
    }

    /// Create domain-level property
    #[must_use]
    pub fn core(context: &ModelContext) -> Self {
        Self::named(CORE_PROPERTY, context)
    }

    fn named(name: QName, context: &ModelContext) -> Self {
        Self {
            base: BaseModel::create(name, context),
        }
    }

    /// Property key
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.base.raw_attribute(NAME_ATTR)
    }

    /// Set property key
    pub fn set_name(&self, name: &str) -> &Self {
        self.base.set_attribute(NAME_ATTR, Some(name));
        self
    }

    /// Value with placeholders expanded
    #[must_use]
    pub fn value(&self) -> Option<String> {
        self.raw_value()
            .map(|raw| self.base.context().expand_at(self.base.node(), &raw))
    }

    /// Value as stored
    #[must_use]
    pub fn raw_value(&self) -> Option<String> {
        self.base.raw_attribute(VALUE_ATTR).or_else(|| self.base.raw_text())
    }

    /// Set value attribute
    pub fn set_value(&self, value: &str) -> &Self {
        self.base.set_attribute(VALUE_ATTR, Some(value));
        self
    }
}

impl Model for PropertyModel {
    fn base(&self) -> &BaseModel {
        &self.base
    }
}

impl ModelType for PropertyModel {
    const NAME: QName = COMPOSITE_PROPERTY;

    fn from_node(node: ConfigNode, context: &ModelContext) -> ModelResult<Self> {
        if node.name().local_name() != PROPERTY_LOCAL {
            return Err(ModelError::name_mismatch(&Self::NAME, node.name()));
        }
        Ok(Self {
            base: BaseModel::wrap_any(node, context),
        })
    }
}

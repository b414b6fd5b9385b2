//! Domain-level property sets

use super::PropertyModel;
use crate::context::ModelContext;
use crate::error::ModelResult;
use crate::model::{BaseModel, Model, ModelType};
use crate::names::{CORE_PROPERTY, PROPERTIES};
use crate::scope::scope_of;
use confmodel_node::{ConfigNode, QName};
use confmodel_property::PropertyResolver;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// A `properties` element holding domain-wide declarations
///
/// Its scope sits right above the defaults in every chain of the
/// application.
#[derive(Debug)]
pub struct PropertiesModel {
    base: BaseModel,
    properties: Mutex<IndexMap<String, Arc<PropertyModel>>>,
}

impl PropertiesModel {
    /// Create detached property set
    #[must_use]
    pub fn new(context: &ModelContext) -> Self {
        Self {
            base: BaseModel::create(PROPERTIES, context),
            properties: Mutex::new(IndexMap::new()),
        }
    }

    /// Snapshot of properties keyed by name
    #[must_use]
    pub fn properties(&self) -> IndexMap<String, Arc<PropertyModel>> {
        self.properties.lock().clone()
    }

    /// Property declared under `name`
    #[must_use]
    pub fn property(&self, name: &str) -> Option<Arc<PropertyModel>> {
        self.properties.lock().get(name).cloned()
    }

    /// Append detached property
    ///
    /// # Errors
    /// - `ModelError::AlreadyAttached` if the property has a parent
    pub fn add_property(&self, property: Arc<PropertyModel>) -> ModelResult<&Self> {
        let mut properties = self.properties.lock();
        self.base.add_child_model(&*property)?;
        properties.insert(property.name().unwrap_or_default(), property);
        Ok(self)
    }

    /// Expanded value of the property declared under `key`
    #[must_use]
    pub fn resolve_property(&self, key: &str) -> Option<String> {
        self.property(key).and_then(|p| p.value())
    }
}

impl Model for PropertiesModel {
    fn base(&self) -> &BaseModel {
        &self.base
    }
}

impl ModelType for PropertiesModel {
    const NAME: QName = PROPERTIES;

    fn from_node(node: ConfigNode, context: &ModelContext) -> ModelResult<Self> {
        let base = BaseModel::wrap(node, &Self::NAME, context)?;
        let properties = base
            .child_models_as::<PropertyModel>(&CORE_PROPERTY)?
            .into_iter()
            .map(|p| (p.name().unwrap_or_default(), p))
            .collect();
        Ok(Self {
            base,
            properties: Mutex::new(properties),
        })
    }
}

impl PropertyResolver for PropertiesModel {
    fn resolve(&self, key: &str) -> Option<String> {
        scope_of(self.base.node()).resolve(key)
    }
}

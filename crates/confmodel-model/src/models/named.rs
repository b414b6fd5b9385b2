//! Generic wrapper for structural elements

use crate::context::ModelContext;
use crate::error::ModelResult;
use crate::marshaller::{factory_fn, ModelFactory};
use crate::model::{BaseModel, Model};
use crate::names::NAME_ATTR;
use confmodel_node::{ConfigNode, QName};
use std::sync::Arc;

/// Model for elements that only take part as tree nodes
///
/// Transforms, validates, handlers, securities and similar sections whose
/// content is interpreted elsewhere. Accepts any element name.
#[derive(Debug)]
pub struct NamedModel {
    base: BaseModel,
}

impl NamedModel {
    /// Create detached element named `name`
    #[must_use]
    pub fn new(name: QName, context: &ModelContext) -> Self {
        Self {
            base: BaseModel::create(name, context),
        }
    }

    /// Wrap any node
    #[must_use]
    pub fn wrap(node: ConfigNode, context: &ModelContext) -> Self {
        Self {
            base: BaseModel::wrap_any(node, context),
        }
    }

    /// Factory usable for any local name
    #[must_use]
    pub fn factory() -> ModelFactory {
        factory_fn(|node, context| {
            let model: Arc<dyn Model> = Arc::new(Self::wrap(node, context));
            Ok(model)
        })
    }

    /// `name` attribute
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.base.attribute(NAME_ATTR)
    }

    /// Set `name` attribute
    pub fn set_name(&self, name: &str) -> &Self {
        self.base.set_attribute(NAME_ATTR, Some(name));
        self
    }

    /// Models of all recognized children, in document order
    ///
    /// # Errors
    /// Propagates factory failures
    pub fn children(&self) -> ModelResult<Vec<Arc<dyn Model>>> {
        let context = self.base.context();
        let mut models = Vec::new();
        for child in self.base.node().children() {
            if let Some(model) = context.read(&child)? {
                models.push(model);
            }
        }
        Ok(models)
    }

    /// Append detached child model
    ///
    /// # Errors
    /// - `ModelError::AlreadyAttached` if the child has a parent
    pub fn add_child(&self, child: &dyn Model) -> ModelResult<&Self> {
        self.base.add_child_model(child)?;
        Ok(self)
    }
}

impl Model for NamedModel {
    fn base(&self) -> &BaseModel {
        &self.base
    }
}

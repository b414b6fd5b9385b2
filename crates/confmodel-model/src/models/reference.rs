//! Reference elements

use crate::context::ModelContext;
use crate::error::ModelResult;
use crate::model::{BaseModel, Model, ModelType};
use crate::names::{NAME_ATTR, PROMOTE_ATTR, REFERENCE};
use confmodel_node::{ConfigNode, QName};

/// A `reference` element of a composite or component
#[derive(Debug)]
pub struct ReferenceModel {
    base: BaseModel,
}

impl ReferenceModel {
    /// Create detached reference
    #[must_use]
    pub fn new(context: &ModelContext) -> Self {
        Self {
            base: BaseModel::create(REFERENCE, context),
        }
    }

    /// Reference name
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.base.attribute(NAME_ATTR)
    }

    /// Set reference name
    pub fn set_name(&self, name: &str) -> &Self {
        self.base.set_attribute(NAME_ATTR, Some(name));
        self
    }

    /// Space-separated component references this reference promotes
    #[must_use]
    pub fn promote(&self) -> Vec<String> {
        self.base
            .attribute(PROMOTE_ATTR)
            .map(|p| p.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Set promoted component references
    pub fn set_promote<I, S>(&self, promote: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = promote.into_iter().map(|p| p.as_ref().to_string()).collect::<Vec<_>>().join(" ");
        self.base.set_attribute(PROMOTE_ATTR, Some(&joined));
        self
    }
}

impl Model for ReferenceModel {
    fn base(&self) -> &BaseModel {
        &self.base
    }
}

impl ModelType for ReferenceModel {
    const NAME: QName = REFERENCE;

    fn from_node(node: ConfigNode, context: &ModelContext) -> ModelResult<Self> {
        Ok(Self {
            base: BaseModel::wrap(node, &Self::NAME, context)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promote_list() {
        let reference = ReferenceModel::new(&ModelContext::core());
        reference.set_name("Audit").set_promote(["A/audit", "B/audit"]);

        assert_eq!(reference.node().attribute(PROMOTE_ATTR).as_deref(), Some("A/audit B/audit"));
        assert_eq!(reference.promote(), ["A/audit", "B/audit"]);
    }
}

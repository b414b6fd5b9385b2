//! Model trait and shared wrapper behaviour
//!
//! Defines the [`Model`] trait every typed view implements, and
//! [`BaseModel`], the composable core that holds the wrapped node and
//! provides attribute access, child reading and ordered child writing.

use crate::context::ModelContext;
use crate::error::{ModelError, ModelResult};
use confmodel_node::{ChildrenOrder, ConfigNode, QName};
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// Upcast support for downcasting trait objects
pub trait AsAny: Any + Send + Sync {
    /// Borrow as `Any`
    fn as_any(&self) -> &dyn Any;

    /// Convert shared handle into `Any`
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Typed view over exactly one configuration node
///
/// Models never copy node data: reads and writes go straight to the wrapped
/// node, and dropping a model leaves the node untouched.
///
/// # Hooks
/// - [`base`](Model::base): access to the shared wrapper core
/// - [`rewire_resolver`](Model::rewire_resolver): rebuild this model's
///   resolver chain after its position in the tree changed
pub trait Model: AsAny + Debug {
    /// Shared wrapper core
    fn base(&self) -> &BaseModel;

    /// Rebuild the resolver chain installed on this model's node
    ///
    /// Called by [`BaseModel::add_child_model`] and
    /// [`BaseModel::set_child_model`] after the node gains a new parent.
    /// Models that declare no property scope keep the default, which does
    /// nothing.
    fn rewire_resolver(&self) {}

    /// Wrapped node
    fn node(&self) -> &ConfigNode {
        self.base().node()
    }

    /// Qualified name of the wrapped node
    fn qname(&self) -> &QName {
        self.base().node().name()
    }

    /// Model wrapping the parent node
    ///
    /// # Errors
    /// Propagates factory failures
    fn parent_model(&self) -> ModelResult<Option<Arc<dyn Model>>> {
        self.base().parent_model()
    }
}

/// Model type with a fixed element name
pub trait ModelType: Model + Sized {
    /// Element name this type wraps
    const NAME: QName;

    /// Wrap an existing node
    ///
    /// # Errors
    /// - `ModelError::NameMismatch` if the node is not named [`NAME`](Self::NAME)
    fn from_node(node: ConfigNode, context: &ModelContext) -> ModelResult<Self>;
}

/// Downcast a model handle to a concrete type
#[must_use]
pub fn downcast<T: Model>(model: Arc<dyn Model>) -> Option<Arc<T>> {
    AsAny::into_any(model).downcast::<T>().ok()
}

/// Shared core of every model
#[derive(Debug)]
pub struct BaseModel {
    node: ConfigNode,
    context: ModelContext,
    order: ChildrenOrder,
}

impl BaseModel {
    /// Wrap `node`, checking that it is named `expected`
    ///
    /// # Errors
    /// - `ModelError::NameMismatch` if the names differ
    pub fn wrap(node: ConfigNode, expected: &QName, context: &ModelContext) -> ModelResult<Self> {
        if node.name() != expected {
            return Err(ModelError::name_mismatch(expected, node.name()));
        }
        Ok(Self::wrap_any(node, context))
    }

    /// Wrap `node` without a name check
    #[must_use]
    pub fn wrap_any(node: ConfigNode, context: &ModelContext) -> Self {
        Self {
            node,
            context: context.clone(),
            order: ChildrenOrder::unordered(),
        }
    }

    /// Wrap a fresh detached node named `name`
    #[must_use]
    pub fn create(name: QName, context: &ModelContext) -> Self {
        Self::wrap_any(ConfigNode::new(name), context)
    }

    /// With canonical children order
    #[must_use]
    pub fn with_children_order<I>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = QName>,
    {
        self.order = ChildrenOrder::new(names);
        self
    }

    /// Wrapped node
    #[inline]
    #[must_use]
    pub fn node(&self) -> &ConfigNode {
        &self.node
    }

    /// Construction context
    #[inline]
    #[must_use]
    pub fn context(&self) -> &ModelContext {
        &self.context
    }

    /// Canonical children order
    #[inline]
    #[must_use]
    pub fn children_order(&self) -> &ChildrenOrder {
        &self.order
    }

    // ------------------------------------------------------------------
    // Attributes and text
    // ------------------------------------------------------------------

    /// Attribute value with placeholders expanded
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.node
            .attribute(name)
            .map(|raw| self.context.expand_at(&self.node, &raw))
    }

    /// Attribute value as stored
    #[must_use]
    pub fn raw_attribute(&self, name: &str) -> Option<String> {
        self.node.attribute(name)
    }

    /// Set attribute, or remove it when `value` is `None`
    pub fn set_attribute(&self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.node.set_attribute(name, value);
            }
            None => {
                self.node.remove_attribute(name);
            }
        }
    }

    /// Text content with placeholders expanded
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.node
            .text()
            .map(|raw| self.context.expand_at(&self.node, &raw))
    }

    /// Text content as stored
    #[must_use]
    pub fn raw_text(&self) -> Option<String> {
        self.node.text()
    }

    /// Set text content, or remove it when `text` is `None`
    pub fn set_text(&self, text: Option<&str>) {
        match text {
            Some(text) => {
                self.node.set_text(text);
            }
            None => {
                self.node.clear_text();
            }
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Model wrapping the parent node
    ///
    /// Built fresh on every call from the current tree; `Ok(None)` for a
    /// root or an unrecognized parent element.
    ///
    /// # Errors
    /// Propagates factory failures
    pub fn parent_model(&self) -> ModelResult<Option<Arc<dyn Model>>> {
        match self.node.parent() {
            Some(parent) => self.context.read(&parent),
            None => Ok(None),
        }
    }

    /// Nearest ancestor model of type `T`
    ///
    /// # Errors
    /// Propagates factory failures
    pub fn ancestor<T: ModelType>(&self) -> ModelResult<Option<Arc<T>>> {
        let Some(node) = self.node.ancestors().find(|a| *a.name() == T::NAME) else {
            return Ok(None);
        };
        self.context.read_as::<T>(&node)
    }

    /// Models of all children named `name`
    ///
    /// Children no marshaller recognizes are skipped.
    ///
    /// # Errors
    /// Propagates factory failures
    pub fn child_models(&self, name: &QName) -> ModelResult<Vec<Arc<dyn Model>>> {
        let mut models = Vec::new();
        for child in self.node.children_named(name) {
            match self.context.read(&child)? {
                Some(model) => models.push(model),
                None => tracing::debug!("Skipping unrecognized element '{}' under '{}'", name, self.node.name()),
            }
        }
        Ok(models)
    }

    /// Models of all children named `name` that are of type `T`
    ///
    /// # Errors
    /// Propagates factory failures
    pub fn child_models_as<T: Model>(&self, name: &QName) -> ModelResult<Vec<Arc<T>>> {
        Ok(self
            .child_models(name)?
            .into_iter()
            .filter_map(downcast::<T>)
            .collect())
    }

    /// Model of the first child named `name`, if it is of type `T`
    ///
    /// # Errors
    /// Propagates factory failures
    pub fn first_child_model_as<T: Model>(&self, name: &QName) -> ModelResult<Option<Arc<T>>> {
        match self.node.first_child(name) {
            Some(child) => self.context.read_as::<T>(&child),
            None => Ok(None),
        }
    }

    // ------------------------------------------------------------------
    // Writing
    // ------------------------------------------------------------------

    /// Insert a detached child model at its canonical position
    ///
    /// Returns the index the child's node was inserted at. The child's
    /// resolver chain is rebuilt to run through this node.
    ///
    /// # Errors
    /// - `ModelError::AlreadyAttached` if the child's node has a parent
    /// - `ModelError::Structural` if the tree rejects the insertion
    pub fn add_child_model(&self, child: &dyn Model) -> ModelResult<usize> {
        if child.node().parent().is_some() {
            return Err(ModelError::AlreadyAttached {
                name: child.qname().clone(),
            });
        }
        let index = self.node.add_child_ordered(child.node(), &self.order)?;
        child.rewire_resolver();
        Ok(index)
    }

    /// Replace children named like `child` with `child`
    ///
    /// A child already attached to this model's node is left where it is.
    /// A newly attached child has its resolver chain rebuilt.
    ///
    /// # Errors
    /// - `ModelError::AlreadyAttached` if the child's node has another parent
    /// - `ModelError::Structural` if the tree rejects the insertion
    pub fn set_child_model(&self, child: &dyn Model) -> ModelResult<()> {
        match child.node().parent() {
            Some(parent) if parent.ptr_eq(&self.node) => Ok(()),
            Some(_) => Err(ModelError::AlreadyAttached {
                name: child.qname().clone(),
            }),
            None => {
                let removed = self.node.set_child(child.node(), &self.order)?;
                if !removed.is_empty() {
                    tracing::trace!("Replaced {} '{}' element(s)", removed.len(), child.qname());
                }
                child.rewire_resolver();
                Ok(())
            }
        }
    }
}

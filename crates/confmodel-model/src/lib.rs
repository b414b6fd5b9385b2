//! Confmodel Model Layer
//!
//! Typed models over configuration trees:
//! - Wraps raw nodes without copying them
//! - Dispatches element names to model types through layered marshallers
//! - Keeps children in canonical order on every write
//! - Installs scoped property resolver chains and rewires them on mutation
//!
//! # Example
//!
//! ```rust
//! use confmodel_model::prelude::*;
//! use confmodel_property::{MapResolver, PropertyResolver};
//! use std::sync::Arc;
//!
//! let ctx = ModelContext::core().with_defaults(Arc::new(MapResolver::new().with("region", "eu")));
//!
//! let composite = CompositeModel::new(&ctx);
//! let component = Arc::new(ComponentModel::new(&ctx));
//! composite.add_component(Arc::clone(&component)).unwrap();
//!
//! let property = PropertyModel::new(&ctx);
//! property.set_name("endpoint").set_value("https://${region}.example.org");
//! composite.add_property(Arc::new(property)).unwrap();
//!
//! let chain = component.node().property_resolver().unwrap();
//! assert_eq!(chain.resolve("endpoint").as_deref(), Some("https://${region}.example.org"));
//! assert_eq!(composite.resolve_property("endpoint").as_deref(), Some("https://eu.example.org"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod context;
mod error;
mod marshaller;
mod model;
mod scope;

pub mod models;
pub mod names;

pub use context::ModelContext;
pub use error::{ModelError, ModelResult};
pub use marshaller::{factory, factory_fn, Marshaller, MarshallerRegistry, ModelFactory};
pub use model::{downcast, AsAny, BaseModel, Model, ModelType};
pub use scope::{scope_of, PropertyScope};

/// Prelude for common imports
pub mod prelude {
    pub use crate::models::{
        ApplicationModel, ComponentModel, CompositeModel, DomainModel, NamedModel, PropertiesModel, PropertyModel,
        ReferenceModel, ServiceModel,
    };
    pub use crate::{downcast, Marshaller, MarshallerRegistry, Model, ModelContext, ModelError, ModelResult, ModelType};
    pub use confmodel_node::{ChildrenOrder, ConfigNode, QName};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

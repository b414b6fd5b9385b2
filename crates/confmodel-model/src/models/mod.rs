//! Core model catalog
//!
//! The application root and its domain section live in the core namespace;
//! composites, components, services and references live in the composite
//! namespace. `property` is mapped in both.

mod application;
mod component;
mod composite;
mod domain;
mod named;
mod properties;
mod property;
mod reference;
mod service;

pub use application::ApplicationModel;
pub use component::ComponentModel;
pub use composite::CompositeModel;
pub use domain::DomainModel;
pub use named::NamedModel;
pub use properties::PropertiesModel;
pub use property::PropertyModel;
pub use reference::ReferenceModel;
pub use service::ServiceModel;

use crate::marshaller::{Marshaller, MarshallerRegistry};
use crate::model::BaseModel;
use crate::names::{COMPOSITE_NAMESPACE, CORE_NAMESPACE, PROPERTY_LOCAL};
use confmodel_property::{compact, PropertyResolver, SharedResolver};
use std::sync::Arc;

/// Marshaller for the core namespace
#[must_use]
pub fn core_marshaller() -> Marshaller {
    Marshaller::new(CORE_NAMESPACE)
        .with_model::<ApplicationModel>("application")
        .with_model::<DomainModel>("domain")
        .with_model::<PropertiesModel>("properties")
        .with_model::<PropertyModel>(PROPERTY_LOCAL)
        .with_factory("transforms", NamedModel::factory())
        .with_factory("validates", NamedModel::factory())
        .with_factory("handlers", NamedModel::factory())
        .with_factory("securities", NamedModel::factory())
}

/// Marshaller for the composite namespace
#[must_use]
pub fn composite_marshaller() -> Marshaller {
    Marshaller::new(COMPOSITE_NAMESPACE)
        .with_model::<CompositeModel>("composite")
        .with_model::<ComponentModel>("component")
        .with_model::<ServiceModel>("service")
        .with_model::<ReferenceModel>("reference")
        .with_model::<PropertyModel>(PROPERTY_LOCAL)
}

/// Registry over the whole core catalog
#[must_use]
pub fn core_registry() -> MarshallerRegistry {
    MarshallerRegistry::new()
        .with_shared_marshaller(Arc::new(core_marshaller()))
        .with_shared_marshaller(Arc::new(composite_marshaller()))
}

/// Install `compact(scope, upstream)` on the model's node
///
/// Upstream is the parent's effective resolver, or the context defaults
/// for a root or detached node. A missing scope leaves just upstream.
pub(crate) fn install_chain(base: &BaseModel, scope: Option<SharedResolver>) -> SharedResolver {
    let upstream = base.context().upstream_resolver(base.node());
    let chain = compact(scope.into_iter().chain(std::iter::once(upstream)));
    tracing::trace!(
        "Rewired resolver chain of '{}' ({} members)",
        base.node().name(),
        chain.members().map_or(1, <[SharedResolver]>::len)
    );
    base.node().set_property_resolver(Arc::clone(&chain));
    chain
}

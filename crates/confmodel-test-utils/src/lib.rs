//! Testing utilities for the confmodel workspace
//!
//! Shared fixtures: tracing setup, deterministic contexts, sample trees.

#![allow(missing_docs)]

use confmodel_model::models::core_registry;
use confmodel_model::names::{
    APPLICATION, COMPONENT, COMPOSITE, COMPOSITE_PROPERTY, CORE_PROPERTY, DOMAIN, NAME_ATTR, PROMOTE_ATTR, PROPERTIES,
    SERVICE, VALUE_ATTR,
};
use confmodel_model::ModelContext;
use confmodel_node::{ConfigNode, NodeSnapshot, QName};
use confmodel_property::{system_and_test, ResolverConfig, SystemResolver, TestResolver};
use std::sync::{Arc, Once};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a test-friendly subscriber once per process
///
/// Honours `RUST_LOG`, defaulting to `warn`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Core catalog context with an empty environment and a live test overlay
pub fn test_context() -> (ModelContext, Arc<TestResolver>) {
    test_context_with(SystemResolver::new(&ResolverConfig::default()))
}

/// Core catalog context over the given system resolver
pub fn test_context_with(system: SystemResolver) -> (ModelContext, Arc<TestResolver>) {
    init_tracing();
    let overlay = Arc::new(TestResolver::new());
    let defaults = system_and_test(Arc::new(system), Arc::clone(&overlay));
    let context = ModelContext::new(Arc::new(core_registry())).with_defaults(defaults);
    (context, overlay)
}

/// Detached `property` snapshot
pub fn property_snapshot(name: QName, key: &str, value: &str) -> NodeSnapshot {
    NodeSnapshot::new(name)
        .with_attribute(NAME_ATTR, key)
        .with_attribute(VALUE_ATTR, value)
}

/// Detached composite-level `property` node
pub fn property_node(key: &str, value: &str) -> ConfigNode {
    ConfigNode::from_snapshot(&property_snapshot(COMPOSITE_PROPERTY, key, value))
}

/// Sample application document
///
/// ```text
/// application name=orders-app
///   composite name=orders
///     service name=OrderService promote=OrderComponent/OrderService
///     component name=OrderComponent
///       property x=inner
///     component name=AuditComponent
///     {urn:vendor:ext}monitor
///     property x=outer
///     property region=${env.REGION:eu}
///   domain
///     properties
///       property x=domain
///       property timeout=30
/// ```
pub fn sample_application() -> NodeSnapshot {
    let composite = NodeSnapshot::new(COMPOSITE)
        .with_attribute(NAME_ATTR, "orders")
        .with_child(
            NodeSnapshot::new(SERVICE)
                .with_attribute(NAME_ATTR, "OrderService")
                .with_attribute(PROMOTE_ATTR, "OrderComponent/OrderService"),
        )
        .with_child(
            NodeSnapshot::new(COMPONENT)
                .with_attribute(NAME_ATTR, "OrderComponent")
                .with_child(property_snapshot(COMPOSITE_PROPERTY, "x", "inner")),
        )
        .with_child(NodeSnapshot::new(COMPONENT).with_attribute(NAME_ATTR, "AuditComponent"))
        .with_child(NodeSnapshot::new(QName::new("urn:vendor:ext", "monitor")))
        .with_child(property_snapshot(COMPOSITE_PROPERTY, "x", "outer"))
        .with_child(property_snapshot(COMPOSITE_PROPERTY, "region", "${env.REGION:eu}"));

    let domain = NodeSnapshot::new(DOMAIN).with_child(
        NodeSnapshot::new(PROPERTIES)
            .with_child(property_snapshot(CORE_PROPERTY, "x", "domain"))
            .with_child(property_snapshot(CORE_PROPERTY, "timeout", "30")),
    );

    NodeSnapshot::new(APPLICATION)
        .with_attribute(NAME_ATTR, "orders-app")
        .with_child(composite)
        .with_child(domain)
}

/// Sample application as a live tree
pub fn sample_application_tree() -> ConfigNode {
    ConfigNode::from_snapshot(&sample_application())
}

/// First child named `name` whose `name` attribute is `value`
pub fn child_by_name(parent: &ConfigNode, name: &QName, value: &str) -> Option<ConfigNode> {
    parent.find_child(|c| c.name() == name && c.attribute(NAME_ATTR).as_deref() == Some(value))
}

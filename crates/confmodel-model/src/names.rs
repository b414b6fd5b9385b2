//! Element and attribute names of the core model catalog

#![allow(missing_docs)]

use confmodel_node::QName;

/// Namespace of application-level elements
pub const CORE_NAMESPACE: &str = "urn:confmodel:core:1.0";

/// Namespace of composite-level elements
pub const COMPOSITE_NAMESPACE: &str = "urn:confmodel:composite:1.0";

/// Local name shared by property declarations in every namespace
pub const PROPERTY_LOCAL: &str = "property";

// Core namespace
pub const APPLICATION: QName = QName::from_static(CORE_NAMESPACE, "application");
pub const DOMAIN: QName = QName::from_static(CORE_NAMESPACE, "domain");
pub const PROPERTIES: QName = QName::from_static(CORE_NAMESPACE, "properties");
pub const CORE_PROPERTY: QName = QName::from_static(CORE_NAMESPACE, PROPERTY_LOCAL);
pub const TRANSFORMS: QName = QName::from_static(CORE_NAMESPACE, "transforms");
pub const VALIDATES: QName = QName::from_static(CORE_NAMESPACE, "validates");
pub const HANDLERS: QName = QName::from_static(CORE_NAMESPACE, "handlers");
pub const SECURITIES: QName = QName::from_static(CORE_NAMESPACE, "securities");

// Composite namespace
pub const COMPOSITE: QName = QName::from_static(COMPOSITE_NAMESPACE, "composite");
pub const COMPONENT: QName = QName::from_static(COMPOSITE_NAMESPACE, "component");
pub const SERVICE: QName = QName::from_static(COMPOSITE_NAMESPACE, "service");
pub const REFERENCE: QName = QName::from_static(COMPOSITE_NAMESPACE, "reference");
pub const COMPOSITE_PROPERTY: QName = QName::from_static(COMPOSITE_NAMESPACE, PROPERTY_LOCAL);

// Attributes
pub const NAME_ATTR: &str = "name";
pub const VALUE_ATTR: &str = "value";
pub const PROMOTE_ATTR: &str = "promote";
pub const TARGET_NAMESPACE_ATTR: &str = "targetNamespace";

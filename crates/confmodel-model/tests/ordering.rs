//! Children Ordering Tests
//!
//! Run with: cargo test --package confmodel-model --test ordering
//!
use confmodel_model::names::{COMPONENT, COMPOSITE_PROPERTY, REFERENCE, SERVICE};
use confmodel_model::prelude::*;
use confmodel_test_utils::test_context;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
enum Add {
    Service,
    Reference,
    Component,
    Property,
    Extension,
}

fn add_strategy() -> impl Strategy<Value = Add> {
    prop_oneof![
        Just(Add::Service),
        Just(Add::Reference),
        Just(Add::Component),
        Just(Add::Property),
        Just(Add::Extension),
    ]
}

fn apply(composite: &CompositeModel, ctx: &ModelContext, add: Add, i: usize) -> ModelResult<()> {
    match add {
        Add::Service => {
            let service = ServiceModel::new(ctx);
            service.set_name(&format!("s{i}"));
            composite.add_service(Arc::new(service))?;
        }
        Add::Reference => {
            composite.add_reference(Arc::new(ReferenceModel::new(ctx)))?;
        }
        Add::Component => {
            composite.add_component(Arc::new(ComponentModel::new(ctx)))?;
        }
        Add::Property => {
            let property = PropertyModel::new(ctx);
            property.set_name(&format!("p{i}")).set_value("v");
            composite.add_property(Arc::new(property))?;
        }
        Add::Extension => {
            let extension = NamedModel::new(QName::new("urn:vendor:ext", "monitor"), ctx);
            composite.base().add_child_model(&extension)?;
        }
    }
    Ok(())
}

fn local_names(node: &ConfigNode) -> Vec<String> {
    node.children().iter().map(|c| c.name().local_name().to_string()).collect()
}

#[test]
fn test_component_service_property_scenario() {
    let (ctx, _) = test_context();
    let composite = CompositeModel::new(&ctx);

    apply(&composite, &ctx, Add::Component, 0).unwrap();
    apply(&composite, &ctx, Add::Service, 1).unwrap();
    apply(&composite, &ctx, Add::Property, 2).unwrap();

    assert_eq!(local_names(composite.node()), ["service", "component", "property"]);
}

#[test]
fn test_same_name_keeps_insertion_order() {
    let (ctx, _) = test_context();
    let composite = CompositeModel::new(&ctx);
    apply(&composite, &ctx, Add::Property, 0).unwrap();
    for i in 1..=3 {
        apply(&composite, &ctx, Add::Service, i).unwrap();
    }

    let names: Vec<Option<String>> = composite.services().iter().map(|s| s.name()).collect();
    assert_eq!(names, [Some("s1".to_string()), Some("s2".to_string()), Some("s3".to_string())]);

    let stored: Vec<Option<String>> = composite
        .node()
        .children_named(&SERVICE)
        .iter()
        .map(|n| n.attribute("name"))
        .collect();
    assert_eq!(stored, names);
}

#[test]
fn test_extension_elements_are_appended() {
    let (ctx, _) = test_context();
    let composite = CompositeModel::new(&ctx);
    apply(&composite, &ctx, Add::Property, 0).unwrap();
    apply(&composite, &ctx, Add::Extension, 1).unwrap();
    apply(&composite, &ctx, Add::Service, 2).unwrap();

    assert_eq!(local_names(composite.node()), ["service", "property", "monitor"]);
}

proptest! {
    #[test]
    fn prop_typed_adds_keep_canonical_order(adds in prop::collection::vec(add_strategy(), 0..20)) {
        let (ctx, _) = test_context();
        let composite = CompositeModel::new(&ctx);
        for (i, add) in adds.iter().enumerate() {
            apply(&composite, &ctx, *add, i).unwrap();
        }

        let order = ChildrenOrder::new([SERVICE, REFERENCE, COMPONENT, COMPOSITE_PROPERTY]);
        prop_assert!(order.is_satisfied_by(&composite.node().children()));
        prop_assert_eq!(composite.node().child_count(), adds.len());
        for child in composite.node().children() {
            let parent = child.parent();
            prop_assert_eq!(parent.as_ref(), Some(composite.node()));
        }
    }
}

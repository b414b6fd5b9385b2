//! Concurrent Access Tests
//!
//! Readers get whole snapshots while writers add children and rewire chains.
//!
//! Run with: cargo test --package confmodel-model --test concurrency
//!
use confmodel_model::prelude::*;
use confmodel_property::PropertyResolver;
use confmodel_test_utils::{sample_application_tree, test_context};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

fn named_service(ctx: &ModelContext, name: &str) -> Arc<ServiceModel> {
    let service = ServiceModel::new(ctx);
    service.set_name(name);
    Arc::new(service)
}

#[test]
fn test_reader_sees_three_or_four_services() {
    let (ctx, _) = test_context();
    let composite = CompositeModel::new(&ctx);
    for name in ["a", "b", "c"] {
        composite.add_service(named_service(&ctx, name)).unwrap();
    }

    let barrier = Barrier::new(2);
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            barrier.wait();
            composite.add_service(named_service(&ctx, "d")).unwrap();
            done.store(true, Ordering::Release);
        });

        s.spawn(|| {
            barrier.wait();
            loop {
                let finished = done.load(Ordering::Acquire);
                let snapshot = composite.services();
                assert!(matches!(snapshot.len(), 3 | 4), "saw {} services", snapshot.len());
                for service in &snapshot {
                    assert!(service.name().is_some());
                }
                if finished {
                    break;
                }
            }
        });
    });

    assert_eq!(composite.services().len(), 4);
    assert_eq!(composite.node().child_count(), 4);
}

#[test]
fn test_snapshot_is_stable_after_later_adds() {
    let (ctx, _) = test_context();
    let composite = CompositeModel::new(&ctx);
    composite.add_service(named_service(&ctx, "a")).unwrap();

    let before = composite.services();
    composite.add_service(named_service(&ctx, "b")).unwrap();

    assert_eq!(before.len(), 1);
    assert_eq!(composite.services().len(), 2);
}

#[test]
fn test_resolution_during_concurrent_property_adds() {
    const WRITERS: usize = 4;
    const PER_WRITER: usize = 25;

    let (ctx, _) = test_context();
    let tree = sample_application_tree();
    let application = ctx.read_as::<ApplicationModel>(&tree).unwrap().unwrap();
    let composite = application.composite().unwrap();
    let components = composite.components();
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        let writers: Vec<_> = (0..WRITERS)
            .map(|w| {
                let ctx = &ctx;
                let composite = &composite;
                s.spawn(move || {
                    for i in 0..PER_WRITER {
                        let property = PropertyModel::new(ctx);
                        property.set_name(&format!("w{w}-{i}")).set_value("v");
                        composite.add_property(Arc::new(property)).unwrap();
                    }
                })
            })
            .collect();

        s.spawn(|| {
            while !done.load(Ordering::Acquire) {
                for component in &components {
                    let chain = component.node().effective_resolver().unwrap();
                    // Shadowing holds throughout rewiring
                    let x = chain.resolve("x");
                    assert!(matches!(x.as_deref(), Some("inner" | "outer")), "got {x:?}");
                    assert_eq!(chain.resolve("timeout").as_deref(), Some("30"));
                }
            }
        });

        for writer in writers {
            writer.join().unwrap();
        }
        done.store(true, Ordering::Release);
    });

    assert_eq!(composite.properties().len(), 2 + WRITERS * PER_WRITER);
    for component in &components {
        let chain = component.node().property_resolver().unwrap();
        assert_eq!(chain.resolve("w0-0").as_deref(), Some("v"));
    }
}

#[test]
fn test_concurrent_component_adds() {
    const THREADS: usize = 6;
    const PER_THREAD: usize = 10;

    let (ctx, _) = test_context();
    let composite = CompositeModel::new(&ctx);

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..PER_THREAD {
                    composite.add_component(Arc::new(ComponentModel::new(&ctx))).unwrap();
                }
            });
        }
    });

    let components = composite.components();
    assert_eq!(components.len(), THREADS * PER_THREAD);
    for component in components {
        assert!(component.node().property_resolver().is_some());
        assert_eq!(component.node().parent().as_ref(), Some(composite.node()));
    }
}

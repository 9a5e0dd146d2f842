/// Resolution observers.

mod common;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;
use wro_di::{
    DiError, InjectionObserver, Injector, InjectorBuilder, Key, ModelFactory, TracingObserver,
};

#[derive(Default)]
struct Recording {
    events: Mutex<Vec<String>>,
}

impl InjectionObserver for Recording {
    fn resolving(&self, key: &Key) {
        self.events.lock().push(format!("resolving {}", key));
    }

    fn resolved(&self, key: &Key, _duration: Duration) {
        self.events.lock().push(format!("resolved {}", key));
    }

    fn failed(&self, key: &Key, _error: &DiError) {
        self.events.lock().push(format!("failed {}", key));
    }
}

trait Absent: Send + Sync {}

#[test]
fn test_observer_sees_nested_resolutions() {
    let recording = Arc::new(Recording::default());
    let mut builder = InjectorBuilder::new(common::CountingFactory::new());
    builder.add_observer(recording.clone());
    let injector = builder.build();

    injector.get::<dyn ModelFactory>().unwrap();
    injector.get::<Injector>().unwrap();

    let events = recording.events.lock().clone();
    assert_eq!(events.len(), 4);
    assert!(events[0].starts_with("resolving") && events[0].contains("ModelFactory"));
    assert!(events[1].starts_with("resolved") && events[1].contains("ModelFactory"));
    assert!(events[3].starts_with("resolved") && events[3].ends_with("Injector"));
}

#[test]
fn test_observer_sees_failures() {
    let recording = Arc::new(Recording::default());
    let mut builder = InjectorBuilder::empty();
    builder
        .add_observer(recording.clone())
        .bind_provider::<dyn Absent, _>(|| Err(DiError::ContainerNotBuilt));
    let injector = builder.build();

    assert!(injector.get::<dyn Absent>().is_err());
    let events = recording.events.lock().clone();
    assert_eq!(events.len(), 2);
    assert!(events[1].starts_with("failed"));
}

#[test]
fn test_tracing_observer_emits_events() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("trace"))
        .with_test_writer()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut builder = InjectorBuilder::new(common::CountingFactory::new());
        builder.add_observer(Arc::new(TracingObserver::with_prefix("test")));
        let injector = builder.build();

        injector.get::<dyn ModelFactory>().unwrap();
        assert!(injector.get::<wro_di::WroConfig>().is_ok());
    });
}

/// Processing entry points and lifecycle callbacks resolved from the injector.

mod common;

use std::sync::Arc;

use parking_lot::Mutex;
use wro_di::{
    injection_target, BoxError, InjectionTarget, InjectorBuilder, LifecycleCallback,
    LifecycleCallbackRegistry, LocatorChain, Manager, PreProcessorExecutor, ProcessorList,
    ReadOnlyContext, Resource, ResourceError, ResourceProcessor, ResourceType, Slot, UriLocator,
};

struct Inline;

impl UriLocator for Inline {
    fn accept(&self, uri: &str) -> bool {
        uri.starts_with("/inline/")
    }

    fn locate(&self, uri: &str) -> Result<Vec<u8>, ResourceError> {
        Ok(format!("var {} = 1", uri.trim_start_matches("/inline/").trim_end_matches(".js"))
            .into_bytes())
    }
}

/// Callback that needs the context and records what it saw.
#[derive(Default)]
struct Audit {
    context: Slot<dyn ReadOnlyContext>,
    seen: Mutex<Vec<String>>,
}

injection_target!(Audit { context: dyn ReadOnlyContext });

impl LifecycleCallback for Audit {
    fn on_after_pre_process(&self, uri: &str) {
        let debug = self.context.try_get().map(|c| c.config().debug);
        self.seen.lock().push(format!("{uri} debug={debug:?}"));
    }

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        Some(self)
    }
}

fn semicolon() -> Arc<dyn ResourceProcessor> {
    Arc::new(|_: &str, c: &str| -> Result<String, ResourceError> { Ok(format!("{c};")) })
}

fn manager_with(registry: Arc<LifecycleCallbackRegistry>) -> impl Fn() -> Result<Manager, BoxError> {
    move || {
        Ok(Manager::new(common::model_factory())
            .with_locator_factory(Arc::new(LocatorChain::new().with(Arc::new(Inline))))
            .with_processors_factory(Arc::new(ProcessorList::new().with_pre(semicolon())))
            .with_callback_registry(registry.clone()))
    }
}

#[test]
fn test_callbacks_are_injected_when_registry_is_resolved() {
    let audit = Arc::new(Audit::default());
    let registry = Arc::new(LifecycleCallbackRegistry::new());
    registry.register(audit.clone());
    let injector = InjectorBuilder::new(manager_with(registry)).build();

    assert!(!audit.context.is_set());
    let resolved = injector.get::<LifecycleCallbackRegistry>().unwrap();
    assert_eq!(resolved.len(), 1);
    assert!(audit.context.is_set());
}

#[test]
fn test_executor_locates_pre_processes_and_notifies() {
    let audit = Arc::new(Audit::default());
    let registry = Arc::new(LifecycleCallbackRegistry::new());
    registry.register(audit.clone());
    let injector = InjectorBuilder::new(manager_with(registry)).build();

    let executor = injector.get::<PreProcessorExecutor>().unwrap();
    let merged = executor
        .process_and_merge(&[
            Resource::new("/inline/a.js", ResourceType::Js),
            Resource::new("/inline/b.js", ResourceType::Js),
        ])
        .unwrap();

    assert_eq!(merged, "var a = 1;\nvar b = 1;");
    assert_eq!(
        *audit.seen.lock(),
        vec!["/inline/a.js debug=Some(true)", "/inline/b.js debug=Some(true)"]
    );
}

#[test]
fn test_executor_reports_unlocatable_resources() {
    let injector =
        InjectorBuilder::new(manager_with(Arc::new(LifecycleCallbackRegistry::new()))).build();
    let executor = injector.get::<PreProcessorExecutor>().unwrap();

    assert_eq!(
        executor.process_and_merge(&[Resource::new("/missing/a.js", ResourceType::Js)]),
        Err(ResourceError::NoLocator("/missing/a.js".to_string()))
    );
}

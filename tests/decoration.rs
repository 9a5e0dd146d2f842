/// Decorated singletons are built and decorated exactly once.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::CountingFactory;
use wro_di::{
    injection_target, BoxError, CacheKey, CacheStrategy, CacheValue, Group, HashStrategy,
    InjectionTarget, Injector, InjectorBuilder, LocatorChain, Manager, Model, ModelFactory,
    NamingStrategy, ResourceAuthorizationManager, ResourceError, ResourceType, Slot, UriLocator,
    UriLocatorFactory,
};

/// Model factory whose models reveal which instance produced them.
struct Tagged;

impl ModelFactory for Tagged {
    fn create(&self) -> Result<Model, ResourceError> {
        let id = self as *const Tagged as usize;
        Ok(Model::new(vec![Group::new(format!("factory-{}", id))]))
    }
}

fn tagged_factory(counter: Arc<AtomicUsize>) -> impl Fn() -> Result<Manager, BoxError> {
    move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Manager::new(Arc::new(Tagged)).with_model_transformer(Arc::new(
            |mut model: Model| -> Result<Model, ResourceError> {
                model.groups.push(Group::new("transformed"));
                Ok(model)
            },
        )))
    }
}

#[test]
fn test_model_factory_decorated_exactly_once() {
    let created = Arc::new(AtomicUsize::new(0));
    let injector = InjectorBuilder::new(tagged_factory(created.clone())).build();

    let first = injector.get::<dyn ModelFactory>().unwrap();
    let second = injector.get::<dyn ModelFactory>().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.create().unwrap(), second.create().unwrap());
    assert_eq!(
        first.create().unwrap().group_names().last(),
        Some(&"transformed")
    );
    assert_eq!(created.load(Ordering::SeqCst), 1);
}

#[test]
fn test_each_decorated_singleton_asks_the_factory_once() {
    let factory = CountingFactory::new();
    let injector = InjectorBuilder::new(factory.clone()).build();

    for _ in 0..3 {
        injector.get::<dyn UriLocatorFactory>().unwrap();
        injector.get::<dyn ResourceAuthorizationManager>().unwrap();
        injector.get::<dyn ModelFactory>().unwrap();
        injector.get::<dyn CacheStrategy>().unwrap();
    }
    assert_eq!(factory.created(), 4);
}

#[test]
fn test_fresh_capabilities_ask_the_factory_every_time() {
    let factory = CountingFactory::new();
    let injector = InjectorBuilder::new(factory.clone()).build();

    injector.get::<dyn NamingStrategy>().unwrap();
    injector.get::<dyn NamingStrategy>().unwrap();
    injector.get::<dyn HashStrategy>().unwrap();
    assert_eq!(factory.created(), 3);
}

#[test]
fn test_nothing_is_built_before_first_request() {
    let factory = CountingFactory::new();
    let _injector = InjectorBuilder::new(factory.clone()).build();
    assert_eq!(factory.created(), 0);
}

#[test]
fn test_cache_strategy_is_shared_across_proxies() {
    let injector = InjectorBuilder::new(CountingFactory::new()).build();
    let key = CacheKey::new("core", ResourceType::Js, true);

    injector.get::<dyn CacheStrategy>().unwrap().put(
        key.clone(),
        CacheValue {
            content: "var a;".into(),
            hash: "1".into(),
        },
    );
    let cached = injector.get::<dyn CacheStrategy>().unwrap().get(&key);
    assert_eq!(cached.map(|v| v.content).as_deref(), Some("var a;"));
}

#[test]
fn test_failed_factory_is_retried_on_next_request() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let injector = InjectorBuilder::new(move || -> Result<Manager, BoxError> {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err("model source unavailable".into());
        }
        Ok(Manager::new(common::model_factory()))
    })
    .build();

    match injector.get::<dyn ModelFactory>() {
        Err(wro_di::DiError::Initialization { capability, .. }) => {
            assert_eq!(capability, "ModelFactory")
        }
        other => panic!("expected initialization error, got {:?}", other.map(|_| ())),
    }
    assert!(injector.get::<dyn ModelFactory>().is_ok());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

/// Locator needing the injector itself.
#[derive(Default)]
struct SelfAware {
    injector: Slot<Injector>,
}

injection_target!(SelfAware { injector: Injector });

impl UriLocator for SelfAware {
    fn accept(&self, uri: &str) -> bool {
        uri.starts_with("/self/")
    }

    fn locate(&self, _uri: &str) -> Result<Vec<u8>, ResourceError> {
        let capabilities = self.injector.get()?.len();
        Ok(capabilities.to_string().into_bytes())
    }

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        Some(self)
    }
}

#[test]
fn test_located_locators_are_injected() {
    let locator = Arc::new(SelfAware::default());
    let shared = locator.clone();
    let injector = InjectorBuilder::new(move || -> Result<Manager, BoxError> {
        Ok(Manager::new(common::model_factory())
            .with_locator_factory(Arc::new(LocatorChain::new().with(shared.clone()))))
    })
    .build();

    let locators = injector.get::<dyn UriLocatorFactory>().unwrap();
    assert!(!locator.injector.is_set());

    assert_eq!(locators.locate("/self/a.js").unwrap(), b"14".to_vec());
    assert!(Injector::ptr_eq(&locator.injector.get().unwrap(), &injector));
}

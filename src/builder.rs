//! Staging area that assembles the provider table and finalizes the injector.

use std::sync::Arc;

use crate::capability::{
    CacheStrategy, GroupExtractor, GroupsProcessor, HashStrategy, LifecycleCallbackRegistry,
    ModelFactory, NamingStrategy, PreProcessorExecutor, ProcessorsFactory,
    ResourceAuthorizationManager, UriLocatorFactory,
};
use crate::config::{Context, ReadOnlyContext, WroConfig};
use crate::decoration::{
    InjectorAwareLocatorFactory, SynchronizedCacheStrategy, TransformingModelFactory,
};
use crate::error::{BoxError, DiError, DiResult};
use crate::injector::{InjectionTarget, Injector, InjectorRef};
use crate::key::Key;
use crate::lazy::LazyValue;
use crate::manager::{Manager, ManagerFactory};
use crate::observer::{InjectionObserver, Observers};
use crate::proxy::{Forwarding, Proxy};
use crate::registration::{Provider, Registry, TypedProvider};

type Lazy<T> = Arc<LazyValue<Arc<T>>>;

/// Builds an [`Injector`].
///
/// The builder is the only mutable phase: providers are staged here, then
/// [`build`](Self::build) freezes them into an immutable injector and
/// publishes it to every provider that needs to call back into it.
///
/// [`new`](Self::new) stages the full optimizer table from a
/// [`ManagerFactory`]. The locator factory, authorization manager, model
/// factory and cache strategy are built and decorated at most once, on first
/// request; every request gets a fresh proxy around that single instance.
///
/// # Examples
///
/// ```rust
/// use wro_di::{BoxError, InjectorBuilder, Manager, Model, ModelFactory, StaticModelFactory};
/// use std::sync::Arc;
///
/// let injector = InjectorBuilder::new(|| -> Result<Manager, BoxError> {
///     Ok(Manager::new(StaticModelFactory::shared(Model::default())))
/// })
/// .build();
///
/// let a = injector.get::<dyn ModelFactory>().unwrap();
/// let b = injector.get::<dyn ModelFactory>().unwrap();
/// assert!(!Arc::ptr_eq(&a, &b));
/// assert!(a.create().unwrap().groups.is_empty());
/// ```
pub struct InjectorBuilder {
    injector: InjectorRef,
    standard: Option<StandardCapabilities>,
    bindings: Registry,
    config: WroConfig,
    observers: Observers,
}

impl InjectorBuilder {
    /// Builder with only the `Injector` capability.
    pub fn empty() -> Self {
        Self {
            injector: InjectorRef::new(),
            standard: None,
            bindings: Registry::new(),
            config: WroConfig::default(),
            observers: Observers::new(),
        }
    }

    /// Builder staging every optimizer capability, created through `factory`.
    pub fn new<F>(factory: F) -> Self
    where
        F: ManagerFactory + 'static,
    {
        let mut builder = Self::empty();
        builder.standard = Some(StandardCapabilities::new(
            Arc::new(factory),
            builder.injector.clone(),
        ));
        builder
    }

    /// Configuration served through `ReadOnlyContext` and `WroConfig`.
    pub fn with_config(&mut self, config: WroConfig) -> &mut Self {
        self.config = config;
        self
    }

    pub fn add_observer(&mut self, observer: Arc<dyn InjectionObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Registers `factory` for capability `T`, replacing any earlier provider.
    ///
    /// The factory runs on every request.
    pub fn bind_provider<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> DiResult<Arc<T>> + Send + Sync + 'static,
    {
        let replaced = self
            .bindings
            .insert(Key::of::<T>(), Arc::new(TypedProvider::<T, F>::new(factory)));
        if replaced {
            tracing::debug!(capability = std::any::type_name::<T>(), "provider replaced");
        }
        self
    }

    /// Registers one shared instance of `T`.
    pub fn bind_instance<T>(&mut self, instance: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.bind_provider::<T, _>(move || Ok(instance.clone()))
    }

    /// Registers a lazily built singleton, handed out behind a fresh proxy.
    ///
    /// `init` runs on first request only; a failure is reported to that
    /// request and the next one tries again.
    pub fn bind_singleton<T, F>(&mut self, name: &'static str, init: F) -> &mut Self
    where
        T: ?Sized + Forwarding,
        F: Fn() -> Result<Arc<T>, BoxError> + Send + Sync + 'static,
    {
        let lazy: Lazy<T> = Arc::new(LazyValue::new(name, init));
        self.bind_provider::<T, _>(move || Ok(Proxy::create(lazy.get()?)))
    }

    /// The forward reference providers use to reach the finished injector.
    pub fn injector_ref(&self) -> InjectorRef {
        self.injector.clone()
    }

    /// Freezes the staged table and publishes the injector.
    pub fn build(self) -> Injector {
        let mut registry = Registry::new();

        let cell = self.injector.clone();
        registry.insert(
            Key::of::<Injector>(),
            Arc::new(TypedProvider::<Injector, _>::new(move || {
                cell.get().map(|injector| Arc::new(injector.downgrade()))
            })),
        );

        if let Some(standard) = &self.standard {
            standard.register(&mut registry, self.config.clone());
        }
        registry.merge(self.bindings);

        let capabilities = registry.len();
        let injector = Injector::new(registry, self.observers);
        if !self.injector.publish(&injector) {
            tracing::warn!("forward reference already published");
        }
        tracing::debug!(capabilities, "injector built");
        injector
    }
}

impl Default for InjectorBuilder {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for InjectorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectorBuilder")
            .field("standard", &self.standard.is_some())
            .field("bindings", &self.bindings.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Injects `target` through the published injector, if it needs anything.
fn inject_into(cell: &InjectorRef, target: Option<&dyn InjectionTarget>) -> DiResult<()> {
    match target {
        Some(target) => cell.get()?.inject(target),
        None => Ok(()),
    }
}

// Provider table backed by a manager factory.
struct StandardCapabilities {
    factory: Arc<dyn ManagerFactory>,
    injector: InjectorRef,
    locator_factory: Lazy<dyn UriLocatorFactory>,
    authorization_manager: Lazy<dyn ResourceAuthorizationManager>,
    model_factory: Lazy<dyn ModelFactory>,
    cache_strategy: Lazy<dyn CacheStrategy>,
    groups_processor: Arc<GroupsProcessor>,
    pre_processor_executor: Arc<PreProcessorExecutor>,
}

impl StandardCapabilities {
    fn new(factory: Arc<dyn ManagerFactory>, injector: InjectorRef) -> Self {
        let locator_factory = {
            let factory = factory.clone();
            let injector = injector.clone();
            Arc::new(LazyValue::new("UriLocatorFactory", move || {
                let manager = factory.create()?;
                Ok(InjectorAwareLocatorFactory::decorate(
                    manager.locator_factory,
                    injector.clone(),
                ))
            }))
        };

        let authorization_manager = {
            let factory = factory.clone();
            Arc::new(LazyValue::new("ResourceAuthorizationManager", move || {
                Ok(factory.create()?.authorization_manager)
            }))
        };

        let model_factory = {
            let factory = factory.clone();
            Arc::new(LazyValue::new("ModelFactory", move || {
                let manager = factory.create()?;
                Ok(TransformingModelFactory::decorate(
                    manager.model_factory,
                    manager.model_transformers,
                ))
            }))
        };

        let cache_strategy = {
            let factory = factory.clone();
            Arc::new(LazyValue::new("CacheStrategy", move || {
                Ok(SynchronizedCacheStrategy::decorate(
                    factory.create()?.cache_strategy,
                ))
            }))
        };

        Self {
            factory,
            injector,
            locator_factory,
            authorization_manager,
            model_factory,
            cache_strategy,
            groups_processor: Arc::new(GroupsProcessor::new()),
            pre_processor_executor: Arc::new(PreProcessorExecutor::new()),
        }
    }

    fn register(&self, registry: &mut Registry, config: WroConfig) {
        fn bind<T, F>(registry: &mut Registry, factory: F)
        where
            T: ?Sized + Send + Sync + 'static,
            F: Fn() -> DiResult<Arc<T>> + Send + Sync + 'static,
        {
            let provider: Arc<dyn Provider> = Arc::new(TypedProvider::<T, F>::new(factory));
            registry.insert(Key::of::<T>(), provider);
        }

        let lazy = self.locator_factory.clone();
        bind::<dyn UriLocatorFactory, _>(registry, move || Ok(Proxy::create(lazy.get()?)));

        let lazy = self.authorization_manager.clone();
        bind::<dyn ResourceAuthorizationManager, _>(registry, move || {
            Ok(Proxy::create(lazy.get()?))
        });

        let (lazy, cell) = (self.model_factory.clone(), self.injector.clone());
        bind::<dyn ModelFactory, _>(registry, move || {
            let decorated = lazy.get()?;
            inject_into(&cell, decorated.as_target())?;
            Ok(Proxy::create(decorated))
        });

        let (lazy, cell) = (self.cache_strategy.clone(), self.injector.clone());
        bind::<dyn CacheStrategy, _>(registry, move || {
            let decorated = lazy.get()?;
            inject_into(&cell, decorated.as_target())?;
            Ok(Proxy::create(decorated))
        });

        let (factory, cell) = (self.factory.clone(), self.injector.clone());
        bind::<dyn NamingStrategy, _>(registry, move || {
            let strategy = create_manager(&*factory, "NamingStrategy")?.naming_strategy;
            inject_into(&cell, strategy.as_target())?;
            Ok(Proxy::create(strategy))
        });

        let (factory, cell) = (self.factory.clone(), self.injector.clone());
        bind::<dyn HashStrategy, _>(registry, move || {
            let strategy = create_manager(&*factory, "HashStrategy")?.hash_strategy;
            inject_into(&cell, strategy.as_target())?;
            Ok(Proxy::create(strategy))
        });

        let factory = self.factory.clone();
        bind::<dyn ProcessorsFactory, _>(registry, move || {
            let processors = create_manager(&*factory, "ProcessorsFactory")?.processors_factory;
            Ok(Proxy::create(processors))
        });

        let (factory, cell) = (self.factory.clone(), self.injector.clone());
        bind::<dyn GroupExtractor, _>(registry, move || {
            let extractor = create_manager(&*factory, "GroupExtractor")?.group_extractor;
            inject_into(&cell, extractor.as_target())?;
            Ok(Proxy::create(extractor))
        });

        let (processor, cell) = (self.groups_processor.clone(), self.injector.clone());
        bind::<GroupsProcessor, _>(registry, move || {
            cell.get()?.inject(&*processor)?;
            Ok(processor.clone())
        });

        let (executor, cell) = (self.pre_processor_executor.clone(), self.injector.clone());
        bind::<PreProcessorExecutor, _>(registry, move || {
            cell.get()?.inject(&*executor)?;
            Ok(executor.clone())
        });

        let (factory, cell) = (self.factory.clone(), self.injector.clone());
        bind::<LifecycleCallbackRegistry, _>(registry, move || {
            let callbacks =
                create_manager(&*factory, "LifecycleCallbackRegistry")?.callback_registry;
            callbacks.inject_callbacks(&cell.get()?)?;
            Ok(callbacks)
        });

        let config = Arc::new(config);
        let context: Arc<dyn ReadOnlyContext> = Arc::new(Context::new(config.as_ref().clone()));
        bind::<dyn ReadOnlyContext, _>(registry, move || Ok(Proxy::create(context.clone())));
        bind::<WroConfig, _>(registry, move || {
            tracing::warn!(
                "WroConfig injected directly; depend on ReadOnlyContext and use context.config() instead"
            );
            Ok(config.clone())
        });
    }
}

fn create_manager(factory: &dyn ManagerFactory, capability: &'static str) -> DiResult<Manager> {
    factory
        .create()
        .map_err(|source| DiError::initialization(capability, source))
}

//! # wro-di
//!
//! Bootstrap injector for a web-resource optimizer.
//!
//! ## Features
//!
//! - **Lazy decorated singletons**: expensive capabilities are built and decorated at most once, on first request
//! - **Forwarding proxies**: consumers always receive a capability-typed proxy, never the raw instance
//! - **Self-injection**: the injector is itself a capability, resolved through a forward reference published at build time
//! - **Member injection**: any [`InjectionTarget`] can have its [`Slot`]s filled in by capability type
//! - **Thread-safe**: the finished injector is immutable, `Send + Sync` and cheap to clone
//!
//! ## Quick Start
//!
//! ```rust
//! use wro_di::{injection_target, BoxError, Injector, InjectorBuilder, Manager, Model,
//!     ModelFactory, Slot, StaticModelFactory};
//!
//! #[derive(Default)]
//! struct Report {
//!     models: Slot<dyn ModelFactory>,
//!     injector: Slot<Injector>,
//! }
//!
//! injection_target!(Report {
//!     models: dyn ModelFactory,
//!     injector: Injector,
//! });
//!
//! let injector = InjectorBuilder::new(|| -> Result<Manager, BoxError> {
//!     Ok(Manager::new(StaticModelFactory::shared(Model::default())))
//! })
//! .build();
//!
//! let report = Report::default();
//! injector.inject(&report).unwrap();
//!
//! assert!(report.models.get().unwrap().create().unwrap().groups.is_empty());
//! assert!(Injector::ptr_eq(&report.injector.get().unwrap(), &injector));
//! ```
//!
//! ## Custom Capabilities
//!
//! ```rust
//! use wro_di::{forwarding, InjectorBuilder, Proxy};
//! use std::sync::Arc;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! impl Clock for Proxy<dyn Clock> {
//!     fn now(&self) -> u64 {
//!         self.delegate().now()
//!     }
//! }
//!
//! forwarding!(Clock);
//!
//! struct Fixed;
//! impl Clock for Fixed {
//!     fn now(&self) -> u64 {
//!         42
//!     }
//! }
//!
//! let mut builder = InjectorBuilder::empty();
//! builder.bind_singleton::<dyn Clock, _>("Clock", || Ok(Arc::new(Fixed) as Arc<dyn Clock>));
//! let injector = builder.build();
//!
//! assert_eq!(injector.get::<dyn Clock>().unwrap().now(), 42);
//! ```

pub mod builder;
pub mod capability;
pub mod config;
pub mod decoration;
pub mod error;
pub mod handler;
pub mod injector;
pub mod key;
pub mod lazy;
pub mod manager;
pub mod observer;
pub mod proxy;

mod registration;

pub use builder::InjectorBuilder;
pub use capability::{
    AuthorizationList, CacheKey, CacheStrategy, CacheValue, DefaultGroupExtractor,
    DefaultHashStrategy, Group, GroupExtractor, GroupsProcessor, HashStrategy, LifecycleCallback,
    LifecycleCallbackRegistry, LocatorChain, MemoryCacheStrategy, Model, ModelFactory,
    ModelTransformer, NamingStrategy, NoOpNamingStrategy, PreProcessorExecutor, ProcessorList,
    ProcessorsFactory, Resource, ResourceAuthorizationManager, ResourceError, ResourceProcessor,
    ResourceType, StaticModelFactory, UriLocator, UriLocatorFactory,
};
pub use config::{
    ConfigSource, ConfigValue, Context, EnvironmentConfigSource, JsonConfigSource,
    MapConfigSource, ReadOnlyContext, WroConfig,
};
pub use decoration::{
    InjectorAwareLocatorFactory, SynchronizedCacheStrategy, TransformingModelFactory,
};
pub use error::{BoxError, DiError, DiResult};
pub use handler::{ModelAsJsonHandler, RequestHandler, Response};
pub use injector::{InjectionTarget, Injector, InjectorRef, Requirement, Slot};
pub use key::{key_of, Key};
pub use lazy::{LazyState, LazyValue};
pub use manager::{Manager, ManagerFactory};
pub use observer::{InjectionObserver, TracingObserver};
pub use proxy::{Forwarding, Proxy};
pub use registration::{Provider, Resolved, TypedProvider};

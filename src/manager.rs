//! The capability factory consumed by the builder.

use std::sync::Arc;

use crate::capability::{
    AuthorizationList, CacheStrategy, DefaultGroupExtractor, DefaultHashStrategy, GroupExtractor,
    HashStrategy, LifecycleCallbackRegistry, LocatorChain, MemoryCacheStrategy, ModelFactory,
    ModelTransformer, NamingStrategy, NoOpNamingStrategy, ProcessorList, ProcessorsFactory,
    ResourceAuthorizationManager, UriLocatorFactory,
};
use crate::error::BoxError;

/// Set of base (undecorated) capabilities.
///
/// Only the model factory has no sensible default; every other capability
/// starts out as its simplest implementation and can be replaced with the
/// `with_*` methods.
pub struct Manager {
    pub locator_factory: Arc<dyn UriLocatorFactory>,
    pub authorization_manager: Arc<dyn ResourceAuthorizationManager>,
    pub model_factory: Arc<dyn ModelFactory>,
    pub model_transformers: Vec<Arc<dyn ModelTransformer>>,
    pub cache_strategy: Arc<dyn CacheStrategy>,
    pub naming_strategy: Arc<dyn NamingStrategy>,
    pub hash_strategy: Arc<dyn HashStrategy>,
    pub processors_factory: Arc<dyn ProcessorsFactory>,
    pub group_extractor: Arc<dyn GroupExtractor>,
    pub callback_registry: Arc<LifecycleCallbackRegistry>,
}

impl Manager {
    pub fn new(model_factory: Arc<dyn ModelFactory>) -> Self {
        Self {
            locator_factory: Arc::new(LocatorChain::new()),
            authorization_manager: Arc::new(AuthorizationList::new()),
            model_factory,
            model_transformers: Vec::new(),
            cache_strategy: Arc::new(MemoryCacheStrategy::new()),
            naming_strategy: Arc::new(NoOpNamingStrategy),
            hash_strategy: Arc::new(DefaultHashStrategy),
            processors_factory: Arc::new(ProcessorList::new()),
            group_extractor: Arc::new(DefaultGroupExtractor),
            callback_registry: Arc::new(LifecycleCallbackRegistry::new()),
        }
    }

    pub fn with_locator_factory(mut self, factory: Arc<dyn UriLocatorFactory>) -> Self {
        self.locator_factory = factory;
        self
    }

    pub fn with_authorization_manager(
        mut self,
        manager: Arc<dyn ResourceAuthorizationManager>,
    ) -> Self {
        self.authorization_manager = manager;
        self
    }

    pub fn with_model_transformer(mut self, transformer: Arc<dyn ModelTransformer>) -> Self {
        self.model_transformers.push(transformer);
        self
    }

    pub fn with_cache_strategy(mut self, strategy: Arc<dyn CacheStrategy>) -> Self {
        self.cache_strategy = strategy;
        self
    }

    pub fn with_naming_strategy(mut self, strategy: Arc<dyn NamingStrategy>) -> Self {
        self.naming_strategy = strategy;
        self
    }

    pub fn with_hash_strategy(mut self, strategy: Arc<dyn HashStrategy>) -> Self {
        self.hash_strategy = strategy;
        self
    }

    pub fn with_processors_factory(mut self, factory: Arc<dyn ProcessorsFactory>) -> Self {
        self.processors_factory = factory;
        self
    }

    pub fn with_group_extractor(mut self, extractor: Arc<dyn GroupExtractor>) -> Self {
        self.group_extractor = extractor;
        self
    }

    pub fn with_callback_registry(mut self, registry: Arc<LifecycleCallbackRegistry>) -> Self {
        self.callback_registry = registry;
        self
    }
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("model_transformers", &self.model_transformers.len())
            .finish_non_exhaustive()
    }
}

/// Creates a [`Manager`] on demand.
///
/// The builder calls `create()` once per decorated singleton and once per
/// request for the capabilities it hands out fresh. Any
/// `Fn() -> Result<Manager, BoxError>` closure is a factory.
pub trait ManagerFactory: Send + Sync {
    fn create(&self) -> Result<Manager, BoxError>;
}

impl<F> ManagerFactory for F
where
    F: Fn() -> Result<Manager, BoxError> + Send + Sync,
{
    fn create(&self) -> Result<Manager, BoxError> {
        self()
    }
}

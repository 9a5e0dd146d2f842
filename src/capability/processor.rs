//! Resource processors and the group processing entry point.

use std::sync::Arc;

use super::callback::LifecycleCallbackRegistry;
use super::locator::UriLocatorFactory;
use super::model::Resource;
use super::ResourceError;
use crate::injector::Slot;
use crate::proxy::Proxy;

/// Transforms the content of one resource.
pub trait ResourceProcessor: Send + Sync {
    fn process(&self, uri: &str, content: &str) -> Result<String, ResourceError>;
}

impl<F> ResourceProcessor for F
where
    F: Fn(&str, &str) -> Result<String, ResourceError> + Send + Sync,
{
    fn process(&self, uri: &str, content: &str) -> Result<String, ResourceError> {
        self(uri, content)
    }
}

/// Supplies the processors applied before and after merging.
pub trait ProcessorsFactory: Send + Sync {
    fn pre_processors(&self) -> Vec<Arc<dyn ResourceProcessor>>;

    fn post_processors(&self) -> Vec<Arc<dyn ResourceProcessor>>;
}

impl ProcessorsFactory for Proxy<dyn ProcessorsFactory> {
    fn pre_processors(&self) -> Vec<Arc<dyn ResourceProcessor>> {
        self.delegate().pre_processors()
    }

    fn post_processors(&self) -> Vec<Arc<dyn ResourceProcessor>> {
        self.delegate().post_processors()
    }
}

crate::forwarding!(ProcessorsFactory);

/// Fixed lists of processors.
#[derive(Default, Clone)]
pub struct ProcessorList {
    pre: Vec<Arc<dyn ResourceProcessor>>,
    post: Vec<Arc<dyn ResourceProcessor>>,
}

impl ProcessorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pre(mut self, processor: Arc<dyn ResourceProcessor>) -> Self {
        self.pre.push(processor);
        self
    }

    pub fn with_post(mut self, processor: Arc<dyn ResourceProcessor>) -> Self {
        self.post.push(processor);
        self
    }
}

impl ProcessorsFactory for ProcessorList {
    fn pre_processors(&self) -> Vec<Arc<dyn ResourceProcessor>> {
        self.pre.clone()
    }

    fn post_processors(&self) -> Vec<Arc<dyn ResourceProcessor>> {
        self.post.clone()
    }
}

/// Runs a resource through every pre-processor, then every post-processor.
///
/// The processors are looked up on each call through the injected
/// [`ProcessorsFactory`], so the same instance can be re-injected and reused.
#[derive(Default, Debug)]
pub struct GroupsProcessor {
    processors: Slot<dyn ProcessorsFactory>,
}

crate::injection_target!(GroupsProcessor {
    processors: dyn ProcessorsFactory,
});

impl GroupsProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&self, uri: &str, content: &str) -> Result<String, ResourceError> {
        let factory = self.processors.get()?;
        let mut content = content.to_string();
        for processor in factory
            .pre_processors()
            .iter()
            .chain(factory.post_processors().iter())
        {
            content = processor.process(uri, &content)?;
        }
        Ok(content)
    }

    pub fn is_injected(&self) -> bool {
        self.processors.is_set()
    }
}

/// Locates resources, runs each through the pre-processors and merges the
/// results, one resource per line.
///
/// Like [`GroupsProcessor`], a single instance is re-injected on every
/// request.
#[derive(Default, Debug)]
pub struct PreProcessorExecutor {
    locators: Slot<dyn UriLocatorFactory>,
    processors: Slot<dyn ProcessorsFactory>,
    callbacks: Slot<LifecycleCallbackRegistry>,
}

crate::injection_target!(PreProcessorExecutor {
    locators: dyn UriLocatorFactory,
    processors: dyn ProcessorsFactory,
    callbacks: LifecycleCallbackRegistry,
});

impl PreProcessorExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_and_merge(&self, resources: &[Resource]) -> Result<String, ResourceError> {
        let locators = self.locators.get()?;
        let pre_processors = self.processors.get()?.pre_processors();
        let callbacks = self.callbacks.get()?;

        let mut merged = Vec::with_capacity(resources.len());
        for resource in resources {
            let bytes = locators.locate(&resource.uri)?;
            let mut content = String::from_utf8_lossy(&bytes).into_owned();

            callbacks.on_before_pre_process(&resource.uri);
            for processor in &pre_processors {
                content = processor.process(&resource.uri, &content)?;
            }
            callbacks.on_after_pre_process(&resource.uri);
            merged.push(content);
        }

        callbacks.on_before_merge();
        let merged = merged.join("\n");
        callbacks.on_after_merge();
        Ok(merged)
    }

    pub fn is_injected(&self) -> bool {
        self.locators.is_set() && self.processors.is_set() && self.callbacks.is_set()
    }
}

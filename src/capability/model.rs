//! The resource model and the factories producing it.

use std::sync::Arc;

use serde::Serialize;

use super::{ResourceError, ResourceType};
use crate::injector::InjectionTarget;
use crate::proxy::Proxy;

/// A single resource belonging to a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub uri: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub minimize: bool,
}

impl Resource {
    pub fn new(uri: impl Into<String>, kind: ResourceType) -> Self {
        Self {
            uri: uri.into(),
            kind,
            minimize: true,
        }
    }
}

/// Named set of resources served together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub name: String,
    pub resources: Vec<Resource>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: Vec::new(),
        }
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }
}

/// All groups known to the optimizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Model {
    pub groups: Vec<Group>,
}

impl Model {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }
}

/// Builds the model.
pub trait ModelFactory: Send + Sync {
    fn create(&self) -> Result<Model, ResourceError>;

    /// Releases anything held by the factory; a later `create` rebuilds it.
    fn destroy(&self) {}

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        None
    }
}

impl ModelFactory for Proxy<dyn ModelFactory> {
    fn create(&self) -> Result<Model, ResourceError> {
        self.delegate().create()
    }

    fn destroy(&self) {
        self.delegate().destroy()
    }

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        self.delegate().as_target()
    }
}

crate::forwarding!(ModelFactory);

/// Rewrites a freshly created model.
pub trait ModelTransformer: Send + Sync {
    fn transform(&self, model: Model) -> Result<Model, ResourceError>;
}

impl<F> ModelTransformer for F
where
    F: Fn(Model) -> Result<Model, ResourceError> + Send + Sync,
{
    fn transform(&self, model: Model) -> Result<Model, ResourceError> {
        self(model)
    }
}

/// Factory returning a copy of a fixed model.
pub struct StaticModelFactory {
    model: Model,
}

impl StaticModelFactory {
    pub fn new(model: Model) -> Self {
        Self { model }
    }

    pub fn shared(model: Model) -> Arc<dyn ModelFactory> {
        Arc::new(Self::new(model))
    }
}

impl ModelFactory for StaticModelFactory {
    fn create(&self) -> Result<Model, ResourceError> {
        Ok(self.model.clone())
    }
}

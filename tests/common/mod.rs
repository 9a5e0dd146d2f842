//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use wro_di::{
    BoxError, Group, Manager, ManagerFactory, Model, ModelFactory, Resource, ResourceType,
    StaticModelFactory,
};

/// Manager factory counting how many managers it created.
#[derive(Clone, Default)]
pub struct CountingFactory {
    pub created: Arc<AtomicUsize>,
}

impl CountingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl ManagerFactory for CountingFactory {
    fn create(&self) -> Result<Manager, BoxError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Manager::new(model_factory()))
    }
}

pub fn sample_model() -> Model {
    Model::new(vec![
        Group::new("core")
            .with_resource(Resource::new("/js/core.js", ResourceType::Js))
            .with_resource(Resource::new("/css/core.css", ResourceType::Css)),
        Group::new("admin").with_resource(Resource::new("/js/admin.js", ResourceType::Js)),
    ])
}

pub fn model_factory() -> Arc<dyn ModelFactory> {
    StaticModelFactory::shared(sample_model())
}

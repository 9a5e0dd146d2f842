//! Request handlers resolved through the injector.

use crate::capability::{ModelFactory, ResourceError};
use crate::config::ReadOnlyContext;
use crate::injector::Slot;

/// Response produced by a [`RequestHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Response {
    pub fn ok(content_type: &'static str, body: String) -> Self {
        Self {
            status: 200,
            content_type,
            body,
        }
    }
}

/// Handles requests whose path it accepts.
pub trait RequestHandler: Send + Sync {
    fn accept(&self, path: &str) -> bool;

    fn handle(&self) -> Result<Response, ResourceError>;

    /// Disabled handlers must not be asked to handle anything.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Serves the current model as JSON under `.../wroAPI/model`.
///
/// Only enabled in debug mode. Must be injected before use:
///
/// ```rust
/// use wro_di::{BoxError, Group, InjectorBuilder, Manager, Model, ModelAsJsonHandler,
///     RequestHandler, StaticModelFactory};
///
/// let model = Model::new(vec![Group::new("core")]);
/// let injector = InjectorBuilder::new(move || -> Result<Manager, BoxError> {
///     Ok(Manager::new(StaticModelFactory::shared(model.clone())))
/// })
/// .build();
///
/// let handler = ModelAsJsonHandler::new();
/// injector.inject(&handler).unwrap();
/// assert!(handler.accept("/app/wroAPI/model"));
/// assert!(handler.handle().unwrap().body.contains("core"));
/// ```
#[derive(Debug, Default)]
pub struct ModelAsJsonHandler {
    context: Slot<dyn ReadOnlyContext>,
    model_factory: Slot<dyn ModelFactory>,
}

crate::injection_target!(ModelAsJsonHandler {
    context: dyn ReadOnlyContext,
    model_factory: dyn ModelFactory,
});

impl ModelAsJsonHandler {
    pub const PATH: &'static str = "wroAPI/model";

    pub fn new() -> Self {
        Self::default()
    }
}

impl RequestHandler for ModelAsJsonHandler {
    fn accept(&self, path: &str) -> bool {
        path.split(['?', '#'])
            .next()
            .is_some_and(|p| p.ends_with(Self::PATH))
    }

    fn handle(&self) -> Result<Response, ResourceError> {
        let model = self.model_factory.get()?.create()?;
        let body = serde_json::to_string(&model)
            .map_err(|e| ResourceError::Processing(e.to_string()))?;
        tracing::debug!(groups = model.groups.len(), "serving model as JSON");
        Ok(Response::ok("application/json", body))
    }

    fn is_enabled(&self) -> bool {
        self.context
            .try_get()
            .is_some_and(|context| context.config().debug)
    }
}

//! Request stages and their composition.
//!
//! A [`Stage`] looks at a request and either lets it through (`Ok(())`) or
//! stops it with an [`ApiError`]. A [`Pipeline`] runs stages in the order they
//! were added and stops at the first error, so nothing after a failing stage
//! runs — not the remaining stages, not the handler. The error goes straight
//! to the error responder.
//!
//! The router owns one global pipeline, run before route lookup, and one
//! pipeline per route, run between lookup and the handler:
//!
//! ```text
//! request ─▶ global (Logger) ─▶ lookup ─▶ route (ApiKey?, ValidateProduct?) ─▶ handler
//!                                  │               │                            │
//!                                  └───── Err ─────┴──────────── Err ───────────┴─▶ error responder
//! ```
//!
//! Built-in stages:
//! - [`Logger`] — access log line per request, never fails
//! - [`ApiKey`] — shared-secret check on the `api-key` header
//! - [`ValidateProduct`] — presence/type checks on a product body

use std::sync::Arc;

use crate::error::ApiError;
use crate::request::Request;

mod auth;
mod logger;
mod validate;

pub use auth::{ApiKey, API_KEY_HEADER};
pub use logger::Logger;
pub use validate::ValidateProduct;

/// One step of the request pipeline.
///
/// Stages inspect the request; they never modify it. Any
/// `Fn(&Request) -> Result<(), ApiError>` closure is a stage too.
pub trait Stage: Send + Sync + 'static {
    fn check(&self, req: &Request) -> Result<(), ApiError>;
}

impl<F> Stage for F
where
    F: Fn(&Request) -> Result<(), ApiError> + Send + Sync + 'static,
{
    fn check(&self, req: &Request) -> Result<(), ApiError> {
        self(req)
    }
}

/// An ordered list of stages.
///
/// Cloning is cheap: stages are shared behind `Arc`s, so one `ApiKey` can
/// guard many routes.
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage. Returns `self` for chaining.
    pub fn then(mut self, stage: impl Stage) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Appends an already shared stage.
    pub fn then_shared(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Appends `stage` only when `enabled`.
    pub fn then_if(self, enabled: bool, stage: Arc<dyn Stage>) -> Self {
        if enabled { self.then_shared(stage) } else { self }
    }

    /// Runs every stage in order, stopping at the first error.
    pub fn run(&self, req: &Request) -> Result<(), ApiError> {
        self.stages.iter().try_for_each(|stage| stage.check(req))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn stage(f: impl Fn(&Request) -> Result<(), ApiError> + Send + Sync + 'static) -> impl Stage {
        f
    }

    #[test]
    fn empty_pipeline_passes() {
        assert_eq!(Pipeline::new().run(&Request::new("GET", "/")), Ok(()));
    }

    #[test]
    fn first_error_short_circuits_the_rest() {
        let reached = Arc::new(AtomicUsize::new(0));
        let after = Arc::clone(&reached);

        let pipeline = Pipeline::new()
            .then(stage(|_| Ok(())))
            .then(stage(|_| Err(ApiError::auth("no"))))
            .then(stage(|_| Err(ApiError::validation("never seen"))))
            .then(stage(move |_| {
                after.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }));

        assert_eq!(pipeline.run(&Request::new("GET", "/")), Err(ApiError::auth("no")));
        assert_eq!(reached.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn then_if_skips_disabled_stages() {
        let deny: Arc<dyn Stage> = Arc::new(stage(|_| Err(ApiError::auth("no"))));
        let req = Request::new("GET", "/");
        assert_eq!(Pipeline::new().then_if(false, Arc::clone(&deny)).run(&req), Ok(()));
        assert_eq!(Pipeline::new().then_if(true, deny).run(&req), Err(ApiError::auth("no")));
    }
}

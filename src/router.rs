//! Radix-tree request router with per-route stage pipelines.
//!
//! One tree per HTTP method, O(path-length) lookup. Static segments win over
//! parameters, so `/products/stats` is never read as `/products/{id}` with
//! `id = "stats"`, whatever the registration order. One trailing slash is
//! ignored (`/products/` is `/products`), and `HEAD` is answered by the `GET`
//! route with the body dropped.
//!
//! [`Router::handle`] is the whole request pipeline:
//!
//! 1. global stages (access log) — before lookup, so unmatched requests are logged too
//! 2. lookup — no match is a `NotFoundError`
//! 3. the route's own stages (auth, validation)
//! 4. the handler, in its own task so a panic becomes a 500
//!
//! Any `Err` along the way skips the remaining steps and goes to the error
//! responder.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;
use tracing::error;

use crate::error::ApiError;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{Pipeline, Stage};
use crate::request::Request;
use crate::response::{IntoResponse, Response};

struct Route {
    stages: Pipeline,
    handler: BoxedHandler,
}

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Registration methods return `self` so they chain.
#[derive(Default)]
pub struct Router {
    global: Pipeline,
    routes: HashMap<Method, MatchitRouter<Route>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stage that runs for every request, before route lookup.
    pub fn stage(mut self, stage: impl Stage) -> Self {
        self.global = self.global.then(stage);
        self
    }

    /// Register a handler with no route-specific stages.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves them.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.route(method, path, Pipeline::new(), handler)
    }

    /// Register a handler behind `stages`, which run in order after lookup.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup, so this is a
    /// programming error rather than a runtime condition.
    pub fn route(mut self, method: Method, path: &str, stages: Pipeline, handler: impl Handler) -> Self {
        let route = Route { stages, handler: handler.into_boxed_handler() };
        self.routes
            .entry(method)
            .or_default()
            .insert(path, route)
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    /// Runs one request through the pipeline and always produces a response.
    pub async fn handle(&self, req: Request) -> Response {
        let head = req.method() == Method::Head.as_str();
        let mut resp = self.dispatch(req).await.into_response();
        if head {
            resp.body.clear();
        }
        resp
    }

    async fn dispatch(&self, mut req: Request) -> Result<Response, ApiError> {
        self.global.run(&req)?;

        let (route, params) = self
            .lookup(req.method(), req.path())
            .ok_or_else(|| ApiError::not_found(format!("Route {} {} not found", req.method(), req.path())))?;
        req.set_params(params);
        route.stages.run(&req)?;

        let handler = Arc::clone(&route.handler);
        tokio::spawn(handler.call(req)).await.map_err(|e| {
            error!("handler task failed: {e}");
            ApiError::unclassified(e.to_string())
        })
    }

    fn lookup(&self, method: &str, path: &str) -> Option<(&Route, HashMap<String, String>)> {
        let method: Method = method.parse().ok()?;
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };
        let tree = match (self.routes.get(&method), method) {
            (Some(tree), _) => tree,
            (None, Method::Head) => self.routes.get(&Method::Get)?,
            (None, _) => return None,
        };
        let matched = tree.at(path).ok()?;
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((matched.value, params))
    }
}

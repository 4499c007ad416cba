//! The product routes.
//!
//! | Route | Stages after the access log | Success |
//! |---|---|---|
//! | `GET    /products`        | [auth]             | 200 `{total, page, limit, data}` |
//! | `GET    /products/search` | [auth]             | 200 `[Product]` |
//! | `GET    /products/stats`  | [auth]             | 200 `{category: count}` |
//! | `GET    /products/{id}`   | [auth]             | 200 `Product` |
//! | `POST   /products`        | [auth], validation | 201 `Product` |
//! | `PUT    /products/{id}`   | [auth], validation | 200 `Product` |
//! | `DELETE /products/{id}`   | [auth]             | 204 |
//!
//! `[auth]` is present or not depending on the [`AuthPolicy`] the router was
//! built with. Health probes are never authenticated.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;

use crate::error::ApiError;
use crate::handler::Handler;
use crate::health;
use crate::method::Method;
use crate::middleware::{ApiKey, Logger, Pipeline, Stage, ValidateProduct};
use crate::product::{Product, ProductDraft};
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::router::Router;
use crate::status::Status;
use crate::store::ProductStore;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// Which product routes require the API key.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum AuthPolicy {
    /// No route is authenticated.
    Open,
    /// POST, PUT and DELETE are authenticated; reads are public.
    #[default]
    Writes,
    /// Every product route is authenticated.
    All,
}

impl AuthPolicy {
    pub fn guards(self, method: Method) -> bool {
        match self {
            Self::Open   => false,
            Self::Writes => method.is_write(),
            Self::All    => true,
        }
    }
}

/// Builds the full application router around `store`.
pub fn router(store: Arc<ProductStore>, key: ApiKey, policy: AuthPolicy) -> Router {
    let key: Arc<dyn Stage> = Arc::new(key);
    let stages = |method: Method| Pipeline::new().then_if(policy.guards(method), Arc::clone(&key));

    Router::new()
        .stage(Logger)
        .on(Method::Get, "/healthz", health::liveness)
        .on(Method::Get, "/readyz", with(&store, health::readiness))
        .route(Method::Get, "/products", stages(Method::Get), with(&store, list))
        .route(Method::Get, "/products/search", stages(Method::Get), with(&store, search))
        .route(Method::Get, "/products/stats", stages(Method::Get), with(&store, stats))
        .route(Method::Get, "/products/{id}", stages(Method::Get), with(&store, get))
        .route(Method::Post, "/products", stages(Method::Post).then(ValidateProduct), with(&store, create))
        .route(Method::Put, "/products/{id}", stages(Method::Put).then(ValidateProduct), with(&store, update))
        .route(Method::Delete, "/products/{id}", stages(Method::Delete), with(&store, delete))
}

/// Turns `f(store, req)` into a handler that owns a handle to `store`.
fn with<F, Fut, R>(store: &Arc<ProductStore>, f: F) -> impl Handler + use<F, Fut, R>
where
    F: Fn(Arc<ProductStore>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    let store = Arc::clone(store);
    move |req| f(Arc::clone(&store), req)
}

// ── Handlers ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Listing {
    total: usize,
    page: usize,
    limit: usize,
    data: Vec<Product>,
}

/// Reads the leading digits of a query value, so `2abc` is 2 and `1.5` is 1.
/// Missing, non-numeric, negative and zero values all fall back to `default`.
fn positive(req: &Request, key: &str, default: usize) -> usize {
    req.query(key)
        .and_then(leading_digits)
        .filter(|&n| n > 0)
        .unwrap_or(default)
}

fn leading_digits(value: &str) -> Option<usize> {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value.find(|c: char| !c.is_ascii_digit()).unwrap_or(value.len());
    value[..end].parse().ok()
}

async fn list(store: Arc<ProductStore>, req: Request) -> Json<Listing> {
    let page = positive(&req, "page", DEFAULT_PAGE);
    let limit = positive(&req, "limit", DEFAULT_LIMIT);
    let matching = store.list(req.query("category"));

    let total = matching.len();
    let start = (page - 1).saturating_mul(limit);
    let data = matching.into_iter().skip(start).take(limit).collect();
    Json(Listing { total, page, limit, data })
}

async fn search(store: Arc<ProductStore>, req: Request) -> Json<Vec<Product>> {
    Json(store.search(req.query("q").unwrap_or_default()))
}

async fn stats(store: Arc<ProductStore>, _req: Request) -> Json<BTreeMap<String, usize>> {
    Json(store.statistics())
}

async fn get(store: Arc<ProductStore>, req: Request) -> Result<Json<Product>, ApiError> {
    store.get(id(&req)?).map(Json).ok_or_else(product_not_found)
}

async fn create(store: Arc<ProductStore>, req: Request) -> Result<Response, ApiError> {
    let draft: ProductDraft = req.json()?;
    Ok(Json(store.insert(draft)).with_status(Status::Created))
}

async fn update(store: Arc<ProductStore>, req: Request) -> Result<Json<Product>, ApiError> {
    let draft: ProductDraft = req.json()?;
    store.replace(id(&req)?, draft).map(Json).ok_or_else(product_not_found)
}

async fn delete(store: Arc<ProductStore>, req: Request) -> Result<Status, ApiError> {
    store.remove(id(&req)?).map(|_| Status::NoContent).ok_or_else(product_not_found)
}

fn id(req: &Request) -> Result<&str, ApiError> {
    req.param("id").ok_or_else(|| ApiError::unclassified("route registered without an {id} parameter"))
}

fn product_not_found() -> ApiError {
    ApiError::not_found("Product not found")
}

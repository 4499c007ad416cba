//! Liveness and readiness probes.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can it serve traffic? Failure → pulled from the load balancer. |
//!
//! Both are registered by [`api::router`](crate::api::router) and are never
//! behind the API key.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::request::Request;
use crate::response::Json;
use crate::store::ProductStore;

/// Always `200 {"status":"ok"}`. If the process can answer at all, it is alive.
pub async fn liveness(_req: Request) -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `200 {"status":"ready","products":N}`. The store lives in memory, so being
/// able to read its size is all readiness means here.
pub async fn readiness(store: Arc<ProductStore>, _req: Request) -> Json<Value> {
    Json(json!({ "status": "ready", "products": store.len() }))
}

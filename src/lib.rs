//! # stockroom
//!
//! A small product catalogue served over HTTP from memory: CRUD, search,
//! category filter, pagination and per-category counts.
//!
//! Every request goes through the same pipeline:
//!
//! - an access-log stage, before anything else;
//! - route lookup on a radix tree ([`matchit`]), literal segments first;
//! - the route's own stages: API-key check where the [`AuthPolicy`] asks for
//!   it, body validation on create and update;
//! - the handler, working on an injected [`ProductStore`].
//!
//! Any stage or handler can fail with an [`ApiError`]. The rest of the
//! pipeline is skipped and the error responder writes
//! `{"error": {"message", "type", "status"}}` with the matching status code.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use stockroom::{ApiKey, AuthPolicy, ProductStore, Server, api};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(ProductStore::with_fixtures());
//!     let app = api::router(store, ApiKey::new("secret"), AuthPolicy::Writes);
//!
//!     Server::bind("0.0.0.0:3000".parse().unwrap()).serve(app).await.unwrap();
//! }
//! ```

mod config;
mod error;
mod handler;
mod method;
mod product;
mod request;
mod response;
mod router;
mod server;
mod status;
mod store;

pub mod api;
pub mod health;
pub mod middleware;

pub use api::AuthPolicy;
pub use config::Config;
pub use error::{ApiError, Error};
pub use handler::Handler;
pub use method::Method;
pub use middleware::{ApiKey, Logger, Pipeline, Stage, ValidateProduct};
pub use product::{Product, ProductDraft};
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use store::ProductStore;

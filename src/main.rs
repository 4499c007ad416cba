//! stockroom server binary.
//!
//! Run with:
//!   API_KEY=secret RUST_LOG=info cargo run
//!
//! Try:
//!   curl 'http://localhost:3000/products?page=1&limit=2'
//!   curl 'http://localhost:3000/products/search?q=laptop'
//!   curl http://localhost:3000/products/stats
//!   curl -X POST http://localhost:3000/products \
//!        -H 'api-key: secret' -H 'content-type: application/json' \
//!        -d '{"name":"Kettle","price":25,"category":"kitchen"}'

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use stockroom::{ApiKey, Config, ProductStore, Server, api};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();

    let store = if config.no_seed {
        ProductStore::new()
    } else {
        ProductStore::with_fixtures()
    };
    info!(products = store.len(), auth = ?config.auth_policy, "catalogue ready");

    let app = api::router(Arc::new(store), ApiKey::new(config.api_key), config.auth_policy);

    match Server::bind(config.addr).serve(app).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(addr = %config.addr, "server error: {e}");
            ExitCode::FAILURE
        }
    }
}

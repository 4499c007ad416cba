//! End-to-end: a real listener, raw HTTP/1.1 over TCP.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::Value;
use stockroom::{ApiKey, AuthPolicy, ProductStore, Server, api};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct Running {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    task: JoinHandle<Result<(), stockroom::Error>>,
}

async fn start() -> Running {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = api::router(Arc::new(ProductStore::with_fixtures()), ApiKey::new("k"), AuthPolicy::Writes);

    let (stop, stopped) = oneshot::channel::<()>();
    let task = tokio::spawn(Server::serve_on(listener, app, async {
        let _ = stopped.await;
    }));
    Running { addr, stop, task }
}

/// Sends one request with `connection: close` and returns (status, headers, body).
async fn exchange(addr: SocketAddr, head: &str, body: &str) -> (u16, String, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let raw = format!(
        "{head}\r\nhost: localhost\r\nconnection: close\r\ncontent-length: {}\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(raw.as_bytes()).await.unwrap();

    let mut buf = String::new();
    stream.read_to_string(&mut buf).await.unwrap();
    let (headers, body) = buf.split_once("\r\n\r\n").unwrap();
    let status = headers.split_whitespace().nth(1).unwrap().parse().unwrap();
    (status, headers.to_ascii_lowercase(), body.to_owned())
}

#[tokio::test]
async fn serves_the_product_api_over_tcp() {
    let server = start().await;

    let (status, headers, body) = exchange(server.addr, "GET /products/stats HTTP/1.1", "").await;
    assert_eq!(status, 200);
    assert!(headers.contains("content-type: application/json"));
    let stats: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(stats["electronics"], 2);
    assert_eq!(stats["kitchen"], 1);

    let (status, _, _) = exchange(
        server.addr,
        "POST /products HTTP/1.1\r\ncontent-type: application/json",
        r#"{"name":"Kettle","price":25}"#,
    )
    .await;
    assert_eq!(status, 401);

    let (status, _, body) = exchange(
        server.addr,
        "POST /products HTTP/1.1\r\napi-key: k\r\ncontent-type: application/json",
        r#"{"name":"Kettle","price":25}"#,
    )
    .await;
    assert_eq!(status, 201);
    let created: Value = serde_json::from_str(&body).unwrap();
    let id = created["id"].as_str().unwrap();

    let (status, _, body) = exchange(server.addr, &format!("DELETE /products/{id} HTTP/1.1\r\napi-key: k"), "").await;
    assert_eq!(status, 204);
    assert!(body.is_empty());

    let (status, _, body) = exchange(server.addr, &format!("GET /products/{id} HTTP/1.1"), "").await;
    assert_eq!(status, 404);
    let err: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(err["error"]["type"], "NotFoundError");

    server.stop.send(()).unwrap();
    server.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn query_strings_reach_the_handlers() {
    let server = start().await;

    let (status, _, body) = exchange(server.addr, "GET /products?category=electronics&limit=1 HTTP/1.1", "").await;
    assert_eq!(status, 200);
    let listing: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(listing["total"], 2);
    assert_eq!(listing["limit"], 1);
    assert_eq!(listing["data"][0]["name"], "Laptop");

    let (_, _, body) = exchange(server.addr, "GET /products/search?q=coffee%20maker HTTP/1.1", "").await;
    let hits: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(hits[0]["name"], "Coffee Maker");

    server.stop.send(()).unwrap();
    server.task.await.unwrap().unwrap();
}

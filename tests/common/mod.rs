//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use photo_gateway::config::GatewayConfig;
use photo_gateway::http::HttpServer;
use photo_gateway::lifecycle::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const SPA_HTML: &str = "<!doctype html><html><body><div id=\"root\"></div></body></html>";
pub const APP_JS: &str = "console.log('app');";
pub const API_KEY: &str = "test-client-id";

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct Recorded {
    /// Request target, path plus query.
    pub target: String,
    pub authorization: Option<String>,
}

pub type Recorder = Arc<Mutex<Vec<Recorded>>>;

/// Start a programmable mock upstream on an ephemeral port.
///
/// The closure receives the request target and returns `(status, body)`.
pub async fn start_upstream<F, Fut>(f: F) -> (SocketAddr, Recorder)
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let recorder: Recorder = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let rec = recorder.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let rec = rec.clone();
                    tokio::spawn(async move {
                        let head = read_head(&mut socket).await;
                        let recorded = parse_head(&head);
                        rec.lock().unwrap().push(recorded.clone());

                        let (status, body) = f(recorded.target).await;
                        let status_text = match status {
                            200 => "200 OK",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, recorder)
}

/// Mock upstream that always answers with the same JSON body.
pub async fn start_fixed_upstream(body: &'static str) -> (SocketAddr, Recorder) {
    start_upstream(move |_| async move { (200, body.to_string()) }).await
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn parse_head(head: &str) -> Recorded {
    let mut lines = head.lines();
    let target = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string();
    let authorization = lines.find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.eq_ignore_ascii_case("authorization")
            .then(|| value.trim().to_string())
    });
    Recorded { target, authorization }
}

/// Create a frontend build directory with an SPA document and one asset.
pub fn asset_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("photo-gateway-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(root.join("static/js")).unwrap();
    std::fs::write(root.join("index.html"), SPA_HTML).unwrap();
    std::fs::write(root.join("static/js/app.js"), APP_JS).unwrap();
    root
}

/// Config pointing at a mock upstream and a fresh asset root.
pub fn gateway_config(upstream: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_url = format!("http://{}/", upstream);
    config.upstream.api_key = API_KEY.to_string();
    config.upstream.timeout_ms = 300;
    config.token.secret = "shhhhh".to_string();
    config.assets.root = asset_root().to_string_lossy().into_owned();
    config
}

/// Start the gateway on an ephemeral port.
pub async fn start_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

// SPDX-License-Identifier: Apache-2.0

//! Shared harness: spins the router up on an ephemeral listener and drives
//! it over a raw TCP stream.

// Each integration binary links this module and uses a different subset.
#![allow(dead_code)]

use lanyard_server::{build_router, AppState, Config, MockGateway};
use lanyard_store::Database;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub struct TestServer {
    pub addr: SocketAddr,
    pub db: Arc<Database>,
    pub gateway: Arc<MockGateway>,
    pub photo_dir: std::path::PathBuf,
    _photo_tmp: TempDir,
}

pub async fn spawn_server() -> TestServer {
    let photo_tmp = tempfile::tempdir().expect("photo tempdir");
    let config = Config {
        token_secret: "test-secret".to_string(),
        photo_dir: photo_tmp.path().to_path_buf(),
        ..Config::default()
    };
    let db = Arc::new(Database::open_in_memory().expect("open store"));
    let gateway = Arc::new(MockGateway::new());
    let state = AppState::new(db.clone(), config, gateway.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    TestServer {
        addr,
        db,
        gateway,
        photo_dir: photo_tmp.path().to_path_buf(),
        _photo_tmp: photo_tmp,
    }
}

pub struct RawResponse {
    pub status: u16,
    pub head: String,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("json body")
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    pub fn header(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}:");
        self.head.lines().find_map(|line| {
            line.to_ascii_lowercase()
                .starts_with(&prefix)
                .then(|| line.split_once(':').map(|(_, v)| v.trim().to_string()))
                .flatten()
        })
    }
}

pub async fn send_raw(
    addr: SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: &[u8],
) -> RawResponse {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut request = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (name, value) in headers {
        request.push_str(&format!("{name}: {value}\r\n"));
    }
    request.push_str(&format!("Content-Length: {}\r\n\r\n", body.len()));
    stream
        .write_all(request.as_bytes())
        .await
        .expect("write request head");
    stream.write_all(body).await.expect("write request body");

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.expect("read response");
    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("http response separator");
    let head = String::from_utf8_lossy(&raw[..split]).to_string();
    let body = raw[split + 4..].to_vec();
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    RawResponse { status, head, body }
}

pub async fn get(addr: SocketAddr, path: &str, token: Option<&str>) -> RawResponse {
    match token {
        Some(token) => {
            let auth = format!("Bearer {token}");
            send_raw(addr, "GET", path, &[("Authorization", auth.as_str())], b"").await
        }
        None => send_raw(addr, "GET", path, &[], b"").await,
    }
}

pub async fn send_json(
    addr: SocketAddr,
    method: &str,
    path: &str,
    token: Option<&str>,
    payload: &Value,
) -> RawResponse {
    let body = serde_json::to_vec(payload).expect("encode payload");
    match token {
        Some(token) => {
            let auth = format!("Bearer {token}");
            send_raw(
                addr,
                method,
                path,
                &[
                    ("Authorization", auth.as_str()),
                    ("Content-Type", "application/json"),
                ],
                &body,
            )
            .await
        }
        None => {
            send_raw(
                addr,
                method,
                path,
                &[("Content-Type", "application/json")],
                &body,
            )
            .await
        }
    }
}

/// Registers a user and logs in, returning the bearer token.
pub async fn register_and_login(addr: SocketAddr, email: &str, role: &str) -> String {
    let register = send_json(
        addr,
        "POST",
        "/api/auth/register",
        None,
        &serde_json::json!({
            "email": email,
            "password": "secret123",
            "name": "Test User",
            "role": role,
        }),
    )
    .await;
    assert_eq!(register.status, 200, "register failed: {}", register.body_text());

    let login = send_json(
        addr,
        "POST",
        "/api/auth/login",
        None,
        &serde_json::json!({"email": email, "password": "secret123"}),
    )
    .await;
    assert_eq!(login.status, 200, "login failed: {}", login.body_text());
    login.json()["access_token"]
        .as_str()
        .expect("access token")
        .to_string()
}

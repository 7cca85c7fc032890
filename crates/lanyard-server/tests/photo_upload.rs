// SPDX-License-Identifier: Apache-2.0

mod support;

use serde_json::json;
use support::{get, register_and_login, send_json, send_raw, spawn_server};

const BOUNDARY: &str = "lanyard-test-boundary";

fn multipart_body(filename: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(
    server: &support::TestServer,
    token: &str,
    user_id: &str,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
) -> support::RawResponse {
    let auth = format!("Bearer {token}");
    let multipart_content_type = format!("multipart/form-data; boundary={BOUNDARY}");
    send_raw(
        server.addr,
        "POST",
        &format!("/api/users/{user_id}/photo"),
        &[
            ("Authorization", auth.as_str()),
            ("Content-Type", multipart_content_type.as_str()),
        ],
        &multipart_body(filename, content_type, bytes),
    )
    .await
}

async fn me_id(server: &support::TestServer, token: &str) -> String {
    let me = get(server.addr, "/api/auth/me", Some(token)).await;
    me.json()["id"].as_str().expect("id").to_string()
}

#[tokio::test]
async fn photo_upload_stores_serves_and_replaces() {
    let server = spawn_server().await;
    let token = register_and_login(server.addr, "admin@demo.com", "Super Admin").await;
    let user_id = me_id(&server, &token).await;

    let uploaded = upload(&server, &token, &user_id, "me.png", "image/png", b"png-bytes").await;
    assert_eq!(uploaded.status, 200, "{}", uploaded.body_text());
    assert_eq!(
        uploaded.json()["photo_url"],
        format!("/api/users/{user_id}/photo")
    );
    assert!(server.photo_dir.join(format!("{user_id}.png")).exists());

    let served = get(
        server.addr,
        &format!("/api/users/{user_id}/photo"),
        Some(&token),
    )
    .await;
    assert_eq!(served.status, 200);
    assert_eq!(served.header("content-type").as_deref(), Some("image/png"));
    assert_eq!(served.body, b"png-bytes");

    // Replacement removes the prior file.
    let replaced = upload(&server, &token, &user_id, "me.jpg", "image/jpeg", b"jpg-bytes").await;
    assert_eq!(replaced.status, 200);
    assert!(!server.photo_dir.join(format!("{user_id}.png")).exists());
    assert!(server.photo_dir.join(format!("{user_id}.jpg")).exists());

    let served = get(
        server.addr,
        &format!("/api/users/{user_id}/photo"),
        Some(&token),
    )
    .await;
    assert_eq!(served.header("content-type").as_deref(), Some("image/jpeg"));
    assert_eq!(served.body, b"jpg-bytes");
}

#[tokio::test]
async fn oversized_upload_is_rejected_after_the_read_with_no_mutation() {
    let server = spawn_server().await;
    let token = register_and_login(server.addr, "admin@demo.com", "Super Admin").await;
    let user_id = me_id(&server, &token).await;

    let oversized = vec![0u8; 5 * 1024 * 1024 + 1];
    let rejected = upload(&server, &token, &user_id, "big.png", "image/png", &oversized).await;
    assert_eq!(rejected.status, 413);
    assert_eq!(rejected.json()["error"]["code"], "payload_too_large");

    // No file written, no record mutated.
    assert!(!server.photo_dir.join(format!("{user_id}.png")).exists());
    let me = get(server.addr, "/api/auth/me", Some(&token)).await;
    assert_eq!(me.json()["photo_url"], json!(null));
}

#[tokio::test]
async fn disallowed_extension_is_rejected() {
    let server = spawn_server().await;
    let token = register_and_login(server.addr, "admin@demo.com", "Super Admin").await;
    let user_id = me_id(&server, &token).await;

    let rejected = upload(
        &server,
        &token,
        &user_id,
        "script.sh",
        "application/x-sh",
        b"#!/bin/sh\n",
    )
    .await;
    assert_eq!(rejected.status, 415);
    assert!(!server.photo_dir.join(format!("{user_id}.sh")).exists());
}

#[tokio::test]
async fn serving_a_missing_photo_is_not_found() {
    let server = spawn_server().await;
    let token = register_and_login(server.addr, "admin@demo.com", "Super Admin").await;
    let user_id = me_id(&server, &token).await;

    let missing = get(
        server.addr,
        &format!("/api/users/{user_id}/photo"),
        Some(&token),
    )
    .await;
    assert_eq!(missing.status, 404);
}

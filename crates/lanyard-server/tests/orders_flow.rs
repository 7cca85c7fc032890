// SPDX-License-Identifier: Apache-2.0

mod support;

use serde_json::json;
use support::{get, register_and_login, send_json, spawn_server};

async fn seed_order(server: &support::TestServer, token: &str) -> String {
    let event = send_json(
        server.addr,
        "POST",
        "/api/events",
        Some(token),
        &json!({
            "name": "Conf 2026",
            "start_date": "2026-09-01T09:00:00Z",
            "end_date": "2026-09-03T18:00:00Z"
        }),
    )
    .await;
    let event_id = event.json()["id"].as_str().expect("id").to_string();
    let company = send_json(
        server.addr,
        "POST",
        "/api/companies",
        Some(token),
        &json!({"name": "Acme"}),
    )
    .await;
    let company_id = company.json()["id"].as_str().expect("id").to_string();
    let contact = send_json(
        server.addr,
        "POST",
        "/api/contacts",
        Some(token),
        &json!({"name": "Jane Doe", "company_id": company_id}),
    )
    .await;
    let contact_id = contact.json()["id"].as_str().expect("id").to_string();

    let order = send_json(
        server.addr,
        "POST",
        "/api/orders",
        Some(token),
        &json!({
            "event_id": event_id,
            "contact_id": contact_id,
            "description": "Conference pass",
            "amount_cents": 12500
        }),
    )
    .await;
    assert_eq!(order.status, 200, "{}", order.body_text());
    let body = order.json();
    assert_eq!(body["status"], "pending");
    assert_eq!(body["currency"], "cad");
    body["id"].as_str().expect("id").to_string()
}

#[tokio::test]
async fn checkout_then_webhook_marks_the_order_paid() {
    let server = spawn_server().await;
    let token = register_and_login(server.addr, "admin@demo.com", "Super Admin").await;
    let order_id = seed_order(&server, &token).await;

    let checkout = send_json(
        server.addr,
        "POST",
        &format!("/api/orders/{order_id}/checkout"),
        Some(&token),
        &json!({}),
    )
    .await;
    assert_eq!(checkout.status, 200);
    let body = checkout.json();
    let session_id = body["session_id"].as_str().expect("session").to_string();
    assert!(body["checkout_url"].as_str().expect("url").contains(&session_id));

    // Still pending until the gateway confirms.
    let order = get(server.addr, &format!("/api/orders/{order_id}"), Some(&token)).await;
    assert_eq!(order.json()["status"], "pending");

    let webhook = send_json(
        server.addr,
        "POST",
        "/api/webhook/stripe",
        None,
        &json!({"type": "checkout.session.completed", "data": {"object": {"id": session_id}}}),
    )
    .await;
    assert_eq!(webhook.status, 200);
    assert_eq!(webhook.json()["received"], true);

    let order = get(server.addr, &format!("/api/orders/{order_id}"), Some(&token)).await;
    assert_eq!(order.json()["status"], "paid");

    // A paid order cannot check out again.
    let again = send_json(
        server.addr,
        "POST",
        &format!("/api/orders/{order_id}/checkout"),
        Some(&token),
        &json!({}),
    )
    .await;
    assert_eq!(again.status, 400);
    assert_eq!(again.json()["error"]["code"], "order_not_pending");
}

#[tokio::test]
async fn webhook_for_an_unknown_session_is_acknowledged_and_ignored() {
    let server = spawn_server().await;
    let webhook = send_json(
        server.addr,
        "POST",
        "/api/webhook/stripe",
        None,
        &json!({"type": "checkout.session.completed", "data": {"object": {"id": "cs_unknown"}}}),
    )
    .await;
    assert_eq!(webhook.status, 200);
    assert_eq!(webhook.json()["received"], true);
}

#[tokio::test]
async fn gateway_failure_surfaces_as_bad_gateway_and_leaves_the_order_pending() {
    let server = spawn_server().await;
    let token = register_and_login(server.addr, "admin@demo.com", "Super Admin").await;
    let order_id = seed_order(&server, &token).await;

    server.gateway.fail_next(true);
    let failed = send_json(
        server.addr,
        "POST",
        &format!("/api/orders/{order_id}/checkout"),
        Some(&token),
        &json!({}),
    )
    .await;
    assert_eq!(failed.status, 502);
    assert_eq!(failed.json()["error"]["code"], "payment_gateway_unavailable");

    server.gateway.fail_next(false);
    let order = get(server.addr, &format!("/api/orders/{order_id}"), Some(&token)).await;
    assert_eq!(order.json()["status"], "pending");
}

#[tokio::test]
async fn order_creation_validates_references_and_amount() {
    let server = spawn_server().await;
    let token = register_and_login(server.addr, "admin@demo.com", "Super Admin").await;

    let bad_event = send_json(
        server.addr,
        "POST",
        "/api/orders",
        Some(&token),
        &json!({"event_id": "ev-missing", "contact_id": "c-missing", "amount_cents": 100}),
    )
    .await;
    assert_eq!(bad_event.status, 404);

    let event = send_json(
        server.addr,
        "POST",
        "/api/events",
        Some(&token),
        &json!({
            "name": "Conf",
            "start_date": "2026-09-01T09:00:00Z",
            "end_date": "2026-09-02T18:00:00Z"
        }),
    )
    .await;
    let event_id = event.json()["id"].as_str().expect("id").to_string();
    let company = send_json(
        server.addr,
        "POST",
        "/api/companies",
        Some(&token),
        &json!({"name": "Acme"}),
    )
    .await;
    let company_id = company.json()["id"].as_str().expect("id").to_string();
    let contact = send_json(
        server.addr,
        "POST",
        "/api/contacts",
        Some(&token),
        &json!({"name": "Jane", "company_id": company_id}),
    )
    .await;
    let contact_id = contact.json()["id"].as_str().expect("id").to_string();

    let zero_amount = send_json(
        server.addr,
        "POST",
        "/api/orders",
        Some(&token),
        &json!({"event_id": event_id, "contact_id": contact_id, "amount_cents": 0}),
    )
    .await;
    assert_eq!(zero_amount.status, 400);
}

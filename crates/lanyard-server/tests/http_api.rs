// SPDX-License-Identifier: Apache-2.0

mod support;

use serde_json::json;
use support::{get, register_and_login, send_json, spawn_server};

#[tokio::test]
async fn login_token_authorizes_me_and_matches_the_user() {
    let server = spawn_server().await;
    let register = send_json(
        server.addr,
        "POST",
        "/api/auth/register",
        None,
        &json!({"email": "admin@demo.com", "password": "admin123", "name": "Admin", "role": "Super Admin"}),
    )
    .await;
    assert_eq!(register.status, 200);
    let registered_id = register.json()["id"].as_str().expect("id").to_string();

    let login = send_json(
        server.addr,
        "POST",
        "/api/auth/login",
        None,
        &json!({"email": "admin@demo.com", "password": "admin123"}),
    )
    .await;
    assert_eq!(login.status, 200);
    let body = login.json();
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().expect("token");

    let me = get(server.addr, "/api/auth/me", Some(token)).await;
    assert_eq!(me.status, 200);
    assert_eq!(me.json()["id"].as_str().expect("id"), registered_id);
    // The hash never appears on the wire.
    assert!(!me.body_text().contains("hashed_password"));
}

#[tokio::test]
async fn bad_credentials_and_bad_tokens_are_unauthorized() {
    let server = spawn_server().await;
    let token = register_and_login(server.addr, "admin@demo.com", "Super Admin").await;

    let wrong_password = send_json(
        server.addr,
        "POST",
        "/api/auth/login",
        None,
        &json!({"email": "admin@demo.com", "password": "wrong"}),
    )
    .await;
    assert_eq!(wrong_password.status, 401);

    let unknown_email = send_json(
        server.addr,
        "POST",
        "/api/auth/login",
        None,
        &json!({"email": "ghost@demo.com", "password": "admin123"}),
    )
    .await;
    assert_eq!(unknown_email.status, 401);

    let missing = get(server.addr, "/api/auth/me", None).await;
    assert_eq!(missing.status, 401);

    let tampered = format!("{token}x");
    let bad = get(server.addr, "/api/auth/me", Some(&tampered)).await;
    assert_eq!(bad.status, 401);
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let server = spawn_server().await;
    register_and_login(server.addr, "admin@demo.com", "Super Admin").await;
    let duplicate = send_json(
        server.addr,
        "POST",
        "/api/auth/register",
        None,
        &json!({"email": "admin@demo.com", "password": "x12345", "name": "Clone"}),
    )
    .await;
    assert_eq!(duplicate.status, 400);
    assert_eq!(duplicate.json()["error"]["code"], "duplicate_email");
}

#[tokio::test]
async fn role_outside_the_allowed_set_is_forbidden() {
    let server = spawn_server().await;
    let staff = register_and_login(server.addr, "staff@demo.com", "Staff").await;
    let admin = register_and_login(server.addr, "admin@demo.com", "Super Admin").await;

    let denied = get(server.addr, "/api/users", Some(&staff)).await;
    assert_eq!(denied.status, 403);

    let allowed = get(server.addr, "/api/users", Some(&admin)).await;
    assert_eq!(allowed.status, 200);

    // Staff may not create users either.
    let denied_create = send_json(
        server.addr,
        "POST",
        "/api/users",
        Some(&staff),
        &json!({"email": "new@demo.com", "password": "x12345", "name": "New"}),
    )
    .await;
    assert_eq!(denied_create.status, 403);
}

#[tokio::test]
async fn user_management_round_trip() {
    let server = spawn_server().await;
    let admin = register_and_login(server.addr, "admin@demo.com", "Super Admin").await;

    let created = send_json(
        server.addr,
        "POST",
        "/api/users",
        Some(&admin),
        &json!({
            "email": "jane@demo.com",
            "password": "secret123",
            "name": "Jane Doe",
            "role": "Staff",
            "department": "Registration",
            "address": {"street": "123 Test St", "city": "Toronto", "province": "Ontario", "postal_code": "M5V 3A8"}
        }),
    )
    .await;
    assert_eq!(created.status, 200);
    let user = created.json();
    let user_id = user["id"].as_str().expect("id").to_string();
    assert_eq!(user["address"]["country"], "Canada");

    // Patch: only supplied fields move.
    let updated = send_json(
        server.addr,
        "PUT",
        &format!("/api/users/{user_id}"),
        Some(&admin),
        &json!({"job_title": "Coordinator", "is_active": false}),
    )
    .await;
    assert_eq!(updated.status, 200);
    let updated = updated.json();
    assert_eq!(updated["job_title"], "Coordinator");
    assert_eq!(updated["is_active"], false);
    assert_eq!(updated["name"], "Jane Doe");
    assert_eq!(updated["department"], "Registration");

    // Disabled accounts cannot log in.
    let login = send_json(
        server.addr,
        "POST",
        "/api/auth/login",
        None,
        &json!({"email": "jane@demo.com", "password": "secret123"}),
    )
    .await;
    assert_eq!(login.status, 401);

    // Sorted listing covers both directions.
    let asc = get(server.addr, "/api/users?sort_by=email&sort_order=asc", Some(&admin)).await;
    assert_eq!(asc.status, 200);
    let emails: Vec<String> = asc
        .json()
        .as_array()
        .expect("array")
        .iter()
        .map(|u| u["email"].as_str().expect("email").to_string())
        .collect();
    assert_eq!(emails, vec!["admin@demo.com", "jane@demo.com"]);

    let departments = get(server.addr, "/api/departments", Some(&admin)).await;
    assert_eq!(departments.status, 200);
    assert_eq!(departments.json(), json!(["Registration"]));

    let deleted = send_json(
        server.addr,
        "DELETE",
        &format!("/api/users/{user_id}"),
        Some(&admin),
        &json!({}),
    )
    .await;
    assert_eq!(deleted.status, 200);

    let gone = send_json(
        server.addr,
        "DELETE",
        &format!("/api/users/{user_id}"),
        Some(&admin),
        &json!({}),
    )
    .await;
    assert_eq!(gone.status, 404);
}

#[tokio::test]
async fn contact_company_lifecycle_keeps_the_counter_consistent() {
    let server = spawn_server().await;
    let token = register_and_login(server.addr, "admin@demo.com", "Super Admin").await;

    let acme = send_json(
        server.addr,
        "POST",
        "/api/companies",
        Some(&token),
        &json!({"name": "Acme", "category": "Technology"}),
    )
    .await;
    assert_eq!(acme.status, 200);
    let acme_id = acme.json()["id"].as_str().expect("id").to_string();
    let globex = send_json(
        server.addr,
        "POST",
        "/api/companies",
        Some(&token),
        &json!({"name": "Globex"}),
    )
    .await;
    let globex_id = globex.json()["id"].as_str().expect("id").to_string();

    // Creating against a missing company writes nothing.
    let orphan = send_json(
        server.addr,
        "POST",
        "/api/contacts",
        Some(&token),
        &json!({"name": "Ghost", "company_id": "co-missing"}),
    )
    .await;
    assert_eq!(orphan.status, 404);
    let contacts = get(server.addr, "/api/contacts", Some(&token)).await;
    assert_eq!(contacts.json().as_array().expect("array").len(), 0);

    let jane = send_json(
        server.addr,
        "POST",
        "/api/contacts",
        Some(&token),
        &json!({"name": "Jane Doe", "email": "jane@acme.com", "company_id": acme_id, "position": "CTO"}),
    )
    .await;
    assert_eq!(jane.status, 200);
    let jane_body = jane.json();
    let jane_id = jane_body["id"].as_str().expect("id").to_string();
    assert_eq!(jane_body["company_name"], "Acme");
    assert!(jane_body["qr_code"]
        .as_str()
        .expect("qr code")
        .starts_with("data:image/png;base64,"));

    let bob = send_json(
        server.addr,
        "POST",
        "/api/contacts",
        Some(&token),
        &json!({"name": "Bob", "company_id": acme_id}),
    )
    .await;
    assert_eq!(bob.status, 200);

    let count_of = |body: serde_json::Value, id: &str| -> i64 {
        body.as_array()
            .expect("array")
            .iter()
            .find(|c| c["id"] == id)
            .expect("company present")["contacts_count"]
            .as_i64()
            .expect("count")
    };
    let listing = get(server.addr, "/api/companies", Some(&token)).await;
    assert_eq!(count_of(listing.json(), &acme_id), 2);

    // Move Jane to Globex: decrement Acme, increment Globex.
    let moved = send_json(
        server.addr,
        "PUT",
        &format!("/api/contacts/{jane_id}"),
        Some(&token),
        &json!({"company_id": globex_id}),
    )
    .await;
    assert_eq!(moved.status, 200);
    assert_eq!(moved.json()["company_name"], "Globex");
    let listing = get(server.addr, "/api/companies", Some(&token)).await;
    let body = listing.json();
    assert_eq!(count_of(body.clone(), &acme_id), 1);
    assert_eq!(count_of(body, &globex_id), 1);

    // Moving to a missing company is a 404 and changes no counts.
    let bad_move = send_json(
        server.addr,
        "PUT",
        &format!("/api/contacts/{jane_id}"),
        Some(&token),
        &json!({"company_id": "co-nope"}),
    )
    .await;
    assert_eq!(bad_move.status, 404);
    let listing = get(server.addr, "/api/companies", Some(&token)).await;
    let body = listing.json();
    assert_eq!(count_of(body.clone(), &acme_id), 1);
    assert_eq!(count_of(body, &globex_id), 1);

    // Deleting a referenced company is refused.
    let refused = send_json(
        server.addr,
        "DELETE",
        &format!("/api/companies/{globex_id}"),
        Some(&token),
        &json!({}),
    )
    .await;
    assert_eq!(refused.status, 400);
    assert_eq!(refused.json()["error"]["code"], "company_has_contacts");

    // Delete the contact, counter follows, then the company can go.
    let deleted = send_json(
        server.addr,
        "DELETE",
        &format!("/api/contacts/{jane_id}"),
        Some(&token),
        &json!({}),
    )
    .await;
    assert_eq!(deleted.status, 200);
    let listing = get(server.addr, "/api/companies", Some(&token)).await;
    assert_eq!(count_of(listing.json(), &globex_id), 0);
    let removed = send_json(
        server.addr,
        "DELETE",
        &format!("/api/companies/{globex_id}"),
        Some(&token),
        &json!({}),
    )
    .await;
    assert_eq!(removed.status, 200);

    // Scoped listing by company.
    let acme_contacts = get(
        server.addr,
        &format!("/api/companies/{acme_id}/contacts"),
        Some(&token),
    )
    .await;
    assert_eq!(acme_contacts.status, 200);
    let names: Vec<String> = acme_contacts
        .json()
        .as_array()
        .expect("array")
        .iter()
        .map(|c| c["name"].as_str().expect("name").to_string())
        .collect();
    assert_eq!(names, vec!["Bob"]);

    let unknown = get(server.addr, "/api/companies/co-missing/contacts", Some(&token)).await;
    assert_eq!(unknown.status, 404);
}

#[tokio::test]
async fn contact_search_filters_by_substring() {
    let server = spawn_server().await;
    let token = register_and_login(server.addr, "admin@demo.com", "Super Admin").await;
    let company = send_json(
        server.addr,
        "POST",
        "/api/companies",
        Some(&token),
        &json!({"name": "Acme"}),
    )
    .await;
    let company_id = company.json()["id"].as_str().expect("id").to_string();
    for (name, position) in [("Jane Doe", "CTO"), ("Bob Smith", "Engineer")] {
        let created = send_json(
            server.addr,
            "POST",
            "/api/contacts",
            Some(&token),
            &json!({"name": name, "company_id": company_id, "position": position}),
        )
        .await;
        assert_eq!(created.status, 200);
    }

    let hits = get(server.addr, "/api/contacts?search=jane", Some(&token)).await;
    assert_eq!(hits.json().as_array().expect("array").len(), 1);
    let hits = get(server.addr, "/api/contacts?search=engineer", Some(&token)).await;
    assert_eq!(hits.json().as_array().expect("array").len(), 1);
    let hits = get(server.addr, "/api/contacts?search=nobody", Some(&token)).await;
    assert_eq!(hits.json().as_array().expect("array").len(), 0);
}

#[tokio::test]
async fn categories_are_ordered_and_role_gated() {
    let server = spawn_server().await;
    let admin = register_and_login(server.addr, "admin@demo.com", "Super Admin").await;
    let staff = register_and_login(server.addr, "staff@demo.com", "Staff").await;

    for (name, order) in [("Technology", 2), ("Aerospace", 1), ("Retail", 3)] {
        let created = send_json(
            server.addr,
            "POST",
            "/api/settings/categories",
            Some(&admin),
            &json!({"category_type": "business_category", "category_name": name, "display_order": order}),
        )
        .await;
        assert_eq!(created.status, 200);
    }
    let denied = send_json(
        server.addr,
        "POST",
        "/api/settings/categories",
        Some(&staff),
        &json!({"category_type": "business_category", "category_name": "Nope"}),
    )
    .await;
    assert_eq!(denied.status, 403);

    let listing = get(
        server.addr,
        "/api/settings/categories?category_type=business_category",
        Some(&admin),
    )
    .await;
    assert_eq!(listing.status, 200);
    let names: Vec<String> = listing
        .json()
        .as_array()
        .expect("array")
        .iter()
        .map(|c| c["category_name"].as_str().expect("name").to_string())
        .collect();
    assert_eq!(names, vec!["Aerospace", "Technology", "Retail"]);

    // Other category types stay partitioned.
    let other = get(
        server.addr,
        "/api/settings/categories?category_type=exhibit_history",
        Some(&admin),
    )
    .await;
    assert_eq!(other.json().as_array().expect("array").len(), 0);
}

#[tokio::test]
async fn stats_reflect_tenant_scoped_totals() {
    let server = spawn_server().await;
    let token = register_and_login(server.addr, "admin@demo.com", "Super Admin").await;
    // A different tenant's data must not leak into the totals.
    register_and_login(server.addr, "other@demo.com", "Super Admin").await;

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
    assert_eq!(contact.status, 200);
    let event = send_json(
        server.addr,
        "POST",
        "/api/events",
        Some(&token),
        &json!({
            "name": "Conf 2026",
            "start_date": "2026-09-01T09:00:00Z",
            "end_date": "2026-09-03T18:00:00Z"
        }),
    )
    .await;
    assert_eq!(event.status, 200);

    let stats = get(server.addr, "/api/stats", Some(&token)).await;
    assert_eq!(stats.status, 200);
    let body = stats.json();
    assert_eq!(body["total_users"], 1);
    assert_eq!(body["total_contacts"], 1);
    assert_eq!(body["total_companies"], 1);
    assert_eq!(body["active_events"], 1);
}

#[tokio::test]
async fn health_metrics_and_request_ids_are_exposed() {
    let server = spawn_server().await;
    let health = get(server.addr, "/healthz", None).await;
    assert_eq!(health.status, 200);
    assert!(health.header("x-request-id").is_some());

    let ready = get(server.addr, "/readyz", None).await;
    assert_eq!(ready.status, 200);

    let metrics = get(server.addr, "/metrics", None).await;
    assert_eq!(metrics.status, 200);
    assert!(metrics.body_text().contains("lanyard_requests_total"));
}

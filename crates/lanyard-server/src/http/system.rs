// SPDX-License-Identifier: Apache-2.0

use crate::auth::authenticate;
use crate::http::{internal, respond};
use crate::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use lanyard_api::{ApiError, StatsResponse};
use lanyard_store::{companies, contacts, events, users};
use serde_json::json;
use std::sync::atomic::Ordering;

pub async fn healthz_handler() -> Response {
    (StatusCode::OK, Json(json!({"status": "ok"}))).into_response()
}

pub async fn readyz_handler(State(state): State<AppState>) -> Response {
    if state.ready.load(Ordering::Relaxed) {
        (StatusCode::OK, Json(json!({"status": "ready"}))).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "not ready"})),
        )
            .into_response()
    }
}

pub async fn stats_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    respond(stats(&state, &headers))
}

fn stats(state: &AppState, headers: &HeaderMap) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    let tenant = ctx.tenant();
    let stats = StatsResponse {
        total_users: users::count(&state.db, tenant).map_err(internal)?,
        total_contacts: contacts::count(&state.db, tenant).map_err(internal)?,
        total_companies: companies::count(&state.db, tenant).map_err(internal)?,
        active_events: events::count_active(&state.db, tenant).map_err(internal)?,
    };
    Ok(Json(stats).into_response())
}

pub async fn departments_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    respond(departments(&state, &headers))
}

fn departments(state: &AppState, headers: &HeaderMap) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    let departments =
        users::distinct_departments(&state.db, ctx.tenant()).map_err(internal)?;
    Ok(Json(departments).into_response())
}

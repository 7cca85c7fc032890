// SPDX-License-Identifier: Apache-2.0

use crate::auth::{authenticate, require_role};
use crate::http::{internal, respond};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lanyard_api::{ApiError, ApiErrorCode, CreateTemplateRequest, MessageResponse};
use lanyard_core::{new_record_id, now_utc};
use lanyard_model::{BadgeTemplate, BadgeTemplatePatch, RecordId, Role};
use lanyard_store::{badge_templates, events};
use std::collections::HashMap;

const MANAGE_ROLES: [Role; 3] = [Role::SuperAdmin, Role::EventManager, Role::ConferenceManager];

fn template_not_found(id: &str) -> ApiError {
    ApiError::not_found(ApiErrorCode::TemplateNotFound, "badge template", id)
}

pub async fn list_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    respond(list(&state, &headers, &query))
}

fn list(
    state: &AppState,
    headers: &HeaderMap,
    query: &HashMap<String, String>,
) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    let event_filter = query
        .get("event_id")
        .filter(|s| !s.is_empty())
        .map(|raw| RecordId::parse(raw))
        .transpose()
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let records = badge_templates::list(&state.db, ctx.tenant(), event_filter.as_ref())
        .map_err(internal)?;
    Ok(Json(records).into_response())
}

pub async fn create_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateTemplateRequest>,
) -> Response {
    respond(create(&state, &headers, request))
}

fn create(
    state: &AppState,
    headers: &HeaderMap,
    request: CreateTemplateRequest,
) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    require_role(&ctx, &MANAGE_ROLES)?;
    let event_id = RecordId::parse(&request.event_id).map_err(|_| {
        ApiError::not_found(ApiErrorCode::EventNotFound, "event", &request.event_id)
    })?;
    events::get(&state.db, ctx.tenant(), &event_id)
        .map_err(internal)?
        .ok_or_else(|| {
            ApiError::not_found(ApiErrorCode::EventNotFound, "event", event_id.as_str())
        })?;

    let id = RecordId::parse(&new_record_id())
        .map_err(|e| ApiError::internal(format!("id generation: {e}")))?;
    let now = now_utc();
    let template = BadgeTemplate {
        id,
        tenant_id: ctx.tenant().clone(),
        event_id,
        name: request.name,
        width: request.width,
        height: request.height,
        elements: request.elements,
        is_default: request.is_default,
        created_at: now,
        updated_at: now,
        created_by: ctx.user_id().clone(),
    };
    template
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;
    badge_templates::insert(&state.db, &template).map_err(internal)?;
    Ok(Json(template).into_response())
}

pub async fn get_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    respond(get(&state, &headers, &id))
}

fn get(state: &AppState, headers: &HeaderMap, id: &str) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    let template_id = RecordId::parse(id).map_err(|_| template_not_found(id))?;
    let template = badge_templates::get(&state.db, ctx.tenant(), &template_id)
        .map_err(internal)?
        .ok_or_else(|| template_not_found(id))?;
    Ok(Json(template).into_response())
}

pub async fn update_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(patch): Json<BadgeTemplatePatch>,
) -> Response {
    respond(update(&state, &headers, &id, patch))
}

fn update(
    state: &AppState,
    headers: &HeaderMap,
    id: &str,
    patch: BadgeTemplatePatch,
) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    require_role(&ctx, &MANAGE_ROLES)?;
    let template_id = RecordId::parse(id).map_err(|_| template_not_found(id))?;
    let mut template = badge_templates::get(&state.db, ctx.tenant(), &template_id)
        .map_err(internal)?
        .ok_or_else(|| template_not_found(id))?;
    patch.apply(&mut template);
    template
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;
    template.updated_at = now_utc();
    badge_templates::update(&state.db, &template).map_err(internal)?;
    Ok(Json(template).into_response())
}

pub async fn delete_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    respond(delete(&state, &headers, &id))
}

fn delete(state: &AppState, headers: &HeaderMap, id: &str) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    require_role(&ctx, &MANAGE_ROLES)?;
    let template_id = RecordId::parse(id).map_err(|_| template_not_found(id))?;
    if !badge_templates::delete(&state.db, ctx.tenant(), &template_id).map_err(internal)? {
        return Err(template_not_found(id));
    }
    Ok(Json(MessageResponse::new("Badge template deleted successfully")).into_response())
}

// SPDX-License-Identifier: Apache-2.0

use crate::auth::{authenticate, require_role};
use crate::http::{internal, respond};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lanyard_api::{ApiError, ApiErrorCode, CreateEventRequest, MessageResponse};
use lanyard_core::{new_record_id, now_utc};
use lanyard_model::{Event, EventPatch, RecordId, Role};
use lanyard_store::events;

const MANAGE_ROLES: [Role; 3] = [Role::SuperAdmin, Role::EventManager, Role::ConferenceManager];

fn event_not_found(id: &str) -> ApiError {
    ApiError::not_found(ApiErrorCode::EventNotFound, "event", id)
}

pub async fn list_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    respond(list(&state, &headers))
}

fn list(state: &AppState, headers: &HeaderMap) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    let records = events::list(&state.db, ctx.tenant()).map_err(internal)?;
    Ok(Json(records).into_response())
}

pub async fn create_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateEventRequest>,
) -> Response {
    respond(create(&state, &headers, request))
}

fn create(
    state: &AppState,
    headers: &HeaderMap,
    request: CreateEventRequest,
) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    require_role(&ctx, &MANAGE_ROLES)?;
    if request.name.trim().is_empty() {
        return Err(ApiError::validation("event name must not be empty"));
    }
    if request.end_date < request.start_date {
        return Err(ApiError::validation("event end date precedes its start"));
    }
    let id = RecordId::parse(&new_record_id())
        .map_err(|e| ApiError::internal(format!("id generation: {e}")))?;
    let now = now_utc();
    let event = Event {
        id,
        tenant_id: ctx.tenant().clone(),
        name: request.name,
        description: request.description,
        venue: request.venue,
        start_date: request.start_date,
        end_date: request.end_date,
        is_active: request.is_active,
        created_at: now,
        updated_at: now,
        created_by: ctx.user_id().clone(),
    };
    events::insert(&state.db, &event).map_err(internal)?;
    Ok(Json(event).into_response())
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
    let event_id = RecordId::parse(id).map_err(|_| event_not_found(id))?;
    let event = events::get(&state.db, ctx.tenant(), &event_id)
        .map_err(internal)?
        .ok_or_else(|| event_not_found(id))?;
    Ok(Json(event).into_response())
}

pub async fn update_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(patch): Json<EventPatch>,
) -> Response {
    respond(update(&state, &headers, &id, patch))
}

fn update(
    state: &AppState,
    headers: &HeaderMap,
    id: &str,
    patch: EventPatch,
) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    require_role(&ctx, &MANAGE_ROLES)?;
    let event_id = RecordId::parse(id).map_err(|_| event_not_found(id))?;
    let mut event = events::get(&state.db, ctx.tenant(), &event_id)
        .map_err(internal)?
        .ok_or_else(|| event_not_found(id))?;
    patch.apply(&mut event);
    if event.end_date < event.start_date {
        return Err(ApiError::validation("event end date precedes its start"));
    }
    event.updated_at = now_utc();
    events::update(&state.db, &event).map_err(internal)?;
    Ok(Json(event).into_response())
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
    let event_id = RecordId::parse(id).map_err(|_| event_not_found(id))?;
    if !events::delete(&state.db, ctx.tenant(), &event_id).map_err(internal)? {
        return Err(event_not_found(id));
    }
    Ok(Json(MessageResponse::new("Event deleted successfully")).into_response())
}

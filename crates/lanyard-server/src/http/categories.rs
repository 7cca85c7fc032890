// SPDX-License-Identifier: Apache-2.0

use crate::auth::{authenticate, require_role};
use crate::http::{internal, respond};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lanyard_api::{ApiError, ApiErrorCode, CreateCategoryRequest, MessageResponse};
use lanyard_core::{new_record_id, now_utc};
use lanyard_model::{Category, CategoryPatch, RecordId, Role};
use lanyard_store::categories;
use std::collections::HashMap;

const MANAGE_ROLES: [Role; 2] = [Role::SuperAdmin, Role::EventManager];

fn category_not_found(id: &str) -> ApiError {
    ApiError::not_found(ApiErrorCode::CategoryNotFound, "category", id)
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
    let category_type = query
        .get("category_type")
        .map(String::as_str)
        .filter(|s| !s.is_empty());
    let records = categories::list(&state.db, ctx.tenant(), category_type).map_err(internal)?;
    Ok(Json(records).into_response())
}

pub async fn create_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateCategoryRequest>,
) -> Response {
    respond(create(&state, &headers, request))
}

fn create(
    state: &AppState,
    headers: &HeaderMap,
    request: CreateCategoryRequest,
) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    require_role(&ctx, &MANAGE_ROLES)?;
    if request.category_type.trim().is_empty() || request.category_name.trim().is_empty() {
        return Err(ApiError::validation(
            "category_type and category_name must not be empty",
        ));
    }
    let id = RecordId::parse(&new_record_id())
        .map_err(|e| ApiError::internal(format!("id generation: {e}")))?;
    let now = now_utc();
    let category = Category {
        id,
        tenant_id: ctx.tenant().clone(),
        category_type: request.category_type,
        category_name: request.category_name,
        display_order: request.display_order,
        is_active: request.is_active,
        created_at: now,
        updated_at: now,
    };
    categories::insert(&state.db, &category).map_err(internal)?;
    Ok(Json(category).into_response())
}

pub async fn update_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(patch): Json<CategoryPatch>,
) -> Response {
    respond(update(&state, &headers, &id, patch))
}

fn update(
    state: &AppState,
    headers: &HeaderMap,
    id: &str,
    patch: CategoryPatch,
) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    require_role(&ctx, &MANAGE_ROLES)?;
    let category_id = RecordId::parse(id).map_err(|_| category_not_found(id))?;
    let mut category = categories::get(&state.db, ctx.tenant(), &category_id)
        .map_err(internal)?
        .ok_or_else(|| category_not_found(id))?;
    patch.apply(&mut category);
    category.updated_at = now_utc();
    categories::update(&state.db, &category).map_err(internal)?;
    Ok(Json(category).into_response())
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
    let category_id = RecordId::parse(id).map_err(|_| category_not_found(id))?;
    if !categories::delete(&state.db, ctx.tenant(), &category_id).map_err(internal)? {
        return Err(category_not_found(id));
    }
    Ok(Json(MessageResponse::new("Category deleted successfully")).into_response())
}

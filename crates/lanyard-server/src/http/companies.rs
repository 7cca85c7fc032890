// SPDX-License-Identifier: Apache-2.0

use crate::auth::authenticate;
use crate::http::{internal, matches_search, respond};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lanyard_api::{ApiError, ApiErrorCode, ContactDto, CreateCompanyRequest, MessageResponse};
use lanyard_core::{new_record_id, now_utc};
use lanyard_model::{Company, CompanyPatch, RecordId};
use lanyard_store::{companies, contacts, StoreErrorCode};
use serde_json::json;
use std::collections::HashMap;

fn company_not_found(id: &str) -> ApiError {
    ApiError::not_found(ApiErrorCode::CompanyNotFound, "company", id)
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
    let mut records = companies::list(&state.db, ctx.tenant()).map_err(internal)?;
    if let Some(search) = query.get("search").map(String::as_str).filter(|s| !s.is_empty()) {
        records.retain(|company| {
            matches_search(
                search,
                &[Some(company.name.as_str()), company.category.as_deref()],
            )
        });
    }
    Ok(Json(records).into_response())
}

pub async fn create_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateCompanyRequest>,
) -> Response {
    respond(create(&state, &headers, request))
}

fn create(
    state: &AppState,
    headers: &HeaderMap,
    request: CreateCompanyRequest,
) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    if request.name.trim().is_empty() {
        return Err(ApiError::validation("company name must not be empty"));
    }
    let id = RecordId::parse(&new_record_id())
        .map_err(|e| ApiError::internal(format!("id generation: {e}")))?;
    let now = now_utc();
    let company = Company {
        id,
        tenant_id: ctx.tenant().clone(),
        name: request.name,
        website: request.website,
        category: request.category,
        description: request.description,
        address: request.address,
        exhibit_history: request.exhibit_history,
        contacts_count: 0,
        created_at: now,
        updated_at: now,
        created_by: ctx.user_id().clone(),
    };
    companies::insert(&state.db, &company).map_err(internal)?;
    Ok(Json(company).into_response())
}

pub async fn update_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(patch): Json<CompanyPatch>,
) -> Response {
    respond(update(&state, &headers, &id, patch))
}

fn update(
    state: &AppState,
    headers: &HeaderMap,
    id: &str,
    patch: CompanyPatch,
) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    let company_id = RecordId::parse(id).map_err(|_| company_not_found(id))?;
    let mut company = companies::get(&state.db, ctx.tenant(), &company_id)
        .map_err(internal)?
        .ok_or_else(|| company_not_found(id))?;
    patch.apply(&mut company);
    company.updated_at = now_utc();
    companies::update(&state.db, &company).map_err(internal)?;
    // Re-read: the store preserves the live counter over the in-memory copy.
    let company = companies::get(&state.db, ctx.tenant(), &company_id)
        .map_err(internal)?
        .ok_or_else(|| company_not_found(id))?;
    Ok(Json(company).into_response())
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
    let company_id = RecordId::parse(id).map_err(|_| company_not_found(id))?;
    companies::delete_checked(&state.db, ctx.tenant(), &company_id).map_err(|e| match e.code {
        StoreErrorCode::Conflict => ApiError::new(
            ApiErrorCode::CompanyHasContacts,
            format!("cannot delete: {}; reassign or delete the contacts first", e.message),
            json!({"id": id}),
        ),
        StoreErrorCode::NotFound => company_not_found(id),
        _ => internal(e),
    })?;
    Ok(Json(MessageResponse::new("Company deleted successfully")).into_response())
}

pub async fn contacts_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    respond(company_contacts(&state, &headers, &id))
}

fn company_contacts(state: &AppState, headers: &HeaderMap, id: &str) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    let company_id = RecordId::parse(id).map_err(|_| company_not_found(id))?;
    let company = companies::get(&state.db, ctx.tenant(), &company_id)
        .map_err(internal)?
        .ok_or_else(|| company_not_found(id))?;
    let records = contacts::list(&state.db, ctx.tenant(), Some(&company_id), None)
        .map_err(internal)?;
    let dtos: Vec<ContactDto> = records
        .into_iter()
        .map(|contact| ContactDto::from_contact(contact, Some(company.name.clone())))
        .collect();
    Ok(Json(dtos).into_response())
}

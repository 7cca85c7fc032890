// SPDX-License-Identifier: Apache-2.0

use crate::auth::authenticate;
use crate::badge::qr;
use crate::http::{internal, matches_search, respond, sort_records};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use lanyard_api::params::{parse_list_params, ListParams, CONTACT_SORT_FIELDS};
use lanyard_api::{ApiError, ApiErrorCode, ContactDto, CreateContactRequest, MessageResponse};
use lanyard_core::{new_record_id, now_utc};
use lanyard_model::{Contact, ContactPatch, RecordId, TenantId};
use lanyard_store::{companies, contacts, StoreError, StoreErrorCode};
use axum::http::HeaderMap;
use std::collections::HashMap;
use tracing::warn;

fn contact_not_found(id: &str) -> ApiError {
    ApiError::not_found(ApiErrorCode::ContactNotFound, "contact", id)
}

fn company_not_found(id: &str) -> ApiError {
    ApiError::new(
        ApiErrorCode::CompanyNotFound,
        "company not found; create the company first",
        serde_json::json!({"id": id}),
    )
}

fn map_counter_error(e: StoreError, company_id: &str) -> ApiError {
    match e.code {
        StoreErrorCode::NotFound => company_not_found(company_id),
        _ => internal(e),
    }
}

fn company_name_of(
    state: &AppState,
    tenant: &TenantId,
    company_id: &RecordId,
) -> Result<Option<String>, ApiError> {
    Ok(companies::get(&state.db, tenant, company_id)
        .map_err(internal)?
        .map(|company| company.name))
}

fn to_dto(state: &AppState, tenant: &TenantId, contact: Contact) -> Result<ContactDto, ApiError> {
    let company_name = company_name_of(state, tenant, &contact.company_id)?;
    Ok(ContactDto::from_contact(contact, company_name))
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
    let params = parse_list_params(query, &CONTACT_SORT_FIELDS)?;
    let company_filter = params
        .company_id
        .as_deref()
        .map(RecordId::parse)
        .transpose()
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let event_filter = params
        .event_id
        .as_deref()
        .map(RecordId::parse)
        .transpose()
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let mut records = contacts::list(
        &state.db,
        ctx.tenant(),
        company_filter.as_ref(),
        event_filter.as_ref(),
    )
    .map_err(internal)?;
    apply_filters(&mut records, &params);

    let mut dtos = Vec::with_capacity(records.len());
    for contact in records {
        dtos.push(to_dto(state, ctx.tenant(), contact)?);
    }
    Ok(Json(dtos).into_response())
}

fn apply_filters(records: &mut Vec<Contact>, params: &ListParams) {
    if let Some(search) = &params.search {
        records.retain(|contact| {
            matches_search(
                search,
                &[
                    Some(contact.name.as_str()),
                    contact.email.as_deref(),
                    contact.position.as_deref(),
                ],
            )
        });
    }
    if let Some(sort_by) = &params.sort_by {
        let field = sort_by.clone();
        sort_records(
            records,
            move |contact| match field.as_str() {
                "email" => contact.email.clone().unwrap_or_default(),
                "created_at" => contact.created_at.to_rfc3339(),
                _ => contact.name.clone(),
            },
            params.sort_order,
        );
    }
}

pub async fn create_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateContactRequest>,
) -> Response {
    respond(create(&state, &headers, request))
}

fn create(
    state: &AppState,
    headers: &HeaderMap,
    request: CreateContactRequest,
) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    if request.name.trim().is_empty() {
        return Err(ApiError::validation("contact name must not be empty"));
    }
    let company_id = RecordId::parse(&request.company_id)
        .map_err(|_| company_not_found(&request.company_id))?;
    let event_id = request
        .event_id
        .as_deref()
        .map(RecordId::parse)
        .transpose()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let id = RecordId::parse(&new_record_id())
        .map_err(|e| ApiError::internal(format!("id generation: {e}")))?;
    // The QR payload is the contact id; scanners resolve it via the public
    // contact endpoint. A generation failure is logged, not fatal.
    let qr_code = match qr::generate_data_url(id.as_str()) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(contact_id = %id, error = %e, "qr generation failed");
            None
        }
    };
    let now = now_utc();
    let contact = Contact {
        id,
        tenant_id: ctx.tenant().clone(),
        name: request.name,
        email: request.email,
        phone: request.phone,
        company_id,
        event_id,
        position: request.position,
        tags: request.tags,
        notes: request.notes,
        photo_url: None,
        qr_code,
        created_at: now,
        updated_at: now,
        created_by: ctx.user_id().clone(),
    };
    contacts::insert_counted(&state.db, &contact)
        .map_err(|e| map_counter_error(e, contact.company_id.as_str()))?;
    let dto = to_dto(state, ctx.tenant(), contact)?;
    Ok(Json(dto).into_response())
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
    let contact_id = RecordId::parse(id).map_err(|_| contact_not_found(id))?;
    let contact = contacts::get(&state.db, ctx.tenant(), &contact_id)
        .map_err(internal)?
        .ok_or_else(|| contact_not_found(id))?;
    let dto = to_dto(state, ctx.tenant(), contact)?;
    Ok(Json(dto).into_response())
}

pub async fn update_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(patch): Json<ContactPatch>,
) -> Response {
    respond(update(&state, &headers, &id, patch))
}

fn update(
    state: &AppState,
    headers: &HeaderMap,
    id: &str,
    patch: ContactPatch,
) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    let contact_id = RecordId::parse(id).map_err(|_| contact_not_found(id))?;
    let mut contact = contacts::get(&state.db, ctx.tenant(), &contact_id)
        .map_err(internal)?
        .ok_or_else(|| contact_not_found(id))?;

    let move_to = patch
        .company_id
        .as_deref()
        .map(RecordId::parse)
        .transpose()
        .map_err(|e| ApiError::validation(e.to_string()))?;
    if let Some(raw_event) = &patch.event_id {
        let event_id =
            RecordId::parse(raw_event).map_err(|e| ApiError::validation(e.to_string()))?;
        contact.event_id = Some(event_id);
    }
    patch.apply(&mut contact);
    contact.updated_at = now_utc();

    let move_target = move_to.clone();
    contacts::update_counted(&state.db, &mut contact, move_to).map_err(|e| {
        match move_target {
            Some(target) => map_counter_error(e, target.as_str()),
            None => internal(e),
        }
    })?;
    let dto = to_dto(state, ctx.tenant(), contact)?;
    Ok(Json(dto).into_response())
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
    let contact_id = RecordId::parse(id).map_err(|_| contact_not_found(id))?;
    contacts::delete_counted(&state.db, ctx.tenant(), &contact_id).map_err(|e| match e.code {
        StoreErrorCode::NotFound => contact_not_found(id),
        _ => internal(e),
    })?;
    Ok(Json(MessageResponse::new("Contact deleted successfully")).into_response())
}

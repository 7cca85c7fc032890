// SPDX-License-Identifier: Apache-2.0

use crate::auth::authenticate;
use crate::badge::render_badge_sheet;
use crate::http::{internal, respond};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use lanyard_api::{ApiError, ApiErrorCode};
use lanyard_model::{BadgeTemplate, RecordId};
use lanyard_store::{badge_templates, companies, contacts};
use std::collections::HashMap;

pub async fn print_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(contact_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    respond(print(&state, &headers, &contact_id, &query))
}

fn resolve_template(
    state: &AppState,
    ctx: &crate::auth::AuthContext,
    contact_event: Option<&RecordId>,
    query: &HashMap<String, String>,
) -> Result<BadgeTemplate, ApiError> {
    if let Some(raw) = query.get("template_id").filter(|v| !v.is_empty()) {
        let template_id = RecordId::parse(raw)
            .map_err(|_| ApiError::not_found(ApiErrorCode::TemplateNotFound, "badge template", raw))?;
        return badge_templates::get(&state.db, ctx.tenant(), &template_id)
            .map_err(internal)?
            .ok_or_else(|| {
                ApiError::not_found(ApiErrorCode::TemplateNotFound, "badge template", raw)
            });
    }
    // No explicit template: the contact's event default.
    let event_id = contact_event.ok_or_else(|| {
        ApiError::validation("contact has no event; pass template_id explicitly")
    })?;
    badge_templates::default_for_event(&state.db, ctx.tenant(), event_id)
        .map_err(internal)?
        .ok_or_else(|| {
            ApiError::not_found(
                ApiErrorCode::TemplateNotFound,
                "badge template",
                event_id.as_str(),
            )
        })
}

fn print(
    state: &AppState,
    headers: &HeaderMap,
    contact_id: &str,
    query: &HashMap<String, String>,
) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    let id = RecordId::parse(contact_id)
        .map_err(|_| ApiError::not_found(ApiErrorCode::ContactNotFound, "contact", contact_id))?;
    let contact = contacts::get(&state.db, ctx.tenant(), &id)
        .map_err(internal)?
        .ok_or_else(|| ApiError::not_found(ApiErrorCode::ContactNotFound, "contact", contact_id))?;

    let template = resolve_template(state, &ctx, contact.event_id.as_ref(), query)?;
    let company_name = companies::get(&state.db, ctx.tenant(), &contact.company_id)
        .map_err(internal)?
        .map(|company| company.name);

    let pdf = render_badge_sheet(&template, &contact, company_name.as_deref())
        .map_err(ApiError::internal)?;
    Ok((
        StatusCode::OK,
        [
            ("content-type", "application/pdf".to_string()),
            (
                "content-disposition",
                format!("inline; filename=\"badge-{}.pdf\"", contact.id.as_str()),
            ),
        ],
        pdf,
    )
        .into_response())
}

// SPDX-License-Identifier: Apache-2.0

pub mod auth;
pub mod badge_templates;
pub mod badges;
pub mod categories;
pub mod companies;
pub mod contacts;
pub mod events;
pub mod orders;
pub mod system;
pub mod users;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lanyard_api::{map_error, ApiError};
use lanyard_api::params::SortOrder;
use lanyard_store::StoreError;
use serde_json::json;

pub(crate) fn api_error_response(err: ApiError) -> Response {
    let status = StatusCode::from_u16(map_error(&err).status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err }))).into_response()
}

pub(crate) fn respond(result: Result<Response, ApiError>) -> Response {
    result.unwrap_or_else(api_error_response)
}

/// Store plumbing failures (I/O, codec) surface as 500s; expected store
/// outcomes are mapped per call site.
pub(crate) fn internal(e: StoreError) -> ApiError {
    ApiError::internal(e.to_string())
}

/// Case-insensitive substring match over a set of optional fields, the
/// `search` parameter contract.
pub(crate) fn matches_search(needle: &str, haystacks: &[Option<&str>]) -> bool {
    let needle = needle.to_lowercase();
    haystacks.iter().any(|field| {
        field.is_some_and(|value| value.to_lowercase().contains(&needle))
    })
}

pub(crate) fn sort_records<T>(items: &mut [T], key: impl Fn(&T) -> String, order: SortOrder) {
    items.sort_by_key(|item| key(item).to_lowercase());
    if order == SortOrder::Desc {
        items.reverse();
    }
}

// SPDX-License-Identifier: Apache-2.0

use crate::auth::{authenticate, hash_password, require_role};
use crate::http::{internal, matches_search, respond, sort_records};
use crate::photos;
use crate::AppState;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use lanyard_api::params::{parse_list_params, ListParams, USER_SORT_FIELDS};
use lanyard_api::{ApiError, ApiErrorCode, CreateUserRequest, MessageResponse, RegisterRequest, UserDto};
use lanyard_core::now_utc;
use lanyard_model::{Email, RecordId, Role, User, UserPatch};
use lanyard_store::{users, StoreErrorCode};
use serde_json::json;
use std::collections::HashMap;

const LIST_ROLES: [Role; 2] = [Role::SuperAdmin, Role::EventManager];
const MANAGE_ROLES: [Role; 1] = [Role::SuperAdmin];

fn user_not_found(id: &str) -> ApiError {
    ApiError::not_found(ApiErrorCode::UserNotFound, "user", id)
}

fn apply_filters(users: &mut Vec<User>, params: &ListParams) {
    if let Some(search) = &params.search {
        users.retain(|user| {
            matches_search(
                search,
                &[
                    Some(user.name.as_str()),
                    Some(user.email.as_str()),
                    user.job_title.as_deref(),
                ],
            )
        });
    }
    if let Some(role) = &params.role {
        users.retain(|user| user.role.as_str() == role);
    }
    if let Some(department) = &params.department {
        users.retain(|user| user.department.as_deref() == Some(department.as_str()));
    }
    if let Some(sort_by) = &params.sort_by {
        let field = sort_by.clone();
        sort_records(
            users,
            move |user| match field.as_str() {
                "email" => user.email.as_str().to_string(),
                "role" => user.role.as_str().to_string(),
                "created_at" => user.created_at.to_rfc3339(),
                _ => user.name.clone(),
            },
            params.sort_order,
        );
    }
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
    require_role(&ctx, &LIST_ROLES)?;
    let params = parse_list_params(query, &USER_SORT_FIELDS)?;
    let mut records = users::list(&state.db, ctx.tenant()).map_err(internal)?;
    apply_filters(&mut records, &params);
    let dtos: Vec<UserDto> = records.into_iter().map(UserDto::from).collect();
    Ok(Json(dtos).into_response())
}

pub async fn create_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateUserRequest>,
) -> Response {
    respond(create(&state, &headers, request))
}

fn create(
    state: &AppState,
    headers: &HeaderMap,
    request: CreateUserRequest,
) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    require_role(&ctx, &MANAGE_ROLES)?;
    let email = Email::parse(&request.email).map_err(|e| ApiError::validation(e.to_string()))?;
    if request.password.is_empty() {
        return Err(ApiError::validation("password must not be empty"));
    }
    if users::email_taken(&state.db, &email, None).map_err(internal)? {
        return Err(ApiError::new(
            ApiErrorCode::DuplicateEmail,
            "email already registered",
            json!({"email": email.as_str()}),
        ));
    }
    let hashed = hash_password(&request.password)?;
    let register = RegisterRequest {
        email: request.email,
        password: String::new(),
        name: request.name,
        role: request.role,
        photo_url: request.photo_url,
        mobile_phone: request.mobile_phone,
        address: request.address,
        job_title: request.job_title,
        department: request.department,
        tags: request.tags,
    };
    // Created users join the creator's tenant.
    let user = super::auth::build_user(
        ctx.tenant().clone(),
        email,
        hashed,
        register,
        request.is_active,
    )?;
    match users::insert(&state.db, &user) {
        Ok(()) => Ok(Json(UserDto::from(user)).into_response()),
        Err(e) if e.code == StoreErrorCode::Duplicate => Err(ApiError::new(
            ApiErrorCode::DuplicateEmail,
            "email already registered",
            json!({}),
        )),
        Err(e) => Err(internal(e)),
    }
}

pub async fn update_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(patch): Json<UserPatch>,
) -> Response {
    respond(update(&state, &headers, &id, patch))
}

fn update(
    state: &AppState,
    headers: &HeaderMap,
    id: &str,
    patch: UserPatch,
) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    require_role(&ctx, &MANAGE_ROLES)?;
    let user_id = RecordId::parse(id).map_err(|_| user_not_found(id))?;
    let mut user = users::get(&state.db, ctx.tenant(), &user_id)
        .map_err(internal)?
        .ok_or_else(|| user_not_found(id))?;

    if let Some(raw_email) = &patch.email {
        let email = Email::parse(raw_email).map_err(|e| ApiError::validation(e.to_string()))?;
        if email != user.email && users::email_taken(&state.db, &email, Some(&user.id)).map_err(internal)? {
            return Err(ApiError::new(
                ApiErrorCode::DuplicateEmail,
                "email already registered",
                json!({"email": email.as_str()}),
            ));
        }
        user.email = email;
    }
    if let Some(password) = &patch.password {
        if password.is_empty() {
            return Err(ApiError::validation("password must not be empty"));
        }
        user.hashed_password = hash_password(password)?;
    }
    patch.apply(&mut user);
    user.updated_at = now_utc();
    users::update(&state.db, &user).map_err(|e| match e.code {
        StoreErrorCode::Duplicate => ApiError::new(
            ApiErrorCode::DuplicateEmail,
            "email already registered",
            json!({}),
        ),
        _ => internal(e),
    })?;
    Ok(Json(UserDto::from(user)).into_response())
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
    let user_id = RecordId::parse(id).map_err(|_| user_not_found(id))?;
    if !users::delete(&state.db, ctx.tenant(), &user_id).map_err(internal)? {
        return Err(user_not_found(id));
    }
    Ok(Json(MessageResponse::new("User deleted successfully")).into_response())
}

pub async fn upload_photo_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    respond(upload_photo(&state, &headers, &id, multipart).await)
}

/// The upload is buffered fully before validation; the size ceiling is
/// checked after the read, and an oversized or disallowed file mutates
/// nothing.
async fn upload_photo(
    state: &AppState,
    headers: &HeaderMap,
    id: &str,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    let user_id = RecordId::parse(id).map_err(|_| user_not_found(id))?;
    let mut user = users::get(&state.db, ctx.tenant(), &user_id)
        .map_err(internal)?
        .ok_or_else(|| user_not_found(id))?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("malformed multipart body: {e}")))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("upload read failed: {e}")))?;
        upload = Some((filename, bytes.to_vec()));
        break;
    }
    let (filename, bytes) =
        upload.ok_or_else(|| ApiError::validation("multipart body carries no file"))?;

    if bytes.len() > state.config.max_upload_bytes {
        return Err(ApiError::new(
            ApiErrorCode::PayloadTooLarge,
            "uploaded file exceeds the size limit",
            json!({"limit_bytes": state.config.max_upload_bytes, "got_bytes": bytes.len()}),
        ));
    }
    let ext = photos::extension_of(&filename)?;
    photos::save_photo(&state.config.photo_dir, user_id.as_str(), &ext, &bytes)?;

    user.photo_url = Some(format!("/api/users/{}/photo", user_id.as_str()));
    user.updated_at = now_utc();
    users::update(&state.db, &user).map_err(internal)?;
    Ok(Json(UserDto::from(user)).into_response())
}

pub async fn serve_photo_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    respond(serve_photo(&state, &headers, &id))
}

fn serve_photo(state: &AppState, headers: &HeaderMap, id: &str) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    let user_id = RecordId::parse(id).map_err(|_| user_not_found(id))?;
    users::get(&state.db, ctx.tenant(), &user_id)
        .map_err(internal)?
        .ok_or_else(|| user_not_found(id))?;
    let (bytes, content_type) = photos::load_photo(&state.config.photo_dir, user_id.as_str())
        .ok_or_else(|| user_not_found(id))?;
    Ok((StatusCode::OK, [("content-type", content_type)], bytes).into_response())
}

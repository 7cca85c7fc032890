// SPDX-License-Identifier: Apache-2.0

use crate::auth::{authenticate, hash_password, verify_password};
use crate::http::{internal, respond};
use crate::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lanyard_api::{ApiError, ApiErrorCode, LoginRequest, LoginResponse, RegisterRequest, UserDto};
use lanyard_core::{new_record_id, now_utc};
use lanyard_model::{Email, RecordId, Role, TenantId, User};
use lanyard_store::{users, StoreErrorCode};
use serde_json::json;

pub(crate) fn build_user(
    tenant_id: TenantId,
    email: Email,
    hashed_password: String,
    request: RegisterRequest,
    is_active: bool,
) -> Result<User, ApiError> {
    let now = now_utc();
    let id = RecordId::parse(&new_record_id())
        .map_err(|e| ApiError::internal(format!("id generation: {e}")))?;
    Ok(User {
        id,
        tenant_id,
        email,
        name: request.name,
        role: request.role.unwrap_or(Role::Staff),
        photo_url: request.photo_url,
        mobile_phone: request.mobile_phone,
        address: request.address,
        job_title: request.job_title,
        department: request.department,
        tags: request.tags,
        is_active,
        hashed_password,
        created_at: now,
        updated_at: now,
    })
}

pub async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Response {
    respond(register(&state, request))
}

/// Open registration: the new user becomes the first member of a fresh
/// tenant.
fn register(state: &AppState, request: RegisterRequest) -> Result<Response, ApiError> {
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
    let tenant_id = TenantId::parse(&new_record_id())
        .map_err(|e| ApiError::internal(format!("tenant id generation: {e}")))?;
    let hashed = hash_password(&request.password)?;
    let user = build_user(tenant_id, email, hashed, request, true)?;
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

pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Response {
    respond(login(&state, request))
}

fn login(state: &AppState, request: LoginRequest) -> Result<Response, ApiError> {
    let invalid = || {
        ApiError::new(
            ApiErrorCode::InvalidCredentials,
            "incorrect email or password",
            json!({}),
        )
    };
    let email = Email::parse(&request.email).map_err(|_| invalid())?;
    let user = users::find_by_email(&state.db, &email)
        .map_err(internal)?
        .ok_or_else(invalid)?;
    if !verify_password(&request.password, &user.hashed_password) {
        return Err(invalid());
    }
    if !user.is_active {
        return Err(ApiError::new(
            ApiErrorCode::AccountDisabled,
            "user account is disabled",
            json!({}),
        ));
    }
    let access_token = state.tokens.issue(&user)?;
    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: UserDto::from(user),
    })
    .into_response())
}

pub async fn me_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    respond(me(&state, &headers))
}

fn me(state: &AppState, headers: &HeaderMap) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    Ok(Json(UserDto::from(ctx.user)).into_response())
}

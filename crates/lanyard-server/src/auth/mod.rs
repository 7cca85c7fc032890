// SPDX-License-Identifier: Apache-2.0

mod password;
mod token;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenSigner};

use crate::AppState;
use axum::http::HeaderMap;
use lanyard_api::ApiError;
use lanyard_model::{RecordId, Role, TenantId, User};
use lanyard_store::users;

/// Authenticated caller: the live user record, re-read on every request so a
/// deleted subject stops authenticating immediately even while its token is
/// unexpired.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: User,
}

impl AuthContext {
    #[must_use]
    pub fn tenant(&self) -> &TenantId {
        &self.user.tenant_id
    }

    #[must_use]
    pub fn user_id(&self) -> &RecordId {
        &self.user.id
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let raw = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("missing authorization header"))?;
    raw.strip_prefix("Bearer ")
        .or_else(|| raw.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthorized("authorization header must be a bearer token"))
}

pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthContext, ApiError> {
    let token = bearer_token(headers)?;
    let claims = state.tokens.verify(token)?;
    let tenant = TenantId::parse(&claims.tenant)
        .map_err(|_| ApiError::unauthorized("invalid token subject"))?;
    let user_id = RecordId::parse(&claims.sub)
        .map_err(|_| ApiError::unauthorized("invalid token subject"))?;
    let user = users::get(&state.db, &tenant, &user_id)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::unauthorized("user not found"))?;
    Ok(AuthContext { user })
}

pub fn require_role(ctx: &AuthContext, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&ctx.user.role) {
        Ok(())
    } else {
        Err(ApiError::forbidden())
    }
}

// SPDX-License-Identifier: Apache-2.0

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use lanyard_api::ApiError;
use lanyard_model::{Role, User};
use serde::{Deserialize, Serialize};

/// Signed token payload: subject id, tenant scope, role snapshot, expiry.
/// Tokens stay valid until `exp` regardless of later account changes; there
/// is no revocation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub tenant: String,
    pub role: Role,
    pub exp: i64,
}

pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_minutes: i64,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_minutes,
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, ApiError> {
        let exp = (Utc::now() + Duration::minutes(self.ttl_minutes)).timestamp();
        let claims = Claims {
            sub: user.id.as_str().to_string(),
            tenant: user.tenant_id.as_str().to_string(),
            role: user.role,
            exp,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::internal(format!("token encoding failed: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => ApiError::unauthorized("token has expired"),
                _ => ApiError::unauthorized("invalid token"),
            })
    }
}

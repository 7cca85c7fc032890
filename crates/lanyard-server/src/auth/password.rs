// SPDX-License-Identifier: Apache-2.0

use lanyard_api::ApiError;

pub fn hash_password(plain: &str) -> Result<String, ApiError> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::internal(format!("password hashing failed: {e}")))
}

/// Verification failure and malformed stored hashes both read as a mismatch;
/// callers report them identically to avoid oracle behaviour.
#[must_use]
pub fn verify_password(plain: &str, hashed: &str) -> bool {
    bcrypt::verify(plain, hashed).unwrap_or(false)
}

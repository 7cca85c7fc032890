// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ApiErrorCode {
    ValidationFailed,
    DuplicateEmail,
    InvalidCredentials,
    AccountDisabled,
    Unauthorized,
    Forbidden,
    UserNotFound,
    ContactNotFound,
    CompanyNotFound,
    CategoryNotFound,
    EventNotFound,
    TemplateNotFound,
    OrderNotFound,
    CompanyHasContacts,
    OrderNotPending,
    PayloadTooLarge,
    UnsupportedMediaType,
    PaymentGatewayUnavailable,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::ValidationFailed, message, json!({}))
    }

    #[must_use]
    pub fn invalid_param(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            format!("invalid parameter: {name}"),
            json!({"parameter": name, "value": value}),
        )
    }

    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Unauthorized, message, json!({}))
    }

    #[must_use]
    pub fn forbidden() -> Self {
        Self::new(
            ApiErrorCode::Forbidden,
            "insufficient permissions",
            json!({}),
        )
    }

    #[must_use]
    pub fn not_found(code: ApiErrorCode, entity: &str, id: &str) -> Self {
        Self::new(code, format!("{entity} not found"), json!({"id": id}))
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Internal, message, json!({}))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_serialize_snake_case() {
        let json = serde_json::to_string(&ApiErrorCode::CompanyHasContacts).expect("serialize");
        assert_eq!(json, "\"company_has_contacts\"");
    }

    #[test]
    fn not_found_carries_the_id() {
        let e = ApiError::not_found(ApiErrorCode::CompanyNotFound, "company", "co-9");
        assert_eq!(e.details["id"], "co-9");
        assert_eq!(e.message, "company not found");
    }
}

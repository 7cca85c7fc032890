// SPDX-License-Identifier: Apache-2.0

use crate::{ApiError, ApiErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiErrorMapping {
    pub status_code: u16,
}

#[must_use]
pub fn map_error(error: &ApiError) -> ApiErrorMapping {
    let status_code = match error.code {
        ApiErrorCode::ValidationFailed
        | ApiErrorCode::DuplicateEmail
        | ApiErrorCode::CompanyHasContacts
        | ApiErrorCode::OrderNotPending => 400,
        ApiErrorCode::InvalidCredentials
        | ApiErrorCode::AccountDisabled
        | ApiErrorCode::Unauthorized => 401,
        ApiErrorCode::Forbidden => 403,
        ApiErrorCode::UserNotFound
        | ApiErrorCode::ContactNotFound
        | ApiErrorCode::CompanyNotFound
        | ApiErrorCode::CategoryNotFound
        | ApiErrorCode::EventNotFound
        | ApiErrorCode::TemplateNotFound
        | ApiErrorCode::OrderNotFound => 404,
        ApiErrorCode::PayloadTooLarge => 413,
        ApiErrorCode::UnsupportedMediaType => 415,
        ApiErrorCode::PaymentGatewayUnavailable => 502,
        _ => 500,
    };

    ApiErrorMapping { status_code }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status_of(code: ApiErrorCode) -> u16 {
        map_error(&ApiError::new(code, "x", json!({}))).status_code
    }

    #[test]
    fn business_rule_violations_are_400() {
        assert_eq!(status_of(ApiErrorCode::DuplicateEmail), 400);
        assert_eq!(status_of(ApiErrorCode::CompanyHasContacts), 400);
        assert_eq!(status_of(ApiErrorCode::ValidationFailed), 400);
    }

    #[test]
    fn credential_failures_are_401_and_role_failures_403() {
        assert_eq!(status_of(ApiErrorCode::InvalidCredentials), 401);
        assert_eq!(status_of(ApiErrorCode::AccountDisabled), 401);
        assert_eq!(status_of(ApiErrorCode::Unauthorized), 401);
        assert_eq!(status_of(ApiErrorCode::Forbidden), 403);
    }

    #[test]
    fn missing_entities_are_404() {
        assert_eq!(status_of(ApiErrorCode::CompanyNotFound), 404);
        assert_eq!(status_of(ApiErrorCode::ContactNotFound), 404);
        assert_eq!(status_of(ApiErrorCode::TemplateNotFound), 404);
    }

    #[test]
    fn upload_and_gateway_failures_map_to_their_statuses() {
        assert_eq!(status_of(ApiErrorCode::PayloadTooLarge), 413);
        assert_eq!(status_of(ApiErrorCode::UnsupportedMediaType), 415);
        assert_eq!(status_of(ApiErrorCode::PaymentGatewayUnavailable), 502);
        assert_eq!(status_of(ApiErrorCode::Internal), 500);
    }
}

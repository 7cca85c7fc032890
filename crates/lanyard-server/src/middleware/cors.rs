// SPDX-License-Identifier: Apache-2.0

use crate::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

fn request_origin(request: &Request<Body>) -> Option<String> {
    request
        .headers()
        .get("origin")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= 256)
        .map(str::to_string)
}

fn origin_allowed(state: &AppState, origin: &str) -> bool {
    state
        .config
        .cors_allowed_origins
        .iter()
        .any(|allowed| allowed == origin || allowed == "*")
}

pub async fn cors_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let origin = request_origin(&request);
    if request.method() == axum::http::Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        if let Some(origin_value) = origin {
            if origin_allowed(&state, &origin_value) {
                if let Ok(v) = HeaderValue::from_str(&origin_value) {
                    response
                        .headers_mut()
                        .insert("access-control-allow-origin", v);
                }
                response.headers_mut().insert(
                    "access-control-allow-methods",
                    HeaderValue::from_static("GET,POST,PUT,DELETE,OPTIONS"),
                );
                response.headers_mut().insert(
                    "access-control-allow-headers",
                    HeaderValue::from_static("authorization,content-type,x-request-id"),
                );
            }
        }
        return response;
    }

    let mut response = next.run(request).await;
    if let Some(origin_value) = origin {
        if origin_allowed(&state, &origin_value) {
            if let Ok(v) = HeaderValue::from_str(&origin_value) {
                response
                    .headers_mut()
                    .insert("access-control-allow-origin", v);
            }
            response
                .headers_mut()
                .insert("vary", HeaderValue::from_static("Origin"));
        }
    }
    response
}

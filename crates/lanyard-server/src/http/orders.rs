// SPDX-License-Identifier: Apache-2.0

use crate::auth::authenticate;
use crate::http::{internal, respond};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lanyard_api::{ApiError, ApiErrorCode, CheckoutResponse, CreateOrderRequest, WebhookEvent};
use lanyard_core::{new_record_id, now_utc};
use lanyard_model::{Order, OrderStatus, PaymentStatus, PaymentTransaction, RecordId};
use lanyard_store::{contacts, events, orders};
use serde_json::json;
use tracing::{info, warn};

fn order_not_found(id: &str) -> ApiError {
    ApiError::not_found(ApiErrorCode::OrderNotFound, "order", id)
}

pub async fn list_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    respond(list(&state, &headers))
}

fn list(state: &AppState, headers: &HeaderMap) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    let records = orders::list(&state.db, ctx.tenant()).map_err(internal)?;
    Ok(Json(records).into_response())
}

pub async fn create_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateOrderRequest>,
) -> Response {
    respond(create(&state, &headers, request))
}

fn create(
    state: &AppState,
    headers: &HeaderMap,
    request: CreateOrderRequest,
) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    let event_id = RecordId::parse(&request.event_id).map_err(|_| {
        ApiError::not_found(ApiErrorCode::EventNotFound, "event", &request.event_id)
    })?;
    events::get(&state.db, ctx.tenant(), &event_id)
        .map_err(internal)?
        .ok_or_else(|| {
            ApiError::not_found(ApiErrorCode::EventNotFound, "event", event_id.as_str())
        })?;
    let contact_id = RecordId::parse(&request.contact_id).map_err(|_| {
        ApiError::not_found(ApiErrorCode::ContactNotFound, "contact", &request.contact_id)
    })?;
    contacts::get(&state.db, ctx.tenant(), &contact_id)
        .map_err(internal)?
        .ok_or_else(|| {
            ApiError::not_found(ApiErrorCode::ContactNotFound, "contact", contact_id.as_str())
        })?;

    let id = RecordId::parse(&new_record_id())
        .map_err(|e| ApiError::internal(format!("id generation: {e}")))?;
    let now = now_utc();
    let order = Order {
        id,
        tenant_id: ctx.tenant().clone(),
        event_id,
        contact_id,
        description: request.description,
        amount_cents: request.amount_cents,
        currency: request.currency.unwrap_or_else(|| "cad".to_string()),
        status: OrderStatus::Pending,
        created_at: now,
        updated_at: now,
        created_by: ctx.user_id().clone(),
    };
    order
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;
    orders::insert(&state.db, &order).map_err(internal)?;
    Ok(Json(order).into_response())
}

pub async fn get_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    respond(get(&state, &headers, &id))
}

fn get(state: &AppState, headers: &HeaderMap, id: &str) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    let order_id = RecordId::parse(id).map_err(|_| order_not_found(id))?;
    let order = orders::get(&state.db, ctx.tenant(), &order_id)
        .map_err(internal)?
        .ok_or_else(|| order_not_found(id))?;
    Ok(Json(order).into_response())
}

pub async fn checkout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    respond(checkout(&state, &headers, &id).await)
}

/// Delegates to the external gateway and records the attempt. The session
/// write happens only after the gateway accepts; a gateway failure leaves
/// the order untouched.
async fn checkout(state: &AppState, headers: &HeaderMap, id: &str) -> Result<Response, ApiError> {
    let ctx = authenticate(state, headers)?;
    let order_id = RecordId::parse(id).map_err(|_| order_not_found(id))?;
    let order = orders::get(&state.db, ctx.tenant(), &order_id)
        .map_err(internal)?
        .ok_or_else(|| order_not_found(id))?;
    if order.status != OrderStatus::Pending {
        return Err(ApiError::new(
            ApiErrorCode::OrderNotPending,
            format!("order is {}, checkout requires pending", order.status.as_str()),
            json!({"id": id}),
        ));
    }

    let session = state
        .gateway
        .create_checkout_session(&order)
        .await
        .map_err(|e| {
            ApiError::new(
                ApiErrorCode::PaymentGatewayUnavailable,
                format!("payment gateway failure: {e}"),
                json!({}),
            )
        })?;

    let payment_id = RecordId::parse(&new_record_id())
        .map_err(|e| ApiError::internal(format!("id generation: {e}")))?;
    let now = now_utc();
    let payment = PaymentTransaction {
        id: payment_id,
        tenant_id: order.tenant_id.clone(),
        order_id: order.id.clone(),
        session_id: session.session_id.clone(),
        amount_cents: order.amount_cents,
        currency: order.currency.clone(),
        status: PaymentStatus::Initiated,
        created_at: now,
        updated_at: now,
    };
    orders::insert_payment(&state.db, &payment).map_err(internal)?;
    info!(order_id = %order.id, session_id = %session.session_id, "checkout session created");
    Ok(Json(CheckoutResponse {
        checkout_url: session.checkout_url,
        session_id: session.session_id,
    })
    .into_response())
}

pub async fn webhook_handler(
    State(state): State<AppState>,
    Json(event): Json<WebhookEvent>,
) -> Response {
    respond(webhook(&state, event))
}

/// Unauthenticated gateway callback. Unknown sessions are acknowledged and
/// ignored, per webhook convention; signature verification is out of scope.
fn webhook(state: &AppState, event: WebhookEvent) -> Result<Response, ApiError> {
    let session_id = event.data.object.id.as_str();
    let Some(mut payment) = orders::payment_by_session(&state.db, session_id).map_err(internal)?
    else {
        warn!(session_id, "webhook for unknown session ignored");
        return Ok(Json(json!({"received": true})).into_response());
    };

    match event.event_type.as_str() {
        "checkout.session.completed" => {
            payment.status = PaymentStatus::Completed;
            payment.updated_at = now_utc();
            orders::update_payment(&state.db, &payment).map_err(internal)?;
            if let Some(mut order) =
                orders::get(&state.db, &payment.tenant_id, &payment.order_id).map_err(internal)?
            {
                order.status = OrderStatus::Paid;
                order.updated_at = now_utc();
                orders::update(&state.db, &order).map_err(internal)?;
            }
            info!(session_id, "payment completed");
        }
        "checkout.session.expired" | "checkout.session.async_payment_failed" => {
            payment.status = PaymentStatus::Failed;
            payment.updated_at = now_utc();
            orders::update_payment(&state.db, &payment).map_err(internal)?;
            info!(session_id, event_type = %event.event_type, "payment failed");
        }
        other => {
            info!(session_id, event_type = other, "webhook event ignored");
        }
    }
    Ok(Json(json!({"received": true})).into_response())
}

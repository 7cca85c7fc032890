// SPDX-License-Identifier: Apache-2.0

//! External payment gateway seam. Checkout delegates to a Stripe-shaped
//! HTTP API; tests and keyless deployments run against the mock.

use async_trait::async_trait;
use lanyard_model::Order;
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError(pub String);

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for GatewayError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub session_id: String,
    pub checkout_url: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    async fn create_checkout_session(&self, order: &Order)
        -> Result<CheckoutSession, GatewayError>;
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: String,
}

pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpGateway {
    #[must_use]
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    async fn create_checkout_session(
        &self,
        order: &Order,
    ) -> Result<CheckoutSession, GatewayError> {
        let url = format!("{}/v1/checkout/sessions", self.base_url);
        let amount = order.amount_cents.to_string();
        let params = [
            ("mode", "payment"),
            ("client_reference_id", order.id.as_str()),
            ("line_items[0][price_data][currency]", order.currency.as_str()),
            ("line_items[0][price_data][unit_amount]", amount.as_str()),
            ("line_items[0][quantity]", "1"),
        ];
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| GatewayError(format!("gateway request failed: {e}")))?;
        if !response.status().is_success() {
            return Err(GatewayError(format!(
                "gateway rejected checkout: {}",
                response.status()
            )));
        }
        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError(format!("gateway response decode failed: {e}")))?;
        Ok(CheckoutSession {
            session_id: session.id,
            checkout_url: session.url,
        })
    }
}

/// Deterministic in-process gateway for tests and keyless deployments.
#[derive(Default)]
pub struct MockGateway {
    seed: AtomicU64,
    fail: std::sync::atomic::AtomicBool,
    pub sessions: Mutex<Vec<String>>,
}

impl MockGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, fail: bool) {
        self.fail.store(fail, Ordering::Relaxed);
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_checkout_session(
        &self,
        order: &Order,
    ) -> Result<CheckoutSession, GatewayError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(GatewayError("mock gateway forced failure".to_string()));
        }
        let n = self.seed.fetch_add(1, Ordering::Relaxed);
        let session_id = format!("cs_mock_{n:08}");
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.push(session_id.clone());
        }
        Ok(CheckoutSession {
            checkout_url: format!("https://checkout.example.com/{session_id}"),
            session_id,
        })
    }
}

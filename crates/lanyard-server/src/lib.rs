#![forbid(unsafe_code)]
//! Lanyard HTTP service: axum front over the sqlite document store, with
//! bearer-token auth, badge PDF rendering, photo uploads, and an external
//! payment gateway client.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;

pub mod auth;
pub mod badge;
pub mod config;
pub mod http;
pub mod middleware;
pub mod payment;
pub mod photos;
pub mod telemetry;

pub use config::{validate_startup_config, Config};
pub use payment::{HttpGateway, MockGateway, PaymentGateway};

use auth::TokenSigner;
use lanyard_store::Database;
use telemetry::RequestMetrics;

pub const CRATE_NAME: &str = "lanyard-server";

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
    pub tokens: Arc<TokenSigner>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub metrics: Arc<RequestMetrics>,
    pub request_id_seed: Arc<AtomicU64>,
    pub ready: Arc<AtomicBool>,
}

impl AppState {
    #[must_use]
    pub fn new(db: Arc<Database>, config: Config, gateway: Arc<dyn PaymentGateway>) -> Self {
        let tokens = Arc::new(TokenSigner::new(
            &config.token_secret,
            config.token_ttl_minutes,
        ));
        Self {
            db,
            config: Arc::new(config),
            tokens,
            gateway,
            metrics: Arc::new(RequestMetrics::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
            ready: Arc::new(AtomicBool::new(true)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    // Transport cap sits well above the application's post-read 5 MB check
    // so oversized uploads are rejected by the handler, not the framework.
    let body_limit = state.config.max_upload_bytes.saturating_mul(3);
    Router::new()
        .route("/healthz", get(http::system::healthz_handler))
        .route("/readyz", get(http::system::readyz_handler))
        .route("/metrics", get(telemetry::metrics_handler))
        .route("/api/auth/register", post(http::auth::register_handler))
        .route("/api/auth/login", post(http::auth::login_handler))
        .route("/api/auth/me", get(http::auth::me_handler))
        .route(
            "/api/users",
            get(http::users::list_handler).post(http::users::create_handler),
        )
        .route(
            "/api/users/:id",
            put(http::users::update_handler).delete(http::users::delete_handler),
        )
        .route(
            "/api/users/:id/photo",
            post(http::users::upload_photo_handler).get(http::users::serve_photo_handler),
        )
        .route(
            "/api/contacts",
            get(http::contacts::list_handler).post(http::contacts::create_handler),
        )
        .route(
            "/api/contacts/:id",
            get(http::contacts::get_handler)
                .put(http::contacts::update_handler)
                .delete(http::contacts::delete_handler),
        )
        .route(
            "/api/companies",
            get(http::companies::list_handler).post(http::companies::create_handler),
        )
        .route(
            "/api/companies/:id",
            put(http::companies::update_handler).delete(http::companies::delete_handler),
        )
        .route(
            "/api/companies/:id/contacts",
            get(http::companies::contacts_handler),
        )
        .route(
            "/api/settings/categories",
            get(http::categories::list_handler).post(http::categories::create_handler),
        )
        .route(
            "/api/settings/categories/:id",
            put(http::categories::update_handler).delete(http::categories::delete_handler),
        )
        .route("/api/departments", get(http::system::departments_handler))
        .route("/api/stats", get(http::system::stats_handler))
        .route(
            "/api/events",
            get(http::events::list_handler).post(http::events::create_handler),
        )
        .route(
            "/api/events/:id",
            get(http::events::get_handler)
                .put(http::events::update_handler)
                .delete(http::events::delete_handler),
        )
        .route(
            "/api/badge-templates",
            get(http::badge_templates::list_handler).post(http::badge_templates::create_handler),
        )
        .route(
            "/api/badge-templates/:id",
            get(http::badge_templates::get_handler)
                .put(http::badge_templates::update_handler)
                .delete(http::badge_templates::delete_handler),
        )
        .route(
            "/api/badges/print/:contact_id",
            get(http::badges::print_handler),
        )
        .route(
            "/api/orders",
            get(http::orders::list_handler).post(http::orders::create_handler),
        )
        .route("/api/orders/:id", get(http::orders::get_handler))
        .route("/api/orders/:id/checkout", post(http::orders::checkout_handler))
        .route("/api/webhook/stripe", post(http::orders::webhook_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::cors::cors_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

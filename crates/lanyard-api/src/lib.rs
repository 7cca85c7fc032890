#![forbid(unsafe_code)]
//! Wire contract for the lanyard HTTP API: error codes and their HTTP
//! mapping, request/response DTOs, and list-parameter parsing.

mod dto;
mod error_mapping;
mod errors;
pub mod params;

pub use dto::{
    CheckoutResponse, ContactDto, CreateCategoryRequest, CreateCompanyRequest,
    CreateContactRequest, CreateEventRequest, CreateOrderRequest, CreateTemplateRequest,
    CreateUserRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    StatsResponse, UserDto, WebhookData, WebhookEvent, WebhookObject,
};
pub use error_mapping::{map_error, ApiErrorMapping};
pub use errors::{ApiError, ApiErrorCode};

pub const CRATE_NAME: &str = "lanyard-api";
pub const API_PREFIX: &str = "/api";

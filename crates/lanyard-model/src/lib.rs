#![forbid(unsafe_code)]
//! Lanyard domain model SSOT: validated identifier newtypes, the closed role
//! enumeration, and the record types persisted by `lanyard-store`.

mod address;
mod badge;
mod category;
mod company;
mod contact;
mod event;
mod ids;
mod order;
mod role;
mod user;

pub use address::Address;
pub use badge::{
    BadgeElement, BadgeTemplate, BadgeTemplatePatch, ElementKind, FontWeight, TextAlign,
};
pub use category::{Category, CategoryPatch};
pub use company::{Company, CompanyPatch};
pub use contact::{Contact, ContactPatch};
pub use event::{Event, EventPatch};
pub use ids::{Email, RecordId, TenantId, ValidationError};
pub use order::{Order, OrderPatch, OrderStatus, PaymentStatus, PaymentTransaction};
pub use role::Role;
pub use user::{User, UserPatch};

pub const CRATE_NAME: &str = "lanyard-model";

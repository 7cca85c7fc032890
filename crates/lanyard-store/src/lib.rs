#![forbid(unsafe_code)]
//! Document store over sqlite. Each collection is a table holding the full
//! record as a JSON `doc` column plus the key columns queries filter on; the
//! contact/company counter pair is maintained inside a single transaction.

mod db;
mod error;

pub mod badge_templates;
pub mod categories;
pub mod companies;
pub mod contacts;
pub mod events;
pub mod orders;
pub mod users;

pub use db::Database;
pub use error::{StoreError, StoreErrorCode};

pub const CRATE_NAME: &str = "lanyard-store";

/// Upper bound applied to every list query, mirroring the original service's
/// fixed page of 1000 documents.
pub const LIST_LIMIT: usize = 1000;

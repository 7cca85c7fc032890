// SPDX-License-Identifier: Apache-2.0

//! Shared helpers used across the lanyard crates: identifier generation and
//! timestamps.

use chrono::{DateTime, Utc};

pub const CRATE_NAME: &str = "lanyard-core";

/// Generates a fresh record identifier (UUIDv4, lowercase hyphenated form).
#[must_use]
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[must_use]
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_ids_are_unique_and_uuid_shaped() {
        let a = new_record_id();
        let b = new_record_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
        assert_eq!(a.matches('-').count(), 4);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_hexdigit() || c == '-'));
    }

    #[test]
    fn now_is_utc_and_monotonic_enough() {
        let a = now_utc();
        let b = now_utc();
        assert!(b >= a);
    }
}

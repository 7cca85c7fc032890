// SPDX-License-Identifier: Apache-2.0

use crate::errors::ApiError;
use std::collections::HashMap;

pub const USER_SORT_FIELDS: [&str; 4] = ["name", "email", "role", "created_at"];
pub const CONTACT_SORT_FIELDS: [&str; 3] = ["name", "email", "created_at"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Asc
    }
}

/// Common list-endpoint query surface: free-text `search`, exact-match
/// filters, and `sort_by`/`sort_order`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    pub search: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub company_id: Option<String>,
    pub event_id: Option<String>,
    pub category_type: Option<String>,
    pub template_id: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

pub fn parse_list_params(
    query: &HashMap<String, String>,
    sort_fields: &[&str],
) -> Result<ListParams, ApiError> {
    let sort_by = match query.get("sort_by") {
        Some(raw) => {
            let field = raw.trim();
            if !sort_fields.contains(&field) {
                return Err(ApiError::invalid_param("sort_by", raw));
            }
            Some(field.to_string())
        }
        None => None,
    };
    let sort_order = match query.get("sort_order").map(String::as_str) {
        None | Some("asc") => SortOrder::Asc,
        Some("desc") => SortOrder::Desc,
        Some(other) => return Err(ApiError::invalid_param("sort_order", other)),
    };

    let non_empty = |name: &str| {
        query
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    Ok(ListParams {
        search: non_empty("search"),
        role: non_empty("role"),
        department: non_empty("department"),
        company_id: non_empty("company_id"),
        event_id: non_empty("event_id"),
        category_type: non_empty("category_type"),
        template_id: non_empty("template_id"),
        sort_by,
        sort_order,
    })
}

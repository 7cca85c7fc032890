use crate::ids::{RecordId, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generic orderable lookup-list entry (business categories, departments,
/// exhibit history tags, ...). `category_type` partitions the lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: RecordId,
    pub tenant_id: TenantId,
    pub category_type: String,
    pub category_name: String,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryPatch {
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub display_order: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl CategoryPatch {
    pub fn apply(&self, category: &mut Category) {
        if let Some(category_name) = &self.category_name {
            category.category_name = category_name.clone();
        }
        if let Some(display_order) = self.display_order {
            category.display_order = display_order;
        }
        if let Some(is_active) = self.is_active {
            category.is_active = is_active;
        }
    }
}

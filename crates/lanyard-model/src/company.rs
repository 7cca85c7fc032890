use crate::address::Address;
use crate::ids::{RecordId, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: RecordId,
    pub tenant_id: TenantId,
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub exhibit_history: Vec<String>,
    /// Denormalized: number of contacts referencing this company. Kept in
    /// sync by the store inside the same transaction as the contact write.
    #[serde(default)]
    pub contacts_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: RecordId,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompanyPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub exhibit_history: Option<Vec<String>>,
}

impl CompanyPatch {
    pub fn apply(&self, company: &mut Company) {
        if let Some(name) = &self.name {
            company.name = name.clone();
        }
        if let Some(website) = &self.website {
            company.website = Some(website.clone());
        }
        if let Some(category) = &self.category {
            company.category = Some(category.clone());
        }
        if let Some(description) = &self.description {
            company.description = Some(description.clone());
        }
        if let Some(address) = &self.address {
            company.address = Some(address.clone());
        }
        if let Some(exhibit_history) = &self.exhibit_history {
            company.exhibit_history = exhibit_history.clone();
        }
    }
}

use crate::address::Address;
use crate::ids::{Email, RecordId, TenantId};
use crate::role::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted user record. `hashed_password` stays inside the store document;
/// the API layer reshapes users into a DTO without it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub tenant_id: TenantId,
    pub email: Email,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub mobile_phone: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// Partial update: only supplied fields overwrite. `password` is consumed by
/// the server (re-hashed) and never applied here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserPatch {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub mobile_phone: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub password: Option<String>,
}

impl UserPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies every supplied field except `email` (validated separately for
    /// the duplicate check) and `password` (re-hashed by the caller).
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(photo_url) = &self.photo_url {
            user.photo_url = Some(photo_url.clone());
        }
        if let Some(mobile_phone) = &self.mobile_phone {
            user.mobile_phone = Some(mobile_phone.clone());
        }
        if let Some(address) = &self.address {
            user.address = Some(address.clone());
        }
        if let Some(job_title) = &self.job_title {
            user.job_title = Some(job_title.clone());
        }
        if let Some(department) = &self.department {
            user.department = Some(department.clone());
        }
        if let Some(tags) = &self.tags {
            user.tags = tags.clone();
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{Email, RecordId, TenantId};

    fn sample_user() -> User {
        User {
            id: RecordId::parse("u-1").expect("id"),
            tenant_id: TenantId::parse("t-1").expect("tenant"),
            email: Email::parse("jane@example.com").expect("email"),
            name: "Jane Doe".to_string(),
            role: Role::Staff,
            photo_url: None,
            mobile_phone: None,
            address: None,
            job_title: Some("Coordinator".to_string()),
            department: None,
            tags: vec![],
            is_active: true,
            hashed_password: "hash".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn patch_overwrites_only_supplied_fields() {
        let mut user = sample_user();
        let patch = UserPatch {
            name: Some("Jane Q. Doe".to_string()),
            is_active: Some(false),
            ..UserPatch::default()
        };
        patch.apply(&mut user);
        assert_eq!(user.name, "Jane Q. Doe");
        assert!(!user.is_active);
        assert_eq!(user.job_title.as_deref(), Some("Coordinator"));
        assert_eq!(user.role, Role::Staff);
    }

    #[test]
    fn patch_never_touches_password_hash() {
        let mut user = sample_user();
        let patch = UserPatch {
            password: Some("hunter2".to_string()),
            ..UserPatch::default()
        };
        patch.apply(&mut user);
        assert_eq!(user.hashed_password, "hash");
    }

    #[test]
    fn empty_patch_detected() {
        assert!(UserPatch::default().is_empty());
        let patch = UserPatch {
            name: Some("x".to_string()),
            ..UserPatch::default()
        };
        assert!(!patch.is_empty());
    }
}

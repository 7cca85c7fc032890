use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

pub const RECORD_ID_MAX_LEN: usize = 64;
pub const EMAIL_MAX_LEN: usize = 254;

/// Opaque record identifier. Generated ids are UUIDv4 strings; parsing only
/// enforces the character set so externally supplied ids fail fast.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ValidationError("record id must not be empty".to_string()));
        }
        if s.len() > RECORD_ID_MAX_LEN {
            return Err(ValidationError(format!(
                "record id exceeds max length {RECORD_ID_MAX_LEN}"
            )));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError(
                "record id must match [A-Za-z0-9_-]+".to_string(),
            ));
        }
        Ok(Self(s.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tenant scope identifier; same character contract as [`RecordId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let id = RecordId::parse(input)
            .map_err(|e| ValidationError(format!("tenant id invalid: {e}")))?;
        Ok(Self(id.into_inner()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TenantId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lowercased, shape-checked email address. Uniqueness is enforced by the
/// store, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim().to_ascii_lowercase();
        if s.is_empty() {
            return Err(ValidationError("email must not be empty".to_string()));
        }
        if s.len() > EMAIL_MAX_LEN {
            return Err(ValidationError(format!(
                "email exceeds max length {EMAIL_MAX_LEN}"
            )));
        }
        let Some((local, domain)) = s.split_once('@') else {
            return Err(ValidationError("email must contain '@'".to_string()));
        };
        if local.is_empty() || domain.is_empty() || !domain.contains('.') {
            return Err(ValidationError(format!("email {s:?} is malformed")));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(ValidationError(
                "email must not contain whitespace".to_string(),
            ));
        }
        Ok(Self(s))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_accepts_uuid_form() {
        let id = RecordId::parse("0d9f2e6a-8f1b-4c3d-9e7a-1b2c3d4e5f60").expect("uuid id");
        assert_eq!(id.as_str(), "0d9f2e6a-8f1b-4c3d-9e7a-1b2c3d4e5f60");
    }

    #[test]
    fn record_id_rejects_empty_and_punctuation() {
        assert!(RecordId::parse("").is_err());
        assert!(RecordId::parse("  ").is_err());
        assert!(RecordId::parse("a/b").is_err());
        assert!(RecordId::parse(&"x".repeat(65)).is_err());
    }

    #[test]
    fn email_is_lowercased_and_shape_checked() {
        let email = Email::parse("Jane.Doe@Example.COM").expect("email");
        assert_eq!(email.as_str(), "jane.doe@example.com");
        assert!(Email::parse("not-an-email").is_err());
        assert!(Email::parse("a@b").is_err());
        assert!(Email::parse("@example.com").is_err());
    }
}

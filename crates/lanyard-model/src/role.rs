use crate::ids::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Closed role enumeration. The wire form keeps the original display strings
/// so existing clients keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Super Admin")]
    SuperAdmin,
    #[serde(rename = "Event Manager")]
    EventManager,
    #[serde(rename = "Conference Manager")]
    ConferenceManager,
    #[serde(rename = "Registration Manager")]
    RegistrationManager,
    #[serde(rename = "Staff")]
    Staff,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::SuperAdmin,
        Role::EventManager,
        Role::ConferenceManager,
        Role::RegistrationManager,
        Role::Staff,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::EventManager => "Event Manager",
            Role::ConferenceManager => "Conference Manager",
            Role::RegistrationManager => "Registration Manager",
            Role::Staff => "Staff",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == trimmed)
            .ok_or_else(|| ValidationError(format!("unknown role: {trimmed}")))
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Staff
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Staff roles carried in access tokens and stored in `users.user_type`.
//!
//! The set is closed: decoding any other string fails, so an unknown role can
//! never slip past the access gate.
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// IT staff. Manages staff accounts.
    #[serde(rename = "IT")]
    Operator,
    /// Nurses. Manage patients and medical records.
    #[serde(rename = "Nurse")]
    Caregiver,
}

#[derive(Debug, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Operator => "IT",
            Role::Caregiver => "Nurse",
        }
    }

    /// Parse the `role` query parameter of the user listing (`it` / `nurse`).
    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "it" => Some(Role::Operator),
            "nurse" => Some(Role::Caregiver),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "IT" => Ok(Role::Operator),
            "Nurse" => Ok(Role::Caregiver),
            _ => Err(UnknownRole(value)),
        }
    }
}

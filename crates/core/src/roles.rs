//! Account roles carried in access-token claims and session rows.

use serde::{Deserialize, Serialize};

/// Role name for adopter accounts (pet owners and prospective adopters).
pub const ROLE_ADOPTER: &str = "adopter";

/// Role name for veterinarian accounts.
pub const ROLE_DOCTOR: &str = "doctor";

/// The two kinds of account. Each lives in its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Adopter,
    Doctor,
}

impl AccountRole {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountRole::Adopter => ROLE_ADOPTER,
            AccountRole::Doctor => ROLE_DOCTOR,
        }
    }

    /// Parse a stored role name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            ROLE_ADOPTER => Some(AccountRole::Adopter),
            ROLE_DOCTOR => Some(AccountRole::Doctor),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Refresh-token session model.

use petpals_core::roles::AccountRole;
use petpals_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `sessions` table.
///
/// Only the SHA-256 hash of the refresh token is stored.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    /// Account role (`"adopter"` or `"doctor"`); selects the account table.
    pub role: String,
    pub account_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Session {
    /// The stored role, or `None` if the column holds an unknown name.
    pub fn account_role(&self) -> Option<AccountRole> {
        AccountRole::parse(&self.role)
    }
}

#[derive(Debug, Clone)]
pub struct CreateSession {
    pub role: String,
    pub account_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn session(role: &str) -> Session {
        Session {
            id: 1,
            role: role.to_string(),
            account_id: 7,
            refresh_token_hash: "hash".to_string(),
            expires_at: Utc::now(),
            revoked_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn stored_role_names_decode() {
        assert_eq!(session("adopter").account_role(), Some(AccountRole::Adopter));
        assert_eq!(session("doctor").account_role(), Some(AccountRole::Doctor));
        assert_eq!(session("admin").account_role(), None);
    }
}

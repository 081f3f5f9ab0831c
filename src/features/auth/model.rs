use serde::{Deserialize, Serialize};

use crate::shared::constants::ROLE_OFFICIAL;

/// Identity extracted from a validated access token.
///
/// Account management lives in an external identity service; the only
/// contract here is the token's claims. `sub` is the stable user id that
/// complaint authorship and support rows reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub sub: String,
    /// Display name claim, when the identity service includes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Check if user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Check if user is an official (may set any complaint status)
    pub fn is_official(&self) -> bool {
        self.has_role(ROLE_OFFICIAL)
    }
}

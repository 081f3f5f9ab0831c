use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;

/// Who filed a complaint or comment.
///
/// Exactly one identity applies: registered users carry the identity
/// service subject id, guests only the display name they typed. Stored as
/// two nullable columns under a CHECK constraint; rows violating it fail
/// to decode instead of producing a half-valid author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Author {
    User { user_id: String },
    Guest { name: String },
}

impl Author {
    /// Resolves the author of a request from the optional bearer identity
    /// and the optional guest name. Exactly one source must be present.
    pub fn resolve(user: Option<&AuthenticatedUser>, guest_name: Option<&str>) -> Result<Self> {
        let guest_name = guest_name.map(str::trim).filter(|n| !n.is_empty());

        match (user, guest_name) {
            (Some(user), None) => Ok(Author::User {
                user_id: user.sub.clone(),
            }),
            (None, Some(name)) => Ok(Author::Guest {
                name: name.to_string(),
            }),
            (Some(_), Some(_)) => Err(AppError::Validation(
                "Authenticated requests must not also carry a guest name".to_string(),
            )),
            (None, None) => Err(AppError::Validation(
                "Either an access token or a guest name is required".to_string(),
            )),
        }
    }

    /// Decodes the two nullable author columns of a row.
    pub fn from_columns(
        user_id: Option<String>,
        guest_name: Option<String>,
    ) -> std::result::Result<Self, String> {
        match (user_id, guest_name) {
            (Some(user_id), None) => Ok(Author::User { user_id }),
            (None, Some(name)) => Ok(Author::Guest { name }),
            (Some(_), Some(_)) => Err("author has both a user id and a guest name".to_string()),
            (None, None) => Err("author has neither a user id nor a guest name".to_string()),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Author::User { user_id } => Some(user_id),
            Author::Guest { .. } => None,
        }
    }

    pub fn guest_name(&self) -> Option<&str> {
        match self {
            Author::User { .. } => None,
            Author::Guest { name } => Some(name),
        }
    }
}

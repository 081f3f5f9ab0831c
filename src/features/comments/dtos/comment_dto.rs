use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::comments::models::Comment;
use crate::features::complaints::models::Author;
use crate::shared::validation::validate_not_blank;

/// Request DTO for creating a comment
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCommentDto {
    pub complaint_id: Uuid,

    #[validate(length(min = 1, max = 2000, message = "Comment must be between 1 and 2000 characters"))]
    pub body: String,

    /// Display name for unauthenticated commenters; must be absent when a token is sent
    #[validate(
        length(
            min = 1,
            max = 100,
            message = "Guest name must be between 1 and 100 characters"
        ),
        custom(function = validate_not_blank, message = "Guest name must not be blank")
    )]
    pub guest_name: Option<String>,
}

/// Query params for listing comments
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListCommentsQuery {
    /// Complaint whose comments to list
    pub complaint_id: Uuid,
}

/// Query params for deleting a comment
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct DeleteCommentQuery {
    /// Name the comment was filed under; required when no token is sent
    pub guest_name: Option<String>,
}

/// Response DTO for comment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponseDto {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub body: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponseDto {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            complaint_id: c.complaint_id,
            body: c.body,
            author: c.author,
            created_at: c.created_at,
        }
    }
}

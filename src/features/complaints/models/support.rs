use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a support (upvote) on a complaint.
///
/// A null supporter id is an anonymous/guest support with no tracked
/// identity. Rows are created once and never mutated; the deletion engine
/// repoints or removes them.
#[derive(Debug, Clone, FromRow)]
pub struct Support {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub supporter_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Support {
    pub fn is_registered(&self) -> bool {
        self.supporter_id.is_some()
    }
}

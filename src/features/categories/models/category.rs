use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for category.
///
/// Complaints of different categories are never grouped together, no
/// matter how close their coordinates are.
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

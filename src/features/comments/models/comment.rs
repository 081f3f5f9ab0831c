use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use crate::features::complaints::models::Author;

/// Database model for comment
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub body: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
}

impl FromRow<'_, PgRow> for Comment {
    fn from_row(row: &PgRow) -> sqlx::Result<Self> {
        let author = Author::from_columns(
            row.try_get("author_user_id")?,
            row.try_get("guest_name")?,
        )
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "author_user_id".to_string(),
            source: e.into(),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            complaint_id: row.try_get("complaint_id")?,
            body: row.try_get("body")?,
            author,
            created_at: row.try_get("created_at")?,
        })
    }
}

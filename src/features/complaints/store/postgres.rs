use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::complaints::geo::BoundingBox;
use crate::features::complaints::models::{
    Author, Complaint, ComplaintFilter, ComplaintStatus, ComplaintSummary, NewComplaint, Support,
};

use super::{ComplaintStore, StoreSession};

/// Column list for complaints queries.
const COMPLAINT_COLUMNS: &str = "id, title, description, category_id, latitude, longitude, \
    address, city, state, photo_url, jurisdiction, status, author_user_id, guest_name, created_at";

/// Column list for complaint_supports queries.
const SUPPORT_COLUMNS: &str = "id, complaint_id, supporter_id, created_at";

/// PostgreSQL-backed store.
///
/// Ids are UUIDv7 generated app-side so id order follows creation order
/// and can break created_at ties deterministically.
pub struct PgComplaintStore {
    pool: PgPool,
}

impl PgComplaintStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ComplaintStore for PgComplaintStore {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at FROM categories ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT id, name, created_at FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get category: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn get_complaint(&self, id: Uuid) -> Result<Option<Complaint>> {
        let query = format!("SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = $1");

        sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get complaint: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn get_summary(&self, id: Uuid) -> Result<Option<ComplaintSummary>> {
        let query = format!(
            "SELECT {COMPLAINT_COLUMNS}, \
                (SELECT COUNT(*) FROM complaint_supports s WHERE s.complaint_id = complaints.id) \
                    AS support_count, \
                (SELECT name FROM categories WHERE categories.id = complaints.category_id) \
                    AS category_name \
             FROM complaints WHERE id = $1"
        );

        sqlx::query_as::<_, ComplaintSummary>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get complaint summary: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list_complaints(
        &self,
        filter: ComplaintFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ComplaintSummary>> {
        let query = format!(
            "SELECT {COMPLAINT_COLUMNS}, \
                (SELECT COUNT(*) FROM complaint_supports s WHERE s.complaint_id = complaints.id) \
                    AS support_count, \
                (SELECT name FROM categories WHERE categories.id = complaints.category_id) \
                    AS category_name \
             FROM complaints \
             WHERE ($1::complaint_status IS NULL OR status = $1) \
               AND ($2::uuid IS NULL OR category_id = $2) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );

        sqlx::query_as::<_, ComplaintSummary>(&query)
            .bind(filter.status)
            .bind(filter.category_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list complaints: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn count_complaints(&self, filter: ComplaintFilter) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM complaints \
             WHERE ($1::complaint_status IS NULL OR status = $1) \
               AND ($2::uuid IS NULL OR category_id = $2)",
        )
        .bind(filter.status)
        .bind(filter.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count complaints: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn update_status(&self, id: Uuid, status: ComplaintStatus) -> Result<()> {
        let result = sqlx::query("UPDATE complaints SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update complaint status: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Complaint {} not found", id)));
        }

        Ok(())
    }

    async fn list_supports_by_supporter(&self, supporter_id: &str) -> Result<Vec<Support>> {
        let query = format!(
            "SELECT {SUPPORT_COLUMNS} FROM complaint_supports \
             WHERE supporter_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );

        sqlx::query_as::<_, Support>(&query)
            .bind(supporter_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list supports: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn get_support(&self, id: Uuid) -> Result<Option<Support>> {
        let query = format!("SELECT {SUPPORT_COLUMNS} FROM complaint_supports WHERE id = $1");

        sqlx::query_as::<_, Support>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get support: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn delete_support(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM complaint_supports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete support: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(())
    }

    async fn count_supports(&self, complaint_id: Uuid) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM complaint_supports WHERE complaint_id = $1",
        )
        .bind(complaint_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count supports: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn begin(&self) -> Result<Box<dyn StoreSession>> {
        let tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(Box::new(PgSession { tx }))
    }
}

struct PgSession {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreSession for PgSession {
    async fn category_exists(&mut self, id: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check category: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn candidates_for_update(
        &mut self,
        category_id: Uuid,
        bbox: BoundingBox,
        exclude_id: Option<Uuid>,
    ) -> Result<Vec<Complaint>> {
        let query = format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints \
             WHERE category_id = $1 \
               AND status IN ('open', 'under_review') \
               AND latitude BETWEEN $2 AND $3 \
               AND longitude BETWEEN $4 AND $5 \
               AND ($6::uuid IS NULL OR id <> $6) \
             ORDER BY created_at DESC, id DESC \
             FOR UPDATE"
        );

        sqlx::query_as::<_, Complaint>(&query)
            .bind(category_id)
            .bind(bbox.min_lat)
            .bind(bbox.max_lat)
            .bind(bbox.min_lon)
            .bind(bbox.max_lon)
            .bind(exclude_id)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load grouping candidates: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn lock_complaint(&mut self, id: Uuid) -> Result<Option<Complaint>> {
        let query = format!("SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = $1 FOR UPDATE");

        sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to lock complaint: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn insert_complaint(&mut self, new: NewComplaint) -> Result<Complaint> {
        let (author_user_id, guest_name) = match &new.author {
            Author::User { user_id } => (Some(user_id.as_str()), None),
            Author::Guest { name } => (None, Some(name.as_str())),
        };

        let query = format!(
            "INSERT INTO complaints \
                (id, title, description, category_id, latitude, longitude, \
                 address, city, state, photo_url, jurisdiction, status, \
                 author_user_id, guest_name) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {COMPLAINT_COLUMNS}"
        );

        sqlx::query_as::<_, Complaint>(&query)
            .bind(Uuid::now_v7())
            .bind(&new.title)
            .bind(&new.description)
            .bind(new.category_id)
            .bind(new.latitude)
            .bind(new.longitude)
            .bind(&new.address)
            .bind(&new.city)
            .bind(&new.state)
            .bind(&new.photo_url)
            .bind(new.jurisdiction)
            .bind(new.status)
            .bind(author_user_id)
            .bind(guest_name)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert complaint: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn delete_complaint(&mut self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM complaints WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete complaint: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(())
    }

    async fn supports_of(&mut self, complaint_id: Uuid) -> Result<Vec<Support>> {
        let query = format!(
            "SELECT {SUPPORT_COLUMNS} FROM complaint_supports \
             WHERE complaint_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );

        sqlx::query_as::<_, Support>(&query)
            .bind(complaint_id)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load supports: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn has_support(&mut self, complaint_id: Uuid, supporter_id: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM complaint_supports \
             WHERE complaint_id = $1 AND supporter_id = $2)",
        )
        .bind(complaint_id)
        .bind(supporter_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check support: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn insert_support(
        &mut self,
        complaint_id: Uuid,
        supporter_id: Option<String>,
    ) -> Result<Support> {
        let query = format!(
            "INSERT INTO complaint_supports (id, complaint_id, supporter_id) \
             VALUES ($1, $2, $3) \
             RETURNING {SUPPORT_COLUMNS}"
        );

        sqlx::query_as::<_, Support>(&query)
            .bind(Uuid::now_v7())
            .bind(complaint_id)
            .bind(supporter_id)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert support: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn move_support(&mut self, support_id: Uuid, to_complaint_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE complaint_supports SET complaint_id = $2 WHERE id = $1")
            .bind(support_id)
            .bind(to_complaint_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to move support: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(())
    }

    async fn delete_support(&mut self, support_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM complaint_supports WHERE id = $1")
            .bind(support_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete support: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(())
    }

    async fn count_supports(&mut self, complaint_id: Uuid) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM complaint_supports WHERE complaint_id = $1",
        )
        .bind(complaint_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count supports: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit transaction: {:?}", e);
            AppError::Database(e)
        })
    }
}

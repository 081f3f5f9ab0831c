use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::comments::models::Comment;
use crate::features::complaints::models::Author;

const COMMENT_COLUMNS: &str = "id, complaint_id, body, author_user_id, guest_name, created_at";

/// Service for comments on complaints
pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Comments of a complaint, oldest first
    pub async fn list_by_complaint(&self, complaint_id: Uuid) -> Result<Vec<Comment>> {
        self.ensure_complaint_exists(complaint_id).await?;

        let query = format!(
            "SELECT {} FROM complaint_comments WHERE complaint_id = $1 ORDER BY created_at ASC, id ASC",
            COMMENT_COLUMNS
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(complaint_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list comments: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Create a comment as a registered user or guest
    pub async fn create(
        &self,
        complaint_id: Uuid,
        body: String,
        author: Author,
    ) -> Result<Comment> {
        self.ensure_complaint_exists(complaint_id).await?;

        let query = format!(
            "INSERT INTO complaint_comments (id, complaint_id, body, author_user_id, guest_name) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            COMMENT_COLUMNS
        );
        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(Uuid::now_v7())
            .bind(complaint_id)
            .bind(&body)
            .bind(author.user_id())
            .bind(author.guest_name())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create comment: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!(comment_id = %comment.id, complaint_id = %complaint_id, "Comment created");

        Ok(comment)
    }

    /// Delete a comment; only its author may do so
    pub async fn delete(&self, comment_id: Uuid, actor: &Author) -> Result<()> {
        let query = format!(
            "SELECT {} FROM complaint_comments WHERE id = $1",
            COMMENT_COLUMNS
        );
        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch comment: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", comment_id)))?;

        if comment.author != *actor {
            return Err(AppError::Forbidden(
                "Only the author can delete a comment".to_string(),
            ));
        }

        sqlx::query("DELETE FROM complaint_comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete comment: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!(comment_id = %comment_id, "Comment deleted");

        Ok(())
    }

    async fn ensure_complaint_exists(&self, complaint_id: Uuid) -> Result<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM complaints WHERE id = $1)")
                .bind(complaint_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to check complaint existence: {:?}", e);
                    AppError::Database(e)
                })?;

        if !exists {
            return Err(AppError::NotFound(format!(
                "Complaint {} not found",
                complaint_id
            )));
        }

        Ok(())
    }
}

use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::complaints::models::{ComplaintFilter, ComplaintStatus, ComplaintSummary};
use crate::features::complaints::store::ComplaintStore;

/// Read and lifecycle operations on complaints
pub struct ComplaintService {
    store: Arc<dyn ComplaintStore>,
}

impl ComplaintService {
    pub fn new(store: Arc<dyn ComplaintStore>) -> Self {
        Self { store }
    }

    /// Newest-first page of complaints plus the total matching count
    pub async fn list(
        &self,
        filter: ComplaintFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ComplaintSummary>, i64)> {
        let total = self.store.count_complaints(filter).await?;
        let complaints = self.store.list_complaints(filter, offset, limit).await?;

        Ok((complaints, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<ComplaintSummary> {
        self.store
            .get_summary(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Complaint {} not found", id)))
    }

    /// Author marks their own complaint as resolved
    pub async fn resolve(&self, id: Uuid, user: &AuthenticatedUser) -> Result<ComplaintSummary> {
        let complaint = self
            .store
            .get_complaint(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Complaint {} not found", id)))?;

        if complaint.author.user_id() != Some(user.sub.as_str()) {
            return Err(AppError::Forbidden(
                "Only the author can resolve a complaint".to_string(),
            ));
        }

        self.store.update_status(id, ComplaintStatus::Resolved).await?;
        tracing::info!(complaint_id = %id, "Complaint resolved by its author");

        self.get(id).await
    }

    /// An official moves a complaint to any status
    pub async fn change_status(
        &self,
        id: Uuid,
        status: ComplaintStatus,
        user: &AuthenticatedUser,
    ) -> Result<ComplaintSummary> {
        if !user.is_official() {
            return Err(AppError::Forbidden(
                "Only officials can change complaint status".to_string(),
            ));
        }

        self.store.update_status(id, status).await?;
        tracing::info!(complaint_id = %id, status = %status, "Complaint status changed");

        self.get(id).await
    }
}

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::complaints::models::{ComplaintStatus, Support};
use crate::features::complaints::store::ComplaintStore;

/// Whether a direct support request changed anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SupportOutcome {
    Added,
    AlreadySupported,
}

/// Result of a direct support request
#[derive(Debug, Clone)]
pub struct SupportResult {
    pub complaint_id: Uuid,
    pub outcome: SupportOutcome,
    pub support_count: i64,
}

/// Direct supports: authenticated users backing an existing complaint
/// without going through submission grouping.
pub struct SupportService {
    store: Arc<dyn ComplaintStore>,
}

impl SupportService {
    pub fn new(store: Arc<dyn ComplaintStore>) -> Self {
        Self { store }
    }

    /// Adds the caller's support to a complaint.
    ///
    /// Supporting a complaint twice is a reported no-op, not an error. The
    /// complaint row stays locked for the duration of the check-then-insert
    /// so a concurrent request for the same pair serializes behind this one.
    pub async fn add(&self, complaint_id: Uuid, user: &AuthenticatedUser) -> Result<SupportResult> {
        let mut session = self.store.begin().await?;

        let complaint = session
            .lock_complaint(complaint_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Complaint {} not found", complaint_id)))?;

        if complaint.status == ComplaintStatus::Resolved {
            return Err(AppError::Validation(
                "Resolved complaints can no longer be supported".to_string(),
            ));
        }

        if session.has_support(complaint_id, &user.sub).await? {
            let support_count = session.count_supports(complaint_id).await?;
            return Ok(SupportResult {
                complaint_id,
                outcome: SupportOutcome::AlreadySupported,
                support_count,
            });
        }

        session
            .insert_support(complaint_id, Some(user.sub.clone()))
            .await?;
        let support_count = session.count_supports(complaint_id).await?;
        session.commit().await?;

        tracing::info!(complaint_id = %complaint_id, "Support added");

        Ok(SupportResult {
            complaint_id,
            outcome: SupportOutcome::Added,
            support_count,
        })
    }

    /// Supports the caller has given, newest first.
    pub async fn list_mine(&self, user: &AuthenticatedUser) -> Result<Vec<Support>> {
        self.store.list_supports_by_supporter(&user.sub).await
    }

    /// Retracts one of the caller's own supports.
    pub async fn retract(&self, support_id: Uuid, user: &AuthenticatedUser) -> Result<()> {
        let support = self
            .store
            .get_support(support_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Support {} not found", support_id)))?;

        if support.supporter_id.as_deref() != Some(user.sub.as_str()) {
            return Err(AppError::Forbidden(
                "Only the supporter can retract a support".to_string(),
            ));
        }

        self.store.delete_support(support_id).await?;
        tracing::info!(support_id = %support_id, "Support retracted");

        Ok(())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::complaints::models::Support;
use crate::features::supports::services::{SupportOutcome, SupportResult};

/// Request DTO for supporting a complaint
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddSupportDto {
    pub complaint_id: Uuid,
}

/// Response DTO for a support
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SupportResponseDto {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Support> for SupportResponseDto {
    fn from(s: Support) -> Self {
        Self {
            id: s.id,
            complaint_id: s.complaint_id,
            created_at: s.created_at,
        }
    }
}

/// Response DTO for a direct support request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SupportResultResponseDto {
    pub complaint_id: Uuid,
    pub outcome: SupportOutcome,
    pub support_count: i64,
}

impl From<SupportResult> for SupportResultResponseDto {
    fn from(r: SupportResult) -> Self {
        Self {
            complaint_id: r.complaint_id,
            outcome: r.outcome,
            support_count: r.support_count,
        }
    }
}

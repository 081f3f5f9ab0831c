use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::complaints::models::{
    Author, ComplaintFilter, ComplaintStatus, ComplaintSummary, Jurisdiction,
};
use crate::features::complaints::services::{DeletionOutcome, GroupingOutcome, Submission};
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::shared::validation::{validate_latitude, validate_longitude, validate_not_blank};

/// Request DTO for submitting a complaint
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateComplaintDto {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 5000,
        message = "Description must be between 1 and 5000 characters"
    ))]
    pub description: String,

    pub category_id: Uuid,

    #[validate(custom(function = validate_latitude))]
    pub latitude: Decimal,

    #[validate(custom(function = validate_longitude))]
    pub longitude: Decimal,

    #[validate(length(min = 1, max = 255, message = "Address must be between 1 and 255 characters"))]
    pub address: Option<String>,

    #[validate(length(min = 1, max = 100, message = "City must be between 1 and 100 characters"))]
    pub city: Option<String>,

    #[validate(length(min = 1, max = 100, message = "State must be between 1 and 100 characters"))]
    pub state: Option<String>,

    #[validate(url(message = "Photo must be a valid URL"))]
    pub photo_url: Option<String>,

    pub jurisdiction: Jurisdiction,

    /// Display name for unauthenticated submitters; must be absent when a token is sent
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

impl CreateComplaintDto {
    /// Split into the submission fields and the guest name used for author resolution
    pub fn into_submission(self) -> (Submission, Option<String>) {
        let guest_name = self.guest_name;
        (
            Submission {
                title: self.title,
                description: self.description,
                category_id: self.category_id,
                latitude: self.latitude,
                longitude: self.longitude,
                address: self.address,
                city: self.city,
                state: self.state,
                photo_url: self.photo_url,
                jurisdiction: self.jurisdiction,
            },
            guest_name,
        )
    }
}

/// Query params for listing complaints
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListComplaintsQuery {
    /// Filter by status
    pub status: Option<ComplaintStatus>,
    /// Filter by category ID
    pub category_id: Option<Uuid>,
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Number of items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl ListComplaintsQuery {
    pub fn filter(&self) -> ComplaintFilter {
        ComplaintFilter {
            status: self.status,
            category_id: self.category_id,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }

    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Query params for deleting a complaint
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct DeleteComplaintQuery {
    /// Name the complaint was filed under; required when no token is sent
    pub guest_name: Option<String>,
}

/// Request DTO for updating complaint status
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChangeStatusDto {
    pub status: ComplaintStatus,
}

/// Response DTO for complaint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComplaintResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub photo_url: Option<String>,
    pub jurisdiction: Jurisdiction,
    pub status: ComplaintStatus,
    pub author: Author,
    pub support_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<ComplaintSummary> for ComplaintResponseDto {
    fn from(s: ComplaintSummary) -> Self {
        let c = s.complaint;
        let latitude = c.lat_f64();
        let longitude = c.lon_f64();
        Self {
            id: c.id,
            title: c.title,
            description: c.description,
            category_id: c.category_id,
            category_name: s.category_name,
            latitude,
            longitude,
            address: c.address,
            city: c.city,
            state: c.state,
            photo_url: c.photo_url,
            jurisdiction: c.jurisdiction,
            status: c.status,
            author: c.author,
            support_count: s.support_count,
            created_at: c.created_at,
        }
    }
}

/// Response DTO for a submission and how it was absorbed
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponseDto {
    pub outcome: GroupingOutcome,
    pub complaint: ComplaintResponseDto,
}

/// Response DTO describing what happened to a deleted complaint's supports
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeletionResponseDto {
    Deleted,
    SupportsTransferred {
        target_complaint_id: Uuid,
        transferred_count: u32,
        dropped_count: u32,
    },
    SupportPromoted {
        new_complaint_id: Uuid,
        preserved_count: u32,
    },
}

impl From<DeletionOutcome> for DeletionResponseDto {
    fn from(o: DeletionOutcome) -> Self {
        match o {
            DeletionOutcome::Deleted => Self::Deleted,
            DeletionOutcome::SupportsTransferred {
                target_complaint_id,
                transferred_count,
                dropped_count,
            } => Self::SupportsTransferred {
                target_complaint_id,
                transferred_count,
                dropped_count,
            },
            DeletionOutcome::SupportPromoted {
                new_complaint_id,
                preserved_count,
            } => Self::SupportPromoted {
                new_complaint_id,
                preserved_count,
            },
        }
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use super::author::Author;

/// Complaint status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "complaint_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Open,
    UnderReview,
    Resolved,
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplaintStatus::Open => write!(f, "open"),
            ComplaintStatus::UnderReview => write!(f, "under_review"),
            ComplaintStatus::Resolved => write!(f, "resolved"),
        }
    }
}

/// Government level responsible for a complaint, matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "jurisdiction_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Jurisdiction {
    Municipal,
    State,
    Federal,
    Private,
}

impl std::fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Jurisdiction::Municipal => write!(f, "municipal"),
            Jurisdiction::State => write!(f, "state"),
            Jurisdiction::Federal => write!(f, "federal"),
            Jurisdiction::Private => write!(f, "private"),
        }
    }
}

/// Database model for a complaint.
///
/// Coordinates stay fixed-precision decimals; they are converted to f64
/// only inside the distance math.
#[derive(Debug, Clone)]
pub struct Complaint {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: Uuid,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub photo_url: Option<String>,
    pub jurisdiction: Jurisdiction,
    pub status: ComplaintStatus,
    pub author: Author,
    pub created_at: DateTime<Utc>,
}

impl Complaint {
    pub fn lat_f64(&self) -> f64 {
        self.latitude.to_f64().unwrap_or(f64::NAN)
    }

    pub fn lon_f64(&self) -> f64 {
        self.longitude.to_f64().unwrap_or(f64::NAN)
    }
}

impl FromRow<'_, PgRow> for Complaint {
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
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            category_id: row.try_get("category_id")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            address: row.try_get("address")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            photo_url: row.try_get("photo_url")?,
            jurisdiction: row.try_get("jurisdiction")?,
            status: row.try_get("status")?,
            author,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Data for inserting a complaint.
///
/// Carries an explicit status because the deletion engine's promotion path
/// copies the original complaint's status instead of resetting it to open.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub category_id: Uuid,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub photo_url: Option<String>,
    pub jurisdiction: Jurisdiction,
    pub status: ComplaintStatus,
    pub author: Author,
}

/// A complaint joined with its support count and category name, the shape
/// the read endpoints expose.
#[derive(Debug, Clone)]
pub struct ComplaintSummary {
    pub complaint: Complaint,
    pub support_count: i64,
    pub category_name: String,
}

impl FromRow<'_, PgRow> for ComplaintSummary {
    fn from_row(row: &PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            complaint: Complaint::from_row(row)?,
            support_count: row.try_get("support_count")?,
            category_name: row.try_get("category_name")?,
        })
    }
}

/// Optional filters for complaint listings
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplaintFilter {
    pub status: Option<ComplaintStatus>,
    pub category_id: Option<Uuid>,
}

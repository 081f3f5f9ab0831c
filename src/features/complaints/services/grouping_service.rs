use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::config::GroupingConfig;
use crate::core::error::{AppError, Result};
use crate::features::complaints::models::{
    Author, Complaint, ComplaintStatus, Jurisdiction, NewComplaint,
};
use crate::features::complaints::store::ComplaintStore;

use super::proximity::ProximitySearch;

/// What the grouping decision did with a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GroupingOutcome {
    Created,
    SupportAdded,
    AlreadySupported,
}

/// The matched-or-created complaint a submission ended up on
#[derive(Debug, Clone)]
pub struct SubmissionResult {
    pub complaint: Complaint,
    pub outcome: GroupingOutcome,
    pub support_count: i64,
}

/// Fields of an incoming submission, validated at the request edge
#[derive(Debug, Clone)]
pub struct Submission {
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
}

impl Submission {
    fn into_new_complaint(self, author: Author) -> NewComplaint {
        NewComplaint {
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
            status: ComplaintStatus::Open,
            author,
        }
    }
}

/// Decides whether a submission is a new physical issue or a duplicate of
/// a nearby open complaint.
///
/// Each call runs in one store session: the candidate reads lock the
/// matching rows, so two concurrent submissions over the same ground
/// cannot both conclude "no match". Exactly one of {complaint insert,
/// support insert, no write} is committed per call.
pub struct GroupingService {
    store: Arc<dyn ComplaintStore>,
    proximity: ProximitySearch,
}

impl GroupingService {
    pub fn new(store: Arc<dyn ComplaintStore>, config: GroupingConfig) -> Self {
        Self {
            store,
            proximity: ProximitySearch::new(config),
        }
    }

    pub async fn submit(&self, submission: Submission, actor: Author) -> Result<SubmissionResult> {
        let mut session = self.store.begin().await?;

        if !session.category_exists(submission.category_id).await? {
            return Err(AppError::Validation(format!(
                "Category {} not found",
                submission.category_id
            )));
        }

        let lat = submission.latitude.to_f64().unwrap_or(f64::NAN);
        let lon = submission.longitude.to_f64().unwrap_or(f64::NAN);

        let nearby = self
            .proximity
            .find_nearby(session.as_mut(), submission.category_id, lat, lon, None)
            .await?;

        let result = match nearby {
            None => {
                let complaint = session
                    .insert_complaint(submission.into_new_complaint(actor))
                    .await?;

                tracing::info!(complaint_id = %complaint.id, "Created new complaint");

                SubmissionResult {
                    complaint,
                    outcome: GroupingOutcome::Created,
                    support_count: 0,
                }
            }
            Some((existing, distance)) => {
                let outcome = match &actor {
                    Author::User { user_id } => {
                        if session.has_support(existing.id, user_id).await? {
                            GroupingOutcome::AlreadySupported
                        } else {
                            match session
                                .insert_support(existing.id, Some(user_id.clone()))
                                .await
                            {
                                Ok(_) => GroupingOutcome::SupportAdded,
                                Err(e) if e.is_unique_violation() => {
                                    return Err(AppError::Conflict(
                                        "User already supports this complaint".to_string(),
                                    ));
                                }
                                Err(e) => return Err(e),
                            }
                        }
                    }
                    // Guest identity is not tracked, so guests are never
                    // deduplicated
                    Author::Guest { .. } => {
                        session.insert_support(existing.id, None).await?;
                        GroupingOutcome::SupportAdded
                    }
                };

                let support_count = session.count_supports(existing.id).await?;

                tracing::info!(
                    complaint_id = %existing.id,
                    distance_m = format!("{:.1}", distance),
                    outcome = ?outcome,
                    "Grouped submission with existing complaint"
                );

                SubmissionResult {
                    complaint: existing,
                    outcome,
                    support_count,
                }
            }
        };

        session.commit().await?;

        Ok(result)
    }
}

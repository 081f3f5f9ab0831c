use std::sync::Arc;

use uuid::Uuid;

use crate::core::config::GroupingConfig;
use crate::core::error::{AppError, Result};
use crate::features::complaints::models::{Author, Complaint, NewComplaint, Support};
use crate::features::complaints::store::{ComplaintStore, StoreSession};
use crate::shared::constants::{ANONYMOUS_SUPPORTER_NAME, PROMOTED_DESCRIPTION_PREFIX};

use super::proximity::ProximitySearch;

/// What happened to the dependent supports of a deleted complaint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// No supports existed; the complaint was removed outright
    Deleted,
    /// Supports were repointed at a nearby complaint
    SupportsTransferred {
        target_complaint_id: Uuid,
        transferred_count: u32,
        dropped_count: u32,
    },
    /// The oldest support became a new complaint carrying the others
    SupportPromoted {
        new_complaint_id: Uuid,
        preserved_count: u32,
    },
}

/// Deletes complaints without losing accumulated community signal.
///
/// A supported complaint never simply vanishes: its supports move onto a
/// nearby open complaint when one exists, and otherwise the oldest support
/// is promoted into a replacement complaint that carries the rest. The
/// whole decision runs in one store session, so either the complaint is
/// fully removed with every support accounted for or nothing changes.
pub struct DeletionService {
    store: Arc<dyn ComplaintStore>,
    proximity: ProximitySearch,
}

impl DeletionService {
    pub fn new(store: Arc<dyn ComplaintStore>, config: GroupingConfig) -> Self {
        Self {
            store,
            proximity: ProximitySearch::new(config),
        }
    }

    /// Deletes a complaint on behalf of `actor`, which must match the
    /// stored author exactly.
    pub async fn delete(&self, complaint_id: Uuid, actor: &Author) -> Result<DeletionOutcome> {
        let mut session = self.store.begin().await?;

        let complaint = session
            .lock_complaint(complaint_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Complaint {} not found", complaint_id)))?;

        if complaint.author != *actor {
            return Err(AppError::Forbidden(
                "Only the author can delete a complaint".to_string(),
            ));
        }

        let supports = session.supports_of(complaint_id).await?;

        let outcome = if supports.is_empty() {
            session.delete_complaint(complaint_id).await?;
            tracing::info!(complaint_id = %complaint_id, "Deleted complaint without supports");
            DeletionOutcome::Deleted
        } else {
            let target = self
                .proximity
                .find_nearby(
                    session.as_mut(),
                    complaint.category_id,
                    complaint.lat_f64(),
                    complaint.lon_f64(),
                    Some(complaint_id),
                )
                .await?;

            match target {
                Some((target, _)) => {
                    self.transfer_to_target(session.as_mut(), &complaint, &supports, &target)
                        .await?
                }
                None => {
                    self.promote_oldest_support(session.as_mut(), &complaint, &supports)
                        .await?
                }
            }
        };

        session.commit().await?;

        Ok(outcome)
    }

    /// Repoints every support at `target`, dropping rows whose registered
    /// supporter already supports it, then removes the complaint.
    async fn transfer_to_target(
        &self,
        session: &mut dyn StoreSession,
        complaint: &Complaint,
        supports: &[Support],
        target: &Complaint,
    ) -> Result<DeletionOutcome> {
        let (transferred_count, dropped_count) =
            Self::move_supports(session, supports, target.id).await?;

        session.delete_complaint(complaint.id).await?;

        tracing::info!(
            complaint_id = %complaint.id,
            target_complaint_id = %target.id,
            transferred_count,
            dropped_count,
            "Deleted complaint, supports transferred to nearby complaint"
        );

        Ok(DeletionOutcome::SupportsTransferred {
            target_complaint_id: target.id,
            transferred_count,
            dropped_count,
        })
    }

    /// Turns the oldest support into a new complaint that carries the
    /// remaining supports, then removes the original.
    ///
    /// The promoted support row itself is deleted: the supporter is now
    /// represented by authorship. An anonymous oldest support promotes to
    /// a fixed guest name.
    async fn promote_oldest_support(
        &self,
        session: &mut dyn StoreSession,
        complaint: &Complaint,
        supports: &[Support],
    ) -> Result<DeletionOutcome> {
        let (oldest, rest) = supports
            .split_first()
            .ok_or_else(|| AppError::Internal("promotion requires at least one support".into()))?;

        let author = match &oldest.supporter_id {
            Some(user_id) => Author::User {
                user_id: user_id.clone(),
            },
            None => Author::Guest {
                name: ANONYMOUS_SUPPORTER_NAME.to_string(),
            },
        };

        let new_complaint = session
            .insert_complaint(NewComplaint {
                title: complaint.title.clone(),
                description: format!(
                    "{}{}",
                    PROMOTED_DESCRIPTION_PREFIX, complaint.description
                ),
                category_id: complaint.category_id,
                latitude: complaint.latitude,
                longitude: complaint.longitude,
                address: complaint.address.clone(),
                city: complaint.city.clone(),
                state: complaint.state.clone(),
                photo_url: complaint.photo_url.clone(),
                jurisdiction: complaint.jurisdiction,
                status: complaint.status,
                author,
            })
            .await?;

        session.delete_support(oldest.id).await?;

        let (preserved_count, _) = Self::move_supports(session, rest, new_complaint.id).await?;

        session.delete_complaint(complaint.id).await?;

        tracing::info!(
            complaint_id = %complaint.id,
            new_complaint_id = %new_complaint.id,
            preserved_count,
            "Deleted complaint, oldest support promoted to a new complaint"
        );

        Ok(DeletionOutcome::SupportPromoted {
            new_complaint_id: new_complaint.id,
            preserved_count,
        })
    }

    /// Moves supports onto `target_id`, deleting instead of moving when
    /// the registered supporter already supports the target. Returns
    /// (transferred, dropped).
    async fn move_supports(
        session: &mut dyn StoreSession,
        supports: &[Support],
        target_id: Uuid,
    ) -> Result<(u32, u32)> {
        let mut transferred = 0;
        let mut dropped = 0;

        for support in supports {
            let duplicate = match &support.supporter_id {
                Some(supporter) => session.has_support(target_id, supporter).await?,
                // Anonymous supports carry no identity to deduplicate on
                None => false,
            };

            if duplicate {
                session.delete_support(support.id).await?;
                dropped += 1;
            } else {
                session.move_support(support.id, target_id).await?;
                transferred += 1;
            }
        }

        Ok((transferred, dropped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::complaints::models::{ComplaintStatus, Jurisdiction};
    use crate::features::complaints::store::MemoryComplaintStore;
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal::Decimal;

    const BASE_LAT: f64 = -26.3045;
    const BASE_LON: f64 = -48.8487;
    const NEARBY_LAT: f64 = BASE_LAT + 0.000449;

    fn service(store: Arc<MemoryComplaintStore>) -> DeletionService {
        DeletionService::new(store, GroupingConfig::default())
    }

    fn guest(name: &str) -> Author {
        Author::Guest {
            name: name.to_string(),
        }
    }

    fn registered(id: &str) -> Author {
        Author::User {
            user_id: id.to_string(),
        }
    }

    async fn insert_complaint(
        store: &MemoryComplaintStore,
        category_id: Uuid,
        lat: f64,
        lon: f64,
        author: Author,
    ) -> Complaint {
        let mut session = store.begin().await.unwrap();
        let complaint = session
            .insert_complaint(NewComplaint {
                title: "Esgoto a céu aberto".to_string(),
                description: "Esgoto correndo na calçada".to_string(),
                category_id,
                latitude: Decimal::from_f64(lat).unwrap(),
                longitude: Decimal::from_f64(lon).unwrap(),
                address: None,
                city: None,
                state: None,
                photo_url: None,
                jurisdiction: Jurisdiction::Municipal,
                status: ComplaintStatus::Open,
                author,
            })
            .await
            .unwrap();
        session.commit().await.unwrap();
        complaint
    }

    async fn insert_support(
        store: &MemoryComplaintStore,
        complaint_id: Uuid,
        supporter_id: Option<&str>,
    ) -> Support {
        let mut session = store.begin().await.unwrap();
        let support = session
            .insert_support(complaint_id, supporter_id.map(str::to_string))
            .await
            .unwrap();
        session.commit().await.unwrap();
        support
    }

    #[tokio::test]
    async fn test_unsupported_complaint_is_deleted_outright() {
        let store = Arc::new(MemoryComplaintStore::new());
        let category = store.seed_category("Saneamento").await;
        let complaint =
            insert_complaint(&store, category.id, BASE_LAT, BASE_LON, guest("Ana")).await;

        let outcome = service(store.clone())
            .delete(complaint.id, &guest("Ana"))
            .await
            .unwrap();

        assert_eq!(outcome, DeletionOutcome::Deleted);
        assert_eq!(store.total_complaints().await, 0);
    }

    #[tokio::test]
    async fn test_only_the_author_can_delete() {
        let store = Arc::new(MemoryComplaintStore::new());
        let category = store.seed_category("Saneamento").await;
        let by_guest =
            insert_complaint(&store, category.id, BASE_LAT, BASE_LON, guest("Ana")).await;
        let by_user = insert_complaint(
            &store,
            category.id,
            BASE_LAT + 0.01,
            BASE_LON,
            registered("user-1"),
        )
        .await;
        let service = service(store.clone());

        // Wrong guest name
        let result = service.delete(by_guest.id, &guest("Beatriz")).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        // A registered user is not the guest author
        let result = service.delete(by_guest.id, &registered("user-1")).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        // Another registered user is not the author
        let result = service.delete(by_user.id, &registered("user-2")).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        assert_eq!(store.total_complaints().await, 2);

        // The true authors can
        service.delete(by_guest.id, &guest("Ana")).await.unwrap();
        service
            .delete(by_user.id, &registered("user-1"))
            .await
            .unwrap();
        assert_eq!(store.total_complaints().await, 0);
    }

    #[tokio::test]
    async fn test_deleting_unknown_complaint_is_not_found() {
        let store = Arc::new(MemoryComplaintStore::new());

        let result = service(store).delete(Uuid::now_v7(), &guest("Ana")).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_supports_transfer_to_nearby_target_with_duplicates_dropped() {
        let store = Arc::new(MemoryComplaintStore::new());
        let category = store.seed_category("Saneamento").await;

        let original =
            insert_complaint(&store, category.id, BASE_LAT, BASE_LON, guest("Ana")).await;
        let target =
            insert_complaint(&store, category.id, NEARBY_LAT, BASE_LON, guest("Bruno")).await;

        insert_support(&store, original.id, Some("user-1")).await;
        insert_support(&store, original.id, Some("user-2")).await;
        insert_support(&store, original.id, None).await;
        // user-2 already supports the target, so that row is dropped
        insert_support(&store, target.id, Some("user-2")).await;

        let outcome = service(store.clone())
            .delete(original.id, &guest("Ana"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DeletionOutcome::SupportsTransferred {
                target_complaint_id: target.id,
                transferred_count: 2,
                dropped_count: 1,
            }
        );
        assert_eq!(store.total_complaints().await, 1);
        assert_eq!(store.count_supports(target.id).await.unwrap(), 3);
        assert_eq!(store.total_supports().await, 3);
    }

    #[tokio::test]
    async fn test_oldest_support_is_promoted_when_no_target_exists() {
        let store = Arc::new(MemoryComplaintStore::new());
        let category = store.seed_category("Saneamento").await;

        let original =
            insert_complaint(&store, category.id, BASE_LAT, BASE_LON, guest("Ana")).await;
        insert_support(&store, original.id, Some("user-1")).await;
        insert_support(&store, original.id, Some("user-2")).await;
        insert_support(&store, original.id, None).await;

        let outcome = service(store.clone())
            .delete(original.id, &guest("Ana"))
            .await
            .unwrap();

        let new_complaint_id = match outcome {
            DeletionOutcome::SupportPromoted {
                new_complaint_id,
                preserved_count,
            } => {
                assert_eq!(preserved_count, 2);
                new_complaint_id
            }
            other => panic!("expected promotion, got {:?}", other),
        };

        let promoted = store.get_complaint(new_complaint_id).await.unwrap().unwrap();
        assert_eq!(promoted.author, registered("user-1"));
        assert_eq!(promoted.title, original.title);
        assert!(promoted
            .description
            .starts_with(PROMOTED_DESCRIPTION_PREFIX));
        assert!(promoted.description.ends_with(&original.description));
        assert_eq!(promoted.status, original.status);

        assert_eq!(store.total_complaints().await, 1);
        assert_eq!(store.count_supports(new_complaint_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_anonymous_oldest_support_promotes_to_fixed_guest() {
        let store = Arc::new(MemoryComplaintStore::new());
        let category = store.seed_category("Saneamento").await;

        let original =
            insert_complaint(&store, category.id, BASE_LAT, BASE_LON, guest("Ana")).await;
        insert_support(&store, original.id, None).await;
        insert_support(&store, original.id, Some("user-2")).await;

        let outcome = service(store.clone())
            .delete(original.id, &guest("Ana"))
            .await
            .unwrap();

        let new_complaint_id = match outcome {
            DeletionOutcome::SupportPromoted {
                new_complaint_id, ..
            } => new_complaint_id,
            other => panic!("expected promotion, got {:?}", other),
        };

        let promoted = store.get_complaint(new_complaint_id).await.unwrap().unwrap();
        assert_eq!(
            promoted.author,
            Author::Guest {
                name: ANONYMOUS_SUPPORTER_NAME.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_promotion_copies_the_original_status() {
        let store = Arc::new(MemoryComplaintStore::new());
        let category = store.seed_category("Saneamento").await;

        let original =
            insert_complaint(&store, category.id, BASE_LAT, BASE_LON, guest("Ana")).await;
        store
            .update_status(original.id, ComplaintStatus::UnderReview)
            .await
            .unwrap();
        insert_support(&store, original.id, Some("user-1")).await;

        let outcome = service(store.clone())
            .delete(original.id, &guest("Ana"))
            .await
            .unwrap();

        let new_complaint_id = match outcome {
            DeletionOutcome::SupportPromoted {
                new_complaint_id, ..
            } => new_complaint_id,
            other => panic!("expected promotion, got {:?}", other),
        };

        let promoted = store.get_complaint(new_complaint_id).await.unwrap().unwrap();
        assert_eq!(promoted.status, ComplaintStatus::UnderReview);
    }

    #[tokio::test]
    async fn test_resolved_neighbors_are_not_transfer_targets() {
        let store = Arc::new(MemoryComplaintStore::new());
        let category = store.seed_category("Saneamento").await;

        let original =
            insert_complaint(&store, category.id, BASE_LAT, BASE_LON, guest("Ana")).await;
        let resolved =
            insert_complaint(&store, category.id, NEARBY_LAT, BASE_LON, guest("Bruno")).await;
        store
            .update_status(resolved.id, ComplaintStatus::Resolved)
            .await
            .unwrap();
        insert_support(&store, original.id, Some("user-1")).await;

        let outcome = service(store.clone())
            .delete(original.id, &guest("Ana"))
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            DeletionOutcome::SupportPromoted { .. }
        ));
    }

    #[tokio::test]
    async fn test_failed_deletion_leaves_store_unchanged() {
        let store = Arc::new(MemoryComplaintStore::new());
        let category = store.seed_category("Saneamento").await;

        let original =
            insert_complaint(&store, category.id, BASE_LAT, BASE_LON, guest("Ana")).await;
        let target =
            insert_complaint(&store, category.id, NEARBY_LAT, BASE_LON, guest("Bruno")).await;
        insert_support(&store, original.id, Some("user-1")).await;
        insert_support(&store, original.id, Some("user-2")).await;

        // First move succeeds, second write fails mid-transfer
        store.fail_after_writes(1);
        let result = service(store.clone())
            .delete(original.id, &guest("Ana"))
            .await;

        assert!(result.is_err());
        assert_eq!(store.total_complaints().await, 2);
        assert_eq!(store.count_supports(original.id).await.unwrap(), 2);
        assert_eq!(store.count_supports(target.id).await.unwrap(), 0);
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::complaints::geo::BoundingBox;
use crate::features::complaints::models::{
    Author, Complaint, ComplaintFilter, ComplaintStatus, ComplaintSummary, NewComplaint, Support,
};

use super::{ComplaintStore, StoreSession};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    categories: HashMap<Uuid, Category>,
    complaints: HashMap<Uuid, Complaint>,
    supports: HashMap<Uuid, Support>,
    clock: i64,
}

impl MemoryState {
    // Strictly increasing so creation order is total
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        DateTime::from_timestamp(1_700_000_000 + self.clock, 0).unwrap()
    }

    fn summarize(&self, complaint: &Complaint) -> ComplaintSummary {
        ComplaintSummary {
            complaint: complaint.clone(),
            support_count: self
                .supports
                .values()
                .filter(|s| s.complaint_id == complaint.id)
                .count() as i64,
            category_name: self
                .categories
                .get(&complaint.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
        }
    }

    fn matches(&self, complaint: &Complaint, filter: ComplaintFilter) -> bool {
        filter.status.is_none_or(|s| complaint.status == s)
            && filter.category_id.is_none_or(|c| complaint.category_id == c)
    }
}

/// In-memory store used by engine and handler tests.
///
/// A session clones the state, mutates the clone, and writes it back on
/// commit, so dropping an uncommitted session discards every staged
/// change. Sessions hold the state lock until they end; pool-level calls
/// made while a session is open wait for it, which mirrors the row
/// locking of the real store coarsely.
pub struct MemoryComplaintStore {
    state: Arc<Mutex<MemoryState>>,
    fail_after_writes: std::sync::Mutex<Option<u32>>,
}

impl MemoryComplaintStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            fail_after_writes: std::sync::Mutex::new(None),
        }
    }

    /// Makes the next session error on its (n+1)-th write.
    pub fn fail_after_writes(&self, n: u32) {
        *self.fail_after_writes.lock().unwrap() = Some(n);
    }

    pub async fn seed_category(&self, name: &str) -> Category {
        let mut state = self.state.lock().await;
        let category = Category {
            id: Uuid::now_v7(),
            name: name.to_string(),
            created_at: state.next_timestamp(),
        };
        state.categories.insert(category.id, category.clone());
        category
    }

    pub async fn total_supports(&self) -> usize {
        self.state.lock().await.supports.len()
    }

    pub async fn total_complaints(&self) -> usize {
        self.state.lock().await.complaints.len()
    }
}

#[async_trait]
impl ComplaintStore for MemoryComplaintStore {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        let state = self.state.lock().await;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.state.lock().await.categories.get(&id).cloned())
    }

    async fn get_complaint(&self, id: Uuid) -> Result<Option<Complaint>> {
        Ok(self.state.lock().await.complaints.get(&id).cloned())
    }

    async fn get_summary(&self, id: Uuid) -> Result<Option<ComplaintSummary>> {
        let state = self.state.lock().await;
        Ok(state.complaints.get(&id).map(|c| state.summarize(c)))
    }

    async fn list_complaints(
        &self,
        filter: ComplaintFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ComplaintSummary>> {
        let state = self.state.lock().await;
        let mut complaints: Vec<&Complaint> = state
            .complaints
            .values()
            .filter(|c| state.matches(c, filter))
            .collect();
        complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(complaints
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|c| state.summarize(c))
            .collect())
    }

    async fn count_complaints(&self, filter: ComplaintFilter) -> Result<i64> {
        let state = self.state.lock().await;
        Ok(state
            .complaints
            .values()
            .filter(|c| state.matches(c, filter))
            .count() as i64)
    }

    async fn update_status(&self, id: Uuid, status: ComplaintStatus) -> Result<()> {
        let mut state = self.state.lock().await;
        match state.complaints.get_mut(&id) {
            Some(complaint) => {
                complaint.status = status;
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Complaint {} not found", id))),
        }
    }

    async fn list_supports_by_supporter(&self, supporter_id: &str) -> Result<Vec<Support>> {
        let state = self.state.lock().await;
        let mut supports: Vec<Support> = state
            .supports
            .values()
            .filter(|s| s.supporter_id.as_deref() == Some(supporter_id))
            .cloned()
            .collect();
        supports.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(supports)
    }

    async fn get_support(&self, id: Uuid) -> Result<Option<Support>> {
        Ok(self.state.lock().await.supports.get(&id).cloned())
    }

    async fn delete_support(&self, id: Uuid) -> Result<()> {
        self.state.lock().await.supports.remove(&id);
        Ok(())
    }

    async fn count_supports(&self, complaint_id: Uuid) -> Result<i64> {
        let state = self.state.lock().await;
        Ok(state
            .supports
            .values()
            .filter(|s| s.complaint_id == complaint_id)
            .count() as i64)
    }

    async fn begin(&self) -> Result<Box<dyn StoreSession>> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        let write_budget = self.fail_after_writes.lock().unwrap().take();

        Ok(Box::new(MemorySession {
            guard,
            staged,
            write_budget,
        }))
    }
}

struct MemorySession {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
    write_budget: Option<u32>,
}

impl MemorySession {
    fn register_write(&mut self) -> Result<()> {
        if let Some(budget) = &mut self.write_budget {
            if *budget == 0 {
                return Err(AppError::Internal("simulated store failure".to_string()));
            }
            *budget -= 1;
        }
        Ok(())
    }
}

#[async_trait]
impl StoreSession for MemorySession {
    async fn category_exists(&mut self, id: Uuid) -> Result<bool> {
        Ok(self.staged.categories.contains_key(&id))
    }

    async fn candidates_for_update(
        &mut self,
        category_id: Uuid,
        bbox: BoundingBox,
        exclude_id: Option<Uuid>,
    ) -> Result<Vec<Complaint>> {
        let mut candidates: Vec<Complaint> = self
            .staged
            .complaints
            .values()
            .filter(|c| {
                c.category_id == category_id
                    && matches!(
                        c.status,
                        ComplaintStatus::Open | ComplaintStatus::UnderReview
                    )
                    && bbox.contains(c.lat_f64(), c.lon_f64())
                    && Some(c.id) != exclude_id
            })
            .cloned()
            .collect();
        candidates.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(candidates)
    }

    async fn lock_complaint(&mut self, id: Uuid) -> Result<Option<Complaint>> {
        Ok(self.staged.complaints.get(&id).cloned())
    }

    async fn insert_complaint(&mut self, new: NewComplaint) -> Result<Complaint> {
        self.register_write()?;

        let complaint = Complaint {
            id: Uuid::now_v7(),
            title: new.title,
            description: new.description,
            category_id: new.category_id,
            latitude: new.latitude,
            longitude: new.longitude,
            address: new.address,
            city: new.city,
            state: new.state,
            photo_url: new.photo_url,
            jurisdiction: new.jurisdiction,
            status: new.status,
            author: new.author,
            created_at: self.staged.next_timestamp(),
        };
        self.staged.complaints.insert(complaint.id, complaint.clone());
        Ok(complaint)
    }

    async fn delete_complaint(&mut self, id: Uuid) -> Result<()> {
        self.register_write()?;

        self.staged.complaints.remove(&id);
        // FK cascade analog
        self.staged.supports.retain(|_, s| s.complaint_id != id);
        Ok(())
    }

    async fn supports_of(&mut self, complaint_id: Uuid) -> Result<Vec<Support>> {
        let mut supports: Vec<Support> = self
            .staged
            .supports
            .values()
            .filter(|s| s.complaint_id == complaint_id)
            .cloned()
            .collect();
        supports.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(supports)
    }

    async fn has_support(&mut self, complaint_id: Uuid, supporter_id: &str) -> Result<bool> {
        Ok(self.staged.supports.values().any(|s| {
            s.complaint_id == complaint_id && s.supporter_id.as_deref() == Some(supporter_id)
        }))
    }

    async fn insert_support(
        &mut self,
        complaint_id: Uuid,
        supporter_id: Option<String>,
    ) -> Result<Support> {
        self.register_write()?;

        // Partial unique index analog: registered supporters once per
        // complaint, anonymous supports unlimited.
        if let Some(supporter) = &supporter_id {
            let duplicate = self.staged.supports.values().any(|s| {
                s.complaint_id == complaint_id && s.supporter_id.as_deref() == Some(supporter)
            });
            if duplicate {
                return Err(AppError::Conflict(format!(
                    "Supporter {} already supports complaint {}",
                    supporter, complaint_id
                )));
            }
        }

        let support = Support {
            id: Uuid::now_v7(),
            complaint_id,
            supporter_id,
            created_at: self.staged.next_timestamp(),
        };
        self.staged.supports.insert(support.id, support.clone());
        Ok(support)
    }

    async fn move_support(&mut self, support_id: Uuid, to_complaint_id: Uuid) -> Result<()> {
        self.register_write()?;

        if let Some(support) = self.staged.supports.get_mut(&support_id) {
            support.complaint_id = to_complaint_id;
        }
        Ok(())
    }

    async fn delete_support(&mut self, support_id: Uuid) -> Result<()> {
        self.register_write()?;

        self.staged.supports.remove(&support_id);
        Ok(())
    }

    async fn count_supports(&mut self, complaint_id: Uuid) -> Result<i64> {
        Ok(self
            .staged
            .supports
            .values()
            .filter(|s| s.complaint_id == complaint_id)
            .count() as i64)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let mut guard = self.guard;
        *guard = self.staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::complaints::models::Jurisdiction;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn new_complaint(category_id: Uuid) -> NewComplaint {
        NewComplaint {
            title: "Buraco na rua".to_string(),
            description: "Buraco grande na frente do mercado".to_string(),
            category_id,
            latitude: Decimal::from_str("-26.3045").unwrap(),
            longitude: Decimal::from_str("-48.8487").unwrap(),
            address: None,
            city: None,
            state: None,
            photo_url: None,
            jurisdiction: Jurisdiction::Municipal,
            status: ComplaintStatus::Open,
            author: Author::Guest {
                name: "Ana".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_dropped_session_discards_writes() {
        let store = MemoryComplaintStore::new();
        let category = store.seed_category("Infraestrutura").await;

        let mut session = store.begin().await.unwrap();
        session.insert_complaint(new_complaint(category.id)).await.unwrap();
        drop(session);

        assert_eq!(store.total_complaints().await, 0);
    }

    #[tokio::test]
    async fn test_committed_session_persists_writes() {
        let store = MemoryComplaintStore::new();
        let category = store.seed_category("Infraestrutura").await;

        let mut session = store.begin().await.unwrap();
        let complaint = session.insert_complaint(new_complaint(category.id)).await.unwrap();
        session.insert_support(complaint.id, None).await.unwrap();
        session.commit().await.unwrap();

        assert_eq!(store.total_complaints().await, 1);
        assert_eq!(store.total_supports().await, 1);
    }

    #[tokio::test]
    async fn test_write_budget_fails_later_writes() {
        let store = MemoryComplaintStore::new();
        let category = store.seed_category("Infraestrutura").await;
        store.fail_after_writes(1);

        let mut session = store.begin().await.unwrap();
        let complaint = session.insert_complaint(new_complaint(category.id)).await.unwrap();
        let result = session.insert_support(complaint.id, None).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_registered_duplicate_support_rejected() {
        let store = MemoryComplaintStore::new();
        let category = store.seed_category("Infraestrutura").await;

        let mut session = store.begin().await.unwrap();
        let complaint = session.insert_complaint(new_complaint(category.id)).await.unwrap();
        session
            .insert_support(complaint.id, Some("user-1".to_string()))
            .await
            .unwrap();

        let duplicate = session
            .insert_support(complaint.id, Some("user-1".to_string()))
            .await;
        assert!(matches!(duplicate, Err(AppError::Conflict(_))));

        // Anonymous supports are not deduplicated
        session.insert_support(complaint.id, None).await.unwrap();
        session.insert_support(complaint.id, None).await.unwrap();
    }
}

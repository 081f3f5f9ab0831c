//! Storage abstraction over the complaint, support, and category tables.
//!
//! Pool-level methods serve plain reads and standalone writes. The
//! grouping and deletion engines instead open a [`StoreSession`]: one
//! transactional unit of work whose candidate reads lock rows for the
//! duration of the decision. Dropping a session without committing rolls
//! every staged change back.

mod postgres;

#[cfg(test)]
mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::models::Category;
use crate::features::complaints::geo::BoundingBox;
use crate::features::complaints::models::{
    Complaint, ComplaintFilter, ComplaintStatus, ComplaintSummary, NewComplaint, Support,
};

pub use postgres::PgComplaintStore;

#[cfg(test)]
pub use memory::MemoryComplaintStore;

#[async_trait]
pub trait ComplaintStore: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>>;

    async fn get_complaint(&self, id: Uuid) -> Result<Option<Complaint>>;

    /// Complaint with its support count and category name.
    async fn get_summary(&self, id: Uuid) -> Result<Option<ComplaintSummary>>;

    /// Newest-first page of complaints.
    async fn list_complaints(
        &self,
        filter: ComplaintFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ComplaintSummary>>;

    async fn count_complaints(&self, filter: ComplaintFilter) -> Result<i64>;

    async fn update_status(&self, id: Uuid, status: ComplaintStatus) -> Result<()>;

    async fn list_supports_by_supporter(&self, supporter_id: &str) -> Result<Vec<Support>>;

    async fn get_support(&self, id: Uuid) -> Result<Option<Support>>;

    async fn delete_support(&self, id: Uuid) -> Result<()>;

    async fn count_supports(&self, complaint_id: Uuid) -> Result<i64>;

    /// Opens a transactional session.
    async fn begin(&self) -> Result<Box<dyn StoreSession>>;
}

/// One transactional unit of work over the store.
///
/// Writes become visible to other callers only after [`commit`]; dropping
/// the session discards them.
///
/// [`commit`]: StoreSession::commit
#[async_trait]
pub trait StoreSession: Send {
    async fn category_exists(&mut self, id: Uuid) -> Result<bool>;

    /// Grouping candidates inside the bounding box: same category, status
    /// open or under_review, newest first. Matching rows are locked until
    /// the session ends so a concurrent decision over the same ground
    /// serializes behind this one.
    async fn candidates_for_update(
        &mut self,
        category_id: Uuid,
        bbox: BoundingBox,
        exclude_id: Option<Uuid>,
    ) -> Result<Vec<Complaint>>;

    /// Loads and locks a single complaint row.
    async fn lock_complaint(&mut self, id: Uuid) -> Result<Option<Complaint>>;

    async fn insert_complaint(&mut self, new: NewComplaint) -> Result<Complaint>;

    /// Deletes a complaint; its remaining supports and comments go with it.
    async fn delete_complaint(&mut self, id: Uuid) -> Result<()>;

    /// Supports of a complaint, oldest first.
    async fn supports_of(&mut self, complaint_id: Uuid) -> Result<Vec<Support>>;

    async fn has_support(&mut self, complaint_id: Uuid, supporter_id: &str) -> Result<bool>;

    async fn insert_support(
        &mut self,
        complaint_id: Uuid,
        supporter_id: Option<String>,
    ) -> Result<Support>;

    /// Repoints a support row at another complaint.
    async fn move_support(&mut self, support_id: Uuid, to_complaint_id: Uuid) -> Result<()>;

    async fn delete_support(&mut self, support_id: Uuid) -> Result<()>;

    async fn count_supports(&mut self, complaint_id: Uuid) -> Result<i64>;

    async fn commit(self: Box<Self>) -> Result<()>;
}

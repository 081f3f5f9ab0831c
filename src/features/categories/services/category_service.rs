use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::complaints::store::ComplaintStore;

/// Service for category operations
pub struct CategoryService {
    store: Arc<dyn ComplaintStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn ComplaintStore>) -> Self {
        Self { store }
    }

    /// List all categories, ordered by name
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.store.list_categories().await?;

        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// Get category by id
    pub async fn get(&self, id: Uuid) -> Result<CategoryResponseDto> {
        self.store
            .get_category(id)
            .await?
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }
}

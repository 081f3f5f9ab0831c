use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::services::CategoryService;
use crate::shared::types::ApiResponse;

/// List all categories
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = service.list().await?;
    Ok(Json(ApiResponse::success(Some(categories), None, None)))
}

/// Get category by id
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, OptionalUser};
use crate::features::comments::dtos::{
    CommentResponseDto, CreateCommentDto, DeleteCommentQuery, ListCommentsQuery,
};
use crate::features::comments::services::CommentService;
use crate::features::complaints::models::Author;
use crate::shared::types::ApiResponse;

/// List comments of a complaint, oldest first
#[utoipa::path(
    get,
    path = "/api/comments",
    params(ListCommentsQuery),
    responses(
        (status = 200, description = "Comments of the complaint", body = ApiResponse<Vec<CommentResponseDto>>),
        (status = 404, description = "Complaint not found")
    ),
    tag = "comments"
)]
pub async fn list_comments(
    State(service): State<Arc<CommentService>>,
    Query(query): Query<ListCommentsQuery>,
) -> Result<Json<ApiResponse<Vec<CommentResponseDto>>>> {
    let comments = service.list_by_complaint(query.complaint_id).await?;
    let dtos: Vec<CommentResponseDto> = comments.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Comment on a complaint as a registered user or guest
#[utoipa::path(
    post,
    path = "/api/comments",
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment created", body = ApiResponse<CommentResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Complaint not found")
    ),
    security((), ("bearer_auth" = [])),
    tag = "comments"
)]
pub async fn create_comment(
    OptionalUser(user): OptionalUser,
    State(service): State<Arc<CommentService>>,
    AppJson(dto): AppJson<CreateCommentDto>,
) -> Result<(StatusCode, Json<ApiResponse<CommentResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let author = Author::resolve(user.as_ref(), dto.guest_name.as_deref())?;
    let comment = service.create(dto.complaint_id, dto.body, author).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(comment.into()), None, None)),
    ))
}

/// Delete own comment
#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(
        ("id" = Uuid, Path, description = "Comment ID"),
        DeleteCommentQuery
    ),
    responses(
        (status = 200, description = "Comment deleted successfully"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found")
    ),
    security((), ("bearer_auth" = [])),
    tag = "comments"
)]
pub async fn delete_comment(
    OptionalUser(user): OptionalUser,
    State(service): State<Arc<CommentService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteCommentQuery>,
) -> Result<Json<ApiResponse<()>>> {
    let author = Author::resolve(user.as_ref(), query.guest_name.as_deref())?;
    service.delete(id, &author).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Comment deleted successfully".to_string()),
        None,
    )))
}

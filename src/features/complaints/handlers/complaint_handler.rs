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
use crate::features::auth::model::AuthenticatedUser;
use crate::features::complaints::dtos::{
    ChangeStatusDto, ComplaintResponseDto, CreateComplaintDto, DeleteComplaintQuery,
    DeletionResponseDto, ListComplaintsQuery, SubmissionResponseDto,
};
use crate::features::complaints::models::Author;
use crate::features::complaints::services::{
    ComplaintService, DeletionService, GroupingOutcome, GroupingService,
};
use crate::shared::types::{ApiResponse, Meta};

/// State for the submission and deletion handlers
#[derive(Clone)]
pub struct ComplaintState {
    pub complaint_service: Arc<ComplaintService>,
    pub grouping_service: Arc<GroupingService>,
    pub deletion_service: Arc<DeletionService>,
}

/// Submit a complaint, grouping it with a nearby one when possible
///
/// Citizens may submit with a bearer token or as a guest carrying a
/// display name. When an open complaint of the same category already
/// sits within the grouping radius, the submission becomes a support
/// on it instead of a new record.
#[utoipa::path(
    post,
    path = "/api/complaints",
    request_body = CreateComplaintDto,
    responses(
        (status = 201, description = "Complaint created", body = ApiResponse<SubmissionResponseDto>),
        (status = 200, description = "Submission absorbed by a nearby complaint", body = ApiResponse<SubmissionResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Duplicate support")
    ),
    security((), ("bearer_auth" = [])),
    tag = "complaints"
)]
pub async fn submit_complaint(
    OptionalUser(user): OptionalUser,
    State(state): State<ComplaintState>,
    AppJson(dto): AppJson<CreateComplaintDto>,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (submission, guest_name) = dto.into_submission();
    let author = Author::resolve(user.as_ref(), guest_name.as_deref())?;

    let result = state.grouping_service.submit(submission, author).await?;
    let summary = state.complaint_service.get(result.complaint.id).await?;

    let (status, message) = match result.outcome {
        GroupingOutcome::Created => (StatusCode::CREATED, "Reclamação registrada com sucesso!"),
        GroupingOutcome::SupportAdded => (
            StatusCode::OK,
            "Sua reclamação foi somada a uma já registrada para este local!",
        ),
        GroupingOutcome::AlreadySupported => (StatusCode::OK, "Você já apoia esta reclamação."),
    };

    let response = SubmissionResponseDto {
        outcome: result.outcome,
        complaint: summary.into(),
    };

    Ok((
        status,
        Json(ApiResponse::success(
            Some(response),
            Some(message.to_string()),
            None,
        )),
    ))
}

/// List complaints with optional status and category filters
#[utoipa::path(
    get,
    path = "/api/complaints",
    params(ListComplaintsQuery),
    responses(
        (status = 200, description = "Paginated complaints", body = ApiResponse<Vec<ComplaintResponseDto>>)
    ),
    tag = "complaints"
)]
pub async fn list_complaints(
    State(state): State<ComplaintState>,
    Query(query): Query<ListComplaintsQuery>,
) -> Result<Json<ApiResponse<Vec<ComplaintResponseDto>>>> {
    let (complaints, total) = state
        .complaint_service
        .list(query.filter(), query.offset(), query.limit())
        .await?;

    let dtos: Vec<ComplaintResponseDto> = complaints.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get complaint by ID
#[utoipa::path(
    get,
    path = "/api/complaints/{id}",
    params(
        ("id" = Uuid, Path, description = "Complaint ID")
    ),
    responses(
        (status = 200, description = "Complaint found", body = ApiResponse<ComplaintResponseDto>),
        (status = 404, description = "Complaint not found")
    ),
    tag = "complaints"
)]
pub async fn get_complaint(
    State(state): State<ComplaintState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ComplaintResponseDto>>> {
    let summary = state.complaint_service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(summary.into()), None, None)))
}

/// Delete a complaint, reassigning its supports
///
/// Only the author may delete. Supports move to a nearby complaint of
/// the same category when one exists; otherwise the oldest support is
/// promoted into a replacement complaint.
#[utoipa::path(
    delete,
    path = "/api/complaints/{id}",
    params(
        ("id" = Uuid, Path, description = "Complaint ID"),
        DeleteComplaintQuery
    ),
    responses(
        (status = 200, description = "Complaint deleted", body = ApiResponse<DeletionResponseDto>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Complaint not found")
    ),
    security((), ("bearer_auth" = [])),
    tag = "complaints"
)]
pub async fn delete_complaint(
    OptionalUser(user): OptionalUser,
    State(state): State<ComplaintState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteComplaintQuery>,
) -> Result<Json<ApiResponse<DeletionResponseDto>>> {
    let author = Author::resolve(user.as_ref(), query.guest_name.as_deref())?;
    let outcome = state.deletion_service.delete(id, &author).await?;
    Ok(Json(ApiResponse::success(Some(outcome.into()), None, None)))
}

/// Mark own complaint as resolved
#[utoipa::path(
    post,
    path = "/api/complaints/{id}/resolve",
    params(
        ("id" = Uuid, Path, description = "Complaint ID")
    ),
    responses(
        (status = 200, description = "Complaint resolved", body = ApiResponse<ComplaintResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Complaint not found")
    ),
    security(("bearer_auth" = [])),
    tag = "complaints"
)]
pub async fn resolve_complaint(
    user: AuthenticatedUser,
    State(service): State<Arc<ComplaintService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ComplaintResponseDto>>> {
    let summary = service.resolve(id, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(summary.into()),
        Some("Complaint marked as resolved".to_string()),
        None,
    )))
}

/// Update complaint status (officials only)
#[utoipa::path(
    patch,
    path = "/api/complaints/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Complaint ID")
    ),
    request_body = ChangeStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ComplaintResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Requires the official role"),
        (status = 404, description = "Complaint not found")
    ),
    security(("bearer_auth" = [])),
    tag = "complaints"
)]
pub async fn update_complaint_status(
    user: AuthenticatedUser,
    State(service): State<Arc<ComplaintService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<ChangeStatusDto>,
) -> Result<Json<ApiResponse<ComplaintResponseDto>>> {
    let summary = service.change_status(id, dto.status, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(summary.into()),
        Some("Status updated successfully".to_string()),
        None,
    )))
}

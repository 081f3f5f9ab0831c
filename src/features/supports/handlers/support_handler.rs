use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::supports::dtos::{
    AddSupportDto, SupportResponseDto, SupportResultResponseDto,
};
use crate::features::supports::services::{SupportOutcome, SupportService};
use crate::shared::types::ApiResponse;

/// Support a complaint directly
///
/// Idempotent: supporting a complaint the caller already supports
/// reports `already_supported` without writing anything.
#[utoipa::path(
    post,
    path = "/api/supports",
    request_body = AddSupportDto,
    responses(
        (status = 201, description = "Support added", body = ApiResponse<SupportResultResponseDto>),
        (status = 200, description = "Already supported", body = ApiResponse<SupportResultResponseDto>),
        (status = 400, description = "Complaint can no longer be supported"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Complaint not found")
    ),
    security(("bearer_auth" = [])),
    tag = "supports"
)]
pub async fn add_support(
    user: AuthenticatedUser,
    State(service): State<Arc<SupportService>>,
    AppJson(dto): AppJson<AddSupportDto>,
) -> Result<(StatusCode, Json<ApiResponse<SupportResultResponseDto>>)> {
    let result = service.add(dto.complaint_id, &user).await?;

    let status = match result.outcome {
        SupportOutcome::Added => StatusCode::CREATED,
        SupportOutcome::AlreadySupported => StatusCode::OK,
    };

    Ok((
        status,
        Json(ApiResponse::success(Some(result.into()), None, None)),
    ))
}

/// List the caller's supports
#[utoipa::path(
    get,
    path = "/api/supports",
    responses(
        (status = 200, description = "List of the caller's supports", body = ApiResponse<Vec<SupportResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "supports"
)]
pub async fn list_my_supports(
    user: AuthenticatedUser,
    State(service): State<Arc<SupportService>>,
) -> Result<Json<ApiResponse<Vec<SupportResponseDto>>>> {
    let supports = service.list_mine(&user).await?;
    let dtos: Vec<SupportResponseDto> = supports.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Retract one of the caller's supports
#[utoipa::path(
    delete,
    path = "/api/supports/{id}",
    params(
        ("id" = Uuid, Path, description = "Support ID")
    ),
    responses(
        (status = 200, description = "Support retracted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the supporter"),
        (status = 404, description = "Support not found")
    ),
    security(("bearer_auth" = [])),
    tag = "supports"
)]
pub async fn retract_support(
    user: AuthenticatedUser,
    State(service): State<Arc<SupportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.retract(id, &user).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Support retracted successfully".to_string()),
        None,
    )))
}

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::comments::{dtos as comments_dtos, handlers as comments_handlers};
use crate::features::complaints::{
    dtos as complaints_dtos, handlers as complaints_handlers, models as complaints_models,
    services as complaints_services,
};
use crate::features::supports::{dtos as supports_dtos, handlers as supports_handlers};
use crate::features::supports::services as supports_services;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories (public)
        categories_handlers::list_categories,
        categories_handlers::get_category,
        // Complaints
        complaints_handlers::list_complaints,
        complaints_handlers::get_complaint,
        complaints_handlers::submit_complaint,
        complaints_handlers::delete_complaint,
        complaints_handlers::resolve_complaint,
        complaints_handlers::update_complaint_status,
        // Supports (protected)
        supports_handlers::add_support,
        supports_handlers::list_my_supports,
        supports_handlers::retract_support,
        // Comments
        comments_handlers::list_comments,
        comments_handlers::create_comment,
        comments_handlers::delete_comment,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Categories
            categories_dtos::CategoryResponseDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            // Complaints
            complaints_models::Author,
            complaints_models::ComplaintStatus,
            complaints_models::Jurisdiction,
            complaints_services::GroupingOutcome,
            complaints_dtos::CreateComplaintDto,
            complaints_dtos::ChangeStatusDto,
            complaints_dtos::ComplaintResponseDto,
            complaints_dtos::SubmissionResponseDto,
            complaints_dtos::DeletionResponseDto,
            ApiResponse<Vec<complaints_dtos::ComplaintResponseDto>>,
            ApiResponse<complaints_dtos::ComplaintResponseDto>,
            ApiResponse<complaints_dtos::SubmissionResponseDto>,
            ApiResponse<complaints_dtos::DeletionResponseDto>,
            // Supports
            supports_services::SupportOutcome,
            supports_dtos::AddSupportDto,
            supports_dtos::SupportResponseDto,
            supports_dtos::SupportResultResponseDto,
            ApiResponse<Vec<supports_dtos::SupportResponseDto>>,
            ApiResponse<supports_dtos::SupportResultResponseDto>,
            // Comments
            comments_dtos::CreateCommentDto,
            comments_dtos::CommentResponseDto,
            ApiResponse<Vec<comments_dtos::CommentResponseDto>>,
            ApiResponse<comments_dtos::CommentResponseDto>,
        )
    ),
    tags(
        (name = "categories", description = "Complaint categories (public)"),
        (name = "complaints", description = "Citizen complaints with proximity grouping"),
        (name = "supports", description = "Direct supports on complaints"),
        (name = "comments", description = "Comments on complaints"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Voz Cidadã API",
        version = "0.1.0",
        description = "API documentation for Voz Cidadã",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

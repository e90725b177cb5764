use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers, model as auth_model};
use crate::features::classification::{
    dtos as classification_dtos, handlers as classification_handlers,
};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::users::models as users_models;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::create_worker,
        auth_handlers::me,
        // Reports
        reports_handlers::create_report,
        reports_handlers::list_reports,
        reports_handlers::list_worker_reports,
        reports_handlers::get_report,
        reports_handlers::update_report_status,
        // Classification
        classification_handlers::classify_image,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth_model::AuthenticatedUser,
            auth_dtos::RegisterRequestDto,
            auth_dtos::LoginRequestDto,
            auth_dtos::CreateWorkerDto,
            auth_dtos::AuthResponseDto,
            auth_dtos::AuthUserDto,
            ApiResponse<auth_dtos::AuthResponseDto>,
            ApiResponse<auth_dtos::AuthUserDto>,
            // Users
            users_models::Role,
            // Reports
            reports_models::Category,
            reports_models::ReportStatus,
            reports_dtos::GeoPointDto,
            reports_dtos::CreateReportDto,
            reports_dtos::UpdateReportStatusDto,
            reports_dtos::ReportResponseDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            // Classification
            classification_dtos::ClassifyImageDto,
            classification_dtos::ClassificationResultDto,
            ApiResponse<classification_dtos::ClassificationResultDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and account endpoints"),
        (name = "reports", description = "Citizen reports, routing and status updates"),
        (name = "classification", description = "Photo upload and category suggestion"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "CivicFix API",
        version = "0.1.0",
        description = "API documentation for CivicFix",
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

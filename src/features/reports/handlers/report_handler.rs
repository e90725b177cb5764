use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::{RequireAdmin, RequireCitizen, RequireWorker};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{
    CreateReportDto, ReportResponseDto, UpdateReportStatusDto,
};
use crate::features::reports::models::CreateReport;
use crate::features::reports::services::{access, ReportService};
use crate::features::users::services::UserService;
use crate::modules::storage::MediaStorage;
use crate::shared::types::ApiResponse;

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub user_service: Arc<UserService>,
    pub media_store: Arc<dyn MediaStorage>,
}

impl ReportState {
    /// Resolve the requester's visible scope, fetching a worker's current
    /// assignment from the store.
    async fn scope_for(&self, user: &AuthenticatedUser) -> Result<access::VisibleScope> {
        let assigned = if user.is_worker() {
            self.user_service.assigned_category(user.user_id).await?
        } else {
            None
        };
        Ok(access::visible_scope(user, assigned))
    }
}

/// Submit a new report (citizens only)
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Citizen access required")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn create_report(
    RequireCitizen(user): RequireCitizen,
    State(state): State<ReportState>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    dto.location.validate_point()?;

    // A photo URL must point at an object we actually hold
    if let Some(photo_url) = &dto.photo {
        let key = state.media_store.key_from_url(photo_url).ok_or_else(|| {
            AppError::Validation("Photo URL does not belong to this service".to_string())
        })?;
        if !state.media_store.exists(&key).await? {
            return Err(AppError::Validation(
                "Photo URL refers to an unknown upload".to_string(),
            ));
        }
    }

    let data = CreateReport {
        title: dto.title,
        description: dto.description,
        category: dto.category,
        longitude: dto.location.longitude(),
        latitude: dto.location.latitude(),
        photo_url: dto.photo,
        // the submitter is always the authenticated caller
        submitted_by: user.user_id,
    };

    let report = state.report_service.create(&data).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(report.into()), None, None)),
    ))
}

/// List reports visible to the authenticated user
#[utoipa::path(
    get,
    path = "/api/reports",
    responses(
        (status = 200, description = "Reports in the requester's scope", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let scope = state.scope_for(&user).await?;
    let reports = state.report_service.list_in_scope(scope).await?;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// List the reports routed to the authenticated worker
#[utoipa::path(
    get,
    path = "/api/reports/worker",
    responses(
        (status = 200, description = "Reports in the worker's assigned category", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Worker access required")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_worker_reports(
    RequireWorker(user): RequireWorker,
    State(state): State<ReportState>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let scope = state.scope_for(&user).await?;
    let reports = state.report_service.list_in_scope(scope).await?;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Get a single report by ID
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Report outside the requester's scope"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.get_by_id(id).await?;

    let scope = state.scope_for(&user).await?;
    if !scope.allows(report.category, report.submitted_by) {
        return Err(AppError::Forbidden(
            "You do not have access to this report".to_string(),
        ));
    }

    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Update a report's status (admin only)
#[utoipa::path(
    put,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Report is resolved"),
        (status = 503, description = "Concurrent modification, retry")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report_status(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<ReportState>,
    Path(id): Path<uuid::Uuid>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.update_status(id, dto.status).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    AuthResponseDto, AuthUserDto, CreateWorkerDto, LoginRequestDto, RegisterRequestDto,
};
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::features::users::services::UserService;
use crate::shared::types::ApiResponse;

/// State for auth handlers
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
}

/// Register a new citizen account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AuthState>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (user, token) = state
        .auth_service
        .register(dto.name, dto.email, dto.password)
        .await?;

    let response = AuthResponseDto {
        access_token: token.access_token,
        token_type: "Bearer".to_string(),
        expires_in: token.expires_in,
        user: user.into(),
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(response), None, None)),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AuthState>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (user, token) = state.auth_service.login(&dto.email, &dto.password).await?;

    let response = AuthResponseDto {
        access_token: token.access_token,
        token_type: "Bearer".to_string(),
        expires_in: token.expires_in,
        user: user.into(),
    };

    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Create a worker account (admin only)
#[utoipa::path(
    post,
    path = "/api/auth/worker",
    request_body = CreateWorkerDto,
    responses(
        (status = 201, description = "Worker created", body = ApiResponse<AuthUserDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn create_worker(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AuthState>,
    AppJson(dto): AppJson<CreateWorkerDto>,
) -> Result<(StatusCode, Json<ApiResponse<AuthUserDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let worker = state
        .auth_service
        .create_worker(dto.name, dto.email, dto.password, dto.assigned_category)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(worker.into()), None, None)),
    ))
}

/// Get the authenticated user's account
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current account", body = ApiResponse<AuthUserDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me(
    user: AuthenticatedUser,
    State(state): State<AuthState>,
) -> Result<Json<ApiResponse<AuthUserDto>>> {
    let account = state.user_service.get_by_id(user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(account.into()), None, None)))
}

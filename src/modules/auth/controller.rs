use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use campus_core::{ApiResponse, ApiResult, ResultExt};
use campus_models::auth::{
    AccountKind, ForgotPasswordRequest, LoginRequest, LoginResponse, ResetPasswordRequest,
    ResetRequested,
};
use tracing::instrument;

use crate::state::AppState;
use crate::utils::email::EmailService;
use crate::validator::ValidatedJson;

use super::service::AuthService;

const LOGIN_FAILED: &str = "Login failed";
const RESET_REQUEST_FAILED: &str = "Failed to request password reset";
const RESET_FAILED: &str = "Failed to reset password";

async fn login(state: &AppState, kind: AccountKind, dto: LoginRequest) -> ApiResult<LoginResponse> {
    let response = AuthService::login(&state.db, kind, dto, &state.jwt_config)
        .await
        .with_message(LOGIN_FAILED)?;
    Ok(ApiResponse::ok(response, "Logged in successfully"))
}

async fn request_reset(
    state: &AppState,
    kind: AccountKind,
    dto: ForgotPasswordRequest,
) -> ApiResult<ResetRequested> {
    let mailer = EmailService::new(state.email_config.clone());
    let requested = AuthService::request_password_reset(
        &state.db,
        &mailer,
        kind,
        &dto.email,
        &state.reset_token_config,
    )
    .await
    .with_message(RESET_REQUEST_FAILED)?;
    Ok(ApiResponse::ok(
        requested,
        "Password reset link sent to your email",
    ))
}

async fn reset(
    state: &AppState,
    kind: AccountKind,
    token: &str,
    dto: ResetPasswordRequest,
) -> ApiResult<()> {
    AuthService::reset_password(&state.db, kind, token, dto, &state.reset_token_config)
        .await
        .with_message(RESET_FAILED)?;
    Ok(ApiResponse::empty(
        StatusCode::ACCEPTED,
        "Password reset successfully",
    ))
}

/// Student login
///
/// Authenticates a student by email and password and returns a bearer token.
#[utoipa::path(
    post,
    path = "/auth/student/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid request body"),
        (status = 401, description = "Unknown email or incorrect password")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn student_login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    login(&state, AccountKind::Student, dto).await
}

/// Employee login
///
/// The issued token marks the caller as an employee.
#[utoipa::path(
    post,
    path = "/auth/employee/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid request body"),
        (status = 401, description = "Unknown email or incorrect password")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn employee_login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    login(&state, AccountKind::Employee, dto).await
}

#[utoipa::path(
    post,
    path = "/auth/student/reset-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset token issued", body = ApiResponse<ResetRequested>),
        (status = 400, description = "Unknown email"),
        (status = 422, description = "Reset email could not be sent")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn student_request_reset(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ForgotPasswordRequest>,
) -> ApiResult<ResetRequested> {
    request_reset(&state, AccountKind::Student, dto).await
}

#[utoipa::path(
    post,
    path = "/auth/employee/reset-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset token issued", body = ApiResponse<ResetRequested>),
        (status = 400, description = "Unknown email"),
        (status = 422, description = "Reset email could not be sent")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn employee_request_reset(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ForgotPasswordRequest>,
) -> ApiResult<ResetRequested> {
    request_reset(&state, AccountKind::Employee, dto).await
}

#[utoipa::path(
    post,
    path = "/auth/student/reset-password/{token}",
    params(("token" = String, Path, description = "Token from the reset email")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 202, description = "Password changed"),
        (status = 400, description = "Passwords do not match"),
        (status = 422, description = "Invalid or expired token")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, token, dto))]
pub async fn student_reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<()> {
    reset(&state, AccountKind::Student, &token, dto).await
}

#[utoipa::path(
    post,
    path = "/auth/employee/reset-password/{token}",
    params(("token" = String, Path, description = "Token from the reset email")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 202, description = "Password changed"),
        (status = 400, description = "Passwords do not match"),
        (status = 422, description = "Invalid or expired token")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, token, dto))]
pub async fn employee_reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<()> {
    reset(&state, AccountKind::Employee, &token, dto).await
}

use axum::{extract::State, http::StatusCode};
use campus_core::{ApiResponse, ApiResult, ResultExt};
use campus_models::profile::{ChangePasswordDto, Profile, UpdateProfileDto};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::ProfileService;

/// Current account
///
/// Returns the student or employee record of the token's subject.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Caller's record", body = ApiResponse<Profile>),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Account no longer exists")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn get_profile(State(state): State<AppState>, user: AuthUser) -> ApiResult<Profile> {
    let profile = ProfileService::get_profile(&state.db, &user)
        .await
        .with_message("Failed to fetch profile")?;
    Ok(ApiResponse::ok(profile, "Profile fetched successfully"))
}

#[utoipa::path(
    post,
    path = "/profile/update",
    request_body = UpdateProfileDto,
    responses(
        (status = 202, description = "Profile updated", body = ApiResponse<Profile>),
        (status = 400, description = "Validation failed or empty update"),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto))]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> ApiResult<Profile> {
    let profile = ProfileService::update_profile(&state.db, &user, dto)
        .await
        .with_message("Failed to update profile")?;
    Ok(ApiResponse::accepted(profile, "Profile updated successfully"))
}

#[utoipa::path(
    post,
    path = "/profile/change-password",
    request_body = ChangePasswordDto,
    responses(
        (status = 202, description = "Password changed"),
        (status = 400, description = "Incorrect current password or mismatched confirmation"),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> ApiResult<()> {
    ProfileService::change_password(&state.db, &user, dto)
        .await
        .with_message("Failed to change password")?;
    Ok(ApiResponse::empty(
        StatusCode::ACCEPTED,
        "Password changed successfully",
    ))
}

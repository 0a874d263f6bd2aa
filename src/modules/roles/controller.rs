use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use campus_core::{ApiResponse, ApiResult, ResultExt};
use campus_models::RoleId;
use campus_models::roles::{CreateRoleDto, Role, SelfPermissions, UpdateRoleDto};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::ids::parse_id;
use crate::validator::ValidatedJson;

use super::service::RoleService;

#[utoipa::path(
    post,
    path = "/role/create",
    request_body = CreateRoleDto,
    responses(
        (status = 201, description = "Role created", body = ApiResponse<Role>),
        (status = 400, description = "Validation failed or name taken"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Requires role.role.create")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_role(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateRoleDto>,
) -> ApiResult<Role> {
    let role = RoleService::create_role(&state.db, dto)
        .await
        .with_message("Failed to create role")?;
    Ok(ApiResponse::created(role, "Role created successfully"))
}

#[utoipa::path(
    get,
    path = "/role",
    responses(
        (status = 200, description = "All roles", body = ApiResponse<Vec<Role>>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Requires role.role.read")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_roles(State(state): State<AppState>) -> ApiResult<Vec<Role>> {
    let roles = RoleService::get_roles(&state.db)
        .await
        .with_message("Failed to fetch roles")?;
    Ok(ApiResponse::ok(roles, "Roles fetched successfully"))
}

#[utoipa::path(
    get,
    path = "/role/{roleId}",
    params(("roleId" = String, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role details", body = ApiResponse<Role>),
        (status = 404, description = "Role not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_role(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<Role> {
    let role_id: RoleId = parse_id(&role_id, "roleId").with_message("Failed to fetch role")?;
    let role = RoleService::get_role(&state.db, role_id)
        .await
        .with_message("Failed to fetch role")?;
    Ok(ApiResponse::ok(role, "Role fetched successfully"))
}

#[utoipa::path(
    patch,
    path = "/role/update/{roleId}",
    params(("roleId" = String, Path, description = "Role ID")),
    request_body = UpdateRoleDto,
    responses(
        (status = 202, description = "Role updated", body = ApiResponse<Role>),
        (status = 400, description = "Validation failed or name taken"),
        (status = 404, description = "Role not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_role(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateRoleDto>,
) -> ApiResult<Role> {
    let role_id: RoleId = parse_id(&role_id, "roleId").with_message("Failed to update role")?;
    let role = RoleService::update_role(&state.db, role_id, dto)
        .await
        .with_message("Failed to update role")?;
    Ok(ApiResponse::accepted(role, "Role updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/role/delete/{roleId}",
    params(("roleId" = String, Path, description = "Role ID")),
    responses(
        (status = 202, description = "Role deleted"),
        (status = 404, description = "Role not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_role(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<()> {
    let role_id: RoleId = parse_id(&role_id, "roleId").with_message("Failed to delete role")?;
    RoleService::delete_role(&state.db, role_id)
        .await
        .with_message("Failed to delete role")?;
    Ok(ApiResponse::empty(StatusCode::ACCEPTED, "Role deleted successfully"))
}

#[utoipa::path(
    get,
    path = "/role/get-permissions/self",
    responses(
        (status = 200, description = "The caller's permissions", body = ApiResponse<SelfPermissions>),
        (status = 401, description = "Unauthenticated or role missing")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_self_permissions(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<SelfPermissions> {
    let permissions = RoleService::self_permissions(&state.db, auth_user.role_id())
        .await
        .with_message("Failed to fetch permissions")?;
    Ok(ApiResponse::ok(permissions, "Permissions fetched successfully"))
}

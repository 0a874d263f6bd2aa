use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use campus_core::{ApiResponse, ApiResult, ResultExt};
use campus_models::DepartmentId;
use campus_models::departments::{Department, DepartmentDto};
use tracing::instrument;

use crate::state::AppState;
use crate::utils::ids::parse_id;
use crate::validator::ValidatedJson;

use super::service::DepartmentService;

#[utoipa::path(
    post,
    path = "/department/create",
    request_body = DepartmentDto,
    responses(
        (status = 201, description = "Department created", body = ApiResponse<Department>),
        (status = 400, description = "Validation failed or name taken"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Requires department.department.create")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_department(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<DepartmentDto>,
) -> ApiResult<Department> {
    let department = DepartmentService::create_department(&state.db, dto)
        .await
        .with_message("Failed to create department")?;
    Ok(ApiResponse::created(department, "Department created successfully"))
}

#[utoipa::path(
    get,
    path = "/department/getall",
    responses(
        (status = 200, description = "All departments", body = ApiResponse<Vec<Department>>),
        (status = 403, description = "Requires department.department.read")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_departments(State(state): State<AppState>) -> ApiResult<Vec<Department>> {
    let departments = DepartmentService::get_departments(&state.db)
        .await
        .with_message("Failed to fetch departments")?;
    Ok(ApiResponse::ok(departments, "Departments fetched successfully"))
}

#[utoipa::path(
    get,
    path = "/department/get/{departmentId}",
    params(("departmentId" = String, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department details", body = ApiResponse<Department>),
        (status = 404, description = "Department not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_department(
    State(state): State<AppState>,
    Path(department_id): Path<String>,
) -> ApiResult<Department> {
    const CONTEXT: &str = "Failed to fetch department";
    let department_id: DepartmentId =
        parse_id(&department_id, "departmentId").with_message(CONTEXT)?;
    let department = DepartmentService::get_department(&state.db, department_id)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::ok(department, "Department fetched successfully"))
}

#[utoipa::path(
    patch,
    path = "/department/update/{departmentId}",
    params(("departmentId" = String, Path, description = "Department ID")),
    request_body = DepartmentDto,
    responses(
        (status = 202, description = "Department updated", body = ApiResponse<Department>),
        (status = 400, description = "Validation failed or name taken"),
        (status = 404, description = "Department not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_department(
    State(state): State<AppState>,
    Path(department_id): Path<String>,
    ValidatedJson(dto): ValidatedJson<DepartmentDto>,
) -> ApiResult<Department> {
    const CONTEXT: &str = "Failed to update department";
    let department_id: DepartmentId =
        parse_id(&department_id, "departmentId").with_message(CONTEXT)?;
    let department = DepartmentService::update_department(&state.db, department_id, dto)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::accepted(department, "Department updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/department/delete/{departmentId}",
    params(("departmentId" = String, Path, description = "Department ID")),
    responses(
        (status = 202, description = "Department deleted"),
        (status = 404, description = "Department not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_department(
    State(state): State<AppState>,
    Path(department_id): Path<String>,
) -> ApiResult<()> {
    const CONTEXT: &str = "Failed to delete department";
    let department_id: DepartmentId =
        parse_id(&department_id, "departmentId").with_message(CONTEXT)?;
    DepartmentService::delete_department(&state.db, department_id)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::empty(
        StatusCode::ACCEPTED,
        "Department deleted successfully",
    ))
}

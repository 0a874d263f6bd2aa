use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use campus_core::pagination::DEFAULT_LIMIT;
use campus_core::{ApiResponse, ApiResult, PagingQuery, ResultExt};
use campus_models::EmployeeId;
use campus_models::employees::{
    CreateEmployeeDto, CreatedEmployee, Employee, EmployeePage, UpdateEmployeeDto,
};
use tracing::instrument;

use crate::state::AppState;
use crate::utils::email::EmailService;
use crate::utils::ids::parse_id;
use crate::validator::ValidatedJson;

use super::service::EmployeeService;

/// Register an employee under an existing role
#[utoipa::path(
    post,
    path = "/employee/create",
    request_body = CreateEmployeeDto,
    responses(
        (status = 201, description = "Employee created", body = ApiResponse<CreatedEmployee>),
        (status = 400, description = "Validation failed, email in use, or unknown department or role"),
        (status = 403, description = "Requires employee.employee.create")
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_employee(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateEmployeeDto>,
) -> ApiResult<CreatedEmployee> {
    let mailer = EmailService::new(state.email_config.clone());
    let created = EmployeeService::create_employee(&state.db, &mailer, dto)
        .await
        .with_message("Failed to create employee")?;
    Ok(ApiResponse::created(created, "Employee created successfully"))
}

#[utoipa::path(
    get,
    path = "/employee/getall",
    params(PagingQuery),
    responses(
        (status = 200, description = "One page of employees", body = ApiResponse<EmployeePage>),
        (status = 403, description = "Requires employee.employee.read"),
        (status = 422, description = "Invalid paging query")
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_employees(
    State(state): State<AppState>,
    Query(query): Query<PagingQuery>,
) -> ApiResult<EmployeePage> {
    const CONTEXT: &str = "Failed to fetch employees";
    let paging = query.into_request(DEFAULT_LIMIT).with_message(CONTEXT)?;
    let page = EmployeeService::get_employees(&state.db, &paging)
        .await
        .with_message(CONTEXT)?;

    Ok(ApiResponse::ok(
        EmployeePage {
            employees: page.items,
            meta: page.meta,
        },
        "Employees fetched successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/employee/get/{employeeId}",
    params(("employeeId" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee details", body = ApiResponse<Employee>),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> ApiResult<Employee> {
    const CONTEXT: &str = "Failed to fetch employee";
    let employee_id: EmployeeId = parse_id(&employee_id, "employeeId").with_message(CONTEXT)?;
    let employee = EmployeeService::get_employee(&state.db, employee_id)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::ok(employee, "Employee fetched successfully"))
}

#[utoipa::path(
    patch,
    path = "/employee/update/{employeeId}",
    params(("employeeId" = String, Path, description = "Employee ID")),
    request_body = UpdateEmployeeDto,
    responses(
        (status = 202, description = "Employee updated", body = ApiResponse<Employee>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateEmployeeDto>,
) -> ApiResult<Employee> {
    const CONTEXT: &str = "Failed to update employee";
    let employee_id: EmployeeId = parse_id(&employee_id, "employeeId").with_message(CONTEXT)?;
    let employee = EmployeeService::update_employee(&state.db, employee_id, dto)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::accepted(employee, "Employee updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/employee/delete/{employeeId}",
    params(("employeeId" = String, Path, description = "Employee ID")),
    responses(
        (status = 202, description = "Employee deleted"),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> ApiResult<()> {
    const CONTEXT: &str = "Failed to delete employee";
    let employee_id: EmployeeId = parse_id(&employee_id, "employeeId").with_message(CONTEXT)?;
    EmployeeService::delete_employee(&state.db, employee_id)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::empty(StatusCode::ACCEPTED, "Employee deleted successfully"))
}

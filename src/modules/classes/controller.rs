use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use campus_core::{ApiResponse, ApiResult, ResultExt};
use campus_models::classes::{Class, CreateClassDto, UpdateClassDto};
use campus_models::{ClassId, DepartmentId};
use tracing::instrument;

use crate::state::AppState;
use crate::utils::ids::parse_id;
use crate::validator::ValidatedJson;

use super::service::ClassService;

#[utoipa::path(
    post,
    path = "/class/create",
    request_body = CreateClassDto,
    responses(
        (status = 201, description = "Class created", body = ApiResponse<Class>),
        (status = 400, description = "Validation failed, name taken or department missing"),
        (status = 403, description = "Requires class.class.create")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_class(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> ApiResult<Class> {
    let class = ClassService::create_class(&state.db, dto)
        .await
        .with_message("Failed to create class")?;
    Ok(ApiResponse::created(class, "Class created successfully"))
}

#[utoipa::path(
    get,
    path = "/class/getall",
    responses(
        (status = 200, description = "All classes", body = ApiResponse<Vec<Class>>),
        (status = 403, description = "Requires class.class.read")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_classes(State(state): State<AppState>) -> ApiResult<Vec<Class>> {
    let classes = ClassService::get_classes(&state.db)
        .await
        .with_message("Failed to fetch classes")?;
    Ok(ApiResponse::ok(classes, "Classes fetched successfully"))
}

#[utoipa::path(
    get,
    path = "/class/get-by-department/{departmentId}",
    params(("departmentId" = String, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Classes of the department", body = ApiResponse<Vec<Class>>),
        (status = 404, description = "Department not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_classes_by_department(
    State(state): State<AppState>,
    Path(department_id): Path<String>,
) -> ApiResult<Vec<Class>> {
    const CONTEXT: &str = "Failed to fetch classes";
    let department_id: DepartmentId =
        parse_id(&department_id, "departmentId").with_message(CONTEXT)?;
    let classes = ClassService::get_classes_by_department(&state.db, department_id)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::ok(classes, "Classes fetched successfully"))
}

#[utoipa::path(
    get,
    path = "/class/get/{classId}",
    params(("classId" = String, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class details", body = ApiResponse<Class>),
        (status = 404, description = "Class not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_class(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> ApiResult<Class> {
    const CONTEXT: &str = "Failed to fetch class";
    let class_id: ClassId = parse_id(&class_id, "classId").with_message(CONTEXT)?;
    let class = ClassService::get_class(&state.db, class_id)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::ok(class, "Class fetched successfully"))
}

#[utoipa::path(
    patch,
    path = "/class/update/{classId}",
    params(("classId" = String, Path, description = "Class ID")),
    request_body = UpdateClassDto,
    responses(
        (status = 202, description = "Class updated", body = ApiResponse<Class>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Class not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_class(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateClassDto>,
) -> ApiResult<Class> {
    const CONTEXT: &str = "Failed to update class";
    let class_id: ClassId = parse_id(&class_id, "classId").with_message(CONTEXT)?;
    let class = ClassService::update_class(&state.db, class_id, dto)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::accepted(class, "Class updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/class/delete/{classId}",
    params(("classId" = String, Path, description = "Class ID")),
    responses(
        (status = 202, description = "Class deleted"),
        (status = 404, description = "Class not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_class(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> ApiResult<()> {
    const CONTEXT: &str = "Failed to delete class";
    let class_id: ClassId = parse_id(&class_id, "classId").with_message(CONTEXT)?;
    ClassService::delete_class(&state.db, class_id)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::empty(StatusCode::ACCEPTED, "Class deleted successfully"))
}

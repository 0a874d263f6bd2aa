use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use campus_core::{ApiResponse, ApiResult, ResultExt};
use campus_models::courses::{Course, CreateCourseDto, UpdateCourseDto};
use campus_models::{CourseId, DepartmentId};
use tracing::instrument;

use crate::state::AppState;
use crate::utils::ids::parse_id;
use crate::validator::ValidatedJson;

use super::service::CourseService;

#[utoipa::path(
    post,
    path = "/course/create",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = ApiResponse<Course>),
        (status = 400, description = "Validation failed, name taken or department missing"),
        (status = 403, description = "Requires course.course.create")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_course(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> ApiResult<Course> {
    let course = CourseService::create_course(&state.db, dto)
        .await
        .with_message("Failed to create course")?;
    Ok(ApiResponse::created(course, "Course created successfully"))
}

#[utoipa::path(
    get,
    path = "/course/getall",
    responses(
        (status = 200, description = "All courses", body = ApiResponse<Vec<Course>>),
        (status = 403, description = "Requires course.course.read")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_courses(State(state): State<AppState>) -> ApiResult<Vec<Course>> {
    let courses = CourseService::get_courses(&state.db)
        .await
        .with_message("Failed to fetch courses")?;
    Ok(ApiResponse::ok(courses, "Courses fetched successfully"))
}

#[utoipa::path(
    get,
    path = "/course/get-by-department/{departmentId}",
    params(("departmentId" = String, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Courses of the department", body = ApiResponse<Vec<Course>>),
        (status = 404, description = "Department not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_courses_by_department(
    State(state): State<AppState>,
    Path(department_id): Path<String>,
) -> ApiResult<Vec<Course>> {
    const CONTEXT: &str = "Failed to fetch courses";
    let department_id: DepartmentId =
        parse_id(&department_id, "departmentId").with_message(CONTEXT)?;
    let courses = CourseService::get_courses_by_department(&state.db, department_id)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::ok(courses, "Courses fetched successfully"))
}

#[utoipa::path(
    get,
    path = "/course/get/{courseId}",
    params(("courseId" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course details", body = ApiResponse<Course>),
        (status = 404, description = "Course not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> ApiResult<Course> {
    const CONTEXT: &str = "Failed to fetch course";
    let course_id: CourseId = parse_id(&course_id, "courseId").with_message(CONTEXT)?;
    let course = CourseService::get_course(&state.db, course_id)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::ok(course, "Course fetched successfully"))
}

#[utoipa::path(
    patch,
    path = "/course/update/{courseId}",
    params(("courseId" = String, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 202, description = "Course updated", body = ApiResponse<Course>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Course not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> ApiResult<Course> {
    const CONTEXT: &str = "Failed to update course";
    let course_id: CourseId = parse_id(&course_id, "courseId").with_message(CONTEXT)?;
    let course = CourseService::update_course(&state.db, course_id, dto)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::accepted(course, "Course updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/course/delete/{courseId}",
    params(("courseId" = String, Path, description = "Course ID")),
    responses(
        (status = 202, description = "Course deleted"),
        (status = 404, description = "Course not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> ApiResult<()> {
    const CONTEXT: &str = "Failed to delete course";
    let course_id: CourseId = parse_id(&course_id, "courseId").with_message(CONTEXT)?;
    CourseService::delete_course(&state.db, course_id)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::empty(StatusCode::ACCEPTED, "Course deleted successfully"))
}

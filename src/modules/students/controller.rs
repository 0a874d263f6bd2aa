use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use campus_core::pagination::DEFAULT_LIMIT;
use campus_core::{ApiResponse, ApiResult, PagingQuery, ResultExt};
use campus_models::StudentId;
use campus_models::students::{
    CreateStudentDto, CreatedStudent, Student, StudentPage, UpdateStudentDto,
};
use tracing::instrument;

use crate::state::AppState;
use crate::utils::email::EmailService;
use crate::utils::ids::parse_id;
use crate::validator::ValidatedJson;

use super::service::StudentService;

/// Register a student
///
/// A username and password are generated and mailed to the student. The
/// `emailDelivery` field reports whether that mail went out.
#[utoipa::path(
    post,
    path = "/student/create",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = ApiResponse<CreatedStudent>),
        (status = 400, description = "Validation failed, email in use, or unknown class/department"),
        (status = 403, description = "Requires student.student.create")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> ApiResult<CreatedStudent> {
    let mailer = EmailService::new(state.email_config.clone());
    let created = StudentService::create_student(&state.db, &mailer, dto)
        .await
        .with_message("Failed to create student")?;
    Ok(ApiResponse::created(created, "Student created successfully"))
}

#[utoipa::path(
    get,
    path = "/student/getall",
    params(PagingQuery),
    responses(
        (status = 200, description = "One page of students", body = ApiResponse<StudentPage>),
        (status = 403, description = "Requires student.student.read"),
        (status = 422, description = "Invalid paging query")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    Query(query): Query<PagingQuery>,
) -> ApiResult<StudentPage> {
    const CONTEXT: &str = "Failed to fetch students";
    let paging = query.into_request(DEFAULT_LIMIT).with_message(CONTEXT)?;
    let page = StudentService::get_students(&state.db, &paging)
        .await
        .with_message(CONTEXT)?;

    Ok(ApiResponse::ok(
        StudentPage {
            students: page.items,
            meta: page.meta,
        },
        "Students fetched successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/student/get/{studentId}",
    params(("studentId" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = ApiResponse<Student>),
        (status = 404, description = "Student not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> ApiResult<Student> {
    const CONTEXT: &str = "Failed to fetch student";
    let student_id: StudentId = parse_id(&student_id, "studentId").with_message(CONTEXT)?;
    let student = StudentService::get_student(&state.db, student_id)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::ok(student, "Student fetched successfully"))
}

#[utoipa::path(
    patch,
    path = "/student/update/{studentId}",
    params(("studentId" = String, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 202, description = "Student updated", body = ApiResponse<Student>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Student not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> ApiResult<Student> {
    const CONTEXT: &str = "Failed to update student";
    let student_id: StudentId = parse_id(&student_id, "studentId").with_message(CONTEXT)?;
    let student = StudentService::update_student(&state.db, student_id, dto)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::accepted(student, "Student updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/student/delete/{studentId}",
    params(("studentId" = String, Path, description = "Student ID")),
    responses(
        (status = 202, description = "Student deleted"),
        (status = 404, description = "Student not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> ApiResult<()> {
    const CONTEXT: &str = "Failed to delete student";
    let student_id: StudentId = parse_id(&student_id, "studentId").with_message(CONTEXT)?;
    StudentService::delete_student(&state.db, student_id)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::empty(StatusCode::ACCEPTED, "Student deleted successfully"))
}

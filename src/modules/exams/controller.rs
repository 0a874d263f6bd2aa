use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use campus_core::pagination::DEFAULT_LIMIT;
use campus_core::{ApiResponse, ApiResult, PagingQuery, ResultExt};
use campus_models::ExamId;
use campus_models::exams::{CreateExamDto, Exam, ExamPage, UpdateExamDto};
use tracing::instrument;

use crate::state::AppState;
use crate::utils::ids::parse_id;
use crate::validator::ValidatedJson;

use super::service::ExamService;

#[utoipa::path(
    post,
    path = "/exam/add-new",
    request_body = CreateExamDto,
    responses(
        (status = 201, description = "Exam created", body = ApiResponse<Exam>),
        (status = 400, description = "Validation failed or exam exists for the session"),
        (status = 403, description = "Requires exam.exam.create")
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_exam(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateExamDto>,
) -> ApiResult<Exam> {
    let exam = ExamService::create_exam(&state.db, dto)
        .await
        .with_message("Failed to create exam")?;
    Ok(ApiResponse::created(exam, "Exam created successfully"))
}

#[utoipa::path(
    get,
    path = "/exam/getall",
    params(PagingQuery),
    responses(
        (status = 200, description = "One page of exams", body = ApiResponse<ExamPage>),
        (status = 403, description = "Requires exam.exam.read"),
        (status = 422, description = "Invalid paging query")
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_exams(
    State(state): State<AppState>,
    Query(query): Query<PagingQuery>,
) -> ApiResult<ExamPage> {
    const CONTEXT: &str = "Failed to fetch exams";
    let paging = query.into_request(DEFAULT_LIMIT).with_message(CONTEXT)?;
    let page = ExamService::get_exams(&state.db, &paging)
        .await
        .with_message(CONTEXT)?;

    Ok(ApiResponse::ok(
        ExamPage {
            exams: page.items,
            meta: page.meta,
        },
        "Exams fetched successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/exam/getall/{session}",
    params(
        ("session" = String, Path, description = "Academic session, e.g. 2023-2024"),
        PagingQuery
    ),
    responses(
        (status = 200, description = "One page of the session's exams", body = ApiResponse<ExamPage>),
        (status = 422, description = "Malformed session or paging query")
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_exams_by_session(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Query(query): Query<PagingQuery>,
) -> ApiResult<ExamPage> {
    const CONTEXT: &str = "Failed to fetch exams";
    let paging = query.into_request(DEFAULT_LIMIT).with_message(CONTEXT)?;
    let page = ExamService::get_exams_by_session(&state.db, &session, &paging)
        .await
        .with_message(CONTEXT)?;

    Ok(ApiResponse::ok(
        ExamPage {
            exams: page.items,
            meta: page.meta,
        },
        "Exams fetched successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/exam/get/{examId}",
    params(("examId" = String, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "Exam details", body = ApiResponse<Exam>),
        (status = 404, description = "Exam not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_exam(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
) -> ApiResult<Exam> {
    const CONTEXT: &str = "Failed to fetch exam";
    let exam_id: ExamId = parse_id(&exam_id, "examId").with_message(CONTEXT)?;
    let exam = ExamService::get_exam(&state.db, exam_id)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::ok(exam, "Exam fetched successfully"))
}

#[utoipa::path(
    patch,
    path = "/exam/update/{examId}",
    params(("examId" = String, Path, description = "Exam ID")),
    request_body = UpdateExamDto,
    responses(
        (status = 202, description = "Exam updated", body = ApiResponse<Exam>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Exam not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_exam(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateExamDto>,
) -> ApiResult<Exam> {
    const CONTEXT: &str = "Failed to update exam";
    let exam_id: ExamId = parse_id(&exam_id, "examId").with_message(CONTEXT)?;
    let exam = ExamService::update_exam(&state.db, exam_id, dto)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::accepted(exam, "Exam updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/exam/delete/{examId}",
    params(("examId" = String, Path, description = "Exam ID")),
    responses(
        (status = 202, description = "Exam deleted"),
        (status = 404, description = "Exam not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_exam(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
) -> ApiResult<()> {
    const CONTEXT: &str = "Failed to delete exam";
    let exam_id: ExamId = parse_id(&exam_id, "examId").with_message(CONTEXT)?;
    ExamService::delete_exam(&state.db, exam_id)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::empty(StatusCode::ACCEPTED, "Exam deleted successfully"))
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use campus_core::pagination::DEFAULT_LIMIT;
use campus_core::{ApiResponse, ApiResult, PagingQuery, ResultExt};
use campus_models::subjects::{CreateSubjectDto, Subject, SubjectPage, UpdateSubjectDto};
use campus_models::{ClassId, SubjectId};
use tracing::instrument;

use crate::state::AppState;
use crate::utils::ids::parse_id;
use crate::validator::ValidatedJson;

use super::service::SubjectService;

#[utoipa::path(
    post,
    path = "/subject/add-new",
    request_body = CreateSubjectDto,
    responses(
        (status = 201, description = "Subject created", body = ApiResponse<Subject>),
        (status = 400, description = "Validation failed, unknown class, or duplicate name"),
        (status = 403, description = "Requires subject.subject.create")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_subject(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateSubjectDto>,
) -> ApiResult<Subject> {
    let subject = SubjectService::create_subject(&state.db, dto)
        .await
        .with_message("Failed to create subject")?;
    Ok(ApiResponse::created(subject, "Subject created successfully"))
}

#[utoipa::path(
    get,
    path = "/subject/getall",
    params(PagingQuery),
    responses(
        (status = 200, description = "One page of subjects", body = ApiResponse<SubjectPage>),
        (status = 422, description = "Invalid paging query")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_subjects(
    State(state): State<AppState>,
    Query(query): Query<PagingQuery>,
) -> ApiResult<SubjectPage> {
    const CONTEXT: &str = "Failed to fetch subjects";
    let paging = query.into_request(DEFAULT_LIMIT).with_message(CONTEXT)?;
    let page = SubjectService::get_subjects(&state.db, &paging)
        .await
        .with_message(CONTEXT)?;

    Ok(ApiResponse::ok(
        SubjectPage {
            subjects: page.items,
            meta: page.meta,
        },
        "Subjects fetched successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/subject/getall/{classId}",
    params(("classId" = String, Path, description = "Class ID"), PagingQuery),
    responses(
        (status = 200, description = "One page of the class's subjects", body = ApiResponse<SubjectPage>),
        (status = 404, description = "Class not found"),
        (status = 422, description = "Malformed id or paging query")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_subjects_by_class(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    Query(query): Query<PagingQuery>,
) -> ApiResult<SubjectPage> {
    const CONTEXT: &str = "Failed to fetch subjects";
    let class_id: ClassId = parse_id(&class_id, "classId").with_message(CONTEXT)?;
    let paging = query.into_request(DEFAULT_LIMIT).with_message(CONTEXT)?;
    let page = SubjectService::get_subjects_by_class(&state.db, class_id, &paging)
        .await
        .with_message(CONTEXT)?;

    Ok(ApiResponse::ok(
        SubjectPage {
            subjects: page.items,
            meta: page.meta,
        },
        "Subjects fetched successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/subject/get/{subjectId}",
    params(("subjectId" = String, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject details", body = ApiResponse<Subject>),
        (status = 404, description = "Subject not found"),
        (status = 422, description = "Malformed id")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_subject(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
) -> ApiResult<Subject> {
    const CONTEXT: &str = "Failed to fetch subject";
    let subject_id: SubjectId = parse_id(&subject_id, "subjectId").with_message(CONTEXT)?;
    let subject = SubjectService::get_subject(&state.db, subject_id)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::ok(subject, "Subject fetched successfully"))
}

#[utoipa::path(
    patch,
    path = "/subject/update/{subjectId}",
    params(("subjectId" = String, Path, description = "Subject ID")),
    request_body = UpdateSubjectDto,
    responses(
        (status = 202, description = "Subject updated", body = ApiResponse<Subject>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Subject not found")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_subject(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateSubjectDto>,
) -> ApiResult<Subject> {
    const CONTEXT: &str = "Failed to update subject";
    let subject_id: SubjectId = parse_id(&subject_id, "subjectId").with_message(CONTEXT)?;
    let subject = SubjectService::update_subject(&state.db, subject_id, dto)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::accepted(subject, "Subject updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/subject/delete/{subjectId}",
    params(("subjectId" = String, Path, description = "Subject ID")),
    responses(
        (status = 202, description = "Subject deleted"),
        (status = 404, description = "Subject not found")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
) -> ApiResult<()> {
    const CONTEXT: &str = "Failed to delete subject";
    let subject_id: SubjectId = parse_id(&subject_id, "subjectId").with_message(CONTEXT)?;
    SubjectService::delete_subject(&state.db, subject_id)
        .await
        .with_message(CONTEXT)?;
    Ok(ApiResponse::empty(StatusCode::ACCEPTED, "Subject deleted successfully"))
}

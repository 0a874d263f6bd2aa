use campus_core::{AppError, ErrorKind, Page, PagingRequest, Violations};
use campus_db::{ListQuery, unique_violation};
use campus_models::ExamId;
use campus_models::exams::{CreateExamDto, Exam, UpdateExamDto, validate_session};
use sqlx::PgPool;
use tracing::instrument;

const EXAM_COLUMNS: &str = "id, name, session, created_at, updated_at";
const EXAM_SORT: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("name", "name"),
    ("session", "session"),
];
const DUPLICATE: &str = "Exam already exists for this session";

pub struct ExamService;

impl ExamService {
    fn listing() -> ListQuery {
        ListQuery::new(EXAM_COLUMNS, "exams").sortable(EXAM_SORT)
    }

    async fn duplicate(
        db: &PgPool,
        name: &str,
        session: &str,
        except: Option<ExamId>,
    ) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM exams WHERE name = $1 AND session = $2 AND ($3::uuid IS NULL OR id <> $3))",
        )
        .bind(name)
        .bind(session)
        .bind(except)
        .fetch_one(db)
        .await?;
        Ok(taken)
    }

    #[instrument(skip(db))]
    pub async fn create_exam(db: &PgPool, dto: CreateExamDto) -> Result<Exam, AppError> {
        let name = dto.name.trim().to_string();

        let mut violations = Violations::new();
        violations.check(
            Self::duplicate(db, &name, &dto.session, None).await?,
            "name",
            DUPLICATE,
        );
        violations.finish()?;

        let exam = sqlx::query_as::<_, Exam>(&format!(
            "INSERT INTO exams (name, session) VALUES ($1, $2) RETURNING {EXAM_COLUMNS}"
        ))
        .bind(&name)
        .bind(&dto.session)
        .fetch_one(db)
        .await
        .map_err(|e| unique_violation(e, "name", DUPLICATE))?;

        Ok(exam)
    }

    #[instrument(skip(db))]
    pub async fn get_exams(db: &PgPool, paging: &PagingRequest) -> Result<Page<Exam>, AppError> {
        let page = Self::listing().fetch_page::<Exam>(db, paging).await?;
        Ok(page)
    }

    /// Exams of one academic session. A malformed session is a 422.
    #[instrument(skip(db))]
    pub async fn get_exams_by_session(
        db: &PgPool,
        session: &str,
        paging: &PagingRequest,
    ) -> Result<Page<Exam>, AppError> {
        validate_session(session)
            .map_err(|_| AppError::field(ErrorKind::UnprocessableEntity, "session", "Invalid session"))?;

        let page = Self::listing()
            .filter_eq("session", session)
            .fetch_page::<Exam>(db, paging)
            .await?;
        Ok(page)
    }

    #[instrument(skip(db))]
    pub async fn get_exam(db: &PgPool, exam_id: ExamId) -> Result<Exam, AppError> {
        sqlx::query_as::<_, Exam>(&format!("SELECT {EXAM_COLUMNS} FROM exams WHERE id = $1"))
            .bind(exam_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found("Exam not found"))
    }

    #[instrument(skip(db))]
    pub async fn update_exam(
        db: &PgPool,
        exam_id: ExamId,
        dto: UpdateExamDto,
    ) -> Result<Exam, AppError> {
        let existing = Self::get_exam(db, exam_id).await?;

        let name = dto
            .name
            .map(|n| n.trim().to_string())
            .unwrap_or(existing.name);
        let session = dto.session.unwrap_or(existing.session);

        let mut violations = Violations::new();
        violations.check(
            Self::duplicate(db, &name, &session, Some(exam_id)).await?,
            "name",
            DUPLICATE,
        );
        violations.finish()?;

        let exam = sqlx::query_as::<_, Exam>(&format!(
            "UPDATE exams SET name = $1, session = $2, updated_at = NOW() WHERE id = $3 RETURNING {EXAM_COLUMNS}"
        ))
        .bind(&name)
        .bind(&session)
        .bind(exam_id)
        .fetch_one(db)
        .await
        .map_err(|e| unique_violation(e, "name", DUPLICATE))?;

        Ok(exam)
    }

    #[instrument(skip(db))]
    pub async fn delete_exam(db: &PgPool, exam_id: ExamId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM exams WHERE id = $1")
            .bind(exam_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Exam not found"));
        }
        Ok(())
    }
}

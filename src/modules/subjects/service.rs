use campus_core::{AppError, Page, PagingRequest, Violations};
use campus_db::{ListQuery, unique_violation};
use campus_models::subjects::{CreateSubjectDto, Subject, SubjectRow, UpdateSubjectDto};
use campus_models::{ClassId, SubjectId};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::classes::service::ClassService;

const SUBJECT_COLUMNS: &str = "s.id, s.name, s.description, s.class_id, c.name AS class_name, \
                               s.created_at, s.updated_at";
const SUBJECT_FROM: &str = "subjects s JOIN classes c ON c.id = s.class_id";
const SUBJECT_SORT: &[(&str, &str)] = &[
    ("createdAt", "s.created_at"),
    ("name", "s.name"),
    ("updatedAt", "s.updated_at"),
];

const DUPLICATE: &str = "Subject already exists in this class";
const CLASS_MISSING: &str = "Class not found";

pub struct SubjectService;

impl SubjectService {
    fn listing() -> ListQuery {
        ListQuery::new(SUBJECT_COLUMNS, SUBJECT_FROM).sortable(SUBJECT_SORT)
    }

    async fn duplicate(
        db: &PgPool,
        name: &str,
        class_id: ClassId,
        except: Option<SubjectId>,
    ) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM subjects WHERE name = $1 AND class_id = $2 AND ($3::uuid IS NULL OR id <> $3))",
        )
        .bind(name)
        .bind(class_id)
        .bind(except)
        .fetch_one(db)
        .await?;
        Ok(taken)
    }

    #[instrument(skip(db))]
    pub async fn create_subject(db: &PgPool, dto: CreateSubjectDto) -> Result<Subject, AppError> {
        let name = dto.name.trim().to_string();

        let mut violations = Violations::new();
        let class_exists = ClassService::exists(db, dto.class).await?;
        violations.check(!class_exists, "class", CLASS_MISSING);
        if class_exists {
            violations.check(Self::duplicate(db, &name, dto.class, None).await?, "name", DUPLICATE);
        }
        violations.finish()?;

        let subject_id = sqlx::query_scalar::<_, SubjectId>(
            "INSERT INTO subjects (name, description, class_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&name)
        .bind(&dto.description)
        .bind(dto.class)
        .fetch_one(db)
        .await
        .map_err(|e| unique_violation(e, "name", DUPLICATE))?;

        Self::get_subject(db, subject_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_subjects(db: &PgPool, paging: &PagingRequest) -> Result<Page<Subject>, AppError> {
        let page = Self::listing().fetch_page::<SubjectRow>(db, paging).await?;
        Ok(page.map(Subject::from))
    }

    /// Subjects taught in one class. An unknown class is a 404.
    #[instrument(skip(db))]
    pub async fn get_subjects_by_class(
        db: &PgPool,
        class_id: ClassId,
        paging: &PagingRequest,
    ) -> Result<Page<Subject>, AppError> {
        if !ClassService::exists(db, class_id).await? {
            return Err(AppError::not_found(CLASS_MISSING));
        }

        let page = Self::listing()
            .filter_eq("s.class_id", class_id.into_inner())
            .fetch_page::<SubjectRow>(db, paging)
            .await?;
        Ok(page.map(Subject::from))
    }

    #[instrument(skip(db))]
    pub async fn get_subject(db: &PgPool, subject_id: SubjectId) -> Result<Subject, AppError> {
        let row = sqlx::query_as::<_, SubjectRow>(&format!(
            "SELECT {SUBJECT_COLUMNS} FROM {SUBJECT_FROM} WHERE s.id = $1"
        ))
        .bind(subject_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Subject not found"))?;
        Ok(Subject::from(row))
    }

    #[instrument(skip(db))]
    pub async fn update_subject(
        db: &PgPool,
        subject_id: SubjectId,
        dto: UpdateSubjectDto,
    ) -> Result<Subject, AppError> {
        let existing = Self::get_subject(db, subject_id).await?;

        let name = dto
            .name
            .map(|n| n.trim().to_string())
            .unwrap_or(existing.name);
        let description = dto.description.or(existing.description);
        let class_id = dto.class.unwrap_or_else(|| ClassId::from(existing.class.id));

        let mut violations = Violations::new();
        if dto.class.is_some() {
            violations.check(!ClassService::exists(db, class_id).await?, "class", CLASS_MISSING);
        }
        violations.check(
            Self::duplicate(db, &name, class_id, Some(subject_id)).await?,
            "name",
            DUPLICATE,
        );
        violations.finish()?;

        sqlx::query(
            "UPDATE subjects SET name = $1, description = $2, class_id = $3, updated_at = NOW() WHERE id = $4",
        )
        .bind(&name)
        .bind(&description)
        .bind(class_id)
        .bind(subject_id)
        .execute(db)
        .await
        .map_err(|e| unique_violation(e, "name", DUPLICATE))?;

        Self::get_subject(db, subject_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_subject(db: &PgPool, subject_id: SubjectId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(subject_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Subject not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::departments::service::DepartmentService;
    use campus_core::ErrorKind;
    use campus_models::classes::CreateClassDto;
    use campus_models::departments::DepartmentDto;

    async fn class(pool: &PgPool, name: &str) -> ClassId {
        let department = DepartmentService::create_department(
            pool,
            DepartmentDto {
                name: format!("{name} dept"),
            },
        )
        .await
        .unwrap();
        ClassService::create_class(
            pool,
            CreateClassDto {
                name: name.to_string(),
                department: department.id,
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn subject(pool: &PgPool, name: &str, class_id: ClassId) -> Subject {
        SubjectService::create_subject(
            pool,
            CreateSubjectDto {
                name: name.to_string(),
                description: None,
                class: class_id,
            },
        )
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_same_name_allowed_in_other_class(pool: PgPool) {
        let first = class(&pool, "BSC 1").await;
        let second = class(&pool, "BSC 2").await;

        subject(&pool, "Physics", first).await;
        let other = subject(&pool, "Physics", second).await;
        assert_eq!(other.class.id, second.into_inner());

        let err = SubjectService::create_subject(
            &pool,
            CreateSubjectDto {
                name: "Physics".to_string(),
                description: None,
                class: first,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_subjects_by_class_filters_and_counts(pool: PgPool) {
        let first = class(&pool, "BSC 1").await;
        let second = class(&pool, "BSC 2").await;
        for i in 0..4 {
            subject(&pool, &format!("Subject {i}"), first).await;
        }
        subject(&pool, "Chemistry", second).await;

        let page = SubjectService::get_subjects_by_class(&pool, first, &PagingRequest::new(1, 3))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.meta.total_records, 4);
        assert!(page.items.iter().all(|s| s.class.id == first.into_inner()));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_subjects_of_unknown_class(pool: PgPool) {
        let err = SubjectService::get_subjects_by_class(&pool, ClassId::new(), &PagingRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_class_delete_cascades_to_subjects(pool: PgPool) {
        let class_id = class(&pool, "BSC 1").await;
        let physics = subject(&pool, "Physics", class_id).await;

        ClassService::delete_class(&pool, class_id).await.unwrap();

        let err = SubjectService::get_subject(&pool, physics.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

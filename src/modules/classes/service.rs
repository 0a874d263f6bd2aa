use campus_core::{AppError, Violations};
use campus_db::unique_violation;
use campus_models::classes::{Class, ClassRow, CreateClassDto, UpdateClassDto};
use campus_models::{ClassId, DepartmentId, canonical_name};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::departments::service::DepartmentService;

const CLASS_SELECT: &str = r#"SELECT c.id, c.name, c.department_id, d.name AS department_name,
       c.created_at, c.updated_at
  FROM classes c
  JOIN departments d ON d.id = c.department_id"#;

const NAME_TAKEN: &str = "Class already exists";
const DEPARTMENT_MISSING: &str = "Department not found";

pub struct ClassService;

impl ClassService {
    async fn name_taken(db: &PgPool, name: &str, except: Option<ClassId>) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM classes WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(except)
        .fetch_one(db)
        .await?;
        Ok(taken)
    }

    pub async fn exists(db: &PgPool, class_id: ClassId) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM classes WHERE id = $1)")
            .bind(class_id)
            .fetch_one(db)
            .await?;
        Ok(exists)
    }

    #[instrument(skip(db))]
    pub async fn create_class(db: &PgPool, dto: CreateClassDto) -> Result<Class, AppError> {
        let name = canonical_name(&dto.name);

        let mut violations = Violations::new();
        violations.check(Self::name_taken(db, &name, None).await?, "name", NAME_TAKEN);
        violations.check(
            !DepartmentService::exists(db, dto.department).await?,
            "department",
            DEPARTMENT_MISSING,
        );
        violations.finish()?;

        let class_id = sqlx::query_scalar::<_, ClassId>(
            "INSERT INTO classes (name, department_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(&name)
        .bind(dto.department)
        .fetch_one(db)
        .await
        .map_err(|e| unique_violation(e, "name", NAME_TAKEN))?;

        Self::get_class(db, class_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_classes(db: &PgPool) -> Result<Vec<Class>, AppError> {
        let rows = sqlx::query_as::<_, ClassRow>(&format!("{CLASS_SELECT} ORDER BY c.created_at ASC"))
            .fetch_all(db)
            .await?;
        Ok(rows.into_iter().map(Class::from).collect())
    }

    /// Classes of one department; the department itself must exist.
    #[instrument(skip(db))]
    pub async fn get_classes_by_department(
        db: &PgPool,
        department_id: DepartmentId,
    ) -> Result<Vec<Class>, AppError> {
        if !DepartmentService::exists(db, department_id).await? {
            return Err(AppError::not_found(DEPARTMENT_MISSING));
        }

        let rows = sqlx::query_as::<_, ClassRow>(&format!(
            "{CLASS_SELECT} WHERE c.department_id = $1 ORDER BY c.created_at ASC"
        ))
        .bind(department_id)
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(Class::from).collect())
    }

    #[instrument(skip(db))]
    pub async fn get_class(db: &PgPool, class_id: ClassId) -> Result<Class, AppError> {
        let row = sqlx::query_as::<_, ClassRow>(&format!("{CLASS_SELECT} WHERE c.id = $1"))
            .bind(class_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found("Class not found"))?;
        Ok(Class::from(row))
    }

    #[instrument(skip(db))]
    pub async fn update_class(
        db: &PgPool,
        class_id: ClassId,
        dto: UpdateClassDto,
    ) -> Result<Class, AppError> {
        let existing = Self::get_class(db, class_id).await?;

        let name = dto
            .name
            .as_deref()
            .map(canonical_name)
            .unwrap_or(existing.name);
        let department_id = dto
            .department
            .unwrap_or_else(|| DepartmentId::from(existing.department.id));

        let mut violations = Violations::new();
        violations.check(
            Self::name_taken(db, &name, Some(class_id)).await?,
            "name",
            NAME_TAKEN,
        );
        if dto.department.is_some() {
            violations.check(
                !DepartmentService::exists(db, department_id).await?,
                "department",
                DEPARTMENT_MISSING,
            );
        }
        violations.finish()?;

        sqlx::query("UPDATE classes SET name = $1, department_id = $2, updated_at = NOW() WHERE id = $3")
            .bind(&name)
            .bind(department_id)
            .bind(class_id)
            .execute(db)
            .await
            .map_err(|e| unique_violation(e, "name", NAME_TAKEN))?;

        Self::get_class(db, class_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_class(db: &PgPool, class_id: ClassId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(class_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Class not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::{ErrorDetail, ErrorKind};
    use campus_models::departments::DepartmentDto;

    async fn department(pool: &PgPool, name: &str) -> DepartmentId {
        DepartmentService::create_department(
            pool,
            DepartmentDto {
                name: name.to_string(),
            },
        )
        .await
        .unwrap()
        .id
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_class_embeds_department(pool: PgPool) {
        let department_id = department(&pool, "Science").await;
        let class = ClassService::create_class(
            &pool,
            CreateClassDto {
                name: "bsc 1".to_string(),
                department: department_id,
            },
        )
        .await
        .unwrap();

        assert_eq!(class.name, "BSC 1");
        assert_eq!(class.department.id, department_id.into_inner());
        assert_eq!(class.department.name, "SCIENCE");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_class_reports_all_violations(pool: PgPool) {
        let department_id = department(&pool, "Science").await;
        ClassService::create_class(
            &pool,
            CreateClassDto {
                name: "BSC 1".to_string(),
                department: department_id,
            },
        )
        .await
        .unwrap();

        let err = ClassService::create_class(
            &pool,
            CreateClassDto {
                name: "bsc 1".to_string(),
                department: DepartmentId::new(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BadRequest);
        match err.detail() {
            ErrorDetail::Fields(fields) => {
                let paths: Vec<&str> = fields.iter().map(|f| f.path.as_str()).collect();
                assert_eq!(paths, vec!["name", "department"]);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_classes_by_unknown_department(pool: PgPool) {
        let err = ClassService::get_classes_by_department(&pool, DepartmentId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

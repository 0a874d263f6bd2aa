use campus_core::{AppError, Violations};
use campus_db::unique_violation;
use campus_models::DepartmentId;
use campus_models::canonical_name;
use campus_models::departments::{Department, DepartmentDto};
use sqlx::PgPool;
use tracing::instrument;

const DEPARTMENT_COLUMNS: &str = "id, name, created_at, updated_at";
const NAME_TAKEN: &str = "Department already exists";

pub struct DepartmentService;

impl DepartmentService {
    async fn name_taken(
        db: &PgPool,
        name: &str,
        except: Option<DepartmentId>,
    ) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM departments WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(except)
        .fetch_one(db)
        .await?;
        Ok(taken)
    }

    pub async fn exists(db: &PgPool, department_id: DepartmentId) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM departments WHERE id = $1)")
                .bind(department_id)
                .fetch_one(db)
                .await?;
        Ok(exists)
    }

    #[instrument(skip(db))]
    pub async fn create_department(db: &PgPool, dto: DepartmentDto) -> Result<Department, AppError> {
        let name = canonical_name(&dto.name);

        let mut violations = Violations::new();
        violations.check(Self::name_taken(db, &name, None).await?, "name", NAME_TAKEN);
        violations.finish()?;

        let department = sqlx::query_as::<_, Department>(&format!(
            "INSERT INTO departments (name) VALUES ($1) RETURNING {DEPARTMENT_COLUMNS}"
        ))
        .bind(&name)
        .fetch_one(db)
        .await
        .map_err(|e| unique_violation(e, "name", NAME_TAKEN))?;

        Ok(department)
    }

    #[instrument(skip(db))]
    pub async fn get_departments(db: &PgPool) -> Result<Vec<Department>, AppError> {
        let departments = sqlx::query_as::<_, Department>(&format!(
            "SELECT {DEPARTMENT_COLUMNS} FROM departments ORDER BY created_at ASC"
        ))
        .fetch_all(db)
        .await?;
        Ok(departments)
    }

    #[instrument(skip(db))]
    pub async fn get_department(
        db: &PgPool,
        department_id: DepartmentId,
    ) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>(&format!(
            "SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE id = $1"
        ))
        .bind(department_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Department not found"))
    }

    #[instrument(skip(db))]
    pub async fn update_department(
        db: &PgPool,
        department_id: DepartmentId,
        dto: DepartmentDto,
    ) -> Result<Department, AppError> {
        Self::get_department(db, department_id).await?;
        let name = canonical_name(&dto.name);

        let mut violations = Violations::new();
        violations.check(
            Self::name_taken(db, &name, Some(department_id)).await?,
            "name",
            NAME_TAKEN,
        );
        violations.finish()?;

        let department = sqlx::query_as::<_, Department>(&format!(
            "UPDATE departments SET name = $1, updated_at = NOW() WHERE id = $2 RETURNING {DEPARTMENT_COLUMNS}"
        ))
        .bind(&name)
        .bind(department_id)
        .fetch_one(db)
        .await
        .map_err(|e| unique_violation(e, "name", NAME_TAKEN))?;

        Ok(department)
    }

    #[instrument(skip(db))]
    pub async fn delete_department(db: &PgPool, department_id: DepartmentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(department_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Department not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::ErrorKind;

    fn dto(name: &str) -> DepartmentDto {
        DepartmentDto {
            name: name.to_string(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_department_uppercases(pool: PgPool) {
        let department = DepartmentService::create_department(&pool, dto("computer science"))
            .await
            .unwrap();
        assert_eq!(department.name, "COMPUTER SCIENCE");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_department_rejected(pool: PgPool) {
        DepartmentService::create_department(&pool, dto("Commerce"))
            .await
            .unwrap();
        let err = DepartmentService::create_department(&pool, dto("COMMERCE "))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_rename_to_own_name_is_allowed(pool: PgPool) {
        let department = DepartmentService::create_department(&pool, dto("Arts"))
            .await
            .unwrap();
        let renamed = DepartmentService::update_department(&pool, department.id, dto("arts"))
            .await
            .unwrap();
        assert_eq!(renamed.name, "ARTS");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_missing_department(pool: PgPool) {
        let err = DepartmentService::get_department(&pool, DepartmentId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

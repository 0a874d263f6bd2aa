use campus_core::{AppError, Violations};
use campus_db::unique_violation;
use campus_models::courses::{Course, CourseRow, CreateCourseDto, UpdateCourseDto};
use campus_models::{CourseId, DepartmentId};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::departments::service::DepartmentService;

const COURSE_SELECT: &str = r#"SELECT co.id, co.name, co.description, co.eligibility, co.opportunities,
       co.images, co.department_id, d.name AS department_name, co.created_at, co.updated_at
  FROM courses co
  JOIN departments d ON d.id = co.department_id"#;

const NAME_TAKEN: &str = "Course already exists";
const DEPARTMENT_MISSING: &str = "Department not found";

pub struct CourseService;

impl CourseService {
    async fn name_taken(db: &PgPool, name: &str, except: Option<CourseId>) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM courses WHERE LOWER(name) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(except)
        .fetch_one(db)
        .await?;
        Ok(taken)
    }

    #[instrument(skip(db))]
    pub async fn create_course(db: &PgPool, dto: CreateCourseDto) -> Result<Course, AppError> {
        let name = dto.name.trim().to_string();

        let mut violations = Violations::new();
        violations.check(Self::name_taken(db, &name, None).await?, "name", NAME_TAKEN);
        violations.check(
            !DepartmentService::exists(db, dto.department).await?,
            "department",
            DEPARTMENT_MISSING,
        );
        violations.finish()?;

        let course_id = sqlx::query_scalar::<_, CourseId>(
            r#"INSERT INTO courses (name, description, eligibility, opportunities, images, department_id)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id"#,
        )
        .bind(&name)
        .bind(&dto.description)
        .bind(&dto.eligibility)
        .bind(&dto.opportunities)
        .bind(&dto.images)
        .bind(dto.department)
        .fetch_one(db)
        .await
        .map_err(|e| unique_violation(e, "name", NAME_TAKEN))?;

        Self::get_course(db, course_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_courses(db: &PgPool) -> Result<Vec<Course>, AppError> {
        let rows = sqlx::query_as::<_, CourseRow>(&format!("{COURSE_SELECT} ORDER BY co.created_at ASC"))
            .fetch_all(db)
            .await?;
        Ok(rows.into_iter().map(Course::from).collect())
    }

    #[instrument(skip(db))]
    pub async fn get_courses_by_department(
        db: &PgPool,
        department_id: DepartmentId,
    ) -> Result<Vec<Course>, AppError> {
        if !DepartmentService::exists(db, department_id).await? {
            return Err(AppError::not_found(DEPARTMENT_MISSING));
        }

        let rows = sqlx::query_as::<_, CourseRow>(&format!(
            "{COURSE_SELECT} WHERE co.department_id = $1 ORDER BY co.created_at ASC"
        ))
        .bind(department_id)
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(Course::from).collect())
    }

    #[instrument(skip(db))]
    pub async fn get_course(db: &PgPool, course_id: CourseId) -> Result<Course, AppError> {
        let row = sqlx::query_as::<_, CourseRow>(&format!("{COURSE_SELECT} WHERE co.id = $1"))
            .bind(course_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))?;
        Ok(Course::from(row))
    }

    #[instrument(skip(db))]
    pub async fn update_course(
        db: &PgPool,
        course_id: CourseId,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let existing = Self::get_course(db, course_id).await?;

        let name = dto
            .name
            .map(|n| n.trim().to_string())
            .unwrap_or(existing.name);
        let department_id = dto
            .department
            .unwrap_or_else(|| DepartmentId::from(existing.department.id));

        let mut violations = Violations::new();
        violations.check(
            Self::name_taken(db, &name, Some(course_id)).await?,
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

        let description = dto.description.or(existing.description);
        let eligibility = dto.eligibility.or(existing.eligibility);
        let opportunities = dto.opportunities.unwrap_or(existing.opportunities);
        let images = dto.images.unwrap_or(existing.images);

        sqlx::query(
            r#"UPDATE courses
               SET name = $1, description = $2, eligibility = $3, opportunities = $4,
                   images = $5, department_id = $6, updated_at = NOW()
               WHERE id = $7"#,
        )
        .bind(&name)
        .bind(&description)
        .bind(&eligibility)
        .bind(&opportunities)
        .bind(&images)
        .bind(department_id)
        .bind(course_id)
        .execute(db)
        .await
        .map_err(|e| unique_violation(e, "name", NAME_TAKEN))?;

        Self::get_course(db, course_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, course_id: CourseId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Course not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::ErrorKind;
    use campus_models::departments::DepartmentDto;

    async fn department(pool: &PgPool) -> DepartmentId {
        DepartmentService::create_department(
            pool,
            DepartmentDto {
                name: "Management".to_string(),
            },
        )
        .await
        .unwrap()
        .id
    }

    fn dto(name: &str, department: DepartmentId) -> CreateCourseDto {
        CreateCourseDto {
            name: name.to_string(),
            description: Some("Three year programme".to_string()),
            eligibility: None,
            opportunities: vec!["Analyst".to_string()],
            images: vec![],
            department,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_and_list_by_department(pool: PgPool) {
        let department_id = department(&pool).await;
        let course = CourseService::create_course(&pool, dto("BBA", department_id))
            .await
            .unwrap();
        assert_eq!(course.department.name, "MANAGEMENT");
        assert_eq!(course.opportunities, vec!["Analyst".to_string()]);

        let courses = CourseService::get_courses_by_department(&pool, department_id)
            .await
            .unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].id, course.id);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_keeps_unset_fields(pool: PgPool) {
        let department_id = department(&pool).await;
        let course = CourseService::create_course(&pool, dto("BBA", department_id))
            .await
            .unwrap();

        let updated = CourseService::update_course(
            &pool,
            course.id,
            UpdateCourseDto {
                name: None,
                description: None,
                eligibility: Some("10+2".to_string()),
                opportunities: None,
                images: None,
                department: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "BBA");
        assert_eq!(updated.description.as_deref(), Some("Three year programme"));
        assert_eq!(updated.eligibility.as_deref(), Some("10+2"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_course_name(pool: PgPool) {
        let department_id = department(&pool).await;
        CourseService::create_course(&pool, dto("BBA", department_id))
            .await
            .unwrap();
        let err = CourseService::create_course(&pool, dto("bba", department_id))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }
}

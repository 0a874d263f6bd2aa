use campus_core::{AppError, Page, PagingRequest, Violations, generate_password, hash_password};
use campus_db::{ListQuery, unique_violation_on};
use campus_models::roles::STUDENT_ROLE;
use campus_models::students::{
    CreateStudentDto, CreatedStudent, Student, StudentRow, UpdateStudentDto,
};
use campus_models::{ClassId, DepartmentId, StudentId};
use sqlx::PgPool;
use tracing::instrument;

use crate::metrics::track_account_created;
use crate::modules::classes::service::ClassService;
use crate::modules::departments::service::DepartmentService;
use crate::modules::roles::service::RoleService;
use crate::utils::email::EmailService;
use crate::utils::username::generate_username;

pub(crate) const STUDENT_COLUMNS: &str = "s.id, s.first_name, s.last_name, s.fathers_name, \
     s.username, s.email, s.mobile, s.alternative_mobile, s.dob, \
     s.class_id, c.name AS class_name, s.department_id, d.name AS department_name, \
     s.role_id, s.created_at, s.updated_at";
pub(crate) const STUDENT_FROM: &str = "students s \
     LEFT JOIN classes c ON c.id = s.class_id \
     LEFT JOIN departments d ON d.id = s.department_id";
const STUDENT_SORT: &[(&str, &str)] = &[
    ("createdAt", "s.created_at"),
    ("firstName", "s.first_name"),
    ("lastName", "s.last_name"),
    ("username", "s.username"),
    ("email", "s.email"),
];

pub const GENERATED_PASSWORD_LEN: usize = 10;

const EMAIL_TAKEN: &str = "Email already in use";
const ACCOUNT_UNIQUE_FIELDS: &[(&str, &str, &str)] = &[
    ("students_email_key", "email", EMAIL_TAKEN),
    ("students_username_key", "username", "Username already in use"),
];
const CLASS_MISSING: &str = "Class not found";
const DEPARTMENT_MISSING: &str = "Department not found";

pub struct StudentService;

impl StudentService {
    fn listing() -> ListQuery {
        ListQuery::new(STUDENT_COLUMNS, STUDENT_FROM).sortable(STUDENT_SORT)
    }

    async fn email_taken(db: &PgPool, email: &str) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM students WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(db)
        .await?;
        Ok(taken)
    }

    async fn username_taken(db: &PgPool, username: String) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM students WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(db)
        .await?;
        Ok(taken)
    }

    async fn check_references(
        db: &PgPool,
        violations: &mut Violations,
        class: Option<ClassId>,
        department: Option<DepartmentId>,
    ) -> Result<(), AppError> {
        if let Some(class_id) = class {
            violations.check(!ClassService::exists(db, class_id).await?, "class", CLASS_MISSING);
        }
        if let Some(department_id) = department {
            violations.check(
                !DepartmentService::exists(db, department_id).await?,
                "department",
                DEPARTMENT_MISSING,
            );
        }
        Ok(())
    }

    /// Creates the account with a generated username and password, then mails the
    /// credentials. A failed email does not undo the account.
    #[instrument(skip(db, mailer, dto), fields(email = %dto.email))]
    pub async fn create_student(
        db: &PgPool,
        mailer: &EmailService,
        dto: CreateStudentDto,
    ) -> Result<CreatedStudent, AppError> {
        let email = dto.email.trim().to_lowercase();

        let mut violations = Violations::new();
        violations.check(Self::email_taken(db, &email).await?, "email", EMAIL_TAKEN);
        Self::check_references(db, &mut violations, dto.class, dto.department).await?;
        violations.finish()?;

        let username = generate_username(&email, |candidate| Self::username_taken(db, candidate)).await?;
        let password = generate_password(GENERATED_PASSWORD_LEN);
        let password_hash = hash_password(&password)?;
        let role_id = RoleService::find_by_name(db, STUDENT_ROLE).await?.map(|role| role.id);

        let student_id = sqlx::query_scalar::<_, StudentId>(
            r#"INSERT INTO students (first_name, last_name, fathers_name, username, email,
                                     password_hash, mobile, alternative_mobile, dob,
                                     class_id, department_id, role_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
               RETURNING id"#,
        )
        .bind(dto.first_name.trim())
        .bind(&dto.last_name)
        .bind(&dto.fathers_name)
        .bind(&username)
        .bind(&email)
        .bind(&password_hash)
        .bind(&dto.mobile)
        .bind(&dto.alternative_mobile)
        .bind(dto.dob)
        .bind(dto.class)
        .bind(dto.department)
        .bind(role_id)
        .fetch_one(db)
        .await
        .map_err(|e| unique_violation_on(e, ACCOUNT_UNIQUE_FIELDS))?;

        let student = Self::get_student(db, student_id).await?;
        track_account_created("student");
        tracing::info!(student_id = %student.id, %username, "Student created");

        let name = match student.last_name.as_deref() {
            Some(last) if !last.is_empty() => format!("{} {last}", student.first_name),
            _ => student.first_name.clone(),
        };
        let email_delivery = mailer
            .send_account_credentials(&student.email, &name, &username, &password)
            .await;

        Ok(CreatedStudent {
            student,
            email_delivery,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_students(db: &PgPool, paging: &PagingRequest) -> Result<Page<Student>, AppError> {
        let page = Self::listing().fetch_page::<StudentRow>(db, paging).await?;
        Ok(page.map(Student::from))
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, student_id: StudentId) -> Result<Student, AppError> {
        let row = sqlx::query_as::<_, StudentRow>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM {STUDENT_FROM} WHERE s.id = $1"
        ))
        .bind(student_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Student not found"))?;
        Ok(Student::from(row))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        student_id: StudentId,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let existing = Self::get_student(db, student_id).await?;

        let mut violations = Violations::new();
        Self::check_references(db, &mut violations, dto.class, dto.department).await?;
        violations.finish()?;

        let first_name = dto
            .first_name
            .map(|n| n.trim().to_string())
            .unwrap_or(existing.first_name);
        let last_name = dto.last_name.or(existing.last_name);
        let fathers_name = dto.fathers_name.or(existing.fathers_name);
        let mobile = dto.mobile.unwrap_or(existing.mobile);
        let alternative_mobile = dto.alternative_mobile.or(existing.alternative_mobile);
        let dob = dto.dob.or(existing.dob);
        let class_id = dto.class.or(existing.class.map(|c| ClassId::from(c.id)));
        let department_id = dto
            .department
            .or(existing.department.map(|d| DepartmentId::from(d.id)));

        sqlx::query(
            r#"UPDATE students
                  SET first_name = $1, last_name = $2, fathers_name = $3, mobile = $4,
                      alternative_mobile = $5, dob = $6, class_id = $7, department_id = $8,
                      updated_at = NOW()
                WHERE id = $9"#,
        )
        .bind(&first_name)
        .bind(&last_name)
        .bind(&fathers_name)
        .bind(&mobile)
        .bind(&alternative_mobile)
        .bind(dob)
        .bind(class_id)
        .bind(department_id)
        .bind(student_id)
        .execute(db)
        .await?;

        Self::get_student(db, student_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, student_id: StudentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(student_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Student not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_config::EmailConfig;
    use campus_core::{ErrorDetail, ErrorKind, verify_password};
    use campus_models::auth::DeliveryStatus;
    use campus_models::roles::CreateRoleDto;

    fn mailer() -> EmailService {
        EmailService::new(EmailConfig {
            enabled: false,
            smtp_host: "localhost".into(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@campus.local".into(),
            from_name: "Campus".into(),
            frontend_url: "http://localhost:5173".into(),
        })
    }

    fn dto(email: &str) -> CreateStudentDto {
        CreateStudentDto {
            first_name: "Asha".to_string(),
            last_name: Some("Rao".to_string()),
            fathers_name: None,
            email: email.to_string(),
            mobile: "9876543210".to_string(),
            alternative_mobile: None,
            dob: None,
            class: None,
            department: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_student_generates_credentials(pool: PgPool) {
        let created = StudentService::create_student(&pool, &mailer(), dto("Asha.Rao@example.com"))
            .await
            .unwrap();

        assert_eq!(created.student.username, "asha.rao");
        assert_eq!(created.student.email, "asha.rao@example.com");
        assert_eq!(created.email_delivery, DeliveryStatus::Disabled);

        let hash: String = sqlx::query_scalar("SELECT password_hash FROM students WHERE id = $1")
            .bind(created.student.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(hash.starts_with("$2"));
        assert!(!verify_password("", &hash).unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_student_suffixes_taken_username(pool: PgPool) {
        StudentService::create_student(&pool, &mailer(), dto("asha@example.com"))
            .await
            .unwrap();
        let second = StudentService::create_student(&pool, &mailer(), dto("asha@example.org"))
            .await
            .unwrap();

        assert_ne!(second.student.username, "asha");
        assert!(second.student.username.starts_with("asha"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_student_gets_student_role(pool: PgPool) {
        let role = RoleService::create_role(
            &pool,
            CreateRoleDto {
                name: "student".to_string(),
                permissions: vec!["READ".to_string()],
                is_super_admin: false,
            },
        )
        .await
        .unwrap();

        let created = StudentService::create_student(&pool, &mailer(), dto("asha@example.com"))
            .await
            .unwrap();
        assert_eq!(created.student.role, Some(role.id));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_student_reports_violations(pool: PgPool) {
        StudentService::create_student(&pool, &mailer(), dto("asha@example.com"))
            .await
            .unwrap();

        let mut duplicate = dto("ASHA@example.com");
        duplicate.class = Some(ClassId::new());
        let err = StudentService::create_student(&pool, &mailer(), duplicate)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BadRequest);
        match err.detail() {
            ErrorDetail::Fields(fields) => {
                let paths: Vec<&str> = fields.iter().map(|f| f.path.as_str()).collect();
                assert_eq!(paths, vec!["email", "class"]);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_keeps_unsent_fields(pool: PgPool) {
        let created = StudentService::create_student(&pool, &mailer(), dto("asha@example.com"))
            .await
            .unwrap();

        let updated = StudentService::update_student(
            &pool,
            created.student.id,
            UpdateStudentDto {
                mobile: Some("+919999999999".to_string()),
                ..UpdateStudentDto::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.mobile, "+919999999999");
        assert_eq!(updated.first_name, "Asha");
        assert_eq!(updated.last_name.as_deref(), Some("Rao"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_listing_pages(pool: PgPool) {
        for i in 0..12 {
            StudentService::create_student(&pool, &mailer(), dto(&format!("student{i}@example.com")))
                .await
                .unwrap();
        }

        let page = StudentService::get_students(&pool, &PagingRequest::new(2, 10))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.meta.total_records, 12);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_missing_student(pool: PgPool) {
        let err = StudentService::delete_student(&pool, StudentId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

use campus_core::{AppError, Page, PagingRequest, Violations, generate_password, hash_password};
use campus_db::{ListQuery, unique_violation_on};
use campus_models::employees::{
    CreateEmployeeDto, CreatedEmployee, Employee, EmployeeRow, UpdateEmployeeDto,
};
use campus_models::{DepartmentId, EmployeeId, RoleId};
use sqlx::PgPool;
use tracing::instrument;

use crate::metrics::track_account_created;
use crate::modules::departments::service::DepartmentService;
use crate::modules::roles::service::RoleService;
use crate::modules::students::service::GENERATED_PASSWORD_LEN;
use crate::utils::email::EmailService;
use crate::utils::username::generate_username;

pub(crate) const EMPLOYEE_COLUMNS: &str = "e.id, e.first_name, e.last_name, e.fathers_name, \
     e.username, e.email, e.mobile, e.alternative_mobile, e.dob, e.bio, \
     e.department_id, d.name AS department_name, e.role_id, r.name AS role_name, \
     e.created_at, e.updated_at";
pub(crate) const EMPLOYEE_FROM: &str = "employees e \
     LEFT JOIN departments d ON d.id = e.department_id \
     LEFT JOIN roles r ON r.id = e.role_id";
const EMPLOYEE_SORT: &[(&str, &str)] = &[
    ("createdAt", "e.created_at"),
    ("firstName", "e.first_name"),
    ("lastName", "e.last_name"),
    ("username", "e.username"),
    ("email", "e.email"),
];

const EMAIL_TAKEN: &str = "Email already in use";
const ACCOUNT_UNIQUE_FIELDS: &[(&str, &str, &str)] = &[
    ("employees_email_key", "email", EMAIL_TAKEN),
    ("employees_username_key", "username", "Username already in use"),
];
const DEPARTMENT_MISSING: &str = "Department not found";
const ROLE_MISSING: &str = "Role not found";

pub struct EmployeeService;

impl EmployeeService {
    fn listing() -> ListQuery {
        ListQuery::new(EMPLOYEE_COLUMNS, EMPLOYEE_FROM).sortable(EMPLOYEE_SORT)
    }

    async fn email_taken(
        db: &PgPool,
        email: &str,
        except: Option<EmployeeId>,
    ) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE LOWER(email) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(except)
        .fetch_one(db)
        .await?;
        Ok(taken)
    }

    async fn username_taken(db: &PgPool, username: String) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(db)
        .await?;
        Ok(taken)
    }

    async fn check_references(
        db: &PgPool,
        violations: &mut Violations,
        department: Option<DepartmentId>,
        role: Option<RoleId>,
    ) -> Result<(), AppError> {
        if let Some(department_id) = department {
            violations.check(
                !DepartmentService::exists(db, department_id).await?,
                "department",
                DEPARTMENT_MISSING,
            );
        }
        if let Some(role_id) = role {
            violations.check(
                RoleService::find_by_id(db, role_id).await?.is_none(),
                "role",
                ROLE_MISSING,
            );
        }
        Ok(())
    }

    /// Creates the account under the given role and mails the generated
    /// credentials.
    #[instrument(skip(db, mailer, dto), fields(email = %dto.email))]
    pub async fn create_employee(
        db: &PgPool,
        mailer: &EmailService,
        dto: CreateEmployeeDto,
    ) -> Result<CreatedEmployee, AppError> {
        let email = dto.email.trim().to_lowercase();

        let mut violations = Violations::new();
        violations.check(Self::email_taken(db, &email, None).await?, "email", EMAIL_TAKEN);
        Self::check_references(db, &mut violations, dto.department, Some(dto.role)).await?;
        violations.finish()?;

        let username = generate_username(&email, |candidate| Self::username_taken(db, candidate)).await?;
        let password = generate_password(GENERATED_PASSWORD_LEN);
        let password_hash = hash_password(&password)?;

        let employee_id = sqlx::query_scalar::<_, EmployeeId>(
            r#"INSERT INTO employees (first_name, last_name, fathers_name, username, email,
                                      password_hash, mobile, alternative_mobile, dob, bio,
                                      department_id, role_id)
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
        .bind(&dto.bio)
        .bind(dto.department)
        .bind(dto.role)
        .fetch_one(db)
        .await
        .map_err(|e| unique_violation_on(e, ACCOUNT_UNIQUE_FIELDS))?;

        let employee = Self::get_employee(db, employee_id).await?;
        track_account_created("employee");
        tracing::info!(employee_id = %employee.id, %username, "Employee created");

        let name = match employee.last_name.as_deref() {
            Some(last) if !last.is_empty() => format!("{} {last}", employee.first_name),
            _ => employee.first_name.clone(),
        };
        let email_delivery = mailer
            .send_account_credentials(&employee.email, &name, &username, &password)
            .await;

        Ok(CreatedEmployee {
            employee,
            email_delivery,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_employees(
        db: &PgPool,
        paging: &PagingRequest,
    ) -> Result<Page<Employee>, AppError> {
        let page = Self::listing().fetch_page::<EmployeeRow>(db, paging).await?;
        Ok(page.map(Employee::from))
    }

    #[instrument(skip(db))]
    pub async fn get_employee(db: &PgPool, employee_id: EmployeeId) -> Result<Employee, AppError> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM {EMPLOYEE_FROM} WHERE e.id = $1"
        ))
        .bind(employee_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Employee not found"))?;
        Ok(Employee::from(row))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_employee(
        db: &PgPool,
        employee_id: EmployeeId,
        dto: UpdateEmployeeDto,
    ) -> Result<Employee, AppError> {
        let existing = Self::get_employee(db, employee_id).await?;

        let email = dto
            .email
            .map(|e| e.trim().to_lowercase())
            .unwrap_or(existing.email);

        let mut violations = Violations::new();
        violations.check(
            Self::email_taken(db, &email, Some(employee_id)).await?,
            "email",
            EMAIL_TAKEN,
        );
        Self::check_references(db, &mut violations, dto.department, dto.role).await?;
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
        let bio = dto.bio.or(existing.bio);
        let department_id = dto
            .department
            .or(existing.department.map(|d| DepartmentId::from(d.id)));
        let role_id = dto.role.or(existing.role.map(|r| RoleId::from(r.id)));

        sqlx::query(
            r#"UPDATE employees
                  SET first_name = $1, last_name = $2, fathers_name = $3, email = $4, mobile = $5,
                      alternative_mobile = $6, dob = $7, bio = $8, department_id = $9,
                      role_id = $10, updated_at = NOW()
                WHERE id = $11"#,
        )
        .bind(&first_name)
        .bind(&last_name)
        .bind(&fathers_name)
        .bind(&email)
        .bind(&mobile)
        .bind(&alternative_mobile)
        .bind(dob)
        .bind(&bio)
        .bind(department_id)
        .bind(role_id)
        .bind(employee_id)
        .execute(db)
        .await
        .map_err(|e| unique_violation_on(e, ACCOUNT_UNIQUE_FIELDS))?;

        Self::get_employee(db, employee_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_employee(db: &PgPool, employee_id: EmployeeId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(employee_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Employee not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_config::EmailConfig;
    use campus_core::{ErrorDetail, ErrorKind};
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

    async fn role(pool: &PgPool, name: &str) -> RoleId {
        RoleService::create_role(
            pool,
            CreateRoleDto {
                name: name.to_string(),
                is_super_admin: false,
                permissions: vec![campus_core::permissions::STUDENT_READ.to_string()],
            },
        )
        .await
        .unwrap()
        .id
    }

    fn dto(email: &str, role: RoleId) -> CreateEmployeeDto {
        CreateEmployeeDto {
            first_name: "Ravi".to_string(),
            last_name: Some("Kumar".to_string()),
            fathers_name: None,
            email: email.to_string(),
            mobile: "9876543210".to_string(),
            alternative_mobile: None,
            dob: None,
            bio: Some("Teaches physics".to_string()),
            department: None,
            role,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_employee_embeds_role(pool: PgPool) {
        let role_id = role(&pool, "Teacher").await;
        let created = EmployeeService::create_employee(&pool, &mailer(), dto("ravi@example.com", role_id))
            .await
            .unwrap();

        assert_eq!(created.employee.username, "ravi");
        assert_eq!(created.email_delivery, DeliveryStatus::Disabled);
        let embedded = created.employee.role.unwrap();
        assert_eq!(embedded.id, role_id.into_inner());
        assert_eq!(embedded.name, "TEACHER");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_employee_unknown_role(pool: PgPool) {
        let err = EmployeeService::create_employee(&pool, &mailer(), dto("ravi@example.com", RoleId::new()))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BadRequest);
        match err.detail() {
            ErrorDetail::Fields(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].path, "role");
                assert_eq!(fields[0].msg, ROLE_MISSING);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_email_conflict(pool: PgPool) {
        let role_id = role(&pool, "Teacher").await;
        EmployeeService::create_employee(&pool, &mailer(), dto("ravi@example.com", role_id))
            .await
            .unwrap();
        let other = EmployeeService::create_employee(&pool, &mailer(), dto("meera@example.com", role_id))
            .await
            .unwrap();

        let err = EmployeeService::update_employee(
            &pool,
            other.employee.id,
            UpdateEmployeeDto {
                email: Some("Ravi@Example.com".to_string()),
                ..UpdateEmployeeDto::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);

        let same = EmployeeService::update_employee(
            &pool,
            other.employee.id,
            UpdateEmployeeDto {
                email: Some("meera@example.com".to_string()),
                bio: Some("Librarian".to_string()),
                ..UpdateEmployeeDto::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(same.bio.as_deref(), Some("Librarian"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_role_delete_detaches_employee(pool: PgPool) {
        let role_id = role(&pool, "Teacher").await;
        let created = EmployeeService::create_employee(&pool, &mailer(), dto("ravi@example.com", role_id))
            .await
            .unwrap();

        RoleService::delete_role(&pool, role_id).await.unwrap();

        let employee = EmployeeService::get_employee(&pool, created.employee.id)
            .await
            .unwrap();
        assert!(employee.role.is_none());
    }
}

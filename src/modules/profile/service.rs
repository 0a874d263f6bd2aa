use campus_core::{AppError, ErrorKind, hash_password, verify_password};
use campus_models::auth::AccountKind;
use campus_models::employees::UpdateEmployeeDto;
use campus_models::profile::{ChangePasswordDto, Profile, UpdateProfileDto};
use campus_models::students::UpdateStudentDto;
use campus_models::{EmployeeId, StudentId};
use sqlx::PgPool;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::employees::service::EmployeeService;
use crate::modules::students::service::StudentService;

fn account_kind(user: &AuthUser) -> AccountKind {
    if user.is_employee() {
        AccountKind::Employee
    } else {
        AccountKind::Student
    }
}

pub struct ProfileService;

impl ProfileService {
    #[instrument(skip(db, user), fields(subject_id = %user.subject_id()))]
    pub async fn get_profile(db: &PgPool, user: &AuthUser) -> Result<Profile, AppError> {
        let profile = match account_kind(user) {
            AccountKind::Employee => Profile::Employee(
                EmployeeService::get_employee(db, EmployeeId::from(user.subject_id())).await?,
            ),
            AccountKind::Student => Profile::Student(
                StudentService::get_student(db, StudentId::from(user.subject_id())).await?,
            ),
        };
        Ok(profile)
    }

    /// Applies personal-field changes to the caller's own record.
    #[instrument(skip(db, user, dto), fields(subject_id = %user.subject_id()))]
    pub async fn update_profile(
        db: &PgPool,
        user: &AuthUser,
        dto: UpdateProfileDto,
    ) -> Result<Profile, AppError> {
        if dto.is_empty() {
            return Err(AppError::bad_request("No fields to update"));
        }

        let profile = match account_kind(user) {
            AccountKind::Employee => {
                let update = UpdateEmployeeDto {
                    first_name: dto.first_name,
                    last_name: dto.last_name,
                    fathers_name: dto.fathers_name,
                    mobile: dto.mobile,
                    alternative_mobile: dto.alternative_mobile,
                    dob: dto.dob,
                    ..UpdateEmployeeDto::default()
                };
                Profile::Employee(
                    EmployeeService::update_employee(db, EmployeeId::from(user.subject_id()), update)
                        .await?,
                )
            }
            AccountKind::Student => {
                let update = UpdateStudentDto {
                    first_name: dto.first_name,
                    last_name: dto.last_name,
                    fathers_name: dto.fathers_name,
                    mobile: dto.mobile,
                    alternative_mobile: dto.alternative_mobile,
                    dob: dto.dob,
                    ..UpdateStudentDto::default()
                };
                Profile::Student(
                    StudentService::update_student(db, StudentId::from(user.subject_id()), update)
                        .await?,
                )
            }
        };
        Ok(profile)
    }

    #[instrument(skip(db, user, dto), fields(subject_id = %user.subject_id()))]
    pub async fn change_password(
        db: &PgPool,
        user: &AuthUser,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        let table = account_kind(user).table();

        let current_hash = sqlx::query_scalar::<_, String>(&format!(
            "SELECT password_hash FROM {table} WHERE id = $1"
        ))
        .bind(user.subject_id())
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Account not found"))?;

        if !verify_password(&dto.password, &current_hash)? {
            return Err(AppError::field(
                ErrorKind::BadRequest,
                "password",
                "Incorrect password",
            ));
        }

        let new_hash = hash_password(&dto.new_password)?;
        sqlx::query(&format!(
            "UPDATE {table} SET password_hash = $1, updated_at = NOW() WHERE id = $2"
        ))
        .bind(&new_hash)
        .bind(user.subject_id())
        .execute(db)
        .await?;

        tracing::info!("Password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_auth::{Claims, Identity};
    use uuid::Uuid;

    async fn seed(pool: &PgPool, table: &str, password: &str) -> Uuid {
        sqlx::query_scalar(&format!(
            r#"INSERT INTO {table} (first_name, username, email, password_hash, mobile)
               VALUES ('Meera', 'meera', 'meera@example.com', $1, '9876543210') RETURNING id"#
        ))
        .bind(hash_password(password).unwrap())
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn caller(subject_id: Uuid, is_employee: bool) -> AuthUser {
        let identity = Identity {
            subject_id,
            display_name: "Meera".to_string(),
            username: "meera".to_string(),
            role_id: None,
            is_employee,
        };
        AuthUser(Claims::new(&identity, 0, usize::MAX))
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_profile_follows_employee_flag(pool: PgPool) {
        let employee_id = seed(&pool, "employees", "secret123").await;
        let student_id = seed(&pool, "students", "secret123").await;

        let employee = ProfileService::get_profile(&pool, &caller(employee_id, true))
            .await
            .unwrap();
        assert!(matches!(employee, Profile::Employee(e) if e.id.into_inner() == employee_id));

        let student = ProfileService::get_profile(&pool, &caller(student_id, false))
            .await
            .unwrap();
        assert!(matches!(student, Profile::Student(s) if s.id.into_inner() == student_id));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_profile_rejects_empty_body(pool: PgPool) {
        let id = seed(&pool, "students", "secret123").await;
        let err = ProfileService::update_profile(&pool, &caller(id, false), UpdateProfileDto::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_change_password(pool: PgPool) {
        let id = seed(&pool, "employees", "secret123").await;
        let user = caller(id, true);

        let err = ProfileService::change_password(
            &pool,
            &user,
            ChangePasswordDto {
                password: "wrong".to_string(),
                new_password: "fresh-pass".to_string(),
                cnf_password: "fresh-pass".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);

        ProfileService::change_password(
            &pool,
            &user,
            ChangePasswordDto {
                password: "secret123".to_string(),
                new_password: "fresh-pass".to_string(),
                cnf_password: "fresh-pass".to_string(),
            },
        )
        .await
        .unwrap();

        let hash: String = sqlx::query_scalar("SELECT password_hash FROM employees WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(verify_password("fresh-pass", &hash).unwrap());
    }
}

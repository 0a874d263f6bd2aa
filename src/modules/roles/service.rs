use campus_core::{AppError, Violations};
use campus_db::unique_violation;
use campus_models::canonical_name;
use campus_models::roles::{CreateRoleDto, Role, SelfPermissions, UpdateRoleDto};
use campus_models::RoleId;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

const ROLE_COLUMNS: &str = "id, name, is_super_admin, permissions, created_at, updated_at";

pub struct RoleService;

impl RoleService {
    async fn name_taken(db: &PgPool, name: &str, except: Option<RoleId>) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM roles WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(except)
        .fetch_one(db)
        .await?;
        Ok(taken)
    }

    #[instrument(skip(db))]
    pub async fn create_role(db: &PgPool, dto: CreateRoleDto) -> Result<Role, AppError> {
        let name = canonical_name(&dto.name);

        let mut violations = Violations::new();
        violations.check(
            Self::name_taken(db, &name, None).await?,
            "name",
            "Role already exists",
        );
        violations.finish()?;

        let role = sqlx::query_as::<_, Role>(&format!(
            "INSERT INTO roles (name, is_super_admin, permissions) VALUES ($1, $2, $3) RETURNING {ROLE_COLUMNS}"
        ))
        .bind(&name)
        .bind(dto.is_super_admin)
        .bind(&dto.permissions)
        .fetch_one(db)
        .await
        .map_err(|e| unique_violation(e, "name", "Role already exists"))?;

        tracing::info!(role_id = %role.id, name = %role.name, "Role created");
        Ok(role)
    }

    #[instrument(skip(db))]
    pub async fn get_roles(db: &PgPool) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles ORDER BY created_at ASC"
        ))
        .fetch_all(db)
        .await?;
        Ok(roles)
    }

    /// `None` when no role has this id.
    pub async fn find_by_id(db: &PgPool, role_id: RoleId) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE id = $1"
        ))
        .bind(role_id)
        .fetch_optional(db)
        .await?;
        Ok(role)
    }

    pub async fn find_by_name(db: &PgPool, name: &str) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE name = $1"
        ))
        .bind(canonical_name(name))
        .fetch_optional(db)
        .await?;
        Ok(role)
    }

    #[instrument(skip(db))]
    pub async fn get_role(db: &PgPool, role_id: RoleId) -> Result<Role, AppError> {
        Self::find_by_id(db, role_id)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))
    }

    #[instrument(skip(db))]
    pub async fn update_role(
        db: &PgPool,
        role_id: RoleId,
        dto: UpdateRoleDto,
    ) -> Result<Role, AppError> {
        let existing = Self::get_role(db, role_id).await?;

        let name = dto
            .name
            .as_deref()
            .map(canonical_name)
            .unwrap_or(existing.name);

        let mut violations = Violations::new();
        violations.check(
            Self::name_taken(db, &name, Some(role_id)).await?,
            "name",
            "Role already exists",
        );
        violations.finish()?;

        let is_super_admin = dto.is_super_admin.unwrap_or(existing.is_super_admin);
        let permissions = dto.permissions.unwrap_or(existing.permissions);

        let role = sqlx::query_as::<_, Role>(&format!(
            r#"UPDATE roles
               SET name = $1, is_super_admin = $2, permissions = $3, updated_at = NOW()
               WHERE id = $4
               RETURNING {ROLE_COLUMNS}"#
        ))
        .bind(&name)
        .bind(is_super_admin)
        .bind(&permissions)
        .bind(role_id)
        .fetch_one(db)
        .await
        .map_err(|e| unique_violation(e, "name", "Role already exists"))?;

        Ok(role)
    }

    /// Accounts holding the role keep existing with no role.
    #[instrument(skip(db))]
    pub async fn delete_role(db: &PgPool, role_id: RoleId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Role not found"));
        }

        tracing::info!(%role_id, "Role deleted");
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn self_permissions(
        db: &PgPool,
        role_id: Option<Uuid>,
    ) -> Result<SelfPermissions, AppError> {
        let role = match role_id {
            Some(id) => Self::find_by_id(db, RoleId::from(id)).await?,
            None => None,
        };

        role.map(SelfPermissions::from)
            .ok_or_else(|| AppError::unauthorized("Failed to resolve role"))
    }
}

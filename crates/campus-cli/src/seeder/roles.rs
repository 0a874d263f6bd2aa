use anyhow::Context;
use campus_core::hash_password;
use campus_models::roles::SUPER_ADMIN_ROLE;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{SuperAdminSeed, default_roles};

/// Upserts the default roles by name and returns how many were written.
pub async fn seed_roles(db: &PgPool) -> anyhow::Result<usize> {
    let roles = default_roles();
    let mut tx = db.begin().await?;

    for role in &roles {
        let permissions: Vec<String> = role.permissions.iter().map(|p| p.to_string()).collect();
        sqlx::query(
            "INSERT INTO roles (name, is_super_admin, permissions)
             VALUES ($1, $2, $3)
             ON CONFLICT (name) DO UPDATE
             SET is_super_admin = EXCLUDED.is_super_admin,
                 permissions = EXCLUDED.permissions,
                 updated_at = NOW()",
        )
        .bind(role.name)
        .bind(role.is_super_admin)
        .bind(&permissions)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to seed role {}", role.name))?;
    }

    tx.commit().await?;
    Ok(roles.len())
}

/// Upserts the super-admin employee keyed by email. Requires the SUPER ADMIN role.
pub async fn seed_super_admin(db: &PgPool, seed: &SuperAdminSeed) -> anyhow::Result<Uuid> {
    let role_id: Uuid = sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
        .bind(SUPER_ADMIN_ROLE)
        .fetch_optional(db)
        .await?
        .with_context(|| format!("Role {SUPER_ADMIN_ROLE} not found. Run `seed-roles` first."))?;

    let password_hash = hash_password(&seed.password)?;

    let id = sqlx::query_scalar(
        "INSERT INTO employees (first_name, last_name, username, email, password_hash, mobile, role_id)
         VALUES ($1, $2, $3, LOWER($4), $5, $6, $7)
         ON CONFLICT (email) DO UPDATE
         SET first_name = EXCLUDED.first_name,
             last_name = EXCLUDED.last_name,
             password_hash = EXCLUDED.password_hash,
             role_id = EXCLUDED.role_id,
             updated_at = NOW()
         RETURNING id",
    )
    .bind(&seed.first_name)
    .bind(&seed.last_name)
    .bind(&seed.username)
    .bind(&seed.email)
    .bind(&password_hash)
    .bind(&seed.mobile)
    .bind(role_id)
    .fetch_one(db)
    .await
    .context("Failed to write super admin")?;

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_seed() -> SuperAdminSeed {
        SuperAdminSeed {
            first_name: SuperAdminSeed::DEFAULT_FIRST_NAME.to_string(),
            last_name: None,
            username: SuperAdminSeed::DEFAULT_USERNAME.to_string(),
            email: SuperAdminSeed::DEFAULT_EMAIL.to_string(),
            mobile: SuperAdminSeed::DEFAULT_MOBILE.to_string(),
            password: "bootstrap-pass".to_string(),
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_seed_roles_is_repeatable(pool: PgPool) {
        assert_eq!(seed_roles(&pool).await.unwrap(), 2);
        assert_eq!(seed_roles(&pool).await.unwrap(), 2);

        let (is_super_admin, permissions): (bool, Vec<String>) =
            sqlx::query_as("SELECT is_super_admin, permissions FROM roles WHERE name = 'STUDENT'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert!(!is_super_admin);
        assert_eq!(permissions, vec!["READ", "WRITE", "student.create"]);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM roles")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_super_admin_requires_role(pool: PgPool) {
        let err = seed_super_admin(&pool, &admin_seed()).await.unwrap_err();
        assert!(err.to_string().contains("seed-roles"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_super_admin_upserts_by_email(pool: PgPool) {
        seed_roles(&pool).await.unwrap();
        let first = seed_super_admin(&pool, &admin_seed()).await.unwrap();
        let second = seed_super_admin(&pool, &admin_seed()).await.unwrap();
        assert_eq!(first, second);

        let role: String = sqlx::query_scalar(
            "SELECT r.name FROM employees e JOIN roles r ON r.id = e.role_id WHERE e.id = $1",
        )
        .bind(first)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(role, SUPER_ADMIN_ROLE);
    }
}

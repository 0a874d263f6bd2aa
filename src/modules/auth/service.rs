use campus_auth::{Identity, issue_token};
use campus_config::{JwtConfig, ResetTokenConfig};
use campus_core::{AppError, ErrorKind, hash_password, verify_password};
use campus_models::auth::{
    AccountCredentials, AccountKind, DeliveryStatus, LoginRequest, LoginResponse,
    RESET_PASSWORD_TOKEN_TYPE, ResetPasswordRequest, ResetRequested,
};
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::metrics::{
    track_jwt_issued, track_login_failure, track_login_success, track_password_reset,
};
use crate::utils::email::EmailService;

pub const TOKEN_TYPE: &str = "Bearer Token";

const RESET_TOKEN_BYTES: usize = 32;
const INVALID_RESET_TOKEN: &str = "Invalid or expired token";

/// Random hex token handed to the account owner by email.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Only this digest is stored.
pub fn hash_reset_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

pub struct AuthService;

impl AuthService {
    pub async fn find_account(
        db: &PgPool,
        kind: AccountKind,
        email: &str,
    ) -> Result<Option<AccountCredentials>, AppError> {
        let account = sqlx::query_as::<_, AccountCredentials>(&format!(
            "SELECT id, first_name, last_name, username, email, password_hash, role_id
               FROM {} WHERE LOWER(email) = LOWER($1)",
            kind.table()
        ))
        .bind(email.trim())
        .fetch_optional(db)
        .await?;
        Ok(account)
    }

    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        kind: AccountKind,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let Some(account) = Self::find_account(db, kind, &dto.email).await? else {
            track_login_failure(kind.as_str(), "unknown_email");
            return Err(AppError::field(ErrorKind::Unauthorized, "email", "Invalid email"));
        };

        if !verify_password(&dto.password, &account.password_hash)? {
            track_login_failure(kind.as_str(), "invalid_password");
            return Err(AppError::field(
                ErrorKind::Unauthorized,
                "password",
                "Incorrect password",
            ));
        }

        let identity = Identity {
            subject_id: account.id,
            display_name: account.display_name(),
            username: account.username,
            role_id: account.role_id,
            is_employee: kind.is_employee(),
        };
        let token = issue_token(&identity, jwt_config)?;

        track_jwt_issued();
        track_login_success(kind.as_str());
        tracing::info!(subject_id = %identity.subject_id, kind = kind.as_str(), "Login succeeded");

        Ok(LoginResponse {
            token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: jwt_config.expires_in(),
        })
    }

    async fn purge_expired_tokens(db: &PgPool, config: &ResetTokenConfig) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM reset_tokens WHERE created_at < NOW() - ($1::float8 * INTERVAL '1 second')",
        )
        .bind(config.expiry_seconds as f64)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    /// Stores a fresh token for the account behind `email` and mails the link.
    ///
    /// Any earlier token of the same account is replaced. When the mail cannot be
    /// sent the token is removed again and the request fails.
    #[instrument(skip(db, mailer, config))]
    pub async fn request_password_reset(
        db: &PgPool,
        mailer: &EmailService,
        kind: AccountKind,
        email: &str,
        config: &ResetTokenConfig,
    ) -> Result<ResetRequested, AppError> {
        let purged = Self::purge_expired_tokens(db, config).await?;
        if purged > 0 {
            tracing::debug!(purged, "Expired reset tokens removed");
        }

        let account = Self::find_account(db, kind, email)
            .await?
            .ok_or_else(|| AppError::field(ErrorKind::BadRequest, "email", "Invalid email"))?;

        let token = generate_reset_token();
        let token_hash = hash_reset_token(&token);

        let mut tx = db.begin().await?;
        sqlx::query("DELETE FROM reset_tokens WHERE subject_kind = $1 AND subject_id = $2")
            .bind(kind.as_str())
            .bind(account.id)
            .execute(&mut *tx)
            .await?;
        let token_id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO reset_tokens (token_hash, token_type, subject_kind, subject_id)
               VALUES ($1, $2, $3, $4)
               RETURNING id"#,
        )
        .bind(&token_hash)
        .bind(RESET_PASSWORD_TOKEN_TYPE)
        .bind(kind.as_str())
        .bind(account.id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        let email_delivery = mailer
            .send_password_reset_email(&account.email, &account.display_name(), &token)
            .await;

        if email_delivery == DeliveryStatus::Failed {
            sqlx::query("DELETE FROM reset_tokens WHERE id = $1")
                .bind(token_id)
                .execute(db)
                .await?;
            return Err(AppError::unprocessable("Failed to send mail"));
        }

        track_password_reset("requested");
        Ok(ResetRequested { email_delivery })
    }

    /// Consumes `token` and stores the new password for its account.
    #[instrument(skip(db, token, dto, config))]
    pub async fn reset_password(
        db: &PgPool,
        kind: AccountKind,
        token: &str,
        dto: ResetPasswordRequest,
        config: &ResetTokenConfig,
    ) -> Result<(), AppError> {
        let token_hash = hash_reset_token(token);
        let password_hash = hash_password(&dto.new_password)?;

        // Claiming the token and changing the password commit together, so a token
        // redeems at most once even under concurrent requests.
        let mut tx = db.begin().await?;
        let subject_id = sqlx::query_scalar::<_, Uuid>(
            r#"DELETE FROM reset_tokens
                WHERE token_hash = $1 AND token_type = $2 AND subject_kind = $3
                  AND created_at >= NOW() - ($4::float8 * INTERVAL '1 second')
                RETURNING subject_id"#,
        )
        .bind(&token_hash)
        .bind(RESET_PASSWORD_TOKEN_TYPE)
        .bind(kind.as_str())
        .bind(config.expiry_seconds as f64)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::unprocessable(INVALID_RESET_TOKEN))?;

        let updated = sqlx::query(&format!(
            "UPDATE {} SET password_hash = $1, updated_at = NOW() WHERE id = $2",
            kind.table()
        ))
        .bind(&password_hash)
        .bind(subject_id)
        .execute(&mut *tx)
        .await?;

        // The account is gone; the claimed token is still spent.
        tx.commit().await?;
        if updated.rows_affected() == 0 {
            return Err(AppError::unprocessable(INVALID_RESET_TOKEN));
        }

        track_password_reset("completed");
        tracing::info!(%subject_id, kind = kind.as_str(), "Password reset");
        Ok(())
    }
}

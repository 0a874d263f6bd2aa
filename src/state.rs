use campus_config::{CorsConfig, EmailConfig, JwtConfig, ResetTokenConfig};
use sqlx::PgPool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub cors_config: CorsConfig,
    pub reset_token_config: ResetTokenConfig,
}

impl AppState {
    /// Builds state around an existing pool with every other setting read from the
    /// environment.
    pub fn from_env(db: PgPool) -> Self {
        Self {
            db,
            jwt_config: JwtConfig::from_env(),
            email_config: EmailConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            reset_token_config: ResetTokenConfig::from_env(),
        }
    }
}

pub async fn init_app_state() -> Result<AppState, sqlx::Error> {
    let db = campus_db::init_db_pool().await?;
    Ok(AppState::from_env(db))
}

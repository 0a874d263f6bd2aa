use std::env;

use crate::env_or;

/// Seven days.
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 604_800;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds.
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            access_token_expiry: env_or("JWT_ACCESS_EXPIRY", DEFAULT_ACCESS_TOKEN_EXPIRY),
        }
    }

    /// Lifetime as reported to clients, e.g. `"604800s"`.
    pub fn expires_in(&self) -> String {
        format!("{}s", self.access_token_expiry)
    }
}

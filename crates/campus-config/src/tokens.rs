use crate::env_or;

#[derive(Clone, Debug)]
pub struct ResetTokenConfig {
    /// Seconds a password-reset token stays valid.
    pub expiry_seconds: i64,
}

impl Default for ResetTokenConfig {
    fn default() -> Self {
        Self {
            expiry_seconds: 604_800,
        }
    }
}

impl ResetTokenConfig {
    pub fn from_env() -> Self {
        Self {
            expiry_seconds: env_or(
                "RESET_PASSWORD_TOKEN_EXPIRY",
                Self::default().expiry_seconds,
            ),
        }
    }
}

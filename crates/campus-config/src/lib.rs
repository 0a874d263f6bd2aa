//! # Campus Config
//!
//! Configuration structures loaded from environment variables. Each concern owns
//! one struct with a `from_env()` constructor; unset or unparsable variables fall
//! back to defaults.
//!
//! - [`server`]: listen ports
//! - [`jwt`]: identity token signing and lifetime
//! - [`email`]: SMTP delivery and frontend links
//! - [`cors`]: allowed browser origins
//! - [`tokens`]: password-reset token lifetime
//!
//! ```ignore
//! use campus_config::{JwtConfig, EmailConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let email_config = EmailConfig::from_env();
//! ```

pub mod cors;
pub mod email;
pub mod jwt;
pub mod server;
pub mod tokens;

pub use cors::CorsConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;
pub use tokens::ResetTokenConfig;

/// Reads `key` and parses it, falling back to `default` when unset or invalid.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Reads a boolean flag. `true`/`1` enable it, anything else disables it.
pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| {
            let v = v.trim().to_lowercase();
            v == "true" || v == "1"
        })
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back_when_unset() {
        let value: u16 = env_or("CAMPUS_TEST_SURELY_UNSET_VARIABLE", 4242);
        assert_eq!(value, 4242);
    }

    #[test]
    fn test_env_flag_falls_back_when_unset() {
        assert!(env_flag("CAMPUS_TEST_SURELY_UNSET_FLAG", true));
        assert!(!env_flag("CAMPUS_TEST_SURELY_UNSET_FLAG", false));
    }
}

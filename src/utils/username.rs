//! Unique username allocation.
//!
//! The base is the local part of the email address. When it is taken, up to
//! [`MAX_USERNAME_ATTEMPTS`] numeric suffixes are tried, then one candidate with a
//! random alphanumeric token. If every candidate is taken the allocation fails
//! instead of looping.

use std::future::Future;

use campus_core::AppError;
use rand::{Rng, distributions::Alphanumeric};

pub const MAX_USERNAME_ATTEMPTS: usize = 10;

const TOKEN_SUFFIX_LEN: usize = 8;

/// Lowercased local part of `email` with anything outside `[a-z0-9._]` removed.
pub fn base_username(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let base: String = local
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '_')
        .collect::<String>()
        .to_lowercase();

    if base.is_empty() { "user".to_string() } else { base }
}

/// Returns the first candidate for which `is_taken` reports `false`.
pub async fn generate_username<F, Fut>(email: &str, mut is_taken: F) -> Result<String, AppError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, AppError>>,
{
    let base = base_username(email);
    if !is_taken(base.clone()).await? {
        return Ok(base);
    }

    for _ in 0..MAX_USERNAME_ATTEMPTS {
        let suffix: u32 = rand::thread_rng().gen_range(1..1000);
        let candidate = format!("{base}{suffix}");
        if !is_taken(candidate.clone()).await? {
            return Ok(candidate);
        }
    }

    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_SUFFIX_LEN)
        .map(char::from)
        .collect();
    let candidate = format!("{base}_{}", token.to_lowercase());
    if !is_taken(candidate.clone()).await? {
        return Ok(candidate);
    }

    tracing::warn!(%base, "Username candidates exhausted");
    Err(AppError::unprocessable("Could not allocate a unique username"))
}

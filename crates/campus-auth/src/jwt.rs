//! Signing and verifying identity tokens.
//!
//! Tokens are HS256 JWTs signed with `JWT_SECRET`. They expire
//! `JWT_ACCESS_EXPIRY` seconds after issue (seven days by default), and expiry is
//! checked with zero leeway.
//!
//! Decoding is a purely structural and cryptographic check: every failure (bad
//! signature, malformed token, expired token) is reported as the same
//! `Unauthorized` error.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use campus_config::JwtConfig;
use campus_core::AppError;

use crate::claims::{Claims, Identity};

/// Issues a token for `identity` that expires after the configured lifetime.
pub fn issue_token(identity: &Identity, jwt_config: &JwtConfig) -> Result<String, AppError> {
    let now = Utc::now().timestamp().max(0) as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;

    encode_claims(&Claims::new(identity, now, exp), jwt_config)
}

/// Signs an already-built claim set.
pub fn encode_claims(claims: &Claims, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(format!("Failed to create token: {e}")))
}

/// Verifies signature and expiry and returns the embedded claims.
pub fn decode_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid authentication token"))
}

//! Identity claims embedded in bearer tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Who the caller is, independent of token timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: Uuid,
    pub display_name: String,
    pub username: String,
    pub role_id: Option<Uuid>,
    pub is_employee: bool,
}

/// Decoded token payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Student or employee id
    pub sub: Uuid,
    /// Display name
    pub name: String,
    pub username: String,
    /// Role id; `None` for accounts without a role
    pub role: Option<Uuid>,
    #[serde(rename = "isEmployee")]
    pub is_employee: bool,
    /// Expiration timestamp (Unix seconds)
    pub exp: usize,
    /// Issued-at timestamp (Unix seconds)
    pub iat: usize,
}

impl Claims {
    pub fn new(identity: &Identity, iat: usize, exp: usize) -> Self {
        Self {
            sub: identity.subject_id,
            name: identity.display_name.clone(),
            username: identity.username.clone(),
            role: identity.role_id,
            is_employee: identity.is_employee,
            exp,
            iat,
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            subject_id: self.sub,
            display_name: self.name.clone(),
            username: self.username.clone(),
            role_id: self.role,
            is_employee: self.is_employee,
        }
    }
}

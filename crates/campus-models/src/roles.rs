//! Roles and their permission sets.

use std::collections::HashSet;

use campus_auth::RoleGrants;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::ids::RoleId;

/// Role assigned to newly created students when it exists.
pub const STUDENT_ROLE: &str = "STUDENT";
/// Seeded role that bypasses permission checks.
pub const SUPER_ADMIN_ROLE: &str = "SUPER ADMIN";

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub is_super_admin: bool,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoleGrants for Role {
    fn is_super_admin(&self) -> bool {
        self.is_super_admin
    }

    fn permissions(&self) -> &[String] {
        &self.permissions
    }
}

/// Rejects permission lists that name the same permission twice.
#[allow(clippy::ptr_arg)]
pub fn validate_unique_permissions(permissions: &Vec<String>) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(permissions.len());
    for permission in permissions {
        if !seen.insert(permission.as_str()) {
            let mut err = ValidationError::new("duplicate_permission");
            err.message = Some(format!("Duplicate permission: {permission}").into());
            return Err(err);
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleDto {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub is_super_admin: bool,
    #[serde(default)]
    #[validate(custom(function = "validate_unique_permissions"))]
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleDto {
    #[validate(length(min = 1, max = 100, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub is_super_admin: Option<bool>,
    #[validate(custom(function = "validate_unique_permissions"))]
    pub permissions: Option<Vec<String>>,
}

/// The caller's own grants.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelfPermissions {
    pub role: String,
    pub is_super_admin: bool,
    pub permissions: Vec<String>,
}

impl From<Role> for SelfPermissions {
    fn from(role: Role) -> Self {
        Self {
            role: role.name,
            is_super_admin: role.is_super_admin,
            permissions: role.permissions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_permissions_pass() {
        let perms = vec!["READ".to_string(), "student.student.create".to_string()];
        assert!(validate_unique_permissions(&perms).is_ok());
    }

    #[test]
    fn test_duplicate_permissions_fail() {
        let perms = vec![
            "role.role.read".to_string(),
            "role.role.update".to_string(),
            "role.role.read".to_string(),
        ];
        let err = validate_unique_permissions(&perms).unwrap_err();
        assert_eq!(err.code, "duplicate_permission");
    }

    #[test]
    fn test_create_dto_validation_reports_duplicates() {
        let dto: CreateRoleDto = serde_json::from_value(serde_json::json!({
            "name": "clerk",
            "permissions": ["READ", "READ"]
        }))
        .unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("permissions"));
    }

    #[test]
    fn test_create_dto_defaults() {
        let dto: CreateRoleDto =
            serde_json::from_value(serde_json::json!({ "name": "viewer" })).unwrap();
        assert!(!dto.is_super_admin);
        assert!(dto.permissions.is_empty());
        assert!(dto.validate().is_ok());
    }
}

//! The caller's own account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::employees::Employee;
use crate::students::Student;
use crate::validate_phone;

/// Students and employees share the profile endpoints.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum Profile {
    Student(Student),
    Employee(Employee),
}

/// Personal fields a caller may change on their own record.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 100, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "Last name is too long"))]
    pub last_name: Option<String>,
    #[validate(length(max = 100, message = "Father's name is too long"))]
    pub fathers_name: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub mobile: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub alternative_mobile: Option<String>,
    pub dob: Option<DateTime<Utc>>,
}

impl UpdateProfileDto {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.fathers_name.is_none()
            && self.mobile.is_none()
            && self.alternative_mobile.is_none()
            && self.dob.is_none()
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub cnf_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_change_password_mismatch() {
        let dto: ChangePasswordDto = serde_json::from_value(json!({
            "password": "old",
            "newPassword": "secret123",
            "cnfPassword": "secret321"
        }))
        .unwrap();
        assert!(dto.validate().unwrap_err().field_errors().contains_key("cnf_password"));
    }

    #[test]
    fn test_empty_profile_update() {
        assert!(UpdateProfileDto::default().is_empty());
        let dto = UpdateProfileDto {
            mobile: Some("9876543210".into()),
            ..Default::default()
        };
        assert!(!dto.is_empty());
    }
}

//! Login, password reset, and account credential shapes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Token type stored with password-reset tokens.
pub const RESET_PASSWORD_TOKEN_TYPE: &str = "reset-password";

/// Which account table a login or reset targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Student,
    Employee,
}

impl AccountKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Employee => "employee",
        }
    }

    pub const fn table(self) -> &'static str {
        match self {
            Self::Student => "students",
            Self::Employee => "employees",
        }
    }

    pub const fn is_employee(self) -> bool {
        matches!(self, Self::Employee)
    }
}

/// The columns login and password flows need from either account table.
#[derive(Debug, Clone, FromRow)]
pub struct AccountCredentials {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: Option<Uuid>,
}

impl AccountCredentials {
    pub fn display_name(&self) -> String {
        match self.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}

/// Outcome of an outbound email attached to an otherwise successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Failed,
    Disabled,
}

impl DeliveryStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Disabled => "disabled",
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
}

/// Reset request outcome. `failed` never appears here: a failed send is an error.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequested {
    pub email_delivery: DeliveryStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub cnf_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(last_name: Option<&str>) -> AccountCredentials {
        AccountCredentials {
            id: Uuid::new_v4(),
            first_name: "Asha".to_string(),
            last_name: last_name.map(String::from),
            username: "asha".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: String::new(),
            role_id: None,
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(credentials(Some("Rao")).display_name(), "Asha Rao");
        assert_eq!(credentials(Some("  ")).display_name(), "Asha");
        assert_eq!(credentials(None).display_name(), "Asha");
    }

    #[test]
    fn test_reset_request_mismatch_is_invalid() {
        let req: ResetPasswordRequest = serde_json::from_value(serde_json::json!({
            "newPassword": "secret123",
            "cnfPassword": "secret124"
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("cnf_password"));
    }

    #[test]
    fn test_login_response_keys() {
        let body = serde_json::to_value(LoginResponse {
            token: "t".into(),
            token_type: "Bearer Token".into(),
            expires_in: "604800s".into(),
        })
        .unwrap();
        assert_eq!(body["tokenType"], "Bearer Token");
        assert_eq!(body["expiresIn"], "604800s");
    }

    #[test]
    fn test_delivery_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(DeliveryStatus::Failed).unwrap(),
            serde_json::json!("failed")
        );
    }
}

use campus_core::PageMeta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::DeliveryStatus;
use crate::ids::{DepartmentId, EmployeeId, RoleId};
use crate::{NamedRef, validate_phone};

/// Flat read of an employee joined with its department and role.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeRow {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub fathers_name: Option<String>,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub alternative_mobile: Option<String>,
    pub dob: Option<DateTime<Utc>>,
    pub bio: Option<String>,
    pub department_id: Option<Uuid>,
    pub department_name: Option<String>,
    pub role_id: Option<Uuid>,
    pub role_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub fathers_name: Option<String>,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub alternative_mobile: Option<String>,
    pub dob: Option<DateTime<Utc>>,
    pub bio: Option<String>,
    pub department: Option<NamedRef>,
    pub role: Option<NamedRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            fathers_name: row.fathers_name,
            username: row.username,
            email: row.email,
            mobile: row.mobile,
            alternative_mobile: row.alternative_mobile,
            dob: row.dob,
            bio: row.bio,
            department: NamedRef::from_parts(row.department_id, row.department_name),
            role: NamedRef::from_parts(row.role_id, row.role_name),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeDto {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(max = 100, message = "Last name is too long"))]
    pub last_name: Option<String>,
    #[validate(length(max = 100, message = "Father's name is too long"))]
    pub fathers_name: Option<String>,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub mobile: String,
    #[validate(custom(function = "validate_phone"))]
    pub alternative_mobile: Option<String>,
    pub dob: Option<DateTime<Utc>>,
    #[validate(length(max = 2000, message = "Bio is too long"))]
    pub bio: Option<String>,
    pub department: Option<DepartmentId>,
    pub role: RoleId,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeDto {
    #[validate(length(min = 1, max = 100, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "Last name is too long"))]
    pub last_name: Option<String>,
    #[validate(length(max = 100, message = "Father's name is too long"))]
    pub fathers_name: Option<String>,
    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub mobile: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub alternative_mobile: Option<String>,
    pub dob: Option<DateTime<Utc>>,
    #[validate(length(max = 2000, message = "Bio is too long"))]
    pub bio: Option<String>,
    pub department: Option<DepartmentId>,
    pub role: Option<RoleId>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeePage {
    pub employees: Vec<Employee>,
    pub meta: PageMeta,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEmployee {
    #[serde(flatten)]
    pub employee: Employee,
    pub email_delivery: DeliveryStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_dto_requires_role() {
        let result: Result<CreateEmployeeDto, _> = serde_json::from_value(json!({
            "firstName": "Ravi",
            "email": "ravi@example.com",
            "mobile": "9876543210"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_row_without_role_has_no_role_ref() {
        let row = EmployeeRow {
            id: EmployeeId::new(),
            first_name: "Ravi".into(),
            last_name: Some("Kumar".into()),
            fathers_name: None,
            username: "ravi".into(),
            email: "ravi@example.com".into(),
            mobile: "9876543210".into(),
            alternative_mobile: None,
            dob: None,
            bio: None,
            department_id: None,
            department_name: None,
            role_id: None,
            role_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let employee = Employee::from(row);
        assert!(employee.role.is_none());
        let value = serde_json::to_value(employee).unwrap();
        assert!(value["role"].is_null());
        assert_eq!(value["lastName"], "Kumar");
    }
}

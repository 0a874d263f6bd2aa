use campus_core::PageMeta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::DeliveryStatus;
use crate::ids::{ClassId, DepartmentId, RoleId, StudentId};
use crate::{NamedRef, validate_phone};

/// Flat read of a student joined with its class and department.
#[derive(Debug, Clone, FromRow)]
pub struct StudentRow {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub fathers_name: Option<String>,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub alternative_mobile: Option<String>,
    pub dob: Option<DateTime<Utc>>,
    pub class_id: Option<Uuid>,
    pub class_name: Option<String>,
    pub department_id: Option<Uuid>,
    pub department_name: Option<String>,
    pub role_id: Option<RoleId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub fathers_name: Option<String>,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub alternative_mobile: Option<String>,
    pub dob: Option<DateTime<Utc>>,
    pub class: Option<NamedRef>,
    pub department: Option<NamedRef>,
    pub role: Option<RoleId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
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
            class: NamedRef::from_parts(row.class_id, row.class_name),
            department: NamedRef::from_parts(row.department_id, row.department_name),
            role: row.role_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentDto {
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
    pub class: Option<ClassId>,
    pub department: Option<DepartmentId>,
}

/// Editable student fields. Email, username and password are fixed here.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentDto {
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
    pub class: Option<ClassId>,
    pub department: Option<DepartmentId>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentPage {
    pub students: Vec<Student>,
    pub meta: PageMeta,
}

/// A new student plus the outcome of the welcome email.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedStudent {
    #[serde(flatten)]
    pub student: Student,
    pub email_delivery: DeliveryStatus,
}

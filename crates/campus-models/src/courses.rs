use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::NamedRef;
use crate::ids::{CourseId, DepartmentId};

#[derive(Debug, Clone, FromRow)]
pub struct CourseRow {
    pub id: CourseId,
    pub name: String,
    pub description: Option<String>,
    pub eligibility: Option<String>,
    pub opportunities: Vec<String>,
    pub images: Vec<String>,
    pub department_id: Uuid,
    pub department_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub description: Option<String>,
    pub eligibility: Option<String>,
    pub opportunities: Vec<String>,
    pub images: Vec<String>,
    pub department: NamedRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            eligibility: row.eligibility,
            opportunities: row.opportunities,
            images: row.images,
            department: NamedRef {
                id: row.department_id,
                name: row.department_name,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 150, message = "Name is required"))]
    pub name: String,
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,
    pub eligibility: Option<String>,
    #[serde(default)]
    pub opportunities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub department: DepartmentId,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, max = 150, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,
    pub eligibility: Option<String>,
    pub opportunities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub department: Option<DepartmentId>,
}

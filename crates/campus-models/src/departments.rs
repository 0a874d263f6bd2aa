use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::DepartmentId;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for both creating and renaming a department.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DepartmentDto {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
}

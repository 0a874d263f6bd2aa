use campus_core::PageMeta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::ids::ExamId;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: ExamId,
    pub name: String,
    pub session: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Checks an academic session of the form `YYYY-YYYY` whose end year is the start
/// year or the one after it.
pub fn validate_session(session: &str) -> Result<(), ValidationError> {
    let invalid = || {
        let mut err = ValidationError::new("session_format");
        err.message = Some("Session must look like 2023-2024".into());
        err
    };

    let (start, end) = session.split_once('-').ok_or_else(invalid)?;
    let is_year = |s: &str| s.len() == 4 && s.chars().all(|c| c.is_ascii_digit());
    if !is_year(start) || !is_year(end) {
        return Err(invalid());
    }

    let start: i32 = start.parse().map_err(|_| invalid())?;
    let end: i32 = end.parse().map_err(|_| invalid())?;
    if (0..=1).contains(&(end - start)) {
        Ok(())
    } else {
        Err(invalid())
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExamDto {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(custom(function = "validate_session"))]
    pub session: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateExamDto {
    #[validate(length(min = 1, max = 100, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_session"))]
    pub session: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExamPage {
    pub exams: Vec<Exam>,
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_sessions() {
        assert!(validate_session("2023-2024").is_ok());
        assert!(validate_session("2024-2024").is_ok());
    }

    #[test]
    fn test_invalid_sessions() {
        for session in ["2023-2025", "2024-2023", "23-24", "2023/2024", "2023-24", "abcd-efgh", ""] {
            assert!(validate_session(session).is_err(), "{session}");
        }
    }

    #[test]
    fn test_update_dto_skips_absent_session() {
        let dto = UpdateExamDto {
            name: Some("FINALS".to_string()),
            session: None,
        };
        assert!(dto.validate().is_ok());
    }
}

//! # Campus Models
//!
//! Database rows, request DTOs and response shapes for the Campus API.
//!
//! Request and response bodies use camelCase keys; database rows use the snake_case
//! column names. Joined reads are fetched into flat `*Row` structs and converted
//! into nested response types.
//!
//! - [`ids`]: typed entity ids
//! - [`auth`]: login, password reset, and account credential shapes
//! - [`roles`], [`departments`], [`classes`], [`courses`], [`exams`], [`subjects`]
//! - [`students`], [`employees`], [`profile`]

pub mod auth;
pub mod classes;
pub mod courses;
pub mod departments;
pub mod employees;
pub mod exams;
pub mod ids;
pub mod profile;
pub mod roles;
pub mod students;
pub mod subjects;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::ValidationError;

pub use ids::{ClassId, CourseId, DepartmentId, EmployeeId, ExamId, RoleId, StudentId, SubjectId};

/// A referenced entity reduced to its id and name, as embedded in joined reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NamedRef {
    pub id: Uuid,
    pub name: String,
}

impl NamedRef {
    /// Builds a reference from the nullable columns of a LEFT JOIN.
    pub fn from_parts(id: Option<Uuid>, name: Option<String>) -> Option<Self> {
        Some(Self { id: id?, name: name? })
    }
}

/// Trims, and uppercases names that are stored in canonical form.
pub fn canonical_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Accepts 7 to 15 digits with an optional leading `+`.
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let digits = value.strip_prefix('+').unwrap_or(value);
    if (7..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone");
        err.message = Some("Invalid mobile number".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("+919876543210").is_ok());
        assert!(validate_phone("98765").is_err());
        assert!(validate_phone("98765-43210").is_err());
    }

    #[test]
    fn test_named_ref_requires_both_parts() {
        let id = Uuid::new_v4();
        assert!(NamedRef::from_parts(Some(id), None).is_none());
        assert!(NamedRef::from_parts(None, Some("BCA".into())).is_none());
        assert_eq!(
            NamedRef::from_parts(Some(id), Some("BCA".into())),
            Some(NamedRef {
                id,
                name: "BCA".into()
            })
        );
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("  bba/bca "), "BBA/BCA");
    }
}

use std::str::FromStr;

use campus_core::{AppError, ErrorKind};

/// Parses a path id, reporting a malformed value as a 422 against `param`.
pub fn parse_id<T: FromStr>(raw: &str, param: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::field(ErrorKind::UnprocessableEntity, param, "Invalid id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::ErrorDetail;
    use campus_models::StudentId;

    #[test]
    fn test_parse_valid_id() {
        let id: StudentId = parse_id("6f1c2f0e-8d4b-4c8e-9a57-1f3b2c4d5e6f", "studentId").unwrap();
        assert_eq!(id.to_string(), "6f1c2f0e-8d4b-4c8e-9a57-1f3b2c4d5e6f");
    }

    #[test]
    fn test_parse_invalid_id_names_param() {
        let err = parse_id::<StudentId>("not-an-id", "studentId").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnprocessableEntity);
        match err.detail() {
            ErrorDetail::Fields(fields) => {
                assert_eq!(fields[0].path, "studentId");
                assert_eq!(fields[0].msg, "Invalid id");
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }
}

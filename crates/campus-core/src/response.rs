//! Success envelope shared by every handler.

use axum::{Json, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::{AppError, FieldError};

/// `{ data, message, errors }` where `errors` is always empty on success.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub message: String,
    pub errors: Vec<FieldError>,
}

/// Handler return type: a status plus the JSON envelope, or an [`AppError`].
pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), AppError>;

impl<T> ApiResponse<T> {
    fn reply(status: StatusCode, data: Option<T>, message: impl Into<String>) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                data,
                message: message.into(),
                errors: Vec::new(),
            }),
        )
    }

    pub fn ok(data: T, message: impl Into<String>) -> (StatusCode, Json<Self>) {
        Self::reply(StatusCode::OK, Some(data), message)
    }

    pub fn created(data: T, message: impl Into<String>) -> (StatusCode, Json<Self>) {
        Self::reply(StatusCode::CREATED, Some(data), message)
    }

    pub fn accepted(data: T, message: impl Into<String>) -> (StatusCode, Json<Self>) {
        Self::reply(StatusCode::ACCEPTED, Some(data), message)
    }

    /// Envelope with `data: null`, used by deletes and password flows.
    pub fn empty(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Self>) {
        Self::reply(status, None, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope() {
        let (status, Json(body)) = ApiResponse::ok(vec!["READ"], "Permissions fetched");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({ "data": ["READ"], "message": "Permissions fetched", "errors": [] })
        );
    }

    #[test]
    fn test_empty_envelope_has_null_data() {
        let (status, Json(body)) = ApiResponse::<()>::empty(StatusCode::ACCEPTED, "Student deleted");
        assert_eq!(status, StatusCode::ACCEPTED);
        let value = serde_json::to_value(body).unwrap();
        assert!(value["data"].is_null());
        assert_eq!(value["errors"], json!([]));
    }

    #[test]
    fn test_created_status() {
        let (status, _) = ApiResponse::created(1, "Department created");
        assert_eq!(status, StatusCode::CREATED);
    }
}

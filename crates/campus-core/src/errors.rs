//! Application error type and its HTTP rendering.
//!
//! Every failure in the API is an [`AppError`]: an [`ErrorKind`] tag that fixes the
//! HTTP status, an [`ErrorDetail`] payload that becomes the `errors` field of the
//! envelope, and an optional context message supplied by the handler that caught it.
//!
//! ```ignore
//! use campus_core::errors::{AppError, ResultExt};
//!
//! let err = AppError::field(ErrorKind::Unauthorized, "password", "Incorrect password");
//! let result: Result<(), AppError> = Err(err);
//! result.with_message("Login failed")?;
//! ```

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// The closed set of failure categories, each bound to one HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    UnprocessableEntity,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message used when no handler attached its own.
    const fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "Validation failed",
            Self::Unauthorized | Self::Forbidden => "Access denied",
            Self::NotFound => "Resource not found",
            Self::UnprocessableEntity => "Request could not be processed",
            Self::Internal => "Something went wrong",
        }
    }
}

/// A single field-level problem, rendered as `{ "path": ..., "msg": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub path: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            msg: msg.into(),
        }
    }
}

/// Payload of the `errors` envelope field: either a plain string or a list of
/// field errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Fields(Vec<FieldError>),
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(msg) => f.write_str(msg),
            Self::Fields(fields) => {
                let joined = fields
                    .iter()
                    .map(|e| format!("{}: {}", e.path, e.msg))
                    .collect::<Vec<_>>()
                    .join(", ");
                f.write_str(&joined)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{kind:?}: {detail}")]
pub struct AppError {
    kind: ErrorKind,
    detail: ErrorDetail,
    context: Option<String>,
}

impl AppError {
    pub fn new(kind: ErrorKind, detail: ErrorDetail) -> Self {
        Self {
            kind,
            detail,
            context: None,
        }
    }

    pub fn message(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self::new(kind, ErrorDetail::Message(msg.into()))
    }

    pub fn fields(kind: ErrorKind, fields: Vec<FieldError>) -> Self {
        Self::new(kind, ErrorDetail::Fields(fields))
    }

    /// Shorthand for an error carrying exactly one field error.
    pub fn field(kind: ErrorKind, path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::fields(kind, vec![FieldError::new(path, msg)])
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::message(ErrorKind::BadRequest, msg)
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::message(ErrorKind::Unauthorized, msg)
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::message(ErrorKind::Forbidden, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::message(ErrorKind::NotFound, msg)
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::message(ErrorKind::UnprocessableEntity, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::message(ErrorKind::Internal, msg)
    }

    /// Attaches the handler's context message unless one is already present.
    #[must_use]
    pub fn with_message(mut self, context: impl Into<String>) -> Self {
        if self.context.is_none() {
            self.context = Some(context.into());
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn detail(&self) -> &ErrorDetail {
        &self.detail
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Renders the envelope body without consuming the error.
    pub fn body(&self) -> ErrorBody {
        let message = self
            .context
            .clone()
            .unwrap_or_else(|| self.kind.default_message().to_string());

        let errors = match self.kind {
            ErrorKind::Internal => ErrorDetail::Message("Internal server error".to_string()),
            _ => self.detail.clone(),
        };

        ErrorBody {
            data: None,
            message,
            errors,
        }
    }
}

/// Failure envelope: `{ data: null, message, errors }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
    pub message: String,
    pub errors: ErrorDetail,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(
                status = %status.as_u16(),
                context = ?self.context,
                detail = %self.detail,
                "Request failed"
            );
        } else {
            tracing::debug!(
                status = %status.as_u16(),
                detail = %self.detail,
                "Request rejected"
            );
        }

        (status, Json(self.body())).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::internal(format!("database error: {err}"))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let msg = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid"));
                    FieldError::new(camel_case(field), msg)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.path.cmp(&b.path));

        Self::fields(ErrorKind::BadRequest, fields)
    }
}

/// Request bodies use camelCase keys while validator reports Rust field names.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Adds a handler context message to a failed result.
pub trait ResultExt<T> {
    fn with_message(self, context: &str) -> Result<T, AppError>;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn with_message(self, context: &str) -> Result<T, AppError> {
        self.map_err(|e| e.with_message(context))
    }
}

/// Collects field-level rule violations (uniqueness, existence, cross-field
/// checks) before any mutation runs.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldError>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, msg: impl Into<String>) {
        self.0.push(FieldError::new(path, msg));
    }

    /// Records a violation when `failed` is true.
    pub fn check(&mut self, failed: bool, path: &str, msg: &str) {
        if failed {
            self.push(path, msg);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` when nothing was recorded, otherwise a 400 carrying every violation.
    pub fn finish(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::fields(ErrorKind::BadRequest, self.0))
        }
    }
}

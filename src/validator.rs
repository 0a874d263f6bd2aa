use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use campus_core::{AppError, ErrorKind};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body extractor that runs `validator` rules before the handler sees the
/// value. Every failure is a 400 with the `{ path, msg }` error array.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

fn missing_field(body_text: &str) -> Option<&str> {
    body_text
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    let body_text = rejection.body_text();

    if let Some(field) = missing_field(&body_text) {
        return AppError::field(ErrorKind::BadRequest, field, format!("{field} is required"));
    }

    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::bad_request("Missing 'Content-Type: application/json' header")
        }
        JsonRejection::JsonDataError(_) => AppError::bad_request("Invalid field type in request"),
        _ => AppError::bad_request("Invalid request body"),
    }
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

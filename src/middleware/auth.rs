use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use campus_auth::{Claims, Identity, decode_token};
use campus_config::JwtConfig;
use campus_core::AppError;
use uuid::Uuid;

use crate::state::AppState;

/// The authenticated caller.
///
/// Protected routers run [`authorize_request`](super::authorize::authorize_request),
/// which stores the caller in the request extensions; handlers then pick it up
/// from there without decoding the token a second time.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn subject_id(&self) -> Uuid {
        self.0.sub
    }

    pub fn role_id(&self) -> Option<Uuid> {
        self.0.role
    }

    pub fn is_employee(&self) -> bool {
        self.0.is_employee
    }

    pub fn identity(&self) -> Identity {
        self.0.identity()
    }
}

/// Reads the bearer token from `Authorization` and decodes it.
///
/// A missing header fails before any decoding; a header that is present but
/// not a well-formed bearer credential counts as an invalid token.
pub async fn authenticate(parts: &mut Parts, jwt_config: &JwtConfig) -> Result<AuthUser, AppError> {
    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, &())
            .await
            .map_err(|rejection| {
                if rejection.is_missing() {
                    AppError::unauthorized("Authentication failed")
                } else {
                    AppError::unauthorized("Invalid authentication token")
                }
            })?;

    let claims = decode_token(bearer.token(), jwt_config)?;
    Ok(AuthUser(claims))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        authenticate(parts, &state.jwt_config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, header};
    use campus_auth::issue_token;
    use campus_core::ErrorDetail;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "middleware-test-secret".to_string(),
            access_token_expiry: 3600,
        }
    }

    fn parts_with(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/profile");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    fn detail_message(err: &AppError) -> String {
        match err.detail() {
            ErrorDetail::Message(msg) => msg.clone(),
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_header_is_authentication_failure() {
        let mut parts = parts_with(None);
        let err = authenticate(&mut parts, &jwt_config()).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(detail_message(&err), "Authentication failed");
    }

    #[tokio::test]
    async fn test_non_bearer_header_is_invalid_token() {
        let mut parts = parts_with(Some("Basic dXNlcjpwYXNz"));
        let err = authenticate(&mut parts, &jwt_config()).await.unwrap_err();
        assert_eq!(detail_message(&err), "Invalid authentication token");
    }

    #[tokio::test]
    async fn test_valid_token_yields_identity() {
        let identity = Identity {
            subject_id: Uuid::new_v4(),
            display_name: "Asha".to_string(),
            username: "asha".to_string(),
            role_id: Some(Uuid::new_v4()),
            is_employee: false,
        };
        let token = issue_token(&identity, &jwt_config()).unwrap();
        let mut parts = parts_with(Some(&format!("Bearer {token}")));

        let user = authenticate(&mut parts, &jwt_config()).await.unwrap();
        assert_eq!(user.identity(), identity);
        assert!(!user.is_employee());
    }
}

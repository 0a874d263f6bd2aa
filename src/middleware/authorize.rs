use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use campus_auth::{AccessDenied, evaluate};
use campus_core::AppError;
use campus_models::RoleId;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::metrics::track_authorization_check;
use crate::middleware::auth::authenticate;
use crate::middleware::route_permissions::{RouteAccess, route_access};
use crate::modules::roles::service::RoleService;
use crate::state::AppState;

/// Loads the caller's role and checks it grants `required`.
///
/// A role id that does not resolve (absent from the token or deleted since the
/// token was issued) is Unauthorized; a resolved role without the permission is
/// Forbidden. Lookup errors stay internal.
#[instrument(skip(db))]
pub async fn authorize(db: &PgPool, required: &str, role_id: Option<Uuid>) -> Result<(), AppError> {
    let role = match role_id {
        Some(id) => RoleService::find_by_id(db, RoleId::from(id)).await?,
        None => None,
    };

    let decision = evaluate(required, role.as_ref());
    track_authorization_check(decision.is_ok(), required);

    decision.map_err(|denied| {
        tracing::warn!(
            required,
            role_id = ?role_id,
            reason = %denied,
            "Permission check failed"
        );
        AppError::from(denied)
    })
}

/// Authenticates every request on a protected router, then applies the route's
/// entry in the access table. A matched route with no entry is Forbidden.
pub async fn authorize_request(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let user = authenticate(&mut parts, &state.jwt_config).await?;

    let matched_path = parts
        .extensions
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned());

    let access = matched_path
        .as_deref()
        .and_then(|path| route_access(&parts.method, path));

    match access {
        Some(RouteAccess::Permission(required)) => {
            authorize(&state.db, required, user.role_id()).await?;
        }
        Some(RouteAccess::AuthenticatedOnly) => {}
        None => {
            tracing::error!(
                method = %parts.method,
                path = ?matched_path,
                "Protected route has no access entry"
            );
            return Err(AppError::from(AccessDenied::MissingPermission));
        }
    }

    parts.extensions.insert(user);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::authorize::authorize_request;
use crate::modules::{
    auth::init_auth_router, classes::init_classes_router, courses::init_courses_router,
    departments::init_departments_router, employees::init_employees_router,
    exams::init_exams_router, profile::init_profile_router, roles::init_roles_router,
    students::init_students_router, subjects::init_subjects_router,
};
use crate::state::AppState;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

/// Every router behind bearer authentication. Routes listed in the permission
/// table are additionally authorized against the caller's role.
fn protected_router() -> Router<AppState> {
    Router::new()
        .merge(init_students_router())
        .merge(init_employees_router())
        .merge(init_departments_router())
        .merge(init_classes_router())
        .merge(init_courses_router())
        .merge(init_exams_router())
        .merge(init_subjects_router())
        .merge(init_roles_router())
        .merge(init_profile_router())
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    let protected = protected_router().route_layer(middleware::from_fn_with_state(
        state.clone(),
        authorize_request,
    ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(init_auth_router())
        .merge(protected)
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

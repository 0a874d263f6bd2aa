use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{
    employee_login, employee_request_reset, employee_reset_password, student_login,
    student_request_reset, student_reset_password,
};

/// Public routes; nothing here sits behind the authorize layer.
pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/student/login", post(student_login))
        .route("/auth/employee/login", post(employee_login))
        .route("/auth/student/reset-password", post(student_request_reset))
        .route("/auth/employee/reset-password", post(employee_request_reset))
        .route(
            "/auth/student/reset-password/{token}",
            post(student_reset_password),
        )
        .route(
            "/auth/employee/reset-password/{token}",
            post(employee_reset_password),
        )
}

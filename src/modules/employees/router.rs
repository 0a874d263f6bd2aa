use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

use super::controller::{create_employee, delete_employee, get_employee, get_employees, update_employee};

pub fn init_employees_router() -> Router<AppState> {
    Router::new()
        .route("/employee/create", post(create_employee))
        .route("/employee/getall", get(get_employees))
        .route("/employee/get/{employeeId}", get(get_employee))
        .route("/employee/update/{employeeId}", patch(update_employee))
        .route("/employee/delete/{employeeId}", delete(delete_employee))
}

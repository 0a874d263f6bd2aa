use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    create_department, delete_department, get_department, get_departments, update_department,
};

pub fn init_departments_router() -> Router<AppState> {
    Router::new()
        .route("/department/create", post(create_department))
        .route("/department/getall", get(get_departments))
        .route("/department/get/{departmentId}", get(get_department))
        .route("/department/update/{departmentId}", patch(update_department))
        .route("/department/delete/{departmentId}", delete(delete_department))
}

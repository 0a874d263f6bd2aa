use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    create_class, delete_class, get_class, get_classes, get_classes_by_department, update_class,
};

pub fn init_classes_router() -> Router<AppState> {
    Router::new()
        .route("/class/create", post(create_class))
        .route("/class/getall", get(get_classes))
        .route(
            "/class/get-by-department/{departmentId}",
            get(get_classes_by_department),
        )
        .route("/class/get/{classId}", get(get_class))
        .route("/class/update/{classId}", patch(update_class))
        .route("/class/delete/{classId}", delete(delete_class))
}

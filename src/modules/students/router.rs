use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

use super::controller::{create_student, delete_student, get_student, get_students, update_student};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/student/create", post(create_student))
        .route("/student/getall", get(get_students))
        .route("/student/get/{studentId}", get(get_student))
        .route("/student/update/{studentId}", patch(update_student))
        .route("/student/delete/{studentId}", delete(delete_student))
}

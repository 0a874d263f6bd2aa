use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    create_course, delete_course, get_course, get_courses, get_courses_by_department,
    update_course,
};

pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/course/create", post(create_course))
        .route("/course/getall", get(get_courses))
        .route(
            "/course/get-by-department/{departmentId}",
            get(get_courses_by_department),
        )
        .route("/course/get/{courseId}", get(get_course))
        .route("/course/update/{courseId}", patch(update_course))
        .route("/course/delete/{courseId}", delete(delete_course))
}

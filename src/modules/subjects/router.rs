use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    create_subject, delete_subject, get_subject, get_subjects, get_subjects_by_class,
    update_subject,
};

pub fn init_subjects_router() -> Router<AppState> {
    Router::new()
        .route("/subject/add-new", post(create_subject))
        .route("/subject/getall", get(get_subjects))
        .route("/subject/getall/{classId}", get(get_subjects_by_class))
        .route("/subject/get/{subjectId}", get(get_subject))
        .route("/subject/update/{subjectId}", patch(update_subject))
        .route("/subject/delete/{subjectId}", delete(delete_subject))
}

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    create_exam, delete_exam, get_exam, get_exams, get_exams_by_session, update_exam,
};

pub fn init_exams_router() -> Router<AppState> {
    Router::new()
        .route("/exam/add-new", post(create_exam))
        .route("/exam/getall", get(get_exams))
        .route("/exam/getall/{session}", get(get_exams_by_session))
        .route("/exam/get/{examId}", get(get_exam))
        .route("/exam/update/{examId}", patch(update_exam))
        .route("/exam/delete/{examId}", delete(delete_exam))
}

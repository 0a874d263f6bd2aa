use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{change_password, get_profile, update_profile};

pub fn init_profile_router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/profile/update", post(update_profile))
        .route("/profile/change-password", post(change_password))
}

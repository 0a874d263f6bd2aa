use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    create_role, delete_role, get_role, get_roles, get_self_permissions, update_role,
};

pub fn init_roles_router() -> Router<AppState> {
    Router::new()
        .route("/role", get(get_roles))
        .route("/role/create", post(create_role))
        .route("/role/get-permissions/self", get(get_self_permissions))
        .route("/role/{roleId}", get(get_role))
        .route("/role/update/{roleId}", patch(update_role))
        .route("/role/delete/{roleId}", delete(delete_role))
}

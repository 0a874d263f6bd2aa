//! Request authentication and authorization.
//!
//! - [`auth`]: the [`AuthUser`](auth::AuthUser) extractor and bearer-token decoding
//! - [`route_permissions`]: the declarative route → permission table
//! - [`authorize`]: the middleware that applies both to protected routers
//!
//! ```ignore
//! Router::new()
//!     .merge(init_students_router())
//!     .route_layer(middleware::from_fn_with_state(state.clone(), authorize_request));
//! ```

pub mod auth;
pub mod authorize;
pub mod route_permissions;

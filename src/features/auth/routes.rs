use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::auth::handlers::{self, AuthState};
use crate::features::auth::services::AuthService;
use crate::features::users::services::UserService;

/// Public auth routes: registration and login
pub fn public_routes(
    auth_service: Arc<AuthService>,
    user_service: Arc<UserService>,
) -> Router {
    let state = AuthState {
        auth_service,
        user_service,
    };

    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .with_state(state)
}

/// Protected auth routes (require auth middleware applied by the caller)
pub fn protected_routes(
    auth_service: Arc<AuthService>,
    user_service: Arc<UserService>,
) -> Router {
    let state = AuthState {
        auth_service,
        user_service,
    };

    Router::new()
        .route("/api/auth/worker", post(handlers::create_worker))
        .route("/api/auth/me", get(handlers::me))
        .with_state(state)
}

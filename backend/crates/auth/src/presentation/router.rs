//! Auth Router

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use platform::clock::{Clock, SystemClock};

use crate::application::config::AuthConfig;
use crate::domain::repository::UserStore;
use crate::infra::postgres::PgUserStore;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{require_admin, require_sign_in};

/// Create the Auth router with the PostgreSQL store
pub fn auth_router(store: PgUserStore, config: AuthConfig) -> Router {
    auth_router_generic(store, config, Arc::new(SystemClock))
}

/// Create a generic Auth router for any store implementation
pub fn auth_router_generic<S>(store: S, config: AuthConfig, clock: Arc<dyn Clock>) -> Router
where
    S: UserStore + Send + Sync + 'static,
{
    let state = AuthAppState::new(store, config, clock);

    let signed_in = Router::new()
        .route("/user-auth", get(handlers::user_auth))
        .route("/profile", put(handlers::update_profile::<S>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_sign_in::<S>,
        ));

    let admin = Router::new()
        .route("/admin-auth", get(handlers::admin_auth))
        .route("/test", get(handlers::protected_test))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin::<S>,
        ));

    Router::new()
        .route("/register", post(handlers::register::<S>))
        .route("/login", post(handlers::login::<S>))
        .route("/forgot-password", post(handlers::forgot_password::<S>))
        .merge(signed_in)
        .merge(admin)
        .with_state(state)
}

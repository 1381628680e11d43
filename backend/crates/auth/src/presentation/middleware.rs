//! Auth Middleware
//!
//! Runs the auth gate in front of protected routes. On success the
//! [`Principal`] is inserted into request extensions for the handler.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;

use crate::application::gate::{ADMIN_ONLY, GateOutcome, Rejection, RequestContext, SIGNED_IN, Stage};
use crate::domain::repository::UserStore;
use crate::presentation::handlers::AuthAppState;

/// Header telling the client to show the sign-in page
pub const AUTH_REQUIRED_HEADER: &str = "X-Auth-Required";

/// Require a valid identity token
pub async fn require_sign_in<S>(
    State(state): State<AuthAppState<S>>,
    req: Request,
    next: Next,
) -> Response
where
    S: UserStore + Send + Sync + 'static,
{
    run_gate(&state, SIGNED_IN, req, next).await
}

/// Require a valid identity token belonging to an administrator
pub async fn require_admin<S>(
    State(state): State<AuthAppState<S>>,
    req: Request,
    next: Next,
) -> Response
where
    S: UserStore + Send + Sync + 'static,
{
    run_gate(&state, ADMIN_ONLY, req, next).await
}

async fn run_gate<S>(
    state: &AuthAppState<S>,
    stages: &[Stage],
    mut req: Request,
    next: Next,
) -> Response
where
    S: UserStore + Send + Sync + 'static,
{
    let ctx = RequestContext::from_headers(req.headers());

    match state.gate.evaluate(ctx, stages).await {
        GateOutcome::Continue(ctx) => {
            if let Some(principal) = ctx.into_principal() {
                req.extensions_mut().insert(principal);
            }
            next.run(req).await
        }
        GateOutcome::Reject(rejection) => rejection.into_response(),
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self {
            Rejection::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, [(AUTH_REQUIRED_HEADER, "true")]).into_response()
            }
            Rejection::Unauthorized => AppError::forbidden("Unauthorized access").into_response(),
        }
    }
}

//! HTTP Handlers

use axum::Json;
use axum::extract::{FromRequestParts, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use std::sync::Arc;

use platform::clock::Clock;
use platform::token::TokenService;

use crate::application::config::AuthConfig;
use crate::application::gate::AuthGate;
use crate::application::{
    ResetPasswordInput, ResetPasswordUseCase, SignInInput, SignInUseCase, SignUpInput,
    SignUpUseCase, UpdateProfileInput, UpdateProfileUseCase,
};
use crate::domain::entity::principal::Principal;
use crate::domain::repository::UserStore;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AccessResponse, ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse,
    RegisterRequest, RegisterResponse, UpdateProfileRequest, UpdateProfileResponse,
};

/// Shared state for auth handlers and middleware
pub struct AuthAppState<S> {
    pub store: Arc<S>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenService>,
    pub gate: AuthGate<S>,
}

impl<S> Clone for AuthAppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
            tokens: self.tokens.clone(),
            gate: self.gate.clone(),
        }
    }
}

impl<S> AuthAppState<S>
where
    S: UserStore + Send + Sync + 'static,
{
    pub fn new(store: S, config: AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(store);
        let tokens = Arc::new(config.token_service(clock));
        let gate = AuthGate::new(tokens.clone(), store.clone(), config.lookup_timeout);

        Self {
            store,
            config: Arc::new(config),
            tokens,
            gate,
        }
    }
}

/// The Principal inserted by `require_sign_in` / `require_admin`
///
/// Rejects with 401 when a handler is mounted without the middleware.
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .ok_or(AuthError::Unauthenticated)
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /register
pub async fn register<S>(
    State(state): State<AuthAppState<S>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)>
where
    S: UserStore + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.store.clone(), state.config.clone());

    let input = SignUpInput {
        name: req.name,
        email: req.email,
        password: req.password,
        phone: req.phone,
        address: req.address,
        answer: req.answer,
    };

    let user = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "User registered successfully",
            user: user.into(),
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
pub async fn login<S>(
    State(state): State<AuthAppState<S>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    S: UserStore + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.store.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful",
        user: output.user.into(),
        token: output.token,
    }))
}

// ============================================================================
// Forgot Password
// ============================================================================

/// POST /forgot-password
pub async fn forgot_password<S>(
    State(state): State<AuthAppState<S>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    S: UserStore + Send + Sync + 'static,
{
    let use_case = ResetPasswordUseCase::new(state.store.clone(), state.config.clone());

    use_case
        .execute(ResetPasswordInput {
            email: req.email,
            answer: req.answer,
            new_password: req.new_password,
        })
        .await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Password reset successfully",
    }))
}

// ============================================================================
// Access checks
// ============================================================================

/// GET /user-auth (signed in)
pub async fn user_auth() -> Json<AccessResponse> {
    Json(AccessResponse { ok: true })
}

/// GET /admin-auth (admin)
pub async fn admin_auth() -> Json<AccessResponse> {
    Json(AccessResponse { ok: true })
}

/// GET /test (admin)
pub async fn protected_test(principal: Principal) -> &'static str {
    tracing::debug!(user_id = %principal.user_id, "Protected route reached");
    "Protected Routes"
}

// ============================================================================
// Profile
// ============================================================================

/// PUT /profile (signed in)
pub async fn update_profile<S>(
    State(state): State<AuthAppState<S>>,
    principal: Principal,
    Json(req): Json<UpdateProfileRequest>,
) -> AuthResult<Json<UpdateProfileResponse>>
where
    S: UserStore + Send + Sync + 'static,
{
    let use_case = UpdateProfileUseCase::new(state.store.clone(), state.config.clone());

    let user = use_case
        .execute(
            &principal,
            UpdateProfileInput {
                name: req.name,
                password: req.password,
                phone: req.phone,
                address: req.address,
            },
        )
        .await?;

    Ok(Json(UpdateProfileResponse {
        success: true,
        message: "Profile updated successfully",
        updated_user: user.into(),
    }))
}

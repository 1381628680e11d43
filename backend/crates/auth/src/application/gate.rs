//! Auth Gate
//!
//! Authenticates a request by its identity token and authorizes it by role,
//! before any business logic runs. Checks are stages of a pipeline over a
//! [`RequestContext`]; each stage either continues with the (possibly
//! enriched) context or short-circuits with a [`Rejection`].
//!
//! ## Fail closed
//! Every ambiguous condition denies:
//! - missing, malformed, forged or expired token → `Unauthenticated`
//! - role mismatch, unknown user, store error or store timeout → `Unauthorized`

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::HeaderMap;
use platform::header::{authorization_header, parse_authorization};
use platform::token::TokenService;

use crate::domain::entity::{principal::Principal, user::User};
use crate::domain::repository::UserStore;
use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Request Context
// ============================================================================

/// Per-request state threaded through the gate
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    authorization: Option<String>,
    principal: Option<Principal>,
}

impl RequestContext {
    /// Context carrying the raw `Authorization` header value
    pub fn new(authorization: Option<String>) -> Self {
        Self {
            authorization,
            principal: None,
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::new(authorization_header(headers).map(str::to_owned))
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn into_principal(self) -> Option<Principal> {
        self.principal
    }
}

// ============================================================================
// Outcomes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No valid identity
    Unauthenticated,
    /// Valid identity, insufficient privilege (or privilege could not be checked)
    Unauthorized,
}

#[derive(Debug)]
pub enum GateOutcome {
    Continue(RequestContext),
    Reject(Rejection),
}

impl GateOutcome {
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            GateOutcome::Continue(_) => None,
            GateOutcome::Reject(rejection) => Some(*rejection),
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            GateOutcome::Continue(ctx) => ctx.principal(),
            GateOutcome::Reject(_) => None,
        }
    }
}

/// A single gate check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RequireAuthenticated,
    RequireRole(UserRole),
}

/// Stages for routes open to every signed-in user
pub const SIGNED_IN: &[Stage] = &[Stage::RequireAuthenticated];

/// Stages for administrator routes
pub const ADMIN_ONLY: &[Stage] = &[Stage::RequireAuthenticated, Stage::RequireRole(UserRole::Admin)];

// ============================================================================
// Gate
// ============================================================================

pub struct AuthGate<S> {
    tokens: Arc<TokenService>,
    store: Arc<S>,
    lookup_timeout: Duration,
}

impl<S> Clone for AuthGate<S> {
    fn clone(&self) -> Self {
        Self {
            tokens: self.tokens.clone(),
            store: self.store.clone(),
            lookup_timeout: self.lookup_timeout,
        }
    }
}

impl<S> fmt::Debug for AuthGate<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("lookup_timeout", &self.lookup_timeout)
            .finish_non_exhaustive()
    }
}

impl<S> AuthGate<S>
where
    S: UserStore + Send + Sync + 'static,
{
    pub fn new(tokens: Arc<TokenService>, store: Arc<S>, lookup_timeout: Duration) -> Self {
        Self {
            tokens,
            store,
            lookup_timeout,
        }
    }

    /// Verify the request token and attach the Principal
    ///
    /// One verification attempt; no retry, no refresh.
    pub fn require_authenticated(&self, mut ctx: RequestContext) -> GateOutcome {
        let Some(token) = ctx.authorization.as_deref().and_then(parse_authorization) else {
            tracing::debug!("Rejected request without identity token");
            return GateOutcome::Reject(Rejection::Unauthenticated);
        };

        let verified = match self.tokens.verify(token) {
            Ok(verified) => verified,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected request with invalid identity token");
                return GateOutcome::Reject(Rejection::Unauthenticated);
            }
        };

        let user_id = match verified.subject.parse::<UserId>() {
            Ok(user_id) => user_id,
            Err(_) => {
                tracing::warn!("Rejected identity token whose subject is not a user id");
                return GateOutcome::Reject(Rejection::Unauthenticated);
            }
        };

        ctx.principal = Some(Principal::new(user_id));
        GateOutcome::Continue(ctx)
    }

    /// Require the Principal's current role to equal `required`
    ///
    /// Reads the role from the store on every call, so a demoted admin loses
    /// access even with an unexpired token.
    pub async fn require_role(&self, ctx: RequestContext, required: UserRole) -> GateOutcome {
        let Some(principal) = ctx.principal else {
            tracing::warn!(%required, "Role check reached without an authenticated principal");
            return GateOutcome::Reject(Rejection::Unauthenticated);
        };
        let user_id = principal.user_id;

        match self.lookup_user(&user_id).await {
            Ok(Some(user)) if user.role == required => GateOutcome::Continue(ctx),
            Ok(Some(user)) => {
                tracing::warn!(%user_id, %required, actual = %user.role, "Role mismatch");
                GateOutcome::Reject(Rejection::Unauthorized)
            }
            Ok(None) => {
                tracing::warn!(%user_id, %required, "Token subject has no user record");
                GateOutcome::Reject(Rejection::Unauthorized)
            }
            Err(e @ AuthError::StoreTimeout) => {
                tracing::error!(
                    %user_id,
                    error = %e,
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "User lookup timed out during role check"
                );
                GateOutcome::Reject(Rejection::Unauthorized)
            }
            Err(e) => {
                tracing::error!(%user_id, error = %e, "User lookup failed during role check");
                GateOutcome::Reject(Rejection::Unauthorized)
            }
        }
    }

    /// Fetch the user record, bounded by the lookup timeout
    async fn lookup_user(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        tokio::time::timeout(self.lookup_timeout, self.store.find_by_id(user_id))
            .await
            .map_err(|_| AuthError::StoreTimeout)?
    }

    /// Run `stages` in order, stopping at the first rejection
    pub async fn evaluate(&self, mut ctx: RequestContext, stages: &[Stage]) -> GateOutcome {
        for stage in stages {
            let outcome = match *stage {
                Stage::RequireAuthenticated => self.require_authenticated(ctx),
                Stage::RequireRole(role) => self.require_role(ctx, role).await,
            };

            match outcome {
                GateOutcome::Continue(next) => ctx = next,
                rejected => return rejected,
            }
        }

        GateOutcome::Continue(ctx)
    }
}

// ============================================================================
// Tests
// ============================================================================

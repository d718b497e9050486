use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::validate_jwt;
use crate::config::AccessMode;
use crate::error::ApiError;
use crate::policy::{LeadAction, Policy};

pub const SESSION_COOKIE: &str = "session";

/// The signed-in user for the current request, injected by `session_middleware`
#[derive(Clone, Debug)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
    pub policy: Policy,
}

impl Identity {
    pub fn organization_id(&self) -> Uuid {
        self.policy.organization_id()
    }

    /// Gate a lead action; refusals go back to the login page
    pub fn require(&self, mode: AccessMode, action: LeadAction) -> Result<(), ApiError> {
        if self.policy.permits(mode, action) {
            return Ok(());
        }
        tracing::warn!(
            "User '{}' ({}) refused {:?} in {:?} mode",
            self.username,
            self.user_id,
            action,
            mode
        );
        Err(ApiError::login_required("Organiser access required"))
    }

    pub fn require_organiser(&self) -> Result<(), ApiError> {
        self.require(AccessMode::Protected, LeadAction::Manage)
    }
}

/// Resolve the session token into an `Identity`, or redirect to the login page
pub async fn session_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&headers).ok_or_else(|| ApiError::login_required("Login required"))?;
    let claims = validate_jwt(&token, &state.config.security)?;

    // Re-read the user so deleted accounts and role changes take effect immediately
    let user = state
        .store
        .find_user(claims.sub)
        .await?
        .filter(|u| u.organization_id == claims.organization)
        .ok_or_else(|| {
            tracing::warn!("Session for unknown user '{}' ({})", claims.username, claims.sub);
            ApiError::login_required("Login required")
        })?;

    let policy = if user.is_organiser {
        Policy::Organiser { organization_id: user.organization_id }
    } else {
        let agent = state
            .store
            .find_agent_by_user(user.id)
            .await?
            .filter(|a| a.organization_id == user.organization_id)
            .ok_or_else(|| {
                tracing::warn!("User '{}' is neither organiser nor agent", user.username);
                ApiError::login_required("Login required")
            })?;
        Policy::Agent { organization_id: user.organization_id, agent_id: agent.id }
    };

    tracing::debug!("Session resolved: {} as {:?}", user.username, policy);

    request.extensions_mut().insert(Identity {
        user_id: user.id,
        username: user.username,
        policy,
    });

    Ok(next.run(request).await)
}

/// Session token from the `session` cookie, falling back to a Bearer header
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    })
}

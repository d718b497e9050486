// handlers/public/session.rs - GET|POST /login and POST /logout

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Redirect},
    Form,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::{generate_jwt, verify_password, AuthError, Claims};
use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::forms::{LoginForm, LOGIN_FIELDS};
use crate::middleware::{ApiResponse, ApiResult, SESSION_COOKIE};

/// GET /login - form context
pub async fn login_get() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "form": { "fields": LOGIN_FIELDS }
    })))
}

/**
 * POST /login - verify credentials and start a session
 *
 * Sets the signed session token as an HttpOnly cookie and redirects to
 * /leads. Unknown usernames and wrong passwords both answer 401 with the
 * same message.
 */
pub async fn login_post(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, ApiError> {
    let (username, password) = form.validate()?;

    let user = match state.store.find_user_by_username(&username).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Login attempt for unknown user '{}'", username);
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    if let Err(e) = verify_password(&password, &user.password_hash) {
        tracing::warn!("Failed login for '{}'", user.username);
        return Err(e.into());
    }

    let security = &state.config.security;
    let token = generate_jwt(&Claims::for_user(&user, security.session_hours()), security)?;

    tracing::info!("User '{}' ({}) logged in", user.username, user.id);

    Ok((
        [(header::SET_COOKIE, session_cookie(&token, security))],
        Redirect::to("/leads"),
    ))
}

/// POST /logout - clear the session cookie
pub async fn logout_post(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, expired_cookie(&state.config.security))],
        Redirect::to("/"),
    )
}

fn session_cookie(token: &str, security: &SecurityConfig) -> String {
    build_cookie(token, security.session_seconds(), security.secure_cookies)
}

fn expired_cookie(security: &SecurityConfig) -> String {
    build_cookie("", 0, security.secure_cookies)
}

fn build_cookie(value: &str, max_age: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, value, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

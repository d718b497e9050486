// handlers/public/signup.rs - GET|POST /signup

use axum::{extract::State, response::Redirect, Form};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::hash_password;
use crate::database::models::NewUser;
use crate::error::{ApiError, LOGIN_PATH};
use crate::forms::{SignupForm, SIGNUP_FIELDS};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /signup - form context
pub async fn signup_get(State(state): State<AppState>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "form": {
            "fields": SIGNUP_FIELDS,
            "min_password_length": state.config.security.min_password_length,
        }
    })))
}

/**
 * POST /signup - create an organization and its organiser account
 *
 * Input (urlencoded): username, email, password1, password2 and an optional
 * organization_name, which defaults to the username.
 *
 * Success redirects to /login. A taken username is 409, any other invalid
 * field is 422 with field_errors.
 */
pub async fn signup_post(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Redirect, ApiError> {
    let signup = form.validate(state.config.security.min_password_length)?;

    let account = NewUser {
        username: signup.username,
        email: signup.email,
        first_name: String::new(),
        last_name: String::new(),
        password_hash: hash_password(&signup.password)?,
    };

    let (organization, user) = state
        .store
        .create_organiser(&signup.organization_name, account)
        .await?;

    tracing::info!(
        "Signed up organiser '{}' ({}) for organization '{}' ({})",
        user.username,
        user.id,
        organization.name,
        organization.id
    );

    Ok(Redirect::to(LOGIN_PATH))
}
